//! Encoding and decoding between flattened key paths and resource ids.

use std::borrow::Cow;

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::component::PathComponent;
use crate::error::ResourceIdError;

/// Separator between positional components in the decoded byte stream.
///
/// ASCII 30 (record separator). Permanent wire contract: previously
/// issued resource ids depend on this exact value.
pub const FIELD_SEPARATOR: char = '\u{1e}';

/// Tag ahead of the decimal form of an integer identifier.
///
/// ASCII 31 (unit separator). Permanent wire contract.
pub const INT_TAG: char = '\u{1f}';

/// Encode a flattened key path as a portable resource id.
///
/// The path must hold a non-zero, even number of components (every kind
/// paired with exactly one identifier), and every component must
/// stringify to non-empty ASCII free of the two sentinel bytes.
///
/// # Errors
///
/// Fails with the malformed-key class of [`ResourceIdError`] when the
/// pairing or a component is structurally invalid.
pub fn encode(flat_path: &[PathComponent]) -> Result<String, ResourceIdError> {
    if flat_path.is_empty() {
        return Err(ResourceIdError::EmptyPath);
    }
    if flat_path.len() % 2 != 0 {
        return Err(ResourceIdError::UnpairedComponent(flat_path.len()));
    }

    let mut buf = String::new();
    for (index, component) in flat_path.iter().enumerate() {
        if index > 0 {
            buf.push(FIELD_SEPARATOR);
        }
        match component {
            PathComponent::Id(id) => {
                buf.push(INT_TAG);
                buf.push_str(&id.to_string());
            }
            PathComponent::Name(name) => {
                if name.is_empty() {
                    return Err(ResourceIdError::EmptyComponent(index / 2));
                }
                if !is_encodable(name) {
                    return Err(ResourceIdError::UnencodableComponent(name.clone()));
                }
                buf.push_str(name);
            }
        }
    }

    Ok(URL_SAFE_NO_PAD.encode(buf.as_bytes()))
}

/// Decode a resource id back into its flattened key path.
///
/// Tokens carrying the integer tag come back as [`PathComponent::Id`];
/// every other token comes back verbatim as [`PathComponent::Name`]. The
/// tag check applies uniformly to every token position, so an
/// adversarial id that tags a kind position still yields a usable token
/// list rather than a crash. Pairing of the result is not validated
/// here; key construction owns that check.
///
/// # Errors
///
/// Fails with the invalid-resource-id class of [`ResourceIdError`] when
/// the string is not decodable URL-safe base64, the payload is not
/// text, or an integer tag holds no integer.
pub fn decode(resource_id: &str) -> Result<Vec<PathComponent>, ResourceIdError> {
    let padded = restore_padding(resource_id);
    let bytes = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|err| ResourceIdError::InvalidBase64(err.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| ResourceIdError::InvalidPayload)?;

    text.split(FIELD_SEPARATOR).map(parse_token).collect()
}

/// Restore the `=` padding that was stripped when the id was issued.
///
/// At most three characters are appended. A length congruent to 1 mod 4
/// can never be valid base64; it is padded anyway and rejected by the
/// decoder rather than special-cased here.
fn restore_padding(resource_id: &str) -> Cow<'_, str> {
    match resource_id.len() % 4 {
        0 => Cow::Borrowed(resource_id),
        remainder => {
            let mut padded = String::with_capacity(resource_id.len() + 4 - remainder);
            padded.push_str(resource_id);
            for _ in remainder..4 {
                padded.push('=');
            }
            Cow::Owned(padded)
        }
    }
}

fn parse_token(token: &str) -> Result<PathComponent, ResourceIdError> {
    match token.strip_prefix(INT_TAG) {
        Some(digits) => digits
            .parse::<i64>()
            .map(PathComponent::Id)
            .map_err(|_| ResourceIdError::InvalidIntegerId(digits.to_string())),
        None => Ok(PathComponent::Name(token.to_string())),
    }
}

fn is_encodable(name: &str) -> bool {
    name.bytes()
        .all(|b| b.is_ascii() && b != FIELD_SEPARATOR as u8 && b != INT_TAG as u8)
}
