//! Interop with previously issued, database-native key strings.
//!
//! Legacy key strings predate the portable resource id format: they are
//! URL-safe base64 over the backing store's own serialized key record, a
//! tag/value byte stream. The record carries the app (field 13) and
//! namespace (field 20) as length-delimited strings, and the key path
//! (field 14) as a nested message of group-framed elements, each holding
//! a kind (field 2) and either an integer identifier (field 3, varint)
//! or a string identifier (field 4). New surfaces hand out resource ids
//! instead; this module only reads ids that are already in the wild.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use strata_resource_id::PathComponent;

use crate::error::DatastoreError;
use crate::key::Key;
use crate::resolve::validate_kind;

// Wire types of the tag/value stream.
const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LENGTH_DELIMITED: u8 = 2;
const WIRE_START_GROUP: u8 = 3;
const WIRE_END_GROUP: u8 = 4;
const WIRE_FIXED32: u8 = 5;

// Key record fields.
const FIELD_APP: u32 = 13;
const FIELD_PATH: u32 = 14;
const FIELD_NAMESPACE: u32 = 20;

// Path element fields.
const FIELD_ELEMENT: u32 = 1;
const FIELD_KIND: u32 = 2;
const FIELD_ID: u32 = 3;
const FIELD_NAME: u32 = 4;

/// Resolves a legacy key string, validating its kind against an expected
/// value.
///
/// # Errors
///
/// Fails with [`DatastoreError::InvalidKeyString`] when the string is
/// empty or not parseable, and [`DatastoreError::KindMismatch`] when it
/// parses to a key of a different kind.
pub fn entity_key(expected_kind: &str, key_string: &str) -> Result<Key, DatastoreError> {
    let key = parse_key_string(key_string)?;
    validate_kind(expected_kind, &key)?;
    Ok(key)
}

/// Parses a legacy key string into a [`Key`].
pub fn parse_key_string(key_string: &str) -> Result<Key, DatastoreError> {
    if key_string.is_empty() {
        return Err(invalid("key string cannot be empty"));
    }

    let mut padded = key_string.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    let bytes = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|err| invalid(format!("could not base64 decode key string: {}", err)))?;

    let mut reader = Reader::new(&bytes);
    let mut project = None;
    let mut namespace = None;
    let mut flat_path = Vec::new();

    while let Some((field, wire)) = reader.next_tag()? {
        match (field, wire) {
            (FIELD_APP, WIRE_LENGTH_DELIMITED) => project = Some(reader.read_string()?),
            (FIELD_NAMESPACE, WIRE_LENGTH_DELIMITED) => namespace = Some(reader.read_string()?),
            (FIELD_PATH, WIRE_LENGTH_DELIMITED) => flat_path = parse_path(reader.read_bytes()?)?,
            (_, wire) => reader.skip(wire)?,
        }
    }

    if flat_path.is_empty() {
        return Err(invalid("key string holds no key path"));
    }

    let mut key = if flat_path.len() % 2 == 0 {
        Key::from_flat_path(flat_path)?
    } else {
        Key::incomplete(flat_path)
    };
    if let Some(project) = project {
        key = key.with_project(project);
    }
    if let Some(namespace) = namespace {
        key = key.with_namespace(namespace);
    }
    Ok(key)
}

fn parse_path(bytes: &[u8]) -> Result<Vec<PathComponent>, DatastoreError> {
    let mut reader = Reader::new(bytes);
    let mut flat_path = Vec::new();

    while let Some((field, wire)) = reader.next_tag()? {
        if (field, wire) != (FIELD_ELEMENT, WIRE_START_GROUP) {
            reader.skip(wire)?;
            continue;
        }

        let mut kind = None;
        let mut id = None;
        let mut name = None;
        loop {
            let Some((field, wire)) = reader.next_tag()? else {
                return Err(invalid("unterminated path element"));
            };
            match (field, wire) {
                (FIELD_ELEMENT, WIRE_END_GROUP) => break,
                (FIELD_KIND, WIRE_LENGTH_DELIMITED) => kind = Some(reader.read_string()?),
                (FIELD_ID, WIRE_VARINT) => id = Some(reader.read_varint()? as i64),
                (FIELD_NAME, WIRE_LENGTH_DELIMITED) => name = Some(reader.read_string()?),
                (_, wire) => reader.skip(wire)?,
            }
        }

        let kind = kind.ok_or_else(|| invalid("path element is missing its kind"))?;
        flat_path.push(PathComponent::Name(kind));
        match (id, name) {
            (Some(id), _) => flat_path.push(PathComponent::Id(id)),
            (None, Some(name)) => flat_path.push(PathComponent::Name(name)),
            // A trailing element with no identifier is an incomplete key.
            (None, None) => {}
        }
    }

    Ok(flat_path)
}

fn invalid(reason: impl Into<String>) -> DatastoreError {
    DatastoreError::InvalidKeyString {
        reason: reason.into(),
    }
}

/// Cursor over the tag/value byte stream.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    /// Next field tag, or `None` at end of input.
    fn next_tag(&mut self) -> Result<Option<(u32, u8)>, DatastoreError> {
        if self.pos == self.bytes.len() {
            return Ok(None);
        }
        let tag = self.read_varint()?;
        let wire = (tag & 0x07) as u8;
        let field =
            u32::try_from(tag >> 3).map_err(|_| invalid("field number out of range"))?;
        Ok(Some((field, wire)))
    }

    fn read_byte(&mut self) -> Result<u8, DatastoreError> {
        let byte = self
            .bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| invalid("unexpected end of key string"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_varint(&mut self) -> Result<u64, DatastoreError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            if shift >= 64 {
                return Err(invalid("varint is too long"));
            }
            let byte = self.read_byte()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    fn read_bytes(&mut self) -> Result<&'a [u8], DatastoreError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| invalid("length out of range"))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| invalid("truncated length-delimited field"))?;
        let bytes = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_string(&mut self) -> Result<String, DatastoreError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| invalid("field is not valid UTF-8"))
    }

    fn advance(&mut self, count: usize) -> Result<(), DatastoreError> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| invalid("truncated fixed-width field"))?;
        self.pos = end;
        Ok(())
    }

    /// Skips over a field of the given wire type.
    fn skip(&mut self, wire: u8) -> Result<(), DatastoreError> {
        match wire {
            WIRE_VARINT => {
                self.read_varint()?;
                Ok(())
            }
            WIRE_FIXED64 => self.advance(8),
            WIRE_LENGTH_DELIMITED => {
                self.read_bytes()?;
                Ok(())
            }
            WIRE_START_GROUP => {
                let mut depth: u32 = 1;
                while depth > 0 {
                    let Some((_, wire)) = self.next_tag()? else {
                        return Err(invalid("unterminated group"));
                    };
                    match wire {
                        WIRE_START_GROUP => depth += 1,
                        WIRE_END_GROUP => depth -= 1,
                        WIRE_VARINT => {
                            self.read_varint()?;
                        }
                        WIRE_FIXED64 => self.advance(8)?,
                        WIRE_LENGTH_DELIMITED => {
                            self.read_bytes()?;
                        }
                        WIRE_FIXED32 => self.advance(4)?,
                        _ => return Err(invalid("unsupported wire type")),
                    }
                }
                Ok(())
            }
            WIRE_END_GROUP => Err(invalid("unbalanced group end")),
            WIRE_FIXED32 => self.advance(4),
            _ => Err(invalid("unsupported wire type")),
        }
    }
}
