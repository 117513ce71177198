//! # strata-resource-id
//!
//! Portable resource id encoding for hierarchical datastore keys.
//!
//! ## Design Principles
//!
//! - Resource ids are opaque to external callers; only this crate
//!   interprets their internal structure
//! - Encoding is reversible: decoding an encoded path reproduces it
//!   exactly, including the integer-vs-string tag of every identifier
//! - The codec is pure and stateless: no I/O, no locks, no shared state
//! - Malformed or adversarial input fails with a precise error, never a
//!   panic
//!
//! ## Wire Format
//!
//! A hierarchical key flattens to alternating kind and identifier
//! positions. The flattened components are joined with ASCII 30, integer
//! identifiers carry an ASCII 31 tag byte ahead of their decimal form,
//! and the result is URL-safe base64 with trailing `=` padding stripped:
//!
//! ```text
//! ("UserEntity", "does_not_exist")  ->  VXNlckVudGl0eR5kb2VzX25vdF9leGlzdA
//! ("UserEntity", 1)                 ->  VXNlckVudGl0eR4fMQ
//! ```
//!
//! Both sentinel values are permanent wire contracts: resource ids issued
//! years ago must keep decoding to the same key path.

mod codec;
mod component;
mod error;
mod macros;


pub use codec::{decode, encode, FIELD_SEPARATOR, INT_TAG};
pub use component::PathComponent;
pub use error::ResourceIdError;
