//! timbre-interchange: the codec bridge and text serialization boundary.
//!
//! Provides the [`Decodable`] trait binding a constructible type to a
//! decoder for its encoded argument shape, and the [`Serializer`] contract
//! with a concrete JSON implementation ([`JsonSerializer`]). Decoding a
//! document is `parse` then `decode`, so callers always get a typed value or
//! one descriptive error -- malformed text included.

pub mod codec;
pub mod serialize;

pub use codec::Decodable;
pub use serialize::{JsonSerializer, ParseError, Serializer};
