//! The codec bridge: binding a constructible type to its decoder.
//!
//! A [`Decodable`] type pairs a decoder for its constructor-argument shape
//! with a matching `encode` back to that same shape. The round-trip law
//! holds for every valid instance: `T::decode_value(&x.encode()) == x` up to
//! field-wise equality.

use timbre_core::{At, DecodeError, Decoder, Value};

/// A type with a decoder for its constructor arguments and an inverse
/// encode.
pub trait Decodable: Sized {
    /// Display name used in error messages (`while decoding class <name>`).
    fn type_name() -> &'static str;

    /// Decoder for the encoded argument shape, mapped into `Self`.
    fn decoder() -> Decoder<Self>;

    /// Render this instance back into the shape [`decoder`](Self::decoder)
    /// accepts.
    fn encode(&self) -> Value;

    /// Decode an untyped value into an instance. Failures are wrapped with
    /// the class name.
    fn decode_value(input: &Value) -> Result<Self, DecodeError> {
        Self::decoder().decode(input).map_err(|e| {
            DecodeError::nested(format!("class {}", Self::type_name()), At::Root, e)
        })
    }

    /// Type predicate derived from [`decode_value`](Self::decode_value).
    fn guard(input: &Value) -> bool {
        Self::decode_value(input).is_ok()
    }
}
