//! Text serialization: the format-agnostic [`Serializer`] contract and its
//! JSON implementation.
//!
//! `render` turns a [`Value`] into text; `parse` turns text back into an
//! untyped [`Value`], converting any malformed-input fault into an ordinary
//! [`ParseError`] -- never an uncaught panic. The provided `decode_with`
//! funnels parsed text through a decoder, so callers get a typed value or a
//! single descriptive error either way.

use timbre_core::{DecodeError, Decoder, Value};

use crate::codec::Decodable;

/// A parse fault at the text boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

/// A text serialization format. The contract is format-agnostic: a binary or
/// other textual format implements the same operations.
pub trait Serializer {
    /// Render a value to text.
    fn render(&self, value: &Value) -> String;

    /// Parse text back into an untyped value.
    fn parse(&self, text: &str) -> Result<Value, ParseError>;

    /// Render exactly the shape the encodable's `encode` returns.
    fn serialize<T: Decodable>(&self, value: &T) -> String {
        self.render(&value.encode())
    }

    /// Parse, then feed the untyped result through `decoder`. Parse faults
    /// are carried over as their message string.
    fn decode_with<T>(&self, text: &str, decoder: &Decoder<T>) -> Result<T, DecodeError> {
        let value = self
            .parse(text)
            .map_err(|e| DecodeError::Failure(e.message))?;
        decoder.decode(&value)
    }

    /// Parse, then decode into a [`Decodable`] type.
    fn deserialize<T: Decodable>(&self, text: &str) -> Result<T, DecodeError> {
        let value = self
            .parse(text)
            .map_err(|e| DecodeError::Failure(e.message))?;
        T::decode_value(&value)
    }
}

/// The default serializer: JSON-compatible, whitespace-insignificant.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn render(&self, value: &Value) -> String {
        // Value serialization cannot fail: keys are strings and non-finite
        // numbers render as null.
        serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        serde_json::from_str::<serde_json::Value>(text)
            .map(Value::from)
            .map_err(|e| ParseError {
                message: e.to_string(),
            })
    }
}
