//! Decode errors.
//!
//! Every failure is an ordinary value, never a panic. The rendered string is
//! the contract tooling relies on:
//!
//! - leaf: `expected <name>; got <rendered-input>`
//! - composite: `while decoding <name>[, at index <i> | at key '<k>']: <nested>`
//!
//! Composite decoders report exactly the first failure encountered, in a
//! deterministic order (arrays and tuples by ascending index, objects by
//! declared-field order, unions and adaptors by declaration order).

use std::fmt;

use crate::value::Value;

/// Location of a child failure inside a composite decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum At {
    /// The composite itself failed (arity, extra key, missing field).
    Root,
    /// Failing element of an array or tuple.
    Index(usize),
    /// Failing field of an object or dictionary.
    Key(String),
}

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            At::Root => Ok(()),
            At::Index(i) => write!(f, ", at index {}", i),
            At::Key(k) => write!(f, ", at key '{}'", k),
        }
    }
}

/// A decode failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Input is not the shape the decoder accepts.
    #[error("expected {expected}; got {got}")]
    Mismatch { expected: String, got: String },

    /// A declared object field is absent from the input.
    #[error("missing required field: '{field}'")]
    MissingField { field: String },

    /// A strict object decoder saw a key it does not declare.
    #[error("invalid extra key: '{field}'")]
    UnknownField { field: String },

    /// A child decoder failed inside a composite.
    #[error("while decoding {name}{at}: {source}")]
    Nested {
        name: String,
        at: At,
        source: Box<DecodeError>,
    },

    /// A conversion or parse fault converted into a decode failure at a
    /// boundary (fallible adaptors, the serializer).
    #[error("{0}")]
    Failure(String),
}

impl DecodeError {
    /// Leaf mismatch against a rendered input value.
    pub fn mismatch(expected: impl Into<String>, got: &Value) -> Self {
        DecodeError::Mismatch {
            expected: expected.into(),
            got: got.render(),
        }
    }

    /// Wrap a child failure with the composite's name and location.
    pub fn nested(name: impl Into<String>, at: At, source: DecodeError) -> Self {
        DecodeError::Nested {
            name: name.into(),
            at,
            source: Box::new(source),
        }
    }
}
