//! The decoder core.
//!
//! A [`Decoder<T>`] pairs a human-readable name with a pure validation
//! function from an untyped [`Value`] to a typed `Result`. Decoders are
//! immutable once constructed and cheap to clone (`Arc` internals);
//! composition happens at construction time, never inside `decode`.
//!
//! Union and intersection decoders additionally retain their candidate lists
//! as construction-time metadata, so composing a union of unions (or an
//! intersection of intersections) flattens into one flat candidate set.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::DecodeError;
use crate::value::Value;

type Run<T> = Arc<dyn Fn(&Value) -> Result<T, DecodeError> + Send + Sync>;

/// How a composite decoder was assembled. Only unions and intersections keep
/// their parts around, for flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompositeKind {
    Union,
    Intersection,
}

/// A named, pure validation function from an untyped value to a typed result.
pub struct Decoder<T> {
    name: Arc<str>,
    composite: Option<(CompositeKind, Arc<Vec<Decoder<T>>>)>,
    run: Run<T>,
}

impl<T> Clone for Decoder<T> {
    fn clone(&self) -> Self {
        Decoder {
            name: self.name.clone(),
            composite: self.composite.clone(),
            run: self.run.clone(),
        }
    }
}

impl<T> fmt::Debug for Decoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder").field("name", &self.name).finish()
    }
}

impl<T> Decoder<T> {
    /// The name used to build error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate `input`, producing the typed value or the first descriptive
    /// failure along the evaluated path. Total: never panics.
    pub fn decode(&self, input: &Value) -> Result<T, DecodeError> {
        (self.run)(input)
    }

    /// Type predicate derived from [`decode`](Self::decode).
    pub fn guard(&self, input: &Value) -> bool {
        self.decode(input).is_ok()
    }

    pub(crate) fn parts_of(&self, kind: CompositeKind) -> Option<&[Decoder<T>]> {
        match &self.composite {
            Some((k, parts)) if *k == kind => Some(parts),
            _ => None,
        }
    }
}

impl<T: 'static> Decoder<T> {
    /// Wrap an arbitrary validation closure as a decoder. This is the escape
    /// hatch the built-in combinators are themselves made of.
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(&Value) -> Result<T, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Decoder {
            name: Arc::from(name.into().as_str()),
            composite: None,
            run: Arc::new(run),
        }
    }

    pub(crate) fn composed(
        name: impl Into<String>,
        kind: CompositeKind,
        parts: Arc<Vec<Decoder<T>>>,
        run: impl Fn(&Value) -> Result<T, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Decoder {
            name: Arc::from(name.into().as_str()),
            composite: Some((kind, parts)),
            run: Arc::new(run),
        }
    }

    /// Same decoder under a different display name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Decoder {
            name: Arc::from(name.into().as_str()),
            composite: self.composite,
            run: self.run,
        }
    }

    /// Apply a total conversion to the decoded value. The name is kept, so
    /// error messages still blame the underlying shape.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Decoder<U> {
        let name = self.name.clone();
        let run = self.run;
        Decoder {
            name,
            composite: None,
            run: Arc::new(move |input| run(input).map(&f)),
        }
    }

    /// Apply a fallible conversion to the decoded value.
    pub fn and_then<U: 'static>(
        self,
        f: impl Fn(T) -> Result<U, DecodeError> + Send + Sync + 'static,
    ) -> Decoder<U> {
        let name = self.name.clone();
        let run = self.run;
        Decoder {
            name,
            composite: None,
            run: Arc::new(move |input| run(input).and_then(&f)),
        }
    }

    /// Erase the output type back to [`Value`]. Object field decoders are
    /// stored in this form so heterogeneous fields can share one map.
    pub fn erased(self) -> Decoder<Value>
    where
        T: Into<Value>,
    {
        self.map(Into::into)
    }
}

/// Accepts any input unchanged.
pub fn any() -> Decoder<Value> {
    Decoder::new("any", |input| Ok(input.clone()))
}

/// Ignores the input and always produces `value`.
pub fn succeed<T: Clone + Send + Sync + 'static>(value: T) -> Decoder<T> {
    Decoder::new("succeed", move |_| Ok(value.clone()))
}

/// Rejects every input with the given message.
pub fn fail<T: 'static>(message: impl Into<String>) -> Decoder<T> {
    let message = message.into();
    Decoder::new("fail", move |_| Err(DecodeError::Failure(message.clone())))
}

/// A decoder resolved lazily through an indirection cell, so a decoder can
/// reference itself or one defined later without recursing at construction
/// time. The thunk runs at most once; resolution is idempotent and the cell
/// is safe to race.
pub fn lazy<T: 'static>(
    name: impl Into<String>,
    thunk: impl Fn() -> Decoder<T> + Send + Sync + 'static,
) -> Decoder<T> {
    let cell: Arc<OnceLock<Decoder<T>>> = Arc::new(OnceLock::new());
    Decoder::new(name, move |input| cell.get_or_init(|| thunk()).decode(input))
}
