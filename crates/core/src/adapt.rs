//! Adaptation: accept alternate encodings of one logical type.
//!
//! An [`Adaptor`] pairs a source decoder with a conversion into the target
//! type. [`Decoder::adapt`] tries the base decoder first, then each adaptor
//! in the order supplied; the first adaptor whose source decoder accepts the
//! input (and whose conversion succeeds, for fallible adaptors) wins.

use std::sync::Arc;

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

type AdaptorRun<T> = Arc<dyn Fn(&Value) -> Result<T, DecodeError> + Send + Sync>;

/// A fallback (source decoder, conversion) pair. Tried only after the base
/// decoder has already failed.
pub struct Adaptor<T> {
    source_name: Arc<str>,
    run: AdaptorRun<T>,
}

impl<T> Clone for Adaptor<T> {
    fn clone(&self) -> Self {
        Adaptor {
            source_name: self.source_name.clone(),
            run: self.run.clone(),
        }
    }
}

/// A safe adaptor: the conversion is total and cannot fail.
pub fn adaptor<U: 'static, T: 'static>(
    source: Decoder<U>,
    convert: impl Fn(U) -> T + Send + Sync + 'static,
) -> Adaptor<T> {
    let source_name: Arc<str> = Arc::from(source.name());
    Adaptor {
        source_name,
        run: Arc::new(move |input| source.decode(input).map(&convert)),
    }
}

/// A fallible adaptor: the conversion itself returns a `Result`, and its
/// failure counts as this adaptor failing.
pub fn try_adaptor<U: 'static, T: 'static>(
    source: Decoder<U>,
    convert: impl Fn(U) -> Result<T, DecodeError> + Send + Sync + 'static,
) -> Adaptor<T> {
    let source_name: Arc<str> = Arc::from(source.name());
    Adaptor {
        source_name,
        run: Arc::new(move |input| source.decode(input).and_then(&convert)),
    }
}

impl<T: 'static> Decoder<T> {
    /// Wrap this decoder with fallback adaptors. The decoder keeps its own
    /// name; when the base and every adaptor fail, the aggregate error names
    /// the base and every adaptor's source decoder.
    pub fn adapt(self, adaptors: Vec<Adaptor<T>>) -> Decoder<T> {
        let name = self.name().to_string();
        let expected = std::iter::once(name.clone())
            .chain(adaptors.iter().map(|a| a.source_name.to_string()))
            .collect::<Vec<_>>()
            .join(" | ");
        Decoder::new(name, move |input| {
            if let Ok(value) = self.decode(input) {
                return Ok(value);
            }
            for adaptor in &adaptors {
                if let Ok(value) = (adaptor.run)(input) {
                    return Ok(value);
                }
            }
            Err(DecodeError::mismatch(expected.clone(), input))
        })
    }
}
