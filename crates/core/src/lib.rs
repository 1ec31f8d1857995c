//! timbre-core: composable runtime decoders for dynamic values.
//!
//! A decoder validates an untyped, already-parsed input [`Value`] against a
//! declared shape, producing either a strongly-typed value or a descriptive
//! error. Callers build a decoder tree once; at decode time, input flows
//! top-down through the tree, each node validating its slice and delegating
//! to child decoders.
//!
//! # Public API
//!
//! Key items are re-exported at the crate root:
//!
//! - [`Decoder`] -- the decoder contract (`decode`, `guard`, `map`, ...)
//! - [`Value`] -- the dynamic input sum type
//! - [`DecodeError`] -- decode failures, rendered as nested messages
//! - primitives: [`string`], [`boolean`], [`number`], [`loose_number`],
//!   [`int`], [`uint`], [`literal`], [`literals`]
//! - combinators: [`union`], [`nullable`], [`maybe`], [`array`], [`dict`],
//!   [`tuple2`] (and friends), [`object`], [`loose_object`],
//!   [`intersection`], [`lazy`]
//! - adaptation: [`adaptor`], [`try_adaptor`], [`Decoder::adapt`]
//!
//! Decoding is fully synchronous and pure: no I/O, no shared mutable state,
//! deterministic results under concurrent use.

pub mod adapt;
pub mod combinator;
pub mod decoder;
pub mod error;
pub mod primitive;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use adapt::{adaptor, try_adaptor, Adaptor};
pub use combinator::{
    array, dict, empty_tuple, field, intersection, loose_object, loose_object_named, maybe,
    nullable, object, object_named, optional_field, tuple1, tuple2, tuple3, tuple4, tuple5,
    tuple6, tuple7, tuple8, union, Field,
};
pub use decoder::{any, fail, lazy, succeed, Decoder};
pub use error::{At, DecodeError};
pub use primitive::{boolean, int, literal, literals, loose_number, number, string, uint};
pub use value::{ObjectMap, Value};
