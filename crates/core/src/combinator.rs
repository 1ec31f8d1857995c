//! Structural combinators: union, optionality, arrays, dictionaries, tuples,
//! objects, and intersection.
//!
//! Every combinator composes child decoders at construction time and
//! fail-fasts at decode time: the first child failure in deterministic order
//! is the error, with the composite's name and the failing index or key
//! prefixed so the failure can be localized without a debugger.

use std::sync::Arc;

use crate::decoder::{CompositeKind, Decoder};
use crate::error::{At, DecodeError};
use crate::primitive::literal;
use crate::value::{ObjectMap, Value};

// ── Union ────────────────────────────────────────────────────────────

/// Tries each candidate in declaration order; the first `Ok` wins. When every
/// candidate fails, the error is one aggregated mismatch naming all
/// candidates, not a list of the individual sub-errors.
///
/// A union candidate that is itself a union is flattened into the combined
/// candidate set, so `union(union(a, b), c)` and `union(a, b, c)` are the
/// same decoder: same acceptance set, same name, same failure message.
pub fn union<T: 'static>(candidates: Vec<Decoder<T>>) -> Decoder<T> {
    let mut flat: Vec<Decoder<T>> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let inner = candidate.parts_of(CompositeKind::Union).map(<[_]>::to_vec);
        match inner {
            Some(parts) => flat.extend(parts),
            None => flat.push(candidate),
        }
    }
    let name = flat
        .iter()
        .map(|d| d.name().to_string())
        .collect::<Vec<_>>()
        .join(" | ");
    let parts = Arc::new(flat);
    let run_parts = parts.clone();
    let err_name = name.clone();
    Decoder::composed(name, CompositeKind::Union, parts, move |input| {
        for candidate in run_parts.iter() {
            if let Ok(value) = candidate.decode(input) {
                return Ok(value);
            }
        }
        Err(DecodeError::mismatch(err_name.clone(), input))
    })
}

impl<T: 'static> Decoder<T> {
    /// Sugar for a two-candidate [`union`]. Flattens like `union` does.
    pub fn or(self, other: Decoder<T>) -> Decoder<T> {
        union(vec![self, other])
    }
}

// ── Optionality ──────────────────────────────────────────────────────

/// Sugar over `union(null, inner)`: `Null` decodes to `None`, anything else
/// is delegated to `inner` and wrapped in `Some`.
pub fn nullable<T: 'static>(inner: Decoder<T>) -> Decoder<Option<T>> {
    union(vec![literal(Value::Null).map(|_| None), inner.map(Some)])
}

/// The maybe decoder: `Null` is the absence case, accepted directly without
/// consulting `inner`. Any other input is delegated; inner failure is
/// reported as a mismatch against `Maybe<name>`.
pub fn maybe<T: 'static>(inner: Decoder<T>) -> Decoder<Option<T>> {
    let name = format!("Maybe<{}>", inner.name());
    let err_name = name.clone();
    Decoder::new(name, move |input| match input {
        Value::Null => Ok(None),
        other => match inner.decode(other) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(DecodeError::mismatch(err_name.clone(), other)),
        },
    })
}

// ── Arrays and dictionaries ──────────────────────────────────────────

/// Accepts only arrays; every element must decode, in index order. The empty
/// array always succeeds.
pub fn array<T: 'static>(inner: Decoder<T>) -> Decoder<Vec<T>> {
    let name = format!("{}[]", inner.name());
    let err_name = name.clone();
    Decoder::new(name, move |input| match input {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match inner.decode(item) {
                    Ok(value) => out.push(value),
                    Err(e) => return Err(DecodeError::nested(err_name.clone(), At::Index(i), e)),
                }
            }
            Ok(out)
        }
        other => Err(DecodeError::mismatch(err_name.clone(), other)),
    })
}

/// String-keyed map: accepts only objects; every value must decode, in
/// ascending key order.
pub fn dict<T: 'static>(inner: Decoder<T>) -> Decoder<std::collections::BTreeMap<String, T>> {
    let name = format!("Dict<{}>", inner.name());
    let err_name = name.clone();
    Decoder::new(name, move |input| match input {
        Value::Object(map) => {
            let mut out = std::collections::BTreeMap::new();
            for (key, value) in map {
                match inner.decode(value) {
                    Ok(decoded) => {
                        out.insert(key.clone(), decoded);
                    }
                    Err(e) => {
                        return Err(DecodeError::nested(
                            err_name.clone(),
                            At::Key(key.clone()),
                            e,
                        ))
                    }
                }
            }
            Ok(out)
        }
        other => Err(DecodeError::mismatch(err_name.clone(), other)),
    })
}

// ── Tuples ───────────────────────────────────────────────────────────

/// Accepts only the empty array.
pub fn empty_tuple() -> Decoder<()> {
    Decoder::new("[]", |input| match input {
        Value::Array(items) if items.is_empty() => Ok(()),
        other => Err(DecodeError::mismatch("[]", other)),
    })
}

macro_rules! tuple_decoder {
    ($(#[$doc:meta])* $fname:ident, $len:expr, $( $d:ident : $T:ident : $idx:tt ),+) => {
        $(#[$doc])*
        pub fn $fname<$($T: 'static),+>($($d: Decoder<$T>),+) -> Decoder<($($T,)+)> {
            let name = format!(
                "[{}]",
                [$($d.name().to_string()),+].join(", ")
            );
            let err_name = name.clone();
            Decoder::new(name, move |input| {
                // A length mismatch is a hard failure before any element is
                // inspected.
                let items = match input {
                    Value::Array(items) if items.len() == $len => items,
                    other => return Err(DecodeError::mismatch(err_name.clone(), other)),
                };
                Ok(($(
                    $d.decode(&items[$idx]).map_err(|e| {
                        DecodeError::nested(err_name.clone(), At::Index($idx), e)
                    })?,
                )+))
            })
        }
    };
}

tuple_decoder!(
    /// Fixed-length tuple of one decoder.
    tuple1, 1, a:A:0
);
tuple_decoder!(
    /// Fixed-length tuple of two decoders, decoded positionally.
    tuple2, 2, a:A:0, b:B:1
);
tuple_decoder!(tuple3, 3, a:A:0, b:B:1, c:C:2);
tuple_decoder!(tuple4, 4, a:A:0, b:B:1, c:C:2, d:D:3);
tuple_decoder!(tuple5, 5, a:A:0, b:B:1, c:C:2, d:D:3, e:E:4);
tuple_decoder!(tuple6, 6, a:A:0, b:B:1, c:C:2, d:D:3, e:E:4, f:F:5);
tuple_decoder!(tuple7, 7, a:A:0, b:B:1, c:C:2, d:D:3, e:E:4, f:F:5, g:G:6);
tuple_decoder!(tuple8, 8, a:A:0, b:B:1, c:C:2, d:D:3, e:E:4, f:F:5, g:G:6, h:H:7);

// ── Objects ──────────────────────────────────────────────────────────

/// One declared object field: a key, its (type-erased) decoder, and whether
/// the key may be absent.
#[derive(Clone)]
pub struct Field {
    key: String,
    decoder: Decoder<Value>,
    required: bool,
}

/// A required field. A missing key is a hard failure.
pub fn field<T: Into<Value> + 'static>(key: &str, decoder: Decoder<T>) -> Field {
    Field {
        key: key.to_string(),
        decoder: decoder.erased(),
        required: true,
    }
}

/// An optional field. A missing key is simply omitted from the output; a
/// present key must still decode.
pub fn optional_field<T: Into<Value> + 'static>(key: &str, decoder: Decoder<T>) -> Field {
    Field {
        key: key.to_string(),
        decoder: decoder.erased(),
        required: false,
    }
}

fn derived_name(fields: &[Field]) -> String {
    if fields.is_empty() {
        return "{}".to_string();
    }
    let inner = fields
        .iter()
        .map(|f| {
            let marker = if f.required { "" } else { "?" };
            format!("{}{}: {}", f.key, marker, f.decoder.name())
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{ {} }}", inner)
}

/// Strict object decoder with a structurally derived name, e.g.
/// `{ a: string, b?: boolean }`. Any input key that is not a declared field
/// is a hard failure, reported before any field is decoded.
pub fn object(fields: Vec<Field>) -> Decoder<ObjectMap> {
    let name = derived_name(&fields);
    object_impl(name, fields, true)
}

/// Strict object decoder under an explicit name.
pub fn object_named(name: impl Into<String>, fields: Vec<Field>) -> Decoder<ObjectMap> {
    object_impl(name.into(), fields, true)
}

/// Loose object decoder: all input keys are copied to the output verbatim,
/// then the declared fields are overwritten with their decoded values. Extra
/// keys pass through; a missing declared field is still a hard failure.
pub fn loose_object(fields: Vec<Field>) -> Decoder<ObjectMap> {
    let name = derived_name(&fields);
    object_impl(name, fields, false)
}

/// Loose object decoder under an explicit name.
pub fn loose_object_named(name: impl Into<String>, fields: Vec<Field>) -> Decoder<ObjectMap> {
    object_impl(name.into(), fields, false)
}

fn object_impl(name: String, fields: Vec<Field>, strict: bool) -> Decoder<ObjectMap> {
    let err_name = name.clone();
    Decoder::new(name, move |input| {
        let map = match input {
            Value::Object(map) => map,
            other => return Err(DecodeError::mismatch(err_name.clone(), other)),
        };

        if strict {
            for key in map.keys() {
                if !fields.iter().any(|f| f.key == *key) {
                    return Err(DecodeError::nested(
                        err_name.clone(),
                        At::Root,
                        DecodeError::UnknownField { field: key.clone() },
                    ));
                }
            }
        }

        let mut out = if strict { ObjectMap::new() } else { map.clone() };
        for f in &fields {
            match map.get(&f.key) {
                Some(value) => match f.decoder.decode(value) {
                    Ok(decoded) => {
                        out.insert(f.key.clone(), decoded);
                    }
                    Err(e) => {
                        return Err(DecodeError::nested(
                            err_name.clone(),
                            At::Key(f.key.clone()),
                            e,
                        ))
                    }
                },
                None if f.required => {
                    return Err(DecodeError::nested(
                        err_name.clone(),
                        At::Root,
                        DecodeError::MissingField {
                            field: f.key.clone(),
                        },
                    ))
                }
                None => {}
            }
        }
        Ok(out)
    })
}

// ── Intersection ─────────────────────────────────────────────────────

/// Combines object-shaped decoders into one whose output has all their
/// fields. Each part re-validates the whole input independently, so every
/// part's own strict or loose shape rules still apply; the first failing
/// part aborts with its own error. On shared keys the later part wins.
///
/// An intersection part that is itself an intersection is flattened, the
/// same way [`union`] flattens.
pub fn intersection(parts: Vec<Decoder<ObjectMap>>) -> Decoder<ObjectMap> {
    let mut flat: Vec<Decoder<ObjectMap>> = Vec::with_capacity(parts.len());
    for part in parts {
        let inner = part
            .parts_of(CompositeKind::Intersection)
            .map(<[_]>::to_vec);
        match inner {
            Some(nested) => flat.extend(nested),
            None => flat.push(part),
        }
    }
    let name = flat
        .iter()
        .map(|d| d.name().to_string())
        .collect::<Vec<_>>()
        .join(" & ");
    let parts = Arc::new(flat);
    let run_parts = parts.clone();
    Decoder::composed(name, CompositeKind::Intersection, parts, move |input| {
        let mut out = ObjectMap::new();
        for part in run_parts.iter() {
            let decoded = part.decode(input)?;
            out.extend(decoded);
        }
        Ok(out)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{boolean, int, literals, number, string, uint};

    fn obj(entries: &[(&str, Value)]) -> Value {
        Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_union_first_ok_wins() {
        let d = union(vec![
            string().map(Value::String),
            int().map(|n| Value::Number(n as f64)),
        ]);
        assert_eq!(d.decode(&Value::String("a".into())), Ok(Value::String("a".into())));
        assert_eq!(d.decode(&Value::Number(3.0)), Ok(Value::Number(3.0)));
        assert_eq!(
            d.decode(&Value::Bool(true)).unwrap_err().to_string(),
            "expected string | int; got true"
        );
    }

    #[test]
    fn test_union_of_unions_flattens() {
        let nested = union(vec![
            union(vec![string().map(Value::String), boolean().map(Value::Bool)]),
            int().map(|n| Value::Number(n as f64)),
        ]);
        let flat = union(vec![
            string().map(Value::String),
            boolean().map(Value::Bool),
            int().map(|n| Value::Number(n as f64)),
        ]);
        assert_eq!(nested.name(), flat.name());
        assert_eq!(nested.name(), "string | boolean | int");
        for v in [
            Value::String("x".into()),
            Value::Bool(false),
            Value::Number(2.0),
            Value::Null,
        ] {
            assert_eq!(nested.guard(&v), flat.guard(&v));
        }
        assert_eq!(
            nested.decode(&Value::Null).unwrap_err(),
            flat.decode(&Value::Null).unwrap_err()
        );
    }

    #[test]
    fn test_or_sugar() {
        let d = string().or(literals(vec![Value::Null]).map(|v| v.to_string()));
        assert_eq!(d.name(), "string | null");
        assert!(d.guard(&Value::Null));
    }

    #[test]
    fn test_nullable() {
        let d = nullable(string());
        assert_eq!(d.decode(&Value::Null), Ok(None));
        assert_eq!(
            d.decode(&Value::String("a".into())),
            Ok(Some("a".to_string()))
        );
        assert_eq!(
            d.decode(&Value::Number(1.0)).unwrap_err().to_string(),
            "expected null | string; got 1"
        );
    }

    #[test]
    fn test_maybe_table() {
        let d = maybe(string());
        assert_eq!(d.decode(&Value::Null), Ok(None));
        assert_eq!(
            d.decode(&Value::String("a".into())),
            Ok(Some("a".to_string()))
        );
        assert_eq!(
            d.decode(&Value::Number(3.0)).unwrap_err().to_string(),
            "expected Maybe<string>; got 3"
        );
    }

    #[test]
    fn test_array() {
        let d = array(int());
        assert_eq!(
            d.decode(&Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])),
            Ok(vec![1, 2])
        );
        assert_eq!(d.decode(&Value::Array(vec![])), Ok(vec![]));
        assert!(d.decode(&Value::Null).is_err());
        // Fail-fast at the first bad index.
        let err = d
            .decode(&Value::Array(vec![
                Value::Number(1.0),
                Value::String("x".into()),
                Value::Null,
            ]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "while decoding int[], at index 1: expected int; got \"x\""
        );
    }

    #[test]
    fn test_dict() {
        let d = dict(number());
        let input = obj(&[("a", Value::Number(1.0)), ("b", Value::Number(2.0))]);
        let out = d.decode(&input).unwrap();
        assert_eq!(out.get("b"), Some(&2.0));
        assert!(d.decode(&Value::Array(vec![])).is_err());

        let bad = obj(&[("a", Value::Number(1.0)), ("b", Value::Bool(true))]);
        assert_eq!(
            d.decode(&bad).unwrap_err().to_string(),
            "while decoding Dict<number>, at key 'b': expected number; got true"
        );
    }

    #[test]
    fn test_tuple_exact_length() {
        let d = tuple2(string(), boolean());
        assert_eq!(d.name(), "[string, boolean]");
        assert_eq!(
            d.decode(&Value::Array(vec![
                Value::String("a".into()),
                Value::Bool(true)
            ])),
            Ok(("a".to_string(), true))
        );
        // Length mismatch before elements are inspected: the single element
        // would fail anyway, but the error is the arity error.
        assert_eq!(
            d.decode(&Value::Array(vec![Value::Null]))
                .unwrap_err()
                .to_string(),
            "expected [string, boolean]; got [null]"
        );
        assert!(d
            .decode(&Value::Array(vec![
                Value::String("a".into()),
                Value::Bool(true),
                Value::Null
            ]))
            .is_err());
    }

    #[test]
    fn test_tuple_positional_error() {
        let d = tuple3(int(), string(), boolean());
        let err = d
            .decode(&Value::Array(vec![
                Value::Number(1.0),
                Value::String("ok".into()),
                Value::Number(0.0),
            ]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "while decoding [int, string, boolean], at index 2: expected boolean; got 0"
        );
    }

    #[test]
    fn test_empty_tuple() {
        assert_eq!(empty_tuple().decode(&Value::Array(vec![])), Ok(()));
        assert!(empty_tuple().decode(&Value::Array(vec![Value::Null])).is_err());
        assert!(empty_tuple().decode(&Value::Null).is_err());
    }

    #[test]
    fn test_strict_object() {
        let d = object(vec![field("a", int()), field("b", string())]);
        assert_eq!(d.name(), "{ a: int, b: string }");

        let ok = obj(&[("a", Value::Number(1.0)), ("b", Value::String("x".into()))]);
        let out = d.decode(&ok).unwrap();
        assert_eq!(out.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(out.get("b"), Some(&Value::String("x".into())));

        // Extra key is a hard failure, reported before field decoding.
        let extra = obj(&[
            ("a", Value::Bool(true)), // would also fail, but the extra key wins
            ("b", Value::String("x".into())),
            ("c", Value::Number(3.0)),
        ]);
        assert_eq!(
            d.decode(&extra).unwrap_err().to_string(),
            "while decoding { a: int, b: string }: invalid extra key: 'c'"
        );

        let missing = obj(&[("a", Value::Number(1.0))]);
        assert_eq!(
            d.decode(&missing).unwrap_err().to_string(),
            "while decoding { a: int, b: string }: missing required field: 'b'"
        );

        let bad_field = obj(&[("a", Value::Number(1.5)), ("b", Value::String("x".into()))]);
        assert_eq!(
            d.decode(&bad_field).unwrap_err().to_string(),
            "while decoding { a: int, b: string }, at key 'a': expected int; got 1.5"
        );

        assert!(d.decode(&Value::Array(vec![])).is_err());
    }

    #[test]
    fn test_optional_field() {
        let d = object(vec![field("a", int()), optional_field("b", string())]);
        assert_eq!(d.name(), "{ a: int, b?: string }");

        let out = d.decode(&obj(&[("a", Value::Number(1.0))])).unwrap();
        assert!(!out.contains_key("b"));

        // Present optional fields must still decode.
        let bad = obj(&[("a", Value::Number(1.0)), ("b", Value::Bool(true))]);
        assert!(d.decode(&bad).is_err());
    }

    #[test]
    fn test_loose_object_passthrough() {
        let strict = object(vec![field("a", int()), field("b", int())]);
        let loose = loose_object(vec![field("a", int()), field("b", int())]);
        let input = obj(&[
            ("a", Value::Number(1.0)),
            ("b", Value::Number(2.0)),
            ("c", Value::Number(3.0)),
        ]);

        assert!(strict.decode(&input).is_err());
        let out = loose.decode(&input).unwrap();
        assert_eq!(out.get("c"), Some(&Value::Number(3.0)));
        assert_eq!(out.get("a"), Some(&Value::Number(1.0)));

        // Declared-but-absent fields still fail in the loose variant.
        let missing = obj(&[("a", Value::Number(1.0)), ("c", Value::Number(3.0))]);
        assert_eq!(
            loose.decode(&missing).unwrap_err().to_string(),
            "while decoding { a: int, b: int }: missing required field: 'b'"
        );
    }

    #[test]
    fn test_loose_object_normalizes_declared_fields() {
        use crate::adapt::adaptor;
        // boolean accepted as 0/1 through adaptation; the decoded output must
        // hold the normalized boolean, while extra keys pass through raw.
        let d = loose_object(vec![field(
            "flag",
            boolean().adapt(vec![adaptor(uint(), |n| n != 0)]),
        )]);
        let input = obj(&[("flag", Value::Number(1.0)), ("extra", Value::Number(1.0))]);
        let out = d.decode(&input).unwrap();
        assert_eq!(out.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(out.get("extra"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_intersection_merges_fields() {
        let d = intersection(vec![
            loose_object(vec![field("a", int())]),
            loose_object(vec![field("b", string())]),
        ]);
        assert_eq!(d.name(), "{ a: int } & { b: string }");
        let input = obj(&[("a", Value::Number(1.0)), ("b", Value::String("x".into()))]);
        let out = d.decode(&input).unwrap();
        assert_eq!(out.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(out.get("b"), Some(&Value::String("x".into())));
    }

    #[test]
    fn test_intersection_keeps_each_parts_shape_rules() {
        // A strict part still rejects keys it does not declare, even when a
        // sibling part declares them.
        let d = intersection(vec![
            object(vec![field("a", int())]),
            loose_object(vec![field("b", string())]),
        ]);
        let input = obj(&[("a", Value::Number(1.0)), ("b", Value::String("x".into()))]);
        let err = d.decode(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "while decoding { a: int }: invalid extra key: 'b'"
        );
    }

    #[test]
    fn test_intersection_flattens() {
        let nested = intersection(vec![
            intersection(vec![
                loose_object(vec![field("a", int())]),
                loose_object(vec![field("b", int())]),
            ]),
            loose_object(vec![field("c", int())]),
        ]);
        let flat = intersection(vec![
            loose_object(vec![field("a", int())]),
            loose_object(vec![field("b", int())]),
            loose_object(vec![field("c", int())]),
        ]);
        assert_eq!(nested.name(), flat.name());
        let input = obj(&[
            ("a", Value::Number(1.0)),
            ("b", Value::Number(2.0)),
            ("c", Value::Number(3.0)),
        ]);
        assert_eq!(nested.decode(&input), flat.decode(&input));
    }

    #[test]
    fn test_intersection_later_part_wins_on_shared_key() {
        let d = intersection(vec![
            loose_object(vec![field("n", int())]),
            loose_object(vec![field("n", number())]),
        ]);
        let input = obj(&[("n", Value::Number(4.0))]);
        // Both parts accept; the later part's normalized value lands in the
        // output.
        assert_eq!(d.decode(&input).unwrap().get("n"), Some(&Value::Number(4.0)));
    }
}
