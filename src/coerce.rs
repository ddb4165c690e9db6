//! Coercion table: raw source values to typed [`Value`]s, dispatched on [`FieldKind`].

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value as Json;

use crate::duration::parse_duration;
use crate::schema::{FieldKind, FieldType};
use crate::value::{RawValue, Value};

/// Outcome of coercing one field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Coerced {
    Scalar(Value),
    /// The field is a struct; walk its fields instead.
    Recurse,
}

/// Why a raw value could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rejection {
    Unparsable(String),
    Unsupported,
}

/// Coerces `raw` into a value for a field of type `ty`.
///
/// Struct kinds (behind any number of pointers) always yield [`Coerced::Recurse`],
/// even without a raw value; scalars without a raw value yield `None`.
pub(crate) fn coerce(ty: FieldType, raw: Option<&RawValue>) -> Result<Option<Coerced>, Rejection> {
    if let Some(pointee) = ty.pointee() {
        return coerce(pointee, raw);
    }

    match (ty.base, raw) {
        (FieldKind::Struct(_), _) => Ok(Some(Coerced::Recurse)),
        (_, None) => Ok(None),
        (kind, Some(raw)) => coerce_scalar(kind, raw).map(|value| Some(Coerced::Scalar(value))),
    }
}

fn coerce_scalar(kind: FieldKind, raw: &RawValue) -> Result<Value, Rejection> {
    match kind {
        FieldKind::String => string(raw).map(Value::String),
        FieldKind::Bool => boolean(raw).map(Value::Bool),
        FieldKind::I8 => integer(raw).map(Value::I8),
        FieldKind::I16 => integer(raw).map(Value::I16),
        FieldKind::I32 => integer(raw).map(Value::I32),
        FieldKind::I64 => integer(raw).map(Value::I64),
        FieldKind::Isize => integer(raw).map(Value::Isize),
        FieldKind::U8 => integer(raw).map(Value::U8),
        FieldKind::U16 => integer(raw).map(Value::U16),
        FieldKind::U32 => integer(raw).map(Value::U32),
        FieldKind::U64 => integer(raw).map(Value::U64),
        FieldKind::Usize => integer(raw).map(Value::Usize),
        FieldKind::F32 => float32(raw).map(Value::F32),
        FieldKind::F64 => float64(raw).map(Value::F64),
        FieldKind::Duration => duration(raw).map(Value::Duration),
        FieldKind::Struct(_) | FieldKind::Unsupported(_) => Err(Rejection::Unsupported),
    }
}

fn unparsable(reason: impl Display) -> Rejection {
    Rejection::Unparsable(reason.to_string())
}

fn mismatched(found: &Json) -> Rejection {
    let found = match found {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    };
    Rejection::Unparsable(format!("found {found}"))
}

fn string(raw: &RawValue) -> Result<String, Rejection> {
    match raw {
        RawValue::Text(text) => Ok(text.clone()),
        RawValue::Json(Json::String(text)) => Ok(text.clone()),
        RawValue::Json(other) => Err(mismatched(other)),
    }
}

fn boolean(raw: &RawValue) -> Result<bool, Rejection> {
    match raw {
        RawValue::Text(text) if text.eq_ignore_ascii_case("true") => Ok(true),
        RawValue::Text(text) if text.eq_ignore_ascii_case("false") => Ok(false),
        RawValue::Text(text) => Err(unparsable(format_args!(
            "{text:?} is neither `true` nor `false`"
        ))),
        RawValue::Json(Json::Bool(value)) => Ok(*value),
        RawValue::Json(other) => Err(mismatched(other)),
    }
}

fn integer<T>(raw: &RawValue) -> Result<T, Rejection>
where
    T: FromStr + TryFrom<i64> + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    match raw {
        RawValue::Text(text) => text
            .parse::<T>()
            .map_err(|err| unparsable(format_args!("{text:?}: {err}"))),
        RawValue::Json(Json::Number(number)) => {
            let converted = if let Some(n) = number.as_i64() {
                T::try_from(n).ok()
            } else if let Some(n) = number.as_u64() {
                T::try_from(n).ok()
            } else {
                return Err(unparsable(format_args!("{number} is not an integer")));
            };
            converted.ok_or_else(|| unparsable(format_args!("{number} is out of range")))
        }
        RawValue::Json(other) => Err(mismatched(other)),
    }
}

// Text goes through the JSON number grammar so env and JSON sources agree on literals.
fn float64(raw: &RawValue) -> Result<f64, Rejection> {
    match raw {
        RawValue::Text(text) => serde_json::from_str::<f64>(text)
            .map_err(|err| unparsable(format_args!("{text:?}: {err}"))),
        RawValue::Json(Json::Number(number)) => number
            .as_f64()
            .ok_or_else(|| unparsable(format_args!("{number} is not representable"))),
        RawValue::Json(other) => Err(mismatched(other)),
    }
}

fn float32(raw: &RawValue) -> Result<f32, Rejection> {
    let wide = float64(raw)?;
    let narrow = wide as f32;
    if narrow.is_infinite() {
        return Err(unparsable(format_args!("{wide} is out of range")));
    }
    Ok(narrow)
}

fn duration(raw: &RawValue) -> Result<Duration, Rejection> {
    match raw {
        RawValue::Text(text) | RawValue::Json(Json::String(text)) => {
            parse_duration(text).map_err(Rejection::Unparsable)
        }
        // Structured documents may carry a plain nanosecond count.
        RawValue::Json(Json::Number(number)) => number
            .as_u64()
            .map(Duration::from_nanos)
            .ok_or_else(|| unparsable(format_args!("{number} is not a nanosecond count"))),
        RawValue::Json(other) => Err(mismatched(other)),
    }
}
