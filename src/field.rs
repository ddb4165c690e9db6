//! Storage side of binding: how a coerced [`Value`] lands in a field.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::schema::{Configuration, FieldKind, FieldType};
use crate::value::Value;

/// A field type the engine can write into.
///
/// Implemented for the supported scalars, for `Option<T>` and `Box<T>`
/// and, through the derive, for configuration structs.
pub trait Field {
    fn field_type() -> FieldType
    where
        Self: Sized;

    /// Stores `value`, handing it back if its kind does not fit this field.
    fn assign(&mut self, value: Value) -> Result<(), Value>;

    /// Whether the field holds its zero value (empty string, `0`, `false`, `None`...).
    fn is_zero(&self) -> bool;

    /// The nested struct behind this field, allocating empty pointer layers on the way.
    fn as_configuration(&mut self) -> Option<&mut dyn Configuration> {
        None
    }

    /// Drops any pointer layers allocated by [`Field::as_configuration`].
    fn clear(&mut self) {}
}

macro_rules! scalar_field {
    ($($ty:ty => $kind:ident, $zero:expr;)*) => {
        $(
            impl Field for $ty {
                fn field_type() -> FieldType {
                    FieldType::scalar(FieldKind::$kind)
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    match value {
                        Value::$kind(value) => {
                            *self = value;
                            Ok(())
                        }
                        other => Err(other),
                    }
                }

                fn is_zero(&self) -> bool {
                    *self == $zero
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool, false;
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    isize => Isize, 0;
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    usize => Usize, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    Duration => Duration, Duration::ZERO;
}

impl Field for String {
    fn field_type() -> FieldType {
        FieldType::scalar(FieldKind::String)
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::String(value) => {
                *self = value;
                Ok(())
            }
            other => Err(other),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

// Described so that binding them fails with a clear error instead of a compile error
// at the derive site.
macro_rules! unsupported_field {
    ($([$($params:tt)*] $ty:ty => $is_zero:expr;)*) => {
        $(
            impl<$($params)*> Field for $ty {
                fn field_type() -> FieldType {
                    FieldType::scalar(FieldKind::Unsupported(std::any::type_name::<Self>()))
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    Err(value)
                }

                fn is_zero(&self) -> bool {
                    let is_zero: fn(&Self) -> bool = $is_zero;
                    is_zero(self)
                }
            }
        )*
    };
}

unsupported_field! {
    [] char => |c| *c == '\0';
    [] i128 => |n| *n == 0;
    [] u128 => |n| *n == 0;
    [T] Vec<T> => |v| v.is_empty();
    [K, V, S] HashMap<K, V, S> => |m| m.is_empty();
    [K, V] BTreeMap<K, V> => |m| m.is_empty();
}
