use std::time::Duration;

/// A raw value handed over by a source, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text from sources without a type system, such as environment variables.
    Text(String),
    /// A value already decoded from a structured document.
    Json(serde_json::Value),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Empty strings and JSON `null` are treated like a missing key.
    pub fn is_unset(&self) -> bool {
        match self {
            RawValue::Text(text) => text.is_empty(),
            RawValue::Json(serde_json::Value::String(text)) => text.is_empty(),
            RawValue::Json(serde_json::Value::Null) => true,
            RawValue::Json(_) => false,
        }
    }
}

/// A coerced value, tagged with the kind it was parsed as.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Duration(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_values() {
        assert!(RawValue::text("").is_unset());
        assert!(RawValue::Json(json!(null)).is_unset());
        assert!(RawValue::Json(json!("")).is_unset());

        assert!(!RawValue::text("   ").is_unset());
        assert!(!RawValue::Json(json!(0)).is_unset());
        assert!(!RawValue::Json(json!(false)).is_unset());
        assert!(!RawValue::Json(json!({})).is_unset());
    }
}
