//! Plain-data description of a configuration struct.
//!
//! A [`Schema`] is produced by [`Configuration::describe`], normally generated
//! by `#[derive(Configuration)]`. Everything downstream of the derive works on
//! these descriptors instead of inspecting types.

use std::fmt;

use crate::field::Field;

/// The base kind of a field, after all pointer layers are stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    /// `std::time::Duration`, parsed from duration literals such as `1m30s`.
    Duration,
    /// A nested configuration struct, identified by its type name.
    Struct(&'static str),
    /// A type the engine refuses to bind.
    Unsupported(&'static str),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Bool => "bool",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::Isize => "isize",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::Usize => "usize",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Duration => "Duration",
            FieldKind::Struct(name) | FieldKind::Unsupported(name) => *name,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, FieldKind::Struct(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field: a base kind behind `indirection` pointer layers.
///
/// `Option<Box<u16>>` is `FieldType { indirection: 2, base: FieldKind::U16 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub indirection: usize,
    pub base: FieldKind,
}

impl FieldType {
    pub const fn scalar(base: FieldKind) -> Self {
        Self {
            indirection: 0,
            base,
        }
    }

    /// The type of a pointer to a value of this type.
    pub const fn pointer(self) -> Self {
        Self {
            indirection: self.indirection + 1,
            base: self.base,
        }
    }

    /// The type one pointer layer down, or `None` for non-pointers.
    pub const fn pointee(self) -> Option<Self> {
        match self.indirection {
            0 => None,
            n => Some(Self {
                indirection: n - 1,
                base: self.base,
            }),
        }
    }

    pub fn is_pointer(&self) -> bool {
        self.indirection > 0
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.indirection {
            0 => write!(f, "{}", self.base),
            1 => write!(f, "{} (behind a pointer)", self.base),
            n => write!(f, "{} (behind {n} pointers)", self.base),
        }
    }
}

/// Metadata for one field of a configuration struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: FieldType,
    /// Key annotations in declaration order, e.g. `("key", "field_a")`.
    pub tags: Vec<(&'static str, &'static str)>,
    /// Literal text used when no source supplies a value.
    pub default: Option<&'static str>,
    pub required: bool,
    pub ignored: bool,
    /// Whether the field is `pub`.
    pub exported: bool,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            tags: Vec::new(),
            default: None,
            required: false,
            ignored: false,
            exported: true,
        }
    }

    pub fn tag(mut self, name: &'static str, value: &'static str) -> Self {
        self.tags.push((name, value));
        self
    }

    pub fn default_value(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Value of the named tag. Empty values count as not set.
    pub fn tag_value(&self, name: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(tag, _)| *tag == name)
            .map(|(_, value)| *value)
            .filter(|value| !value.is_empty())
    }

    /// The `default` literal, unless it is empty.
    pub fn default_literal(&self) -> Option<&'static str> {
        self.default.filter(|literal| !literal.is_empty())
    }
}

/// The described shape of a configuration struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }
}

/// A struct the engine can bind values into.
///
/// Field indices refer to positions in [`Schema::fields`]. Ignored fields have
/// no accessor and return `None`.
pub trait Configuration {
    fn describe() -> Schema
    where
        Self: Sized;

    fn schema(&self) -> Schema;

    fn field(&self, index: usize) -> Option<&dyn Field>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Field>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_layers() {
        let ty = FieldType::scalar(FieldKind::U16).pointer().pointer();
        assert_eq!(ty.indirection, 2);
        assert!(ty.is_pointer());

        let inner = ty.pointee().unwrap().pointee().unwrap();
        assert_eq!(inner, FieldType::scalar(FieldKind::U16));
        assert_eq!(inner.pointee(), None);
    }

    #[test]
    fn test_type_display() {
        assert_eq!(FieldType::scalar(FieldKind::I8).to_string(), "i8");
        assert_eq!(
            FieldType::scalar(FieldKind::Struct("Database"))
                .pointer()
                .to_string(),
            "Database (behind a pointer)"
        );
        assert_eq!(
            FieldType::scalar(FieldKind::Bool)
                .pointer()
                .pointer()
                .pointer()
                .to_string(),
            "bool (behind 3 pointers)"
        );
    }

    #[test]
    fn test_empty_tag_counts_as_unset() {
        let field = FieldDescriptor::new("field_a", FieldType::scalar(FieldKind::String))
            .tag("key", "")
            .tag("env", "FIELD_A");

        assert_eq!(field.tag_value("key"), None);
        assert_eq!(field.tag_value("env"), Some("FIELD_A"));
        assert_eq!(field.tag_value("json"), None);
    }

    #[test]
    fn test_empty_default_counts_as_unset() {
        let ty = FieldType::scalar(FieldKind::String);
        assert_eq!(FieldDescriptor::new("a", ty).default_value("").default_literal(), None);
        assert_eq!(
            FieldDescriptor::new("a", ty).default_value(" ").default_literal(),
            Some(" ")
        );
    }
}
