//! Key resolution: which annotation names a field's key, and how keys nest.

use std::fmt;

use crate::schema::FieldDescriptor;

/// Tag consulted after the source-specific and additional tags.
pub const DEFAULT_KEY_TAG: &str = "key";

type Transform = Box<dyn Fn(&str) -> String + Send + Sync>;

/// An annotation name that can supply a field's key, with an optional
/// transform applied to the annotation value.
pub struct KeyTag {
    name: String,
    transform: Option<Transform>,
}

impl KeyTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key this tag yields for `field`, if the field carries a non-empty value for it.
    pub fn resolve(&self, field: &FieldDescriptor) -> Option<String> {
        let raw = field.tag_value(&self.name)?;
        Some(match &self.transform {
            Some(transform) => transform(raw),
            None => raw.to_owned(),
        })
    }
}

impl fmt::Debug for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTag")
            .field("name", &self.name)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl Default for KeyTag {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_TAG)
    }
}

/// Joins two key segments with `separator`.
///
/// An empty side yields the other side unchanged. A separator already present
/// at the join point is not doubled.
pub fn join_key(prefix: &str, key: &str, separator: &str) -> String {
    if prefix.is_empty() {
        return key.to_owned();
    }
    if key.is_empty() {
        return prefix.to_owned();
    }
    if separator.is_empty() {
        return format!("{prefix}{key}");
    }

    let prefix = prefix.strip_suffix(separator).unwrap_or(prefix);
    let key = key.strip_prefix(separator).unwrap_or(key);
    format!("{prefix}{separator}{key}")
}

/// The chain of resolved keys leading from the root struct to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_owned());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments joined with [`join_key`].
    pub fn joined(&self, separator: &str) -> String {
        self.segments
            .iter()
            .fold(String::new(), |acc, segment| join_key(&acc, segment, separator))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, FieldType};

    fn field() -> FieldDescriptor {
        FieldDescriptor::new("field_a", FieldType::scalar(FieldKind::String))
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "field_a", "_"), "field_a");
        assert_eq!(join_key("TEST", "", "_"), "TEST");
        assert_eq!(join_key("TEST", "FIELD_A", "_"), "TEST_FIELD_A");
        assert_eq!(join_key("TEST_", "FIELD_A", "_"), "TEST_FIELD_A");
        assert_eq!(join_key("TEST_", "_FIELD_A", "_"), "TEST_FIELD_A");
        assert_eq!(join_key("a", "b", ""), "ab");
        assert_eq!(join_key("", "", "_"), "");
    }

    #[test]
    fn test_key_path() {
        let path = KeyPath::root().child("field_b").child("field_c");
        assert_eq!(path.joined("_"), "field_b_field_c");
        assert_eq!(path.to_string(), "field_b.field_c");
        assert_eq!(path.segments(), ["field_b", "field_c"]);
        assert!(KeyPath::root().is_root());
        assert_eq!(KeyPath::root().joined("_"), "");
    }

    #[test]
    fn test_tag_resolution() {
        let field = field().tag("key", "field_a");
        assert_eq!(KeyTag::default().resolve(&field).as_deref(), Some("field_a"));
        assert_eq!(KeyTag::new("env").resolve(&field), None);
    }

    #[test]
    fn test_tag_transform() {
        let field = field().tag("kek", "Oof");
        let tag = KeyTag::new("kek").with_transform(|value| value.to_lowercase());
        assert_eq!(tag.resolve(&field).as_deref(), Some("oof"));
    }
}
