use std::collections::HashMap;
use std::env::VarError;
use std::fmt;

use super::{ParsingCompanion, Source};
use crate::error::Error;
use crate::key::{join_key, KeyPath};
use crate::schema::Configuration;
use crate::value::RawValue;
use crate::walk::Lookup;

const SEPARATOR: &str = "_";

type KeyConverter = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Reads values from environment variables.
///
/// Variable names are built by joining the key path with `_`, passing the
/// result through the key converter (upper-casing by default) and joining it
/// to the prefix with `_`. A field keyed `field_c` inside a struct keyed
/// `field_b` is read from `FIELD_B_FIELD_C`, or `APP_FIELD_B_FIELD_C` with
/// prefix `APP`.
pub struct EnvSource {
    prefix: String,
    converter: Option<KeyConverter>,
    vars: Option<HashMap<String, String>>,
    must: bool,
}

impl EnvSource {
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            converter: None,
            vars: None,
            must: false,
        }
    }

    /// Prefix for every variable name, e.g. `APP` for `APP_FIELD_A`.
    ///
    /// A trailing `_` is tolerated: `APP` and `APP_` behave the same.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the default upper-casing of keys. The prefix is not converted.
    pub fn key_converter(mut self, converter: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Reads from the given variables instead of the process environment.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Fails the parse with [`Error::SourceUnavailable`] if no variable matched.
    pub fn must(mut self) -> Self {
        self.must = true;
        self
    }

    fn variable_name(&self, path: &KeyPath) -> String {
        let key = path.joined(SEPARATOR);
        let key = match &self.converter {
            Some(convert) => convert(&key),
            None => key.to_uppercase(),
        };
        join_key(&self.prefix, &key, SEPARATOR)
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource")
            .field("prefix", &self.prefix)
            .field("converter", &self.converter.is_some())
            .field("snapshot", &self.vars.is_some())
            .field("must", &self.must)
            .finish()
    }
}

impl Lookup for EnvSource {
    fn lookup(&self, path: &KeyPath) -> Result<Option<RawValue>, String> {
        let name = self.variable_name(path);
        let value = match &self.vars {
            Some(vars) => vars.get(&name).cloned(),
            None => match std::env::var(&name) {
                Ok(value) => Some(value),
                Err(VarError::NotPresent) => None,
                Err(VarError::NotUnicode(_)) => {
                    return Err(format!("variable {name} is not valid unicode"))
                }
            },
        };
        Ok(value.map(RawValue::Text))
    }

    fn render(&self, path: &KeyPath) -> String {
        self.variable_name(path)
    }
}

impl Source for EnvSource {
    fn key_tag(&self) -> &str {
        "env"
    }

    fn parse(
        &self,
        companion: &ParsingCompanion<'_>,
        target: &mut dyn Configuration,
    ) -> Result<bool, Error> {
        let applied = companion.walk(target, self)?;
        if !applied && self.must {
            return Err(Error::SourceUnavailable("environment".to_owned()));
        }
        Ok(applied)
    }

    fn render_key(&self, path: &KeyPath) -> String {
        self.variable_name(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> KeyPath {
        segments
            .iter()
            .fold(KeyPath::root(), |path, segment| path.child(segment))
    }

    #[test]
    fn test_variable_names() {
        let source = EnvSource::new();
        assert_eq!(source.render(&path(&["field_a"])), "FIELD_A");
        assert_eq!(
            source.render(&path(&["field_b", "field_c"])),
            "FIELD_B_FIELD_C"
        );
    }

    #[test]
    fn test_prefix_join() {
        assert_eq!(
            EnvSource::new().prefix("TEST").render(&path(&["field_a"])),
            "TEST_FIELD_A"
        );
        assert_eq!(
            EnvSource::new().prefix("TEST_").render(&path(&["field_a"])),
            "TEST_FIELD_A"
        );
    }

    #[test]
    fn test_key_converter_leaves_prefix_alone() {
        let source = EnvSource::new()
            .prefix("Test")
            .key_converter(|key| key.to_owned());
        assert_eq!(source.render(&path(&["field_a"])), "Test_field_a");
    }

    #[test]
    fn test_snapshot_lookup() {
        let source = EnvSource::new()
            .prefix("APP")
            .with_vars([("APP_PORT", "8080"), ("PORT", "1")]);
        assert_eq!(
            source.lookup(&path(&["port"])),
            Ok(Some(RawValue::text("8080")))
        );
        assert_eq!(source.lookup(&path(&["host"])), Ok(None));
    }
}
