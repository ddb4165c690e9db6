//! The source contract and the built-in sources.

mod document;
mod env;
mod file;
mod json;
mod toml;

use std::fmt;
use std::iter;

pub use document::Document;
pub use env::EnvSource;
pub use json::JsonSource;
pub use self::toml::TomlSource;

use crate::error::Error;
use crate::key::{KeyPath, KeyTag};
use crate::schema::{Configuration, FieldDescriptor};
use crate::value::RawValue;
use crate::walk::{Lookup, Walker};

/// A provider of raw configuration values.
pub trait Source: Send + Sync + fmt::Debug {
    /// The annotation name this source consults before any other key tag.
    fn key_tag(&self) -> &str;

    /// Performs one binding pass over `target`.
    ///
    /// Returns whether any value from this source was applied.
    fn parse(
        &self,
        companion: &ParsingCompanion<'_>,
        target: &mut dyn Configuration,
    ) -> Result<bool, Error>;

    /// `path` spelled the way this source spells keys, for error messages.
    fn render_key(&self, path: &KeyPath) -> String {
        path.to_string()
    }
}

/// Field inclusion and key resolution shared by every source in one parse call.
#[derive(Debug)]
pub struct ParsingCompanion<'a> {
    source_tag: KeyTag,
    additional_tags: &'a [KeyTag],
    default_tag: &'a KeyTag,
    infer_field_keys: bool,
    exported_only: bool,
    check_required: bool,
}

impl<'a> ParsingCompanion<'a> {
    pub(crate) fn new(
        source_tag: &str,
        additional_tags: &'a [KeyTag],
        default_tag: &'a KeyTag,
        infer_field_keys: bool,
        exported_only: bool,
    ) -> Self {
        Self {
            source_tag: KeyTag::new(source_tag),
            additional_tags,
            default_tag,
            infer_field_keys,
            exported_only,
            check_required: true,
        }
    }

    /// Leaves required checks to a final [`ParsingCompanion::verify_required`] call.
    pub(crate) fn defer_required(mut self) -> Self {
        self.check_required = false;
        self
    }

    pub(crate) fn enforces_required(&self) -> bool {
        self.check_required
    }

    /// Whether `field` takes part in binding at all.
    pub fn include_field(&self, field: &FieldDescriptor) -> bool {
        !field.ignored && (field.exported || !self.exported_only)
    }

    /// Resolves the key of `field`.
    ///
    /// Tags are consulted in order: the source's own tag, additional tags as
    /// registered, then the default tag. Without a match the field name is
    /// used if key inference is enabled.
    pub fn resolve_key(&self, field: &FieldDescriptor) -> Option<String> {
        iter::once(&self.source_tag)
            .chain(self.additional_tags)
            .chain(iter::once(self.default_tag))
            .find_map(|tag| tag.resolve(field))
            .or_else(|| self.infer_field_keys.then(|| field.name.to_owned()))
    }

    /// Binds every included field of `target` from `lookup`.
    ///
    /// Returns whether `lookup` supplied at least one value.
    pub fn walk(&self, target: &mut dyn Configuration, lookup: &dyn Lookup) -> Result<bool, Error> {
        let walker = Walker {
            companion: self,
            lookup,
        };
        Ok(walker.walk(&KeyPath::root(), target)? > 0)
    }

    /// Fails with [`Error::ValueNotSet`] if a required field of `target` is still
    /// zero, naming keys the way `source` spells them.
    pub(crate) fn verify_required(
        &self,
        target: &mut dyn Configuration,
        source: &dyn Source,
    ) -> Result<(), Error> {
        let walker = Walker {
            companion: self,
            lookup: &KeysOf(source),
        };
        walker.walk(&KeyPath::root(), target).map(|_| ())
    }
}

/// A lookup that finds nothing but renders keys like its source.
struct KeysOf<'a>(&'a dyn Source);

impl Lookup for KeysOf<'_> {
    fn lookup(&self, _: &KeyPath) -> Result<Option<RawValue>, String> {
        Ok(None)
    }

    fn render(&self, path: &KeyPath) -> String {
        self.0.render_key(path)
    }
}
