use std::fmt;

use tracing::debug;

use crate::error::Error;
use crate::key::KeyTag;
use crate::schema::Configuration;
use crate::source::{ParsingCompanion, Source};

/// Binds configuration structs from an ordered list of sources.
///
/// Sources are consulted in registration order. By default the first source
/// that supplies at least one value wins and later sources are not consulted.
/// With [`Loader::allow_override`] every source is applied and a later source
/// overwrites whatever an earlier one bound for the same field.
///
/// ## Key Resolution
///
/// A field's key is taken from the first non-empty annotation among:
///
/// 1. the source's own tag (`env`, `json`, `toml`, ...)
/// 2. the additional tags, in registration order
/// 3. the default tag (`key` unless replaced)
///
/// Without any of these the field name is used if [`Loader::infer_field_keys`]
/// is enabled; otherwise the parse fails with [`Error::MissingKey`].
///
/// ## Example
///
/// ```no_run
/// use confbind::{Configuration, EnvSource, Loader, TomlSource};
///
/// #[derive(Debug, Default, Configuration)]
/// struct Database {
///     #[config(key = "host", default = "localhost")]
///     host: String,
///     #[config(key = "port", default = 5432)]
///     port: u16,
/// }
///
/// #[derive(Debug, Default, Configuration)]
/// struct AppConfig {
///     #[config(key = "name", required)]
///     name: String,
///     #[config(key = "database")]
///     database: Database,
/// }
///
/// // Environment (APP_DATABASE_PORT, ...) overrides the file.
/// let config: AppConfig = Loader::new()
///     .add(TomlSource::new("config/default.toml"))
///     .add(EnvSource::new().prefix("APP"))
///     .allow_override()
///     .load()?;
/// # Ok::<(), confbind::Error>(())
/// ```
#[must_use = "a loader does nothing until .parse() or .load() is called"]
pub struct Loader {
    sources: Vec<Box<dyn Source>>,
    allow_override: bool,
    key_tags: Vec<KeyTag>,
    default_tag: KeyTag,
    infer_field_keys: bool,
    exported_only: bool,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            allow_override: false,
            key_tags: Vec::new(),
            default_tag: KeyTag::default(),
            infer_field_keys: false,
            exported_only: false,
        }
    }

    /// Registers a source. Sources are applied in registration order.
    pub fn add(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Applies every source; the last one to supply a value for a field wins.
    pub fn allow_override(mut self) -> Self {
        self.allow_override = true;
        self
    }

    /// Tags consulted after the source's own tag and before the default tag.
    pub fn additional_key_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_tags.extend(names.into_iter().map(KeyTag::new));
        self
    }

    /// Like [`Loader::additional_key_tags`] for a single tag, which may carry a
    /// transform for its values.
    pub fn key_tag(mut self, tag: KeyTag) -> Self {
        self.key_tags.push(tag);
        self
    }

    /// Replaces the `key` tag consulted last.
    pub fn default_key_tag(mut self, tag: KeyTag) -> Self {
        self.default_tag = tag;
        self
    }

    /// Falls back to the field name when no tag names a key.
    pub fn infer_field_keys(mut self) -> Self {
        self.infer_field_keys = true;
        self
    }

    /// Skips fields that aren't `pub`.
    pub fn exported_fields_only(mut self) -> Self {
        self.exported_only = true;
        self
    }

    /// Binds `target` in place.
    ///
    /// On error `target` may be partially bound.
    pub fn parse<T: Configuration>(&self, target: &mut T) -> Result<(), Error> {
        if self.sources.is_empty() {
            return Err(Error::NoSource);
        }

        // Required fields are checked once, after every pass, so a source that
        // found nothing doesn't stop a later one from supplying them.
        let mut last = None;
        for source in &self.sources {
            let companion = self.companion(&**source).defer_required();
            let applied = source.parse(&companion, &mut *target)?;
            debug!(source = source.key_tag(), applied, "source pass complete");
            last = Some(&**source);

            if applied && !self.allow_override {
                break;
            }
        }

        match last {
            Some(source) => self.companion(source).verify_required(target, source),
            None => Ok(()),
        }
    }

    fn companion(&self, source: &dyn Source) -> ParsingCompanion<'_> {
        ParsingCompanion::new(
            source.key_tag(),
            &self.key_tags,
            &self.default_tag,
            self.infer_field_keys,
            self.exported_only,
        )
    }

    /// Binds a fresh `T::default()` and returns it.
    pub fn load<T: Configuration + Default>(&self) -> Result<T, Error> {
        let mut target = T::default();
        self.parse(&mut target)?;
        Ok(target)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("sources", &self.sources)
            .field("allow_override", &self.allow_override)
            .field("key_tags", &self.key_tags)
            .field("default_tag", &self.default_tag)
            .field("infer_field_keys", &self.infer_field_keys)
            .field("exported_only", &self.exported_only)
            .finish()
    }
}
