use std::path::{Path, PathBuf};

use super::document::Document;
use super::file::read_file;
use super::{ParsingCompanion, Source};
use crate::error::Error;
use crate::schema::Configuration;

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Inline(Document),
}

/// Reads values from a JSON document, usually a file.
///
/// Nested structs are read from nested objects. A missing file is skipped
/// unless the source was marked with [`JsonSource::must`].
#[derive(Debug, Clone)]
pub struct JsonSource {
    origin: Origin,
    must: bool,
}

impl JsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
            must: false,
        }
    }

    /// A source backed by an already decoded document.
    pub fn from_value(value: serde_json::Value) -> Self {
        Self {
            origin: Origin::Inline(Document::new(value)),
            must: false,
        }
    }

    /// Fails the parse with [`Error::SourceUnavailable`] if the file doesn't exist.
    pub fn must(mut self) -> Self {
        self.must = true;
        self
    }
}

impl Source for JsonSource {
    fn key_tag(&self) -> &str {
        "json"
    }

    fn parse(
        &self,
        companion: &ParsingCompanion<'_>,
        target: &mut dyn Configuration,
    ) -> Result<bool, Error> {
        let loaded;
        let document = match &self.origin {
            Origin::Inline(document) => document,
            Origin::File(path) => {
                let Some(contents) = read_file(path, self.must)? else {
                    return Ok(false);
                };
                let root = serde_json::from_str(&contents).map_err(|source| Error::Json {
                    path: path.clone(),
                    source,
                })?;
                loaded = Document::new(root);
                &loaded
            }
        };

        companion.walk(target, document)
    }
}
