use std::path::PathBuf;
use thiserror::Error;

use crate::schema::FieldType;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("no configuration source has been added")]
    NoSource,

    #[error("invalid configuration target `{structure}`: {reason}")]
    InvalidTarget {
        structure: &'static str,
        reason: String,
    },

    #[error("field `{field}` of `{structure}` has no key; annotate it or enable key inference")]
    MissingKey {
        structure: &'static str,
        field: &'static str,
    },

    #[error("required field `{field}` (key `{key}`, type {expected}) has no value")]
    ValueNotSet {
        field: &'static str,
        key: String,
        expected: FieldType,
    },

    #[error("cannot parse value of field `{field}` (key `{key}`) as {expected}: {reason}")]
    Unparsable {
        field: &'static str,
        key: String,
        expected: FieldType,
        reason: String,
    },

    #[error("field `{field}` (key `{key}`) has unsupported type {ty}")]
    UnsupportedType {
        field: &'static str,
        key: String,
        ty: FieldType,
    },

    #[error("{0} could not find its data")]
    SourceUnavailable(String),

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON config file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse TOML config file '{path}': {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Any other failure raised by a source implementation.
    #[error("configuration source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
