//! Binds configuration values from environment variables and files into typed
//! structs.
//!
//! Annotate a struct with `#[derive(Configuration)]`, register one or more
//! sources on a [`Loader`] and call [`Loader::load`] or [`Loader::parse`].
//!
//! ```no_run
//! use confbind::{Configuration, EnvSource, Loader};
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Configuration)]
//! struct Settings {
//!     #[config(key = "listen_addr", default = "0.0.0.0:8080")]
//!     listen_addr: String,
//!     #[config(key = "timeout", default = "30s")]
//!     timeout: Duration,
//!     #[config(env = "DATABASE_URL", required)]
//!     database_url: Option<String>,
//! }
//!
//! let settings: Settings = Loader::new().add(EnvSource::new().prefix("APP")).load()?;
//! # Ok::<(), confbind::Error>(())
//! ```

extern crate self as confbind;

mod builder;
mod coerce;
mod duration;
mod error;
mod field;
mod key;
mod pointer;
mod schema;
mod source;
mod value;
mod walk;

pub use builder::Loader;
pub use confbind_derive::Configuration;
pub use error::Error;
pub use field::Field;
pub use key::{join_key, KeyPath, KeyTag, DEFAULT_KEY_TAG};
pub use schema::{Configuration, FieldDescriptor, FieldKind, FieldType, Schema};
pub use source::{Document, EnvSource, JsonSource, ParsingCompanion, Source, TomlSource};
pub use value::{RawValue, Value};
pub use walk::Lookup;
