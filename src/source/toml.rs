use std::path::{Path, PathBuf};

use serde_json::Value as Json;

use super::document::Document;
use super::file::read_file;
use super::{ParsingCompanion, Source};
use crate::error::Error;
use crate::schema::Configuration;

/// Reads values from a TOML file.
///
/// Tables map to nested structs. The document is converted into the JSON value
/// model before binding, so coercion behaves exactly as for [`JsonSource`](crate::JsonSource);
/// datetimes become strings.
#[derive(Debug, Clone)]
pub struct TomlSource {
    path: PathBuf,
    must: bool,
}

impl TomlSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            must: false,
        }
    }

    /// Fails the parse with [`Error::SourceUnavailable`] if the file doesn't exist.
    pub fn must(mut self) -> Self {
        self.must = true;
        self
    }
}

impl Source for TomlSource {
    fn key_tag(&self) -> &str {
        "toml"
    }

    fn parse(
        &self,
        companion: &ParsingCompanion<'_>,
        target: &mut dyn Configuration,
    ) -> Result<bool, Error> {
        let Some(contents) = read_file(&self.path, self.must)? else {
            return Ok(false);
        };
        let table = ::toml::from_str::<::toml::Table>(&contents).map_err(|source| Error::Toml {
            path: self.path.clone(),
            source,
        })?;

        let document = Document::new(to_json(::toml::Value::Table(table)));
        companion.walk(target, &document)
    }
}

fn to_json(value: ::toml::Value) -> Json {
    match value {
        ::toml::Value::String(s) => Json::String(s),
        ::toml::Value::Integer(i) => Json::from(i),
        // NaN and infinities have no JSON form.
        ::toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number),
        ::toml::Value::Boolean(b) => Json::Bool(b),
        ::toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        ::toml::Value::Array(items) => Json::Array(items.into_iter().map(to_json).collect()),
        ::toml::Value::Table(table) => Json::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, to_json(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyTag;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[derive(Debug, Default, crate::Configuration)]
    struct Server {
        #[config(key = "host")]
        host: String,
        #[config(toml = "port")]
        port: u16,
        #[config(key = "timeout")]
        timeout: Duration,
    }

    #[derive(Debug, Default, crate::Configuration)]
    struct App {
        #[config(key = "name")]
        name: String,
        #[config(key = "server")]
        server: Server,
    }

    fn parse(source: &TomlSource, target: &mut App) -> Result<bool, Error> {
        let default_tag = KeyTag::default();
        let companion = ParsingCompanion::new(source.key_tag(), &[], &default_tag, false, false);
        source.parse(&companion, target)
    }

    #[test]
    fn test_reads_nested_tables() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            name = "svc"

            [server]
            host = "localhost"
            port = 8080
            timeout = "1m30s"
            "#
        )
        .unwrap();

        let mut app = App::default();
        assert!(parse(&TomlSource::new(file.path()), &mut app).unwrap());
        assert_eq!(app.name, "svc");
        assert_eq!(app.server.host, "localhost");
        assert_eq!(app.server.port, 8080);
        assert_eq!(app.server.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_missing_file() {
        let source = TomlSource::new("/nonexistent/config.toml");
        assert!(!parse(&source, &mut App::default()).unwrap());
        assert!(matches!(
            parse(&source.must(), &mut App::default()),
            Err(Error::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name = ").unwrap();
        assert!(matches!(
            parse(&TomlSource::new(file.path()), &mut App::default()),
            Err(Error::Toml { .. })
        ));
    }

    #[test]
    fn test_to_json_conversion() {
        let table: ::toml::Table = ::toml::from_str(
            r#"
            when = 1979-05-27T07:32:00Z
            ratio = 0.5
            list = [1, 2]
            "#,
        )
        .unwrap();
        let json = to_json(::toml::Value::Table(table));
        assert_eq!(json["when"], Json::String("1979-05-27T07:32:00Z".into()));
        assert_eq!(json["ratio"], serde_json::json!(0.5));
        assert_eq!(json["list"], serde_json::json!([1, 2]));
    }
}
