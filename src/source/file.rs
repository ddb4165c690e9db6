//! File access shared by the file-backed sources.

use std::path::Path;

use tracing::debug;

use crate::error::Error;

/// Reads a config file into memory.
///
/// Returns `Ok(None)` if the file doesn't exist and `must` is false.
pub(super) fn read_file(path: &Path, must: bool) -> Result<Option<String>, Error> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if must {
                Err(Error::SourceUnavailable(format!(
                    "config file '{}'",
                    path.display()
                )))
            } else {
                debug!(path = %path.display(), "optional config file not found, skipping");
                Ok(None)
            }
        }
        Err(e) => Err(Error::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key = \"value\"").unwrap();

        let contents = read_file(file.path(), true).unwrap();
        assert_eq!(contents.as_deref(), Some("key = \"value\"\n"));
    }

    #[test]
    fn test_must_file_missing() {
        let result = read_file(Path::new("/nonexistent/path/config.json"), true);
        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }

    #[test]
    fn test_optional_file_missing() {
        let result = read_file(Path::new("/nonexistent/path/config.json"), false);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(dir.path(), false);
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
