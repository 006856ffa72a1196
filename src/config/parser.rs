use crate::config::schema::{Classification, SchemaRegistry, ValueKind};
use crate::config::table::ConfigTable;
use crate::config::value::ConfigValue;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("Config file has multiple specifications of {key} (line {line})")]
    DuplicateKey { key: String, line: usize },
    #[error("Invalid integer for {key}: {value:?}")]
    InvalidInteger { key: String, value: String },
    #[error("Invalid float for {key}: {value:?}")]
    InvalidFloat { key: String, value: String },
    #[error("Could not find config file: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Line-oriented `key = value` parser driven by a [`SchemaRegistry`].
///
/// Keys the registry does not recognize are dropped without error. The
/// parser remembers them so callers that want to be stricter can inspect
/// [`ConfigParser::skipped_keys`] after a parse.
pub struct ConfigParser<'a> {
    registry: &'a SchemaRegistry,
    skipped_keys: Vec<String>,
}

impl<'a> ConfigParser<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            skipped_keys: Vec::new(),
        }
    }

    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ConfigTable, ConfigParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigParseError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigParseError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let table = self.parse_str(&content)?;
        debug!(
            path = %path.display(),
            parameters = table.len(),
            skipped = self.skipped_keys.len(),
            "Parsed config file"
        );
        Ok(table)
    }

    pub fn parse_str(&mut self, content: &str) -> Result<ConfigTable, ConfigParseError> {
        self.skipped_keys.clear();
        let mut table = ConfigTable::new();

        for (index, raw_line) in content.split('\n').enumerate() {
            let line = raw_line.trim_end_matches(['\r', '\n']);

            // Only a '#' in the very first column marks a comment
            if !line.contains('=') || line.starts_with('#') {
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                continue;
            };
            let key = raw_key.trim();
            let value = raw_value.trim();

            if table.contains_key(key) {
                return Err(ConfigParseError::DuplicateKey {
                    key: key.to_string(),
                    line: index + 1,
                });
            }

            match coerce_value(self.registry, key, value)? {
                Some(typed) => table.set(key, typed),
                None => {
                    debug!(key, line = index + 1, "Skipping unrecognized parameter");
                    self.skipped_keys.push(key.to_string());
                }
            }
        }

        Ok(table)
    }

    /// Unrecognized keys dropped by the most recent parse, in file order
    pub fn skipped_keys(&self) -> &[String] {
        &self.skipped_keys
    }
}

/// Parse `path` against `registry` in one pass.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    registry: &SchemaRegistry,
) -> Result<ConfigTable, ConfigParseError> {
    ConfigParser::new(registry).parse_file(path)
}

/// Coerce already-trimmed value text to the kind the registry declares for
/// `key`. Returns `Ok(None)` for unrecognized keys.
pub fn coerce_value(
    registry: &SchemaRegistry,
    key: &str,
    value: &str,
) -> Result<Option<ConfigValue>, ConfigParseError> {
    let kind = match registry.classify(key) {
        Classification::Known(kind) => kind,
        Classification::Unknown => return Ok(None),
    };

    let typed = match kind {
        ValueKind::Integer => value
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|_| ConfigParseError::InvalidInteger {
                key: key.to_string(),
                value: value.to_string(),
            })?,
        ValueKind::Float => value
            .parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|_| ConfigParseError::InvalidFloat {
                key: key.to_string(),
                value: value.to_string(),
            })?,
        ValueKind::String => ConfigValue::String(value.to_string()),
    };

    Ok(Some(typed))
}
