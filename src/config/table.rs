//! Order-preserving table of typed training parameters

use crate::config::parser::{ConfigParseError, ConfigParser};
use crate::config::persistence::{self, WriteError};
use crate::config::schema::{SchemaRegistry, ValueKind};
use crate::config::value::ConfigValue;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Config parameter not found: {0}")]
    NotFound(String),
    #[error("Config parameter {key} is {found}, not {expected}")]
    WrongType {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Parsed configuration: parameter names mapped to typed values in the
/// order they were first seen, plus the file the table belongs to.
#[derive(Debug, Clone, Default)]
pub struct ConfigTable {
    entries: Vec<(String, ConfigValue)>,
    path: PathBuf,
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path` into a new table that remembers the path.
    ///
    /// A missing file is not fatal: it is logged and an empty table is
    /// returned. Every other parse error is propagated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigParseError> {
        let path = path.as_ref();
        let mut table = Self::new();

        match table.read(path) {
            Ok(()) => {}
            Err(ConfigParseError::FileNotFound { .. }) => {
                warn!(path = %path.display(), "Could not find config file");
            }
            Err(e) => return Err(e),
        }

        table.path = path.to_path_buf();
        Ok(table)
    }

    /// Parse `path` and merge its parameters into this table.
    ///
    /// Keys already present keep their position and take the new value.
    /// On error the table is left untouched.
    pub fn read<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigParseError> {
        self.read_with(path, SchemaRegistry::global())
    }

    pub fn read_with<P: AsRef<Path>>(
        &mut self,
        path: P,
        registry: &SchemaRegistry,
    ) -> Result<(), ConfigParseError> {
        let parsed = ConfigParser::new(registry).parse_file(path)?;
        self.extend(parsed.entries);
        Ok(())
    }

    /// Replace the contents of an existing file with this table.
    ///
    /// An empty `path` selects the stored path. Fails without touching the
    /// filesystem when the target does not exist yet.
    pub fn overwrite_existing<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        let target = self.resolve_target(path.as_ref())?;
        persistence::overwrite_existing(self, target)
    }

    /// Write every parameter to `path`, creating or truncating it.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        let target = self.resolve_target(path.as_ref())?;
        persistence::dump_table(self, target)
    }

    fn resolve_target<'a>(&'a self, path: &'a Path) -> Result<&'a Path, WriteError> {
        if !path.as_os_str().is_empty() {
            Ok(path)
        } else if !self.path.as_os_str().is_empty() {
            Ok(&self.path)
        } else {
            Err(WriteError::MissingPath)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.path = path.into();
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn lookup(&self, key: &str) -> Result<&ConfigValue, LookupError> {
        self.get(key)
            .ok_or_else(|| LookupError::NotFound(key.to_string()))
    }

    pub fn get_int(&self, key: &str) -> Result<i64, LookupError> {
        let value = self.lookup(key)?;
        value
            .as_int()
            .ok_or_else(|| wrong_type(key, ValueKind::Integer, value))
    }

    pub fn get_float(&self, key: &str) -> Result<f64, LookupError> {
        let value = self.lookup(key)?;
        value
            .as_float()
            .ok_or_else(|| wrong_type(key, ValueKind::Float, value))
    }

    pub fn get_str(&self, key: &str) -> Result<&str, LookupError> {
        let value = self.lookup(key)?;
        value
            .as_str()
            .ok_or_else(|| wrong_type(key, ValueKind::String, value))
    }

    /// Assign a value. Existing keys are updated in place, new keys are
    /// appended. No schema validation is applied.
    pub fn set<K: Into<String>, V: Into<ConfigValue>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();

        match self.position(&key) {
            Some(index) => self.entries[index].1 = value,
            None => {
                debug!(key = %key, "Adding config parameter");
                self.entries.push((key, value));
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.position(key)
            .map(|index| self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }
}

fn wrong_type(key: &str, expected: ValueKind, value: &ConfigValue) -> LookupError {
    LookupError::WrongType {
        key: key.to_string(),
        expected,
        found: value.kind(),
    }
}

/// Tables compare by their ordered parameters; the stored path is ignored.
impl PartialEq for ConfigTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for ConfigTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config: {}", self.path.display())?;
        for (key, value) in &self.entries {
            write!(f, "\n    {}= {}", key, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> Extend<(K, V)> for ConfigTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ConfigTable {
        vec![
            ("ntraining", ConfigValue::Integer(5000)),
            ("gamma_tik", ConfigValue::Float(1e-7)),
            ("datafolder", ConfigValue::from("data")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_set_preserves_position_of_existing_key() {
        let mut table = sample_table();
        table.set("ntraining", 10);
        table.set("nlayers", 4);

        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            vec!["ntraining", "gamma_tik", "datafolder", "nlayers"]
        );
        assert_eq!(table.get_int("ntraining").unwrap(), 10);
    }

    #[test]
    fn test_set_does_not_validate() {
        let mut table = ConfigTable::new();
        table.set("nlayers", "many");
        table.set("mystery_key", 1.5);

        assert_eq!(table.get_str("nlayers").unwrap(), "many");
        assert_eq!(table.get_float("mystery_key").unwrap(), 1.5);
    }

    #[test]
    fn test_not_found_is_distinct_from_wrong_type() {
        let table = sample_table();

        assert_eq!(
            table.get_int("nlayers"),
            Err(LookupError::NotFound("nlayers".to_string()))
        );
        assert_eq!(
            table.get_int("gamma_tik"),
            Err(LookupError::WrongType {
                key: "gamma_tik".to_string(),
                expected: ValueKind::Integer,
                found: ValueKind::Float,
            })
        );
        assert_eq!(
            table.lookup("nlayers").unwrap_err().to_string(),
            "Config parameter not found: nlayers"
        );
    }

    #[test]
    fn test_remove() {
        let mut table = sample_table();

        assert_eq!(table.remove("gamma_tik"), Some(ConfigValue::Float(1e-7)));
        assert_eq!(table.remove("gamma_tik"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_equality_ignores_path() {
        let mut left = sample_table();
        let right = sample_table();
        left.set_path("somewhere.cfg");

        assert_eq!(left, right);

        let mut reordered = ConfigTable::new();
        reordered.set("gamma_tik", 1e-7);
        reordered.set("ntraining", 5000);
        reordered.set("datafolder", "data");
        assert_ne!(reordered, right);
    }

    #[test]
    fn test_display() {
        let mut table = sample_table();
        table.set_path("mnist.cfg");

        assert_eq!(
            table.to_string(),
            "Config: mnist.cfg\n    ntraining= 5000\n    gamma_tik= 1e-7\n    datafolder= data"
        );
    }

    #[test]
    fn test_write_without_any_path() {
        let table = sample_table();

        assert!(matches!(table.dump(""), Err(WriteError::MissingPath)));
        assert!(matches!(
            table.overwrite_existing(""),
            Err(WriteError::MissingPath)
        ));
    }

    #[test]
    fn test_open_missing_file_yields_empty_table() {
        let table = ConfigTable::open("/nonexistent/braidcfg/missing.cfg").unwrap();

        assert!(table.is_empty());
        assert_eq!(table.path(), Path::new("/nonexistent/braidcfg/missing.cfg"));
    }
}
