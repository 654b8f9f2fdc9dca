use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::{CardField, CardFields, Config};

/// Error type for config file I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not edit {path}: {source}")]
    Edit {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("no configuration directory available")]
    NoConfigDir,
}

/// Location of `config.toml` and the operations on it
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// `<config dir>/project-hub/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("project-hub").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config. A missing file yields defaults; a malformed one is an error.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the whole config, replacing the file atomically
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(config)?;
        self.write_atomic(text.as_bytes())
    }

    /// Update only the `[card_fields]` table, leaving the rest of the file
    /// (comments, ordering, unknown keys) untouched.
    pub fn save_card_fields(&self, fields: &CardFields) -> Result<(), ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let mut doc: toml_edit::DocumentMut = text.parse().map_err(|source| ConfigError::Edit {
            path: self.path.clone(),
            source,
        })?;
        set_card_fields(&mut doc, fields);
        self.write_atomic(doc.to_string().as_bytes())
    }

    fn write_atomic(&self, content: &[u8]) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = self.path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        tracing::debug!(path = %self.path.display(), "config written");
        Ok(())
    }
}

/// Set every card field flag in the document's `[card_fields]` table
pub fn set_card_fields(doc: &mut toml_edit::DocumentMut, fields: &CardFields) {
    if !doc.contains_key("card_fields") {
        doc["card_fields"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    for field in CardField::ALL {
        doc["card_fields"][field.config_key()] = toml_edit::value(fields.get(field));
    }
}
