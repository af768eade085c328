//! # Parameter Persistence
//!
//! Stores the online network's parameters under a fixed key. The session
//! only sees the [`ParameterStore`] trait; [`JsonFileStore`] is the on-disk
//! implementation and [`MemoryStore`] backs tests and embedding hosts.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use ml::NetworkParams;
use serde::{Deserialize, Serialize};

use crate::error::RlError;

/// Key the Pong agent is saved under.
pub const MODEL_KEY: &str = "pong-dqn-agent-v1";

const FORMAT_VERSION: u32 = 1;

pub trait ParameterStore {
    /// # Errors
    ///
    /// Returns an error if the parameters could not be written.
    fn save(&mut self, key: &str, params: &NetworkParams) -> Result<(), RlError>;

    /// # Errors
    ///
    /// Returns [`RlError::NoModel`] if nothing is stored under `key`, or an
    /// I/O or format error if the stored data cannot be read back.
    fn load(&self, key: &str) -> Result<NetworkParams, RlError>;
}

#[derive(Serialize, Deserialize)]
struct SavedModel {
    version: u32,
    key: String,
    params: NetworkParams,
}

/// Writes `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ParameterStore for JsonFileStore {
    fn save(&mut self, key: &str, params: &NetworkParams) -> Result<(), RlError> {
        fs::create_dir_all(&self.dir).map_err(|source| RlError::Io {
            operation: format!("create {}", self.dir.display()),
            source,
        })?;
        let path = self.path_for(key);
        let file = File::create(&path).map_err(|source| RlError::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        let saved = SavedModel { version: FORMAT_VERSION, key: key.to_owned(), params: params.clone() };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &saved)?;
        writer.flush().map_err(|source| RlError::Io {
            operation: format!("write {}", path.display()),
            source,
        })
    }

    fn load(&self, key: &str) -> Result<NetworkParams, RlError> {
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RlError::NoModel { key: key.to_owned() })
            }
            Err(source) => {
                return Err(RlError::Io { operation: format!("open {}", path.display()), source })
            }
        };
        let saved: SavedModel = serde_json::from_reader(BufReader::new(file))?;
        if saved.version != FORMAT_VERSION {
            return Err(RlError::UnsupportedVersion(saved.version));
        }
        Ok(saved.params)
    }
}

/// In-process store keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    models: HashMap<String, NetworkParams>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(key)
    }
}

impl ParameterStore for MemoryStore {
    fn save(&mut self, key: &str, params: &NetworkParams) -> Result<(), RlError> {
        self.models.insert(key.to_owned(), params.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<NetworkParams, RlError> {
        self.models.get(key).cloned().ok_or_else(|| RlError::NoModel { key: key.to_owned() })
    }
}
