//! Top-level configuration file for the binary.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use physics::PongConfig;
use rl::{DqnConfig, SessionConfig};
use serde::{Deserialize, Serialize};

/// Everything a run needs, loadable from one JSON file. Missing sections and
/// fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pong: PongConfig,
    pub dqn: DqnConfig,
    pub session: SessionConfig,
    /// Episodes between progress lines; 0 logs only the final summary
    pub log_every: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pong: PongConfig::default(),
            dqn: DqnConfig::default(),
            session: SessionConfig::default(),
            log_every: 20,
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Fails if the file cannot be opened or is not a valid config.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails on the first section that does not validate.
    pub fn validate(&self) -> Result<()> {
        self.pong.validate().context("invalid [pong] section")?;
        self.dqn.validate().context("invalid [dqn] section")?;
        self.session.validate().context("invalid [session] section")?;
        Ok(())
    }
}
