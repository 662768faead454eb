//! Temporary repository directories holding a `config` file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

/// File name of the configuration document inside a repository.
pub const CONFIG_FILE: &str = "config";

/// Repository directory removed when dropped.
#[derive(Debug)]
pub struct TempRepo {
    dir: TempDir,
}

impl TempRepo {
    /// Create an empty repository directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn empty() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("nodecfg-repo-")
            .tempdir()
            .context("failed to create temporary repository")?;
        Ok(Self { dir })
    }

    /// Create a repository whose `config` file holds `config` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn with_config(config: &Value) -> Result<Self> {
        let repo = Self::empty()?;
        repo.write_config(config)?;
        Ok(repo)
    }

    /// Repository directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Location of the `config` file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(CONFIG_FILE)
    }

    /// Overwrite the `config` file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_config(&self, config: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(config).context("failed to encode config")?;
        fs::write(self.config_path(), text).context("failed to write config")
    }

    /// Raw bytes of the `config` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn config_bytes(&self) -> Result<Vec<u8>> {
        fs::read(self.config_path()).context("failed to read config")
    }

    /// Parsed contents of the `config` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not JSON.
    pub fn read_config(&self) -> Result<Value> {
        let bytes = self.config_bytes()?;
        serde_json::from_slice(&bytes).context("config is not valid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_config;

    #[test]
    fn with_config_round_trips() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        assert!(repo.config_path().starts_with(repo.path()));
        assert_eq!(repo.read_config()?, sample_config());
        Ok(())
    }

    #[test]
    fn empty_repo_has_no_config() -> Result<()> {
        let repo = TempRepo::empty()?;
        assert!(repo.read_config().is_err());
        Ok(())
    }
}
