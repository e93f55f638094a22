//! Persistence for hasher parameters.
//!
//! The bare artifact does not record how it was produced, so the parameters
//! live next to the application in a small JSON file.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use getrandom::fill;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::HasherConfig;

/// A JSON file holding a [`HasherConfig`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config_dir>/password2h/hasher.json` for the current platform.
    pub fn default_location() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "password2h")
            .context("could not determine platform directories")?;

        Ok(Self::new(project_dirs.config_dir().join("hasher.json")))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the stored parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds parameters Argon2id would reject.
    pub fn load(&self) -> Result<HasherConfig> {
        let data = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let config: HasherConfig = serde_json::from_slice(&data)
            .with_context(|| format!("invalid hasher config in {}", self.path.display()))?;
        config.validate().context("invalid Argon2 parameters")?;

        tracing::debug!(path = %self.path.display(), "loaded hasher config");
        Ok(config)
    }

    /// Writes the parameters through a synced temporary file that is then
    /// renamed over the target, so readers see either the old or the new file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, config: &HasherConfig) -> Result<()> {
        let data = serde_json::to_vec_pretty(config)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.random_tmp_path()?;

        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .context("failed to create temporary file")?;

        tmp_file.write_all(&data)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).context("failed to replace hasher config");
        }

        #[cfg(unix)]
        if let Some(parent) = self.path.parent() {
            fs::File::open(parent)?.sync_all()?;
        }

        tracing::debug!(path = %self.path.display(), "saved hasher config");
        Ok(())
    }

    /// `<file name>.tmp.<16 hex chars>` in the target's directory.
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        fill(&mut buf)?;

        let rand_string = buf.iter().map(|b| format!("{b:02x}")).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .context("config path has no file name")?
            .to_string_lossy();

        Ok(self
            .path
            .with_file_name(format!("{file_name}.tmp.{rand_string}")))
    }
}
