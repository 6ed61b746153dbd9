use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

use crate::fs_utils::ensure_private_dir;

/// All computed paths used by ghswitch
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~
    pub home_dir: PathBuf,
    /// ~/.github-switcher
    pub base_dir: PathBuf,
    /// ~/.github-switcher/config.json
    pub config_file: PathBuf,
    /// ~/.github-switcher/config.lock
    pub lock_file: PathBuf,
    /// ~/.ssh
    pub ssh_dir: PathBuf,
    /// ~/.ssh/config
    pub ssh_config: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        Ok(Self::from_home(base_dirs.home_dir()))
    }

    /// Build every location relative to an explicit home directory
    pub fn from_home(home: &Path) -> Self {
        let base_dir = home.join(".github-switcher");
        let ssh_dir = home.join(".ssh");

        Self {
            home_dir: home.to_path_buf(),
            config_file: base_dir.join("config.json"),
            lock_file: base_dir.join("config.lock"),
            base_dir,
            ssh_config: ssh_dir.join("config"),
            ssh_dir,
        }
    }

    /// Per-profile git settings file, e.g. ~/.gitconfig-work
    pub fn profile_gitconfig(&self, name: &str) -> PathBuf {
        self.home_dir.join(format!(".gitconfig-{name}"))
    }

    /// Key file used when a profile does not name one, e.g. ~/.ssh/id_work
    pub fn default_ssh_key(&self, name: &str) -> PathBuf {
        self.ssh_dir.join(format!("id_{name}"))
    }

    /// Ensure the application directory exists (owner-only)
    pub fn ensure_dirs(&self) -> Result<()> {
        ensure_private_dir(&self.base_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.base_dir.display()
            )
        })
    }
}
