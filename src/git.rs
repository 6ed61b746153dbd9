//! Projection of profiles into git configuration.
//!
//! Two mechanisms are used:
//! - Directory mode: a per-profile file `~/.gitconfig-<name>` plus an
//!   `includeIf.gitdir:<dir>/.path` entry in the global config, so git picks
//!   the identity up by itself inside that directory.
//! - Manual mode: `user.*` / `commit.gpgsign` written straight into the
//!   global config.
//!
//! The global config is only ever touched through `git config --global`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs_utils::{remove_if_exists, write_private};
use crate::paths::Paths;
use crate::profiles::{Profile, ProfileStore};
use crate::runner::CommandRunner;

/// The identity git currently uses globally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitIdentity {
    pub email: Option<String>,
    pub name: Option<String>,
    pub signing_key: Option<String>,
    pub gpg_sign: bool,
}

/// What happened to the include directive during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeChange {
    Added,
    Updated,
    Unchanged,
}

/// Render the contents of a profile's settings file
pub fn render_profile_config(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Git configuration for profile: {}", profile.name);
    out.push_str("[user]\n");
    let _ = writeln!(out, "\temail = {}", profile.primary_email);

    if let Some(name) = profile.git_name() {
        let _ = writeln!(out, "\tname = {name}");
    }

    if let Some(key) = profile.gpg_key() {
        let _ = writeln!(out, "\tsigningkey = {key}");
        out.push_str("[commit]\n");
        out.push_str("\tgpgsign = true\n");
    }

    if let Some(key_path) = &profile.ssh_key_path {
        out.push_str("[core]\n");
        let _ = writeln!(
            out,
            "\tsshCommand = ssh -i {} -F /dev/null",
            key_path.display()
        );
    }

    out
}

/// Global config key of the include directive for a directory
///
/// git matches `gitdir:` patterns ending in `/` against everything below the
/// directory, so the trailing separator is always added.
pub fn include_key(directory: &Path) -> String {
    let mut dir = directory.display().to_string().replace('\\', "/");
    if !dir.ends_with('/') {
        dir.push('/');
    }
    format!("includeIf.gitdir:{dir}.path")
}

pub struct GitProjector<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    paths: &'a Paths,
}

impl<'a, R: CommandRunner + ?Sized> GitProjector<'a, R> {
    pub fn new(runner: &'a R, paths: &'a Paths) -> Self {
        Self { runner, paths }
    }

    /// Verify that git is installed and runnable
    pub fn check_installed(&self) -> Result<String> {
        let output = self.runner.run_checked("git", &["--version"])?;
        Ok(output.stdout.trim().to_string())
    }

    /// (Re)write the profile's settings file in full
    pub fn write_profile_config(&self, profile: &Profile) -> Result<PathBuf> {
        let path = self.paths.profile_gitconfig(&profile.name);
        write_private(&path, &render_profile_config(profile))?;
        Ok(path)
    }

    /// Regenerate the profile's settings file and point the include directive
    /// for `directory` (already canonical) at it
    pub fn setup_profile(&self, profile: &Profile, directory: &Path) -> Result<IncludeChange> {
        let config_path = self.write_profile_config(profile)?;
        let config_path = config_path.display().to_string();
        let key = include_key(directory);

        let change = match self.get_global(&key)? {
            None => IncludeChange::Added,
            Some(existing) if existing == config_path => IncludeChange::Unchanged,
            Some(_) => IncludeChange::Updated,
        };

        if change != IncludeChange::Unchanged {
            self.set_global(&key, &config_path)?;
        }

        tracing::debug!(profile = %profile.name, key, ?change, "include directive");
        Ok(change)
    }

    /// Re-project every directory rule of the store
    pub fn setup_all(&self, store: &ProfileStore) -> Result<usize> {
        for rule in &store.directory_rules {
            let profile = store.get_profile(&rule.profile)?;
            self.setup_profile(profile, &rule.path)?;
        }
        Ok(store.directory_rules.len())
    }

    /// Apply a profile to the global config, using `email` as `user.email`
    pub fn switch_global(&self, profile: &Profile, email: &str) -> Result<()> {
        self.set_global("user.email", email)?;

        if let Some(name) = profile.git_name() {
            self.set_global("user.name", name)?;
        }

        match profile.gpg_key() {
            Some(key) => {
                self.set_global("user.signingkey", key)?;
                self.set_global("commit.gpgsign", "true")?;
            }
            None => {
                self.unset_global("commit.gpgsign");
                self.unset_global("user.signingkey");
            }
        }

        Ok(())
    }

    pub fn current_identity(&self) -> Result<GitIdentity> {
        Ok(GitIdentity {
            email: self.get_global("user.email")?,
            name: self.get_global("user.name")?,
            signing_key: self.get_global("user.signingkey")?,
            gpg_sign: self
                .get_global("commit.gpgsign")?
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        })
    }

    /// Delete the profile's settings file.
    ///
    /// Include directives pointing at it stay in the global config; git
    /// ignores includes whose file is missing.
    pub fn remove_profile_config(&self, name: &str) -> Result<bool> {
        remove_if_exists(&self.paths.profile_gitconfig(name))
    }

    /// `None` when the key is not set (git exits 1)
    fn get_global(&self, key: &str) -> Result<Option<String>> {
        let output = self.runner.run("git", &["config", "--global", "--get", key])?;
        if !output.success() {
            return Ok(None);
        }
        let value = output.stdout.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    fn set_global(&self, key: &str, value: &str) -> Result<()> {
        self.runner
            .run_checked("git", &["config", "--global", key, value])?;
        Ok(())
    }

    /// Failures (usually "key not set") are ignored
    fn unset_global(&self, key: &str) {
        match self.runner.run("git", &["config", "--global", "--unset", key]) {
            Ok(output) if !output.success() => {
                tracing::debug!(key, status = ?output.status, "unset skipped");
            }
            Err(e) => tracing::debug!(key, error = %e, "unset failed"),
            Ok(_) => {}
        }
    }
}
