//! Host-alias blocks in `~/.ssh/config`.
//!
//! Each profile may own one block appended to the user's ssh config:
//!
//! ```text
//! # GitHub profile: work
//! Host github.com-work
//!     HostName github.com
//!     User git
//!     IdentityFile ~/.ssh/id_work
//!     IdentitiesOnly yes
//! ```
//!
//! The file is never parsed as a whole. For removal it is split into line
//! records tagged as belonging to the profile's block or not, and only the
//! untouched records are written back, byte for byte.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fs_utils::{ensure_private_dir, write_private};
use crate::paths::Paths;
use crate::profiles::Profile;

pub const SERVICE_HOST: &str = "github.com";
pub const SERVICE_USER: &str = "git";

const MARKER_PREFIX: &str = "GitHub profile:";

/// Host alias a profile's block is registered under, e.g. `github.com-work`
pub fn host_alias(profile_name: &str) -> String {
    format!("{SERVICE_HOST}-{profile_name}")
}

/// Key file a profile connects with: its own, or `~/.ssh/id_<name>`
pub fn identity_file(paths: &Paths, profile: &Profile) -> PathBuf {
    profile
        .ssh_key_path
        .clone()
        .unwrap_or_else(|| paths.default_ssh_key(&profile.name))
}

pub fn render_entry(profile_name: &str, identity_file: &std::path::Path) -> String {
    format!(
        "\n# {MARKER_PREFIX} {profile_name}\n\
         Host {alias}\n\
         \x20   HostName {SERVICE_HOST}\n\
         \x20   User {SERVICE_USER}\n\
         \x20   IdentityFile {key}\n\
         \x20   IdentitiesOnly yes\n",
        alias = host_alias(profile_name),
        key = identity_file.display(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Untouched,
    Managed,
}

#[derive(Debug)]
struct LineRecord<'a> {
    /// Includes the line terminator, if any
    text: &'a str,
    kind: LineKind,
}

fn host_patterns(line: &str) -> Option<std::str::SplitWhitespace<'_>> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;
    keyword.eq_ignore_ascii_case("host").then_some(tokens)
}

fn is_host_for(line: &str, alias: &str) -> bool {
    host_patterns(line).is_some_and(|mut patterns| patterns.any(|p| p == alias))
}

fn is_marker_for(line: &str, profile_name: &str) -> bool {
    line.trim()
        .strip_prefix('#')
        .and_then(|rest| rest.trim().strip_prefix(MARKER_PREFIX))
        .is_some_and(|name| name.trim() == profile_name)
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Tag every line of `content` as part of the profile's block or not.
///
/// A block starts at the profile's marker comment or at a `Host` line for its
/// alias and runs until the next non-blank line that is not indented. A blank
/// line directly before the marker is the separator written by
/// [`render_entry`] and belongs to the block too.
fn tag_lines<'a>(content: &'a str, profile_name: &str) -> Vec<LineRecord<'a>> {
    let alias = host_alias(profile_name);
    let mut records: Vec<LineRecord<'a>> = Vec::new();
    let mut in_block = false;

    for text in content.split_inclusive('\n') {
        let trimmed = text.trim();

        if is_marker_for(text, profile_name) {
            if let Some(prev) = records.last_mut() {
                if prev.kind == LineKind::Untouched && prev.text.trim().is_empty() {
                    prev.kind = LineKind::Managed;
                }
            }
            in_block = true;
            records.push(LineRecord {
                text,
                kind: LineKind::Managed,
            });
            continue;
        }

        let was_in_block = in_block;
        if host_patterns(text).is_some() {
            in_block = is_host_for(text, &alias);
        } else if in_block && !trimmed.is_empty() && !is_indented(text) {
            in_block = false;
        }
        if was_in_block && !in_block {
            release_trailing_blanks(&mut records);
        }

        records.push(LineRecord {
            text,
            kind: if in_block {
                LineKind::Managed
            } else {
                LineKind::Untouched
            },
        });
    }

    records
}

/// Blank lines at the end of a block separate it from whatever follows
fn release_trailing_blanks(records: &mut [LineRecord<'_>]) {
    for record in records.iter_mut().rev() {
        if record.kind != LineKind::Managed || !record.text.trim().is_empty() {
            break;
        }
        record.kind = LineKind::Untouched;
    }
}

/// Remove the profile's block from `content`; `None` if there is none
pub fn strip_entry(content: &str, profile_name: &str) -> Option<String> {
    let records = tag_lines(content, profile_name);
    if records.iter().all(|r| r.kind == LineKind::Untouched) {
        return None;
    }
    Some(
        records
            .iter()
            .filter(|r| r.kind == LineKind::Untouched)
            .map(|r| r.text)
            .collect(),
    )
}

/// Whether any `Host` line already lists the alias
pub fn entry_exists(content: &str, alias: &str) -> bool {
    content.lines().any(|line| is_host_for(line, alias))
}

pub struct SshConfigManager<'a> {
    paths: &'a Paths,
}

impl<'a> SshConfigManager<'a> {
    pub fn new(paths: &'a Paths) -> Self {
        Self { paths }
    }

    fn read(&self) -> Result<Option<String>> {
        let path = &self.paths.ssh_config;
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn has_entry(&self, profile_name: &str) -> Result<bool> {
        Ok(self
            .read()?
            .is_some_and(|content| entry_exists(&content, &host_alias(profile_name))))
    }

    /// Append the profile's block unless a `Host` line for its alias exists.
    ///
    /// Creates `~/.ssh` (0700) and the config file (0600) when missing.
    pub fn ensure_entry(&self, profile: &Profile) -> Result<EntryStatus> {
        let alias = host_alias(&profile.name);
        let mut content = self.read()?.unwrap_or_default();

        if entry_exists(&content, &alias) {
            tracing::debug!(alias, "ssh entry already present");
            return Ok(EntryStatus::AlreadyPresent);
        }

        ensure_private_dir(&self.paths.ssh_dir)?;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&render_entry(
            &profile.name,
            &identity_file(self.paths, profile),
        ));
        write_private(&self.paths.ssh_config, &content)?;

        tracing::debug!(alias, "ssh entry added");
        Ok(EntryStatus::Added)
    }

    /// Remove the profile's block, leaving every other line as it was.
    ///
    /// Returns whether anything was removed. A missing config file, or one
    /// without the block, is left alone.
    pub fn remove_entry(&self, profile_name: &str) -> Result<bool> {
        let Some(content) = self.read()? else {
            return Ok(false);
        };
        let Some(stripped) = strip_entry(&content, profile_name) else {
            return Ok(false);
        };

        write_private(&self.paths.ssh_config, &stripped)?;
        tracing::debug!(profile = profile_name, "ssh entry removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_paths;
    use std::path::Path;
    use tempfile::TempDir;

    const EXISTING: &str = "Host *\n    AddKeysToAgent yes\n\nHost myserver\n    HostName 10.0.0.1\n";

    #[test]
    fn test_render_entry() {
        let entry = render_entry("work", Path::new("/home/u/.ssh/id_work"));
        assert_eq!(
            entry,
            "\n# GitHub profile: work\n\
             Host github.com-work\n\
             \x20   HostName github.com\n\
             \x20   User git\n\
             \x20   IdentityFile /home/u/.ssh/id_work\n\
             \x20   IdentitiesOnly yes\n"
        );
    }

    #[test]
    fn test_ensure_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let manager = SshConfigManager::new(&paths);

        let status = manager.ensure_entry(&Profile::new("work", "a@x.com")).unwrap();
        assert_eq!(status, EntryStatus::Added);

        let content = fs::read_to_string(&paths.ssh_config).unwrap();
        assert!(content.contains("Host github.com-work"));
        assert!(content.contains(&format!(
            "IdentityFile {}",
            paths.default_ssh_key("work").display()
        )));
        assert!(manager.has_entry("work").unwrap());
    }

    #[test]
    fn test_ensure_uses_profile_key_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let manager = SshConfigManager::new(&paths);

        let mut profile = Profile::new("work", "a@x.com");
        profile.ssh_key_path = Some(PathBuf::from("/keys/work_ed25519"));
        manager.ensure_entry(&profile).unwrap();

        let content = fs::read_to_string(&paths.ssh_config).unwrap();
        assert!(content.contains("IdentityFile /keys/work_ed25519"));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let manager = SshConfigManager::new(&paths);
        let profile = Profile::new("work", "a@x.com");

        manager.ensure_entry(&profile).unwrap();
        let status = manager.ensure_entry(&profile).unwrap();
        assert_eq!(status, EntryStatus::AlreadyPresent);

        let content = fs::read_to_string(&paths.ssh_config).unwrap();
        assert_eq!(content.matches("Host github.com-work").count(), 1);
    }

    #[test]
    fn test_ensure_does_not_confuse_similar_alias() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let manager = SshConfigManager::new(&paths);

        manager.ensure_entry(&Profile::new("work2", "a@x.com")).unwrap();
        let status = manager.ensure_entry(&Profile::new("work", "a@x.com")).unwrap();
        assert_eq!(status, EntryStatus::Added);
    }

    #[test]
    fn test_ensure_then_remove_restores_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.ssh_dir).unwrap();
        fs::write(&paths.ssh_config, EXISTING).unwrap();
        let manager = SshConfigManager::new(&paths);

        manager.ensure_entry(&Profile::new("work", "a@x.com")).unwrap();
        assert!(manager.remove_entry("work").unwrap());

        assert_eq!(fs::read_to_string(&paths.ssh_config).unwrap(), EXISTING);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_config_is_edited_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let dotfiles = temp_dir.path().join("dotfiles");
        fs::create_dir_all(&dotfiles).unwrap();
        fs::create_dir_all(&paths.ssh_dir).unwrap();
        let real = dotfiles.join("ssh_config");
        fs::write(&real, EXISTING).unwrap();
        std::os::unix::fs::symlink(&real, &paths.ssh_config).unwrap();
        let manager = SshConfigManager::new(&paths);

        manager.ensure_entry(&Profile::new("work", "a@x.com")).unwrap();
        assert!(paths.ssh_config.is_symlink());
        assert!(fs::read_to_string(&real).unwrap().contains("Host github.com-work\n"));

        assert!(manager.remove_entry("work").unwrap());
        assert!(paths.ssh_config.is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), EXISTING);
    }

    #[test]
    fn test_remove_keeps_other_blocks_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.ssh_dir).unwrap();
        fs::write(&paths.ssh_config, EXISTING).unwrap();
        let manager = SshConfigManager::new(&paths);

        manager.ensure_entry(&Profile::new("work", "a@x.com")).unwrap();
        manager.ensure_entry(&Profile::new("personal", "b@x.com")).unwrap();
        manager.remove_entry("work").unwrap();

        let content = fs::read_to_string(&paths.ssh_config).unwrap();
        assert!(content.starts_with(EXISTING));
        assert!(!content.contains("github.com-work"));
        assert!(content.contains("\n\n# GitHub profile: personal\nHost github.com-personal\n"));
        assert!(content.ends_with("    IdentitiesOnly yes\n"));
    }

    #[test]
    fn test_remove_without_block_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.ssh_dir).unwrap();
        // no trailing newline on purpose
        let original = "Host myserver\n\tHostName 10.0.0.1";
        fs::write(&paths.ssh_config, original).unwrap();

        let manager = SshConfigManager::new(&paths);
        assert!(!manager.remove_entry("work").unwrap());
        assert_eq!(fs::read_to_string(&paths.ssh_config).unwrap(), original);
    }

    #[test]
    fn test_remove_without_file_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let manager = SshConfigManager::new(&paths);

        assert!(!manager.remove_entry("work").unwrap());
        assert!(!paths.ssh_config.exists());
    }

    #[test]
    fn test_strip_hand_written_block_stops_at_top_level_line() {
        let content = "Host github.com-work\n  HostName github.com\n\n  User git\n\nMatch all\n  ForwardAgent no\n";
        let stripped = strip_entry(content, "work").unwrap();
        assert_eq!(stripped, "\nMatch all\n  ForwardAgent no\n");
    }

    #[test]
    fn test_strip_ignores_other_profile_marker() {
        let content = "# GitHub profile: work2\nHost github.com-work2\n    User git\n";
        assert!(strip_entry(content, "work").is_none());
    }

    #[test]
    fn test_entry_exists() {
        assert!(entry_exists("Host github.com-work\n", "github.com-work"));
        assert!(entry_exists("  host other github.com-work\n", "github.com-work"));
        assert!(!entry_exists("Host github.com-work2\n", "github.com-work"));
        assert!(!entry_exists("# Host github.com-work\n", "github.com-work"));
    }
}
