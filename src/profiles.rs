//! Core profile management logic.
//!
//! This module holds the "data model" of ghswitch:
//! - [`Profile`]: one identity (emails, git name, signing key, ssh key)
//! - [`DirectoryRule`]: a directory that automatically selects a profile
//! - [`ProfileStore`]: the aggregate persisted in `~/.github-switcher/config.json`
//!
//! Every mutation goes through a `ProfileStore` method so the invariants hold
//! after each call: the primary email is always one of the profile's emails,
//! rules and the current profile only ever reference existing profiles, and
//! there is at most one rule per directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::resolver;
use crate::validate::{validate, validate_email};

/// An identity that can be applied to git
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub emails: Vec<String>,
    pub primary_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpg_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_path: Option<PathBuf>,
}

impl Profile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            name: name.into(),
            emails: vec![email.clone()],
            primary_email: email,
            git_name: None,
            gpg_key: None,
            ssh_key_path: None,
        }
    }

    pub fn with_git_name(mut self, name: impl Into<String>) -> Self {
        self.git_name = Some(name.into());
        self
    }

    pub fn with_gpg_key(mut self, key: impl Into<String>) -> Self {
        self.gpg_key = Some(key.into());
        self
    }

    /// Git display name, treating an empty string as unset
    pub fn git_name(&self) -> Option<&str> {
        self.git_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Signing key id, treating an empty string as unset
    pub fn gpg_key(&self) -> Option<&str> {
        self.gpg_key.as_deref().filter(|s| !s.is_empty())
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e == email)
    }

    /// Emails other than the primary one, in order
    pub fn other_emails(&self) -> impl Iterator<Item = &str> {
        self.emails
            .iter()
            .map(String::as_str)
            .filter(move |e| *e != self.primary_email)
    }

    /// Restore the email invariants: no duplicates, primary present (prepended if missing)
    fn normalize_emails(&mut self) {
        let mut seen = Vec::with_capacity(self.emails.len() + 1);
        for email in self.emails.drain(..) {
            if !seen.contains(&email) {
                seen.push(email);
            }
        }
        if !seen.contains(&self.primary_email) {
            seen.insert(0, self.primary_email.clone());
        }
        self.emails = seen;
    }
}

/// Maps an absolute directory to a profile name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRule {
    pub path: PathBuf,
    pub profile: String,
}

/// What [`ProfileStore::remove_profile`] took out of the store
#[derive(Debug)]
pub struct RemovedProfile {
    pub profile: Profile,
    pub rules: Vec<DirectoryRule>,
    pub was_current: bool,
}

/// Everything ghswitch persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: BTreeMap<String, Profile>,

    /// Older stores write `null` here once the last rule is gone
    #[serde(default, deserialize_with = "null_as_default")]
    pub directory_rules: Vec<DirectoryRule>,

    /// Serialized as a plain string, empty when no profile is active
    #[serde(default, with = "empty_as_none")]
    pub current_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileStore {
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty() && self.directory_rules.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn get_profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| Error::not_found("profile", name))
    }

    fn get_profile_mut(&mut self, name: &str) -> Result<&mut Profile> {
        self.profiles
            .get_mut(name)
            .ok_or_else(|| Error::not_found("profile", name))
    }

    /// The active profile, if one is set and still exists
    pub fn current(&self) -> Option<&Profile> {
        self.current_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name))
    }

    /// Add a new profile; fails if the name is taken
    pub fn add_profile(&mut self, profile: Profile) -> Result<&Profile> {
        if self.contains(&profile.name) {
            return Err(Error::Conflict(format!(
                "profile '{}' already exists",
                profile.name
            )));
        }
        self.insert_profile(profile)
    }

    /// Validate and insert a profile, replacing any profile with the same name
    pub fn insert_profile(&mut self, mut profile: Profile) -> Result<&Profile> {
        validate(&profile)?;
        profile.normalize_emails();

        let name = profile.name.clone();
        tracing::debug!(profile = %name, "storing profile");
        self.profiles.insert(name.clone(), profile);
        self.get_profile(&name)
    }

    /// Remove a profile together with its directory rules
    pub fn remove_profile(&mut self, name: &str) -> Result<RemovedProfile> {
        let profile = self
            .profiles
            .remove(name)
            .ok_or_else(|| Error::not_found("profile", name))?;

        let (rules, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.directory_rules)
            .into_iter()
            .partition(|rule| rule.profile == name);
        self.directory_rules = kept;

        let was_current = self.current_profile.as_deref() == Some(name);
        if was_current {
            self.current_profile = None;
        }

        Ok(RemovedProfile {
            profile,
            rules,
            was_current,
        })
    }

    pub fn set_current(&mut self, name: &str) -> Result<()> {
        self.get_profile(name)?;
        self.current_profile = Some(name.to_string());
        Ok(())
    }

    pub fn add_email(&mut self, profile_name: &str, email: &str) -> Result<()> {
        let profile = self.get_profile_mut(profile_name)?;
        validate_email(email)?;

        if profile.has_email(email) {
            return Err(Error::Conflict(format!(
                "email '{email}' already exists in profile '{profile_name}'"
            )));
        }

        profile.emails.push(email.to_string());
        Ok(())
    }

    pub fn remove_email(&mut self, profile_name: &str, email: &str) -> Result<()> {
        let profile = self.get_profile_mut(profile_name)?;

        if email == profile.primary_email {
            return Err(Error::validation(
                "email",
                "cannot remove primary email; set a different primary email first",
            ));
        }

        let before = profile.emails.len();
        profile.emails.retain(|e| e != email);
        if profile.emails.len() == before {
            return Err(Error::EmailNotFound {
                email: email.to_string(),
                profile: profile_name.to_string(),
            });
        }
        Ok(())
    }

    /// Make an existing email of the profile its primary one
    pub fn set_primary_email(&mut self, profile_name: &str, email: &str) -> Result<()> {
        let profile = self.get_profile_mut(profile_name)?;
        if !profile.has_email(email) {
            return Err(Error::EmailNotFound {
                email: email.to_string(),
                profile: profile_name.to_string(),
            });
        }
        profile.primary_email = email.to_string();
        Ok(())
    }

    /// Map a directory to a profile, returning the canonical path stored.
    ///
    /// A rule for the same directory is re-pointed rather than duplicated.
    pub fn add_directory_rule(&mut self, path: &Path, profile_name: &str) -> Result<PathBuf> {
        self.get_profile(profile_name)?;
        let abs = resolver::canonicalize(path)?;
        self.upsert_rule(DirectoryRule {
            path: abs.clone(),
            profile: profile_name.to_string(),
        });
        Ok(abs)
    }

    pub(crate) fn upsert_rule(&mut self, rule: DirectoryRule) {
        match self.directory_rules.iter_mut().find(|r| r.path == rule.path) {
            Some(existing) => existing.profile = rule.profile,
            None => self.directory_rules.push(rule),
        }
    }

    pub fn remove_directory_rule(&mut self, path: &Path) -> Result<DirectoryRule> {
        let abs = resolver::canonicalize(path)?;
        let index = self
            .directory_rules
            .iter()
            .position(|rule| rule.path == abs)
            .ok_or_else(|| Error::not_found("directory rule for", abs.display().to_string()))?;
        Ok(self.directory_rules.remove(index))
    }

    pub fn rules_for<'a>(
        &'a self,
        profile_name: &'a str,
    ) -> impl Iterator<Item = &'a DirectoryRule> {
        self.directory_rules
            .iter()
            .filter(move |rule| rule.profile == profile_name)
    }

    /// Profile name that applies at `path`
    pub fn profile_for_directory(&self, path: &Path) -> Result<&str> {
        resolver::resolve(&self.directory_rules, path)
    }

    /// First profile whose primary email matches
    pub fn find_by_email(&self, email: &str) -> Option<&Profile> {
        self.profiles.values().find(|p| p.primary_email == email)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
