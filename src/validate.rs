//! Syntactic validation of profile fields.
//!
//! Nothing here touches the network or the filesystem: a profile is valid when
//! its name, addresses and signing key id have the right shape.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::profiles::Profile;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid EMAIL_REGEX pattern")
});

static GPG_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-F0-9]{8,}$").expect("Invalid GPG_KEY_REGEX pattern"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_gpg_key(key: &str) -> bool {
    GPG_KEY_REGEX.is_match(key)
}

/// Validate profile name
///
/// The name ends up in file names (`~/.gitconfig-<name>`) and in the ssh host
/// alias, so only alphanumeric characters, underscores, and hyphens are allowed.
pub fn validate_profile_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("name", "profile name cannot be empty"));
    }

    if name.chars().count() > 64 {
        return Err(Error::validation(
            "name",
            "profile name cannot be longer than 64 characters",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::validation(
            "name",
            format!(
                "'{name}' may only contain alphanumeric characters, hyphens (-), and underscores (_)"
            ),
        ));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::validation(
            "email",
            format!("invalid email format: {email}"),
        ))
    }
}

/// Validate every field of a profile
pub fn validate(profile: &Profile) -> Result<()> {
    validate_profile_name(&profile.name)?;

    if profile.primary_email.is_empty() {
        return Err(Error::validation(
            "primary_email",
            "primary email cannot be empty",
        ));
    }
    validate_email(&profile.primary_email)?;

    for email in &profile.emails {
        validate_email(email)?;
    }

    if let Some(key) = profile.gpg_key.as_deref().filter(|k| !k.is_empty()) {
        if !is_valid_gpg_key(key) {
            return Err(Error::validation(
                "gpg_key",
                format!("invalid GPG key format: {key} (expected 8+ hexadecimal characters)"),
            ));
        }
    }

    Ok(())
}
