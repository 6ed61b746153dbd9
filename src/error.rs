//! Error types shared by the library modules.
//!
//! Command handlers wrap these in `anyhow` with extra context; the library
//! itself always returns a typed [`Error`] so callers (and tests) can tell a
//! validation failure apart from a missing profile or a failing `git` binary.

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced profile, email or directory rule does not exist.
    #[error("{what} '{name}' not found")]
    NotFound { what: &'static str, name: String },

    #[error("email '{email}' not found in profile '{profile}'")]
    EmailNotFound { email: String, profile: String },

    /// A profile field is malformed; the store is left untouched.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The value is already present (duplicate email and the like).
    #[error("{0}")]
    Conflict(String),

    /// An external binary (git, ssh-add) is missing or exited non-zero.
    #[error("{tool} failed: {detail}")]
    ExternalTool { tool: String, detail: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::EmailNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = Error::not_found("profile", "work");
        assert_eq!(err.to_string(), "profile 'work' not found");
        assert!(err.is_not_found());

        let err = Error::validation("email", "invalid format: nope");
        assert_eq!(err.to_string(), "invalid email: invalid format: nope");
        assert!(err.is_validation());

        let err = Error::io(
            "/tmp/x.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x.json"));
    }
}
