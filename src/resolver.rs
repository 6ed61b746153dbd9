//! Directory-rule resolution.
//!
//! A rule maps an absolute directory to a profile. Looking up a path picks the
//! exact rule if there is one, otherwise the rule for the deepest ancestor
//! directory. Matching works on whole path components, so a rule for
//! `/home/work` covers `/home/work/repo` but not `/home/work-extra`.

use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::profiles::DirectoryRule;

/// Make `path` absolute against the process working directory and collapse
/// `.`/`..` segments. Symlinks are not resolved and the path need not exist.
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| Error::io(path, e))
}

/// Find the most specific rule covering an already-canonical path
pub fn best_match<'a>(rules: &'a [DirectoryRule], path: &Path) -> Option<&'a DirectoryRule> {
    if let Some(exact) = rules.iter().find(|rule| rule.path == path) {
        return Some(exact);
    }

    let mut best: Option<&DirectoryRule> = None;
    for rule in rules {
        if !path.starts_with(&rule.path) {
            continue;
        }
        let len = rule.path.as_os_str().len();
        // strictly longer only: on a tie the first rule seen wins
        if best.is_none_or(|b| len > b.path.as_os_str().len()) {
            best = Some(rule);
        }
    }
    best
}

/// Resolve a path to the name of the profile that should apply there
pub fn resolve<'a>(rules: &'a [DirectoryRule], path: &Path) -> Result<&'a str> {
    let abs = canonicalize(path)?;
    best_match(rules, &abs)
        .map(|rule| rule.profile.as_str())
        .ok_or_else(|| Error::not_found("directory rule for", abs.display().to_string()))
}
