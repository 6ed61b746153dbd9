//! Export and import of the profile store.
//!
//! The exchange format is the store file itself. Importing merges into the
//! existing store: profiles by name, directory rules by path.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs_utils::write_private;
use crate::profiles::{DirectoryRule, ProfileStore};
use crate::resolver;
use crate::store;

/// Outcome of [`merge`], for reporting
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: Vec<String>,
    pub overwritten: Vec<String>,
    /// Conflicting profiles the user chose to keep
    pub skipped: Vec<String>,
    /// Profiles rejected by validation, with the reason
    pub invalid: Vec<(String, String)>,
    pub rules_added: usize,
    pub rules_replaced: usize,
    /// Rules naming a profile that does not exist after the merge
    pub rules_dropped: Vec<DirectoryRule>,
}

impl ImportSummary {
    pub fn profiles_changed(&self) -> usize {
        self.added.len() + self.overwritten.len()
    }
}

pub fn export(store: &ProfileStore) -> Result<String> {
    store::to_json(store)
}

pub fn export_to_file(store: &ProfileStore, path: &Path) -> Result<()> {
    let content = export(store)?;
    write_private(path, &content)
}

pub fn parse(content: &str, origin: &Path) -> Result<ProfileStore> {
    serde_json::from_str(content).map_err(|source| Error::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

pub fn read_file(path: &Path) -> Result<ProfileStore> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&content, path)
}

/// Merge `incoming` into `target`.
///
/// `confirm_overwrite` is asked once per profile name present on both sides;
/// returning `false` keeps the existing profile. Invalid incoming profiles are
/// skipped. The current profile of `target` is never changed.
pub fn merge<F>(
    target: &mut ProfileStore,
    incoming: ProfileStore,
    mut confirm_overwrite: F,
) -> Result<ImportSummary>
where
    F: FnMut(&str) -> Result<bool>,
{
    let mut summary = ImportSummary::default();

    for (name, mut profile) in incoming.profiles {
        // The map key is authoritative
        profile.name = name.clone();

        let exists = target.contains(&name);
        if exists && !confirm_overwrite(&name)? {
            summary.skipped.push(name);
            continue;
        }

        match target.insert_profile(profile) {
            Ok(_) if exists => summary.overwritten.push(name),
            Ok(_) => summary.added.push(name),
            Err(e) if e.is_validation() => {
                tracing::warn!(profile = %name, error = %e, "skipping invalid profile");
                summary.invalid.push((name, e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    for rule in incoming.directory_rules {
        if !target.contains(&rule.profile) {
            summary.rules_dropped.push(rule);
            continue;
        }
        let rule = DirectoryRule {
            path: resolver::canonicalize(&rule.path)?,
            profile: rule.profile,
        };
        if target.directory_rules.iter().any(|r| r.path == rule.path) {
            summary.rules_replaced += 1;
        } else {
            summary.rules_added += 1;
        }
        target.upsert_rule(rule);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::Profile;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_store() -> ProfileStore {
        let mut store = ProfileStore::default();
        store
            .add_profile(
                Profile::new("work", "a@corp.com")
                    .with_git_name("Alice")
                    .with_gpg_key("ABCDEF12"),
            )
            .unwrap();
        store.add_profile(Profile::new("personal", "a@home.org")).unwrap();
        store.add_email("work", "alice@corp.com").unwrap();
        store
            .add_directory_rule(Path::new("/src/work"), "work")
            .unwrap();
        store
            .add_directory_rule(Path::new("/src/oss"), "personal")
            .unwrap();
        store.set_current("work").unwrap();
        store
    }

    fn rule_map(store: &ProfileStore) -> BTreeMap<String, String> {
        store
            .directory_rules
            .iter()
            .map(|r| (r.path.display().to_string(), r.profile.clone()))
            .collect()
    }

    #[test]
    fn test_export_import_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("profiles.json");
        let original = sample_store();

        export_to_file(&original, &file).unwrap();
        let incoming = read_file(&file).unwrap();

        let mut target = ProfileStore::default();
        let summary = merge(&mut target, incoming, |_| panic!("no conflicts expected")).unwrap();

        assert_eq!(summary.added.len(), 2);
        assert_eq!(target.profiles, original.profiles);
        assert_eq!(rule_map(&target), rule_map(&original));
        assert!(target.current_profile.is_none());
    }

    #[test]
    fn test_conflicts_ask_per_profile() {
        let mut target = ProfileStore::default();
        target.add_profile(Profile::new("work", "old@corp.com")).unwrap();
        target.add_profile(Profile::new("personal", "old@home.org")).unwrap();

        let mut asked = Vec::new();
        let summary = merge(&mut target, sample_store(), |name| {
            asked.push(name.to_string());
            Ok(name == "work")
        })
        .unwrap();

        assert_eq!(asked, vec!["personal", "work"]);
        assert_eq!(summary.overwritten, vec!["work"]);
        assert_eq!(summary.skipped, vec!["personal"]);
        assert_eq!(target.get_profile("work").unwrap().primary_email, "a@corp.com");
        assert_eq!(
            target.get_profile("personal").unwrap().primary_email,
            "old@home.org"
        );
    }

    #[test]
    fn test_invalid_profiles_are_skipped() {
        let mut incoming = ProfileStore::default();
        incoming
            .profiles
            .insert("bad".into(), Profile::new("bad", "not-an-email"));
        incoming.directory_rules.push(DirectoryRule {
            path: "/src/bad".into(),
            profile: "bad".into(),
        });

        let mut target = ProfileStore::default();
        let summary = merge(&mut target, incoming, |_| Ok(true)).unwrap();

        assert_eq!(summary.invalid.len(), 1);
        assert_eq!(summary.invalid[0].0, "bad");
        assert_eq!(summary.rules_dropped.len(), 1);
        assert!(target.is_empty());
    }

    #[test]
    fn test_rules_merge_by_path() {
        let mut target = sample_store();
        let mut incoming = ProfileStore::default();
        incoming.directory_rules.push(DirectoryRule {
            path: "/src/work".into(),
            profile: "personal".into(),
        });
        incoming.directory_rules.push(DirectoryRule {
            path: "/src/new".into(),
            profile: "work".into(),
        });

        let summary = merge(&mut target, incoming, |_| Ok(true)).unwrap();

        assert_eq!(summary.rules_replaced, 1);
        assert_eq!(summary.rules_added, 1);
        assert_eq!(target.directory_rules.len(), 3);
        assert_eq!(
            target.profile_for_directory(Path::new("/src/work/app")).unwrap(),
            "personal"
        );
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse("[]", Path::new("backup.json")).unwrap_err();
        assert!(err.to_string().contains("backup.json"));
    }

    #[test]
    fn test_parse_export_with_null_rules() {
        let content = r#"{"profiles": {"home": {"name": "home", "emails": ["me@x.com"], "primary_email": "me@x.com"}}, "directory_rules": null, "current_profile": ""}"#;
        let incoming = parse(content, Path::new("old.json")).unwrap();
        assert!(incoming.contains("home"));
        assert!(incoming.directory_rules.is_empty());
    }
}
