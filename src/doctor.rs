//! Diagnostics for `ghswitch doctor`.
//!
//! Checks the profile store, git, the ssh config and every profile's files,
//! and reports each finding with a pass/fail/warn icon.

use anstyle::AnsiColor;

use crate::agent::KeyAgent;
use crate::context::Context;
use crate::profiles::ProfileStore;
use crate::ssh;
use crate::store;

/// Run all checks; returns `false` if any of them found a problem
pub fn run_doctor(ctx: &Context) -> bool {
    let ui = &ctx.ui;
    let paths = &ctx.paths;

    ui.section("ghswitch Doctor");
    ui.newline();

    let mut healthy = true;

    healthy &= check_step(ctx, "Directories", || {
        if paths.base_dir.exists() {
            ui.println(format!(
                "  {} Config directory exists: {}",
                ui.icon_ok(),
                paths.base_dir.display()
            ));
        } else {
            ui.println(format!(
                "  {} Config directory missing (fresh install?): {}",
                ui.icon_warn(),
                paths.base_dir.display()
            ));
        }
        if !paths.ssh_dir.exists() {
            ui.println(format!(
                "  {} SSH directory missing: {}",
                ui.icon_warn(),
                paths.ssh_dir.display()
            ));
        }
        true
    });

    let loaded = match store::load(&paths.config_file) {
        Ok(store) => Some(store),
        Err(e) => {
            ui.println(ui.bold("Checking Profile Store..."));
            ui.println(format!("  {} Store unreadable: {}", ui.icon_err(), e));
            ui.println(ui.colored("  Issues detected!", AnsiColor::Red));
            ui.newline();
            healthy = false;
            None
        }
    };

    if let Some(store) = &loaded {
        healthy &= check_step(ctx, "Profile Store", || check_store(ctx, store));
    }

    healthy &= check_step(ctx, "Git", || match ctx.git().check_installed() {
        Ok(version) => {
            ui.println(format!("  {} {}", ui.icon_ok(), version));
            true
        }
        Err(e) => {
            ui.println(format!("  {} git not usable: {}", ui.icon_err(), e));
            false
        }
    });

    if let Some(store) = &loaded {
        healthy &= check_step(ctx, "Profiles", || check_profiles(ctx, store));
    }

    check_step(ctx, "SSH Agent", || {
        let agent = ctx.agent();
        match agent.list_keys() {
            Ok(keys) => ui.println(format!(
                "  {} Agent reachable ({}), {} key(s) loaded",
                ui.icon_ok(),
                agent.platform(),
                keys.len()
            )),
            // Not fatal, keys can still be used from disk
            Err(e) => ui.println(format!("  {} {}", ui.icon_warn(), e)),
        }
        true
    });

    healthy
}

fn check_store(ctx: &Context, store: &ProfileStore) -> bool {
    let ui = &ctx.ui;
    let mut ok = true;

    ui.println(format!(
        "  {} {} profile(s), {} directory rule(s)",
        ui.icon_ok(),
        store.profiles.len(),
        store.directory_rules.len()
    ));

    match (store.current_profile.as_deref(), store.current()) {
        (Some(name), Some(_)) => {
            ui.println(format!("  {} Active profile: {}", ui.icon_info(), name));
        }
        (Some(name), None) => {
            ui.println(format!(
                "  {} Active profile '{}' does not exist",
                ui.icon_err(),
                name
            ));
            ok = false;
        }
        (None, _) => ui.println(format!("  {} No active profile set", ui.icon_info())),
    }

    for rule in &store.directory_rules {
        if !store.contains(&rule.profile) {
            ui.println(format!(
                "  {} Rule {} references missing profile '{}'",
                ui.icon_err(),
                rule.path.display(),
                rule.profile
            ));
            ok = false;
        } else if !rule.path.is_dir() {
            ui.println(format!(
                "  {} Rule directory no longer exists: {}",
                ui.icon_warn(),
                rule.path.display()
            ));
        }
    }

    ok
}

fn check_profiles(ctx: &Context, store: &ProfileStore) -> bool {
    let ui = &ctx.ui;
    let paths = &ctx.paths;

    if store.profiles.is_empty() {
        ui.println(format!("  {} No profiles configured", ui.icon_warn()));
        return true;
    }

    let ssh_config = ctx.ssh_config();
    let mut ok = true;

    for profile in store.profiles.values() {
        let mut notes = Vec::new();
        let mut broken = false;

        let settings = paths.profile_gitconfig(&profile.name);
        if store.rules_for(&profile.name).next().is_some() && !settings.exists() {
            notes.push(format!(
                "settings file missing: {}; run 'ghswitch sync'",
                settings.display()
            ));
            broken = true;
        }

        let key = ssh::identity_file(paths, profile);
        if !key.exists() {
            notes.push(format!("SSH key not found: {}", key.display()));
        }

        match ssh_config.has_entry(&profile.name) {
            Ok(true) => {}
            Ok(false) => notes.push(format!(
                "no SSH host entry for {}",
                ssh::host_alias(&profile.name)
            )),
            Err(e) => notes.push(format!("SSH config unreadable: {e}")),
        }

        let icon = if broken {
            ui.icon_err()
        } else if notes.is_empty() {
            ui.icon_ok()
        } else {
            ui.icon_warn()
        };
        if notes.is_empty() {
            ui.println(format!("    {} {}", icon, profile.name));
        } else {
            ui.println(format!("    {} {} ({})", icon, profile.name, notes.join("; ")));
        }
        ok &= !broken;
    }

    ok
}

fn check_step<F>(ctx: &Context, name: &str, check_fn: F) -> bool
where
    F: FnOnce() -> bool,
{
    let ui = &ctx.ui;
    ui.println(ui.bold(format!("Checking {name}...")));
    let success = check_fn();
    if !success {
        ui.println(ui.colored("  Issues detected!", AnsiColor::Red));
    }
    ui.newline();
    success
}
