//! Handlers for each CLI subcommand.
//!
//! Every handler runs one load/mutate/save cycle on the profile store and
//! then projects the change into git and ssh configuration. Follow-up work
//! that is only a convenience (the ssh host alias after `add`, cleanup after
//! `remove`, loading a key into the agent) is reported as a warning and never
//! fails the command.

use anstyle::AnsiColor;
use anyhow::{Context as _, Result, bail};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::agent::KeyAgent;
use crate::context::Context;
use crate::doctor::run_doctor;
use crate::error::Error;
use crate::git::IncludeChange;
use crate::profiles::{Profile, ProfileStore};
use crate::resolver;
use crate::ssh::{self, EntryStatus};
use crate::store::{self, LockedStore};
use crate::transfer;

fn load_store(ctx: &Context) -> Result<ProfileStore> {
    store::load(&ctx.paths.config_file).context("Failed to load profile store")
}

fn confirm(ctx: &Context, prompt: &str, help: &str) -> Result<bool> {
    if ctx.assume_yes {
        return Ok(true);
    }
    inquire::Confirm::new(prompt)
        .with_default(false)
        .with_help_message(help)
        .prompt()
        .context("Confirmation cancelled")
}

/// Warn about a missing key file; returns the path when it exists
fn key_hint(ctx: &Context, profile: &Profile, email: &str) -> Option<PathBuf> {
    let ui = &ctx.ui;
    let key = ssh::identity_file(&ctx.paths, profile);
    if key.exists() {
        return Some(key);
    }

    ui.warn(format!("SSH key not found: {}", key.display()));
    ui.println(format!(
        "  Generate one with: {}",
        ui.bold(format!(
            "ssh-keygen -t ed25519 -f {} -C \"{email}\"",
            key.display()
        ))
    ));
    None
}

fn print_host_alias(ctx: &Context, profile_name: &str) {
    ctx.ui.println(format!(
        "  Use this host in git URLs: {}",
        ctx.ui.bold(format!(
            "git@{}:user/repo.git",
            ssh::host_alias(profile_name)
        ))
    ));
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// List all profiles and directory rules
pub fn list(ctx: &Context) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;

    if store.profiles.is_empty() {
        ui.warn("No profiles configured yet.");
        ui.newline();
        ui.println("Create one with:");
        ui.println(format!("  {} add <name> <email>", ui.bold("ghswitch")));
        return Ok(());
    }

    let current = store.current_profile.as_deref();
    let mut table = ui.table();
    table.set_header(vec![
        ui.header_cell(""),
        ui.header_cell("Profile"),
        ui.header_cell("Primary email"),
        ui.header_cell("Other emails"),
        ui.header_cell("Git name"),
        ui.header_cell("GPG key"),
        ui.header_cell("SSH key"),
    ]);

    for profile in store.profiles.values() {
        let is_active = current == Some(profile.name.as_str());
        let others: Vec<&str> = profile.other_emails().collect();
        let key = ssh::identity_file(&ctx.paths, profile);
        let key_cell = if key.exists() {
            ui.colored_cell(key.display().to_string(), AnsiColor::Green)
        } else {
            ui.colored_cell(format!("{} (not found)", key.display()), AnsiColor::Yellow)
        };

        table.add_row(vec![
            ui.cell(if is_active { ui.icon_ok() } else { "" }),
            if is_active {
                ui.colored_cell(&profile.name, AnsiColor::Green)
            } else {
                ui.cell(&profile.name)
            },
            ui.cell(&profile.primary_email),
            ui.cell(if others.is_empty() {
                "-".to_string()
            } else {
                others.join(", ")
            }),
            ui.cell(or_dash(profile.git_name())),
            ui.cell(or_dash(profile.gpg_key())),
            key_cell,
        ]);
    }

    ui.section(format!("Profiles ({})", store.profiles.len()));
    ui.println(table.to_string());

    if !store.directory_rules.is_empty() {
        ui.newline();
        ui.section("Directory rules");
        let mut rules = ui.simple_table();
        for rule in &store.directory_rules {
            rules.add_row(vec![
                ui.cell(rule.path.display().to_string()),
                ui.cell("→"),
                ui.cell(&rule.profile),
            ]);
        }
        ui.println(rules.to_string());
    }

    Ok(())
}

/// Show the global git identity and the active profile
pub fn current(ctx: &Context) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;
    let identity = ctx
        .git()
        .current_identity()
        .context("Failed to read global git configuration")?;

    ui.section("Current git configuration");
    let mut table = ui.simple_table();
    table.add_row(vec![
        ui.cell("Email:"),
        ui.cell(identity.email.as_deref().unwrap_or("(not set)")),
    ]);
    if let Some(name) = &identity.name {
        table.add_row(vec![ui.cell("Name:"), ui.cell(name)]);
    }
    let signing = match (&identity.signing_key, identity.gpg_sign) {
        (Some(key), true) => format!("enabled (key: {key})"),
        _ => "disabled".to_string(),
    };
    table.add_row(vec![ui.cell("GPG signing:"), ui.cell(signing)]);
    ui.println(table.to_string());
    ui.newline();

    match (store.current(), store.current_profile.as_deref()) {
        (Some(profile), _) => {
            ui.println(format!("Active profile: {}", ui.bold(&profile.name)));
            ui.println(format!("  Primary email: {}", profile.primary_email));
            if !identity.email.as_deref().is_some_and(|e| profile.has_email(e)) {
                ui.newline();
                ui.warn("Git config email doesn't match the active profile");
            }
        }
        (None, Some(missing)) => {
            ui.warn(format!(
                "Active profile '{missing}' no longer exists; run 'ghswitch switch <profile>'"
            ));
        }
        (None, None) => {
            match identity.email.as_deref().and_then(|e| store.find_by_email(e)) {
                Some(profile) => ui.info(format!("Matching profile: {}", profile.name)),
                None => ui.info("No active profile"),
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(name) = store.profile_for_directory(&cwd) {
            ui.info(format!(
                "Directory rule for {} selects profile '{name}'",
                cwd.display()
            ));
        }
    }

    Ok(())
}

/// Add a new profile and its ssh host alias
pub fn add(
    ctx: &Context,
    name: &str,
    email: &str,
    git_name: Option<&str>,
    gpg_key: Option<&str>,
) -> Result<()> {
    let ui = &ctx.ui;
    ctx.paths.ensure_dirs()?;
    let version = ctx
        .git()
        .check_installed()
        .context("git is required but could not be run")?;
    tracing::debug!(%version, "git available");

    let mut profile = Profile::new(name, email);
    profile.git_name = git_name.filter(|s| !s.is_empty()).map(String::from);
    profile.gpg_key = gpg_key.filter(|s| !s.is_empty()).map(String::from);

    let mut locked = LockedStore::open(&ctx.paths)?;
    let profile = locked
        .update(|store| store.add_profile(profile).cloned())
        .with_context(|| format!("Failed to add profile '{name}'"))?;
    drop(locked);

    ui.ok(format!("Profile '{name}' added"));
    let mut table = ui.simple_table();
    table.add_row(vec![ui.cell("  Email:"), ui.cell(&profile.primary_email)]);
    if let Some(git_name) = profile.git_name() {
        table.add_row(vec![ui.cell("  Git name:"), ui.cell(git_name)]);
    }
    if let Some(key) = profile.gpg_key() {
        table.add_row(vec![ui.cell("  GPG key:"), ui.cell(key)]);
    }
    ui.println(table.to_string());

    match ctx.ssh_config().ensure_entry(&profile) {
        Ok(EntryStatus::Added) => {
            ui.ok("SSH config entry created");
            print_host_alias(ctx, name);
        }
        Ok(EntryStatus::AlreadyPresent) => {
            ui.info(format!(
                "SSH config already has host {}",
                ssh::host_alias(name)
            ));
            print_host_alias(ctx, name);
        }
        Err(e) => ui.warn(format!("Failed to set up SSH config: {e}")),
    }

    key_hint(ctx, &profile, &profile.primary_email);

    ui.newline();
    ui.println("Next steps:");
    ui.println(format!(
        "  1. Set up a directory rule: {}",
        ui.bold(format!("ghswitch auto ~/projects/{name} {name}"))
    ));
    ui.println(format!(
        "  2. Or switch manually: {}",
        ui.bold(format!("ghswitch switch {name}"))
    ));
    Ok(())
}

fn load_key(ctx: &Context, profile: &Profile, email: &str) {
    let ui = &ctx.ui;
    let Some(key) = key_hint(ctx, profile, email) else {
        return;
    };

    let agent = ctx.agent();
    match agent.is_key_loaded(&key) {
        Err(e) => ui.warn(format!("Failed to check SSH key status: {e}")),
        Ok(true) => ui.ok("SSH key already loaded"),
        Ok(false) => {
            let spinner = ui.spinner(format!("Adding SSH key to {}...", agent.platform()));
            match agent.add_key(&key) {
                Ok(()) => ui.spinner_finish_ok(&spinner, "SSH key added"),
                Err(e) => {
                    spinner.finish_and_clear();
                    ui.warn(format!("Failed to add SSH key: {e}"));
                    ui.println(format!("  You may need to run: ssh-add {}", key.display()));
                }
            }
        }
    }
    print_host_alias(ctx, &profile.name);
}

/// Apply a profile to the global git configuration
pub fn switch(ctx: &Context, name: &str, email: Option<&str>) -> Result<()> {
    let ui = &ctx.ui;
    let mut locked = LockedStore::open(&ctx.paths)?;
    let profile = locked.store().get_profile(name)?.clone();

    let email = email.unwrap_or(profile.primary_email.as_str());
    if !profile.has_email(email) {
        return Err(Error::EmailNotFound {
            email: email.to_string(),
            profile: name.to_string(),
        }
        .into());
    }

    let spinner = ui.spinner(format!("Switching to profile '{name}'..."));
    if let Err(e) = ctx.git().switch_global(&profile, email) {
        ui.spinner_finish_err(&spinner, format!("Failed to switch: {e}"));
        return Err(e).context("Failed to update global git configuration");
    }
    locked.update(|store| store.set_current(name))?;
    drop(locked);
    ui.spinner_finish_ok(&spinner, format!("Switched to profile '{name}'"));

    ui.println(format!("  Email: {email}"));
    if let Some(git_name) = profile.git_name() {
        ui.println(format!("  Name: {git_name}"));
    }
    if profile.gpg_key().is_some() {
        ui.println("  GPG signing: enabled");
    }

    ui.newline();
    if ctx.auto_ssh {
        load_key(ctx, &profile, email);
    } else {
        let key = ssh::identity_file(&ctx.paths, &profile);
        if key.exists() {
            ui.info(format!("SSH key available: {}", key.display()));
            ui.println(format!(
                "  Load it with: {}",
                ui.bold(format!("ghswitch --auto-ssh switch {name}"))
            ));
            print_host_alias(ctx, name);
        }
    }
    Ok(())
}

/// Remove a profile, its rules, its settings file and its ssh host alias
pub fn remove(ctx: &Context, name: &str) -> Result<()> {
    let ui = &ctx.ui;
    let mut locked = LockedStore::open(&ctx.paths)?;
    let profile = locked.store().get_profile(name)?;

    if !ctx.assume_yes {
        let rule_count = locked.store().rules_for(name).count();
        ui.println(format!("  Email: {}", profile.primary_email));
        if rule_count > 0 {
            ui.println(format!("  Associated directory rules: {rule_count}"));
        }
    }

    if !confirm(
        ctx,
        &format!("Are you sure you want to remove profile '{name}'?"),
        "Its directory rules, git settings file and SSH host entry are removed as well",
    )? {
        ui.warn("Removal cancelled.");
        return Ok(());
    }

    let removed = locked.update(|store| store.remove_profile(name))?;
    drop(locked);

    if let Err(e) = ctx.git().remove_profile_config(name) {
        ui.warn(format!("Failed to remove git settings file: {e}"));
    }
    match ctx.ssh_config().remove_entry(name) {
        Ok(true) => ui.ok("SSH config entry removed"),
        Ok(false) => {}
        Err(e) => ui.warn(format!("Failed to remove SSH config entry: {e}")),
    }

    ui.ok(format!("Profile '{name}' removed"));
    if !removed.rules.is_empty() {
        ui.info(format!("Removed {} directory rule(s)", removed.rules.len()));
    }
    if removed.was_current {
        ui.info("It was the active profile; the global git identity is left as it is.");
    }

    ui.newline();
    ui.println(ui.dim(
        "includeIf directives in your global git config still reference the deleted settings file; git skips missing includes.",
    ));
    ui.println(ui.dim("Your SSH key file (if it exists) was not deleted."));
    Ok(())
}

/// Map a directory to a profile through a git conditional include
pub fn auto(ctx: &Context, directory: &Path, profile_name: &str) -> Result<()> {
    let ui = &ctx.ui;

    match std::fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => bail!("Path is not a directory: {}", directory.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!("Directory does not exist: {}", directory.display())
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to check directory: {}", directory.display()));
        }
    }

    let mut locked = LockedStore::open(&ctx.paths)?;
    let profile = locked.store().get_profile(profile_name)?.clone();
    let abs = locked.update(|store| store.add_directory_rule(directory, profile_name))?;
    drop(locked);

    let spinner = ui.spinner("Configuring git includeIf...");
    let change = match ctx.git().setup_profile(&profile, &abs) {
        Ok(change) => change,
        Err(e) => {
            ui.spinner_finish_err(&spinner, format!("Failed to set up git includeIf: {e}"));
            return Err(e).context("The rule was saved; run 'ghswitch sync' to retry");
        }
    };
    let msg = match change {
        IncludeChange::Added => "Directory rule added",
        IncludeChange::Updated => "Directory rule re-pointed",
        IncludeChange::Unchanged => "Directory rule already in place",
    };
    ui.spinner_finish_ok(&spinner, msg);

    let mut table = ui.simple_table();
    table.add_row(vec![ui.cell("  Directory:"), ui.cell(abs.display().to_string())]);
    table.add_row(vec![ui.cell("  Profile:"), ui.cell(profile_name)]);
    table.add_row(vec![ui.cell("  Email:"), ui.cell(&profile.primary_email)]);
    ui.println(table.to_string());
    ui.newline();
    ui.println("Git now uses this profile for repositories below this directory.");
    Ok(())
}

pub fn auto_list(ctx: &Context) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;

    if store.directory_rules.is_empty() {
        ui.warn("No directory rules configured yet.");
        ui.newline();
        ui.println(format!(
            "Add one with: {}",
            ui.bold("ghswitch auto <directory> <profile>")
        ));
        return Ok(());
    }

    let mut table = ui.table();
    table.set_header(vec![
        ui.header_cell("Directory"),
        ui.header_cell("Profile"),
        ui.header_cell("Email"),
        ui.header_cell("Git name"),
    ]);
    for rule in &store.directory_rules {
        let path = ui.cell(rule.path.display().to_string());
        match store.get_profile(&rule.profile) {
            Ok(profile) => table.add_row(vec![
                path,
                ui.cell(&rule.profile),
                ui.cell(&profile.primary_email),
                ui.cell(or_dash(profile.git_name())),
            ]),
            Err(_) => table.add_row(vec![
                path,
                ui.colored_cell(format!("{} (profile not found)", rule.profile), AnsiColor::Red),
                ui.cell("-"),
                ui.cell("-"),
            ]),
        };
    }

    ui.section(format!("Directory rules ({})", store.directory_rules.len()));
    ui.println(table.to_string());
    Ok(())
}

pub fn auto_remove(ctx: &Context, directory: &Path) -> Result<()> {
    let ui = &ctx.ui;
    let mut locked = LockedStore::open(&ctx.paths)?;
    let rule = locked.update(|store| store.remove_directory_rule(directory))?;

    ui.ok(format!(
        "Directory rule removed: {} (was '{}')",
        rule.path.display(),
        rule.profile
    ));
    ui.println(ui.dim(
        "The includeIf directive stays in your global git config and still points at the profile's settings file.",
    ));
    Ok(())
}

/// Show which profile a directory resolves to
pub fn which(ctx: &Context, directory: Option<&Path>) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;
    let directory = match directory {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let abs = resolver::canonicalize(&directory)?;

    match resolver::best_match(&store.directory_rules, &abs) {
        Some(rule) => {
            ui.ok(format!("{} uses profile '{}'", abs.display(), rule.profile));
            if rule.path != abs {
                ui.println(format!("  via rule for {}", rule.path.display()));
            }
            if let Ok(profile) = store.get_profile(&rule.profile) {
                ui.println(format!("  Email: {}", profile.primary_email));
            }
        }
        None => {
            ui.info(format!("No directory rule covers {}", abs.display()));
            match store.current() {
                Some(profile) => ui.println(format!(
                    "  The global identity applies (active profile: {})",
                    profile.name
                )),
                None => ui.println("  The global identity applies"),
            }
        }
    }
    Ok(())
}

/// Rewrite every profile settings file and include directive from the store
pub fn sync(ctx: &Context) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;

    if store.directory_rules.is_empty() {
        ui.warn("No directory rules configured yet.");
        return Ok(());
    }

    let spinner = ui.spinner("Re-applying directory rules...");
    match ctx.git().setup_all(&store) {
        Ok(count) => {
            ui.spinner_finish_ok(&spinner, format!("Re-applied {count} directory rule(s)"));
            Ok(())
        }
        Err(e) => {
            ui.spinner_finish_err(&spinner, format!("Failed to re-apply rules: {e}"));
            Err(e).context("Failed to re-apply directory rules")
        }
    }
}

pub fn add_email(ctx: &Context, profile_name: &str, email: &str) -> Result<()> {
    let mut locked = LockedStore::open(&ctx.paths)?;
    locked.update(|store| store.add_email(profile_name, email))?;
    ctx.ui
        .ok(format!("Added email '{email}' to profile '{profile_name}'"));
    Ok(())
}

pub fn remove_email(ctx: &Context, profile_name: &str, email: &str) -> Result<()> {
    let mut locked = LockedStore::open(&ctx.paths)?;
    locked.update(|store| store.remove_email(profile_name, email))?;
    ctx.ui
        .ok(format!("Removed email '{email}' from profile '{profile_name}'"));
    Ok(())
}

/// Make another of the profile's emails the primary one
pub fn set_primary(ctx: &Context, profile_name: &str, email: &str) -> Result<()> {
    let ui = &ctx.ui;
    let mut locked = LockedStore::open(&ctx.paths)?;
    let (profile, has_rules, is_current) = locked.update(|store| {
        store.set_primary_email(profile_name, email)?;
        let has_rules = store.rules_for(profile_name).next().is_some();
        let is_current = store.current_profile.as_deref() == Some(profile_name);
        Ok((store.get_profile(profile_name)?.clone(), has_rules, is_current))
    })?;
    drop(locked);

    ui.ok(format!(
        "Primary email of profile '{profile_name}' is now '{email}'"
    ));

    if has_rules {
        if let Err(e) = ctx.git().write_profile_config(&profile) {
            ui.warn(format!("Failed to update git settings file: {e}"));
        }
    }
    if is_current {
        ui.println(format!(
            "  Run {} to apply it globally",
            ui.bold(format!("ghswitch switch {profile_name}"))
        ));
    }
    Ok(())
}

pub fn list_emails(ctx: &Context, profile_name: &str) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;
    let profile = store.get_profile(profile_name)?;

    ui.section(format!("Emails for profile '{profile_name}'"));
    let mut table = ui.simple_table();
    for email in &profile.emails {
        if *email == profile.primary_email {
            table.add_row(vec![
                ui.cell(ui.icon_ok()),
                ui.colored_cell(email, AnsiColor::Green),
                ui.cell("(primary)"),
            ]);
        } else {
            table.add_row(vec![ui.cell(""), ui.cell(email), ui.cell("")]);
        }
    }
    ui.println(table.to_string());
    Ok(())
}

/// Write the store to a file, or print it
pub fn export(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;

    match file {
        Some(path) => {
            transfer::export_to_file(&store, path)
                .with_context(|| format!("Failed to write export file {}", path.display()))?;
            ui.ok(format!("Profiles exported to: {}", path.display()));
        }
        None => ui.println(transfer::export(&store)?),
    }
    Ok(())
}

/// Merge profiles and directory rules from an exported file
pub fn import(ctx: &Context, file: &Path) -> Result<()> {
    let ui = &ctx.ui;
    let incoming = transfer::read_file(file)
        .with_context(|| format!("Failed to read import file {}", file.display()))?;

    let mut locked = LockedStore::open(&ctx.paths)?;

    // Ask before touching the store so a cancelled prompt changes nothing
    let mut approved = HashSet::new();
    for name in incoming.profiles.keys() {
        if locked.store().contains(name)
            && confirm(
                ctx,
                &format!("Profile '{name}' already exists. Overwrite?"),
                "Answering no keeps the existing profile",
            )?
        {
            approved.insert(name.clone());
        }
    }

    let summary = locked.update(|store| {
        transfer::merge(store, incoming, |name| Ok(approved.contains(name)))
    })?;
    drop(locked);

    for (name, reason) in &summary.invalid {
        ui.warn(format!("Skipped invalid profile '{name}': {reason}"));
    }
    for name in &summary.skipped {
        ui.info(format!("Kept existing profile '{name}'"));
    }
    for rule in &summary.rules_dropped {
        ui.warn(format!(
            "Dropped rule for {}: profile '{}' does not exist",
            rule.path.display(),
            rule.profile
        ));
    }

    ui.ok("Import completed");
    let mut table = ui.simple_table();
    table.add_row(vec![ui.cell("  New profiles:"), ui.cell(summary.added.len().to_string())]);
    if !summary.overwritten.is_empty() {
        table.add_row(vec![
            ui.cell("  Overwritten:"),
            ui.cell(summary.overwritten.join(", ")),
        ]);
    }
    table.add_row(vec![
        ui.cell("  Directory rules:"),
        ui.cell(format!(
            "{} added, {} replaced",
            summary.rules_added, summary.rules_replaced
        )),
    ]);
    ui.println(table.to_string());

    if summary.profiles_changed() > 0 || summary.rules_added + summary.rules_replaced > 0 {
        ui.println(format!(
            "  Run {} to apply imported directory rules to git",
            ui.bold("ghswitch sync")
        ));
    }
    Ok(())
}

/// Show keys held by the ssh agent and each profile's key status
pub fn keys(ctx: &Context) -> Result<()> {
    let ui = &ctx.ui;
    let store = load_store(ctx)?;
    let agent = ctx.agent();
    let loaded = agent
        .list_keys()
        .context("Failed to list keys in the SSH agent")?;

    ui.section(format!("SSH agent keys ({})", agent.platform()));
    if loaded.is_empty() {
        ui.println(ui.dim("  (none)"));
    }
    for line in &loaded {
        ui.println(format!("  {line}"));
    }

    if store.profiles.is_empty() {
        return Ok(());
    }

    ui.newline();
    let mut table = ui.table();
    table.set_header(vec![
        ui.header_cell("Profile"),
        ui.header_cell("Key file"),
        ui.header_cell("On disk"),
        ui.header_cell("In agent"),
    ]);
    for profile in store.profiles.values() {
        let key = ssh::identity_file(&ctx.paths, profile);
        let on_disk = key.exists();
        let in_agent = on_disk && agent.is_key_loaded(&key).unwrap_or(false);
        table.add_row(vec![
            ui.cell(&profile.name),
            ui.cell(key.display().to_string()),
            if on_disk {
                ui.colored_cell("yes", AnsiColor::Green)
            } else {
                ui.colored_cell("no", AnsiColor::Yellow)
            },
            if in_agent {
                ui.colored_cell("yes", AnsiColor::Green)
            } else {
                ui.cell("no")
            },
        ]);
    }
    ui.println(table.to_string());
    Ok(())
}

pub fn doctor(ctx: &Context) -> Result<()> {
    if !run_doctor(ctx) {
        bail!("Issues detected; see the report above");
    }
    Ok(())
}
