use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ghswitch::{
    commands,
    context::Context,
    paths::Paths,
    runner::SystemRunner,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "ghswitch")]
#[command(about = "GitHub Account Switcher - manage multiple Git identities")]
#[command(
    long_about = "Manage multiple GitHub identities.\n\nDirectory rules use git's includeIf so repositories pick the right identity automatically; each profile also gets an SSH host alias (github.com-<profile>) bound to its own key."
)]
#[command(version)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Skip confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    yes: bool,

    /// Load the profile's SSH key into the agent when switching
    #[arg(short = 's', long, global = true)]
    auto_ssh: bool,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all profiles
    List,

    /// Show the current git identity and active profile
    Current,

    /// Add a new profile
    Add {
        name: String,
        email: String,
        /// Name used for commits (user.name)
        git_name: Option<String>,
        /// GPG key id used to sign commits
        gpg_key: Option<String>,
    },

    /// Switch the global git identity to a profile
    Switch {
        name: String,
        /// One of the profile's emails to use instead of the primary one
        email: Option<String>,
    },

    /// Remove a profile and its directory rules
    Remove { name: String },

    /// Use a profile automatically for everything below a directory
    Auto { directory: PathBuf, profile: String },

    /// List all directory rules
    AutoList,

    /// Remove a directory rule
    AutoRemove { directory: PathBuf },

    /// Show which profile applies to a directory (default: current directory)
    Which { directory: Option<PathBuf> },

    /// Re-apply every directory rule to the git configuration
    Sync,

    /// Add an email to a profile
    AddEmail { profile: String, email: String },

    /// Remove an email from a profile
    RemoveEmail { profile: String, email: String },

    /// List a profile's emails
    ListEmails { profile: String },

    /// Make one of a profile's emails the primary one
    SetPrimary { profile: String, email: String },

    /// Export profiles to a file, or stdout
    Export { file: Option<PathBuf> },

    /// Import profiles from a file
    Import { file: PathBuf },

    /// Show SSH agent keys and each profile's key status
    Keys,

    /// Run diagnostics on the ghswitch setup
    Doctor,

    /// Generate shell completions
    Completions { shell: Shell },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "ghswitch", &mut std::io::stdout());
        return Ok(());
    }

    let runner = SystemRunner;
    let ctx = Context::new(Paths::new()?, Ui::new(cli.color, cli.no_color), &runner)
        .with_assume_yes(cli.yes)
        .with_auto_ssh(cli.auto_ssh);

    match cli.command {
        Commands::List => commands::list(&ctx),
        Commands::Current => commands::current(&ctx),
        Commands::Add {
            name,
            email,
            git_name,
            gpg_key,
        } => commands::add(&ctx, &name, &email, git_name.as_deref(), gpg_key.as_deref()),
        Commands::Switch { name, email } => commands::switch(&ctx, &name, email.as_deref()),
        Commands::Remove { name } => commands::remove(&ctx, &name),
        Commands::Auto { directory, profile } => commands::auto(&ctx, &directory, &profile),
        Commands::AutoList => commands::auto_list(&ctx),
        Commands::AutoRemove { directory } => commands::auto_remove(&ctx, &directory),
        Commands::Which { directory } => commands::which(&ctx, directory.as_deref()),
        Commands::Sync => commands::sync(&ctx),
        Commands::AddEmail { profile, email } => commands::add_email(&ctx, &profile, &email),
        Commands::RemoveEmail { profile, email } => commands::remove_email(&ctx, &profile, &email),
        Commands::ListEmails { profile } => commands::list_emails(&ctx, &profile),
        Commands::SetPrimary { profile, email } => commands::set_primary(&ctx, &profile, &email),
        Commands::Export { file } => commands::export(&ctx, file.as_deref()),
        Commands::Import { file } => commands::import(&ctx, &file),
        Commands::Keys => commands::keys(&ctx),
        Commands::Doctor => commands::doctor(&ctx),
        Commands::Completions { .. } => Ok(()),
    }
}
