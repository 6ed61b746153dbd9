use crate::agent::SshAgent;
use crate::git::GitProjector;
use crate::paths::Paths;
use crate::runner::CommandRunner;
use crate::ssh::SshConfigManager;
use crate::ui::Ui;

/// Everything a command needs, built once per invocation from the CLI flags
pub struct Context<'a> {
    pub paths: Paths,
    pub ui: Ui,
    pub runner: &'a dyn CommandRunner,
    /// `--yes`: answer every confirmation with yes
    pub assume_yes: bool,
    /// `--auto-ssh`: load the profile's key into the agent when switching
    pub auto_ssh: bool,
}

impl<'a> Context<'a> {
    pub fn new(paths: Paths, ui: Ui, runner: &'a dyn CommandRunner) -> Self {
        Self {
            paths,
            ui,
            runner,
            assume_yes: false,
            auto_ssh: false,
        }
    }

    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn with_auto_ssh(mut self, auto_ssh: bool) -> Self {
        self.auto_ssh = auto_ssh;
        self
    }

    pub fn git(&self) -> GitProjector<'_, dyn CommandRunner + 'a> {
        GitProjector::new(self.runner, &self.paths)
    }

    pub fn ssh_config(&self) -> SshConfigManager<'_> {
        SshConfigManager::new(&self.paths)
    }

    pub fn agent(&self) -> SshAgent<'_, dyn CommandRunner + 'a> {
        SshAgent::detect(self.runner)
    }
}
