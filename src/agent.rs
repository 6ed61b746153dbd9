//! Loading key files into the running ssh agent via `ssh-add`.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::runner::CommandRunner;

const SSH_ADD: &str = "ssh-add";

/// `ssh-add -l` exits with 1 when the agent holds no identities
const EXIT_NO_IDENTITIES: i32 = 1;

pub trait KeyAgent {
    fn add_key(&self, key_path: &Path) -> Result<()>;
    fn is_key_loaded(&self, key_path: &Path) -> Result<bool>;
    fn list_keys(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// The platform this binary is running on. Other unixes behave like Linux.
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            _ => Self::Linux,
        }
    }

    fn add_args(self) -> &'static [&'static str] {
        match self {
            // Store the passphrase in the login keychain as well
            Self::MacOs => &["--apple-use-keychain"],
            Self::Linux | Self::Windows => &[],
        }
    }

    fn normalize(self, text: &str) -> String {
        match self {
            Self::Windows => text.replace('\\', "/"),
            Self::MacOs | Self::Linux => text.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
        })
    }
}

/// [`KeyAgent`] backed by the `ssh-add` binary
pub struct SshAgent<'a, R: CommandRunner + ?Sized> {
    platform: Platform,
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> SshAgent<'a, R> {
    pub fn new(platform: Platform, runner: &'a R) -> Self {
        Self { platform, runner }
    }

    pub fn detect(runner: &'a R) -> Self {
        Self::new(Platform::detect(), runner)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Raw `ssh-add -l` output, empty when the agent holds no keys
    fn loaded(&self) -> Result<String> {
        let output = self.runner.run(SSH_ADD, &["-l"])?;
        match output.status {
            Some(0) => Ok(output.stdout),
            Some(EXIT_NO_IDENTITIES) => Ok(String::new()),
            _ => Err(Error::ExternalTool {
                tool: format!("{SSH_ADD} -l"),
                detail: format!("could not list agent keys: {}", output.combined()),
            }),
        }
    }
}

impl<R: CommandRunner + ?Sized> KeyAgent for SshAgent<'_, R> {
    fn add_key(&self, key_path: &Path) -> Result<()> {
        let key = key_path.to_string_lossy();
        let mut args = self.platform.add_args().to_vec();
        args.push(&key);

        let output = self.runner.run(SSH_ADD, &args)?;
        if output.success() {
            tracing::debug!(key = %key, platform = %self.platform, "key added to agent");
            return Ok(());
        }
        Err(Error::ExternalTool {
            tool: SSH_ADD.to_string(),
            detail: format!("could not add {key} to the agent\n{}", output.combined()),
        })
    }

    fn is_key_loaded(&self, key_path: &Path) -> Result<bool> {
        let listing = self.platform.normalize(&self.loaded()?);
        let key = self.platform.normalize(&key_path.to_string_lossy());
        Ok(!listing.is_empty() && listing.contains(&key))
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .loaded()?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeRunner;

    const LISTING: &str = "256 SHA256:abc /home/u/.ssh/id_work (ED25519)\n\
                           3072 SHA256:def me@laptop (RSA)\n";

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("freebsd"), Platform::Linux);
        assert_eq!(Platform::MacOs.to_string(), "macOS");
    }

    #[test]
    fn test_list_keys() {
        let runner = FakeRunner::new();
        runner.push_response(0, LISTING, "");
        let agent = SshAgent::new(Platform::Linux, &runner);

        let keys = agent.list_keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].contains("id_work"));
        assert_eq!(runner.call_lines(), vec!["ssh-add -l"]);
    }

    #[test]
    fn test_empty_agent_is_not_an_error() {
        let runner = FakeRunner::new();
        runner.push_response(1, "The agent has no identities.\n", "");
        runner.push_response(1, "The agent has no identities.\n", "");
        let agent = SshAgent::new(Platform::Linux, &runner);

        assert!(agent.list_keys().unwrap().is_empty());
        assert!(!agent.is_key_loaded(Path::new("/home/u/.ssh/id_work")).unwrap());
    }

    #[test]
    fn test_unreachable_agent_is_an_error() {
        let runner = FakeRunner::new();
        runner.push_response(2, "", "Could not open a connection to your authentication agent.");
        let agent = SshAgent::new(Platform::Linux, &runner);

        let err = agent.list_keys().unwrap_err();
        assert!(matches!(err, Error::ExternalTool { .. }));
        assert!(err.to_string().contains("Could not open a connection"));
    }

    #[test]
    fn test_is_key_loaded() {
        let runner = FakeRunner::new();
        runner.push_response(0, LISTING, "");
        runner.push_response(0, LISTING, "");
        let agent = SshAgent::new(Platform::Linux, &runner);

        assert!(agent.is_key_loaded(Path::new("/home/u/.ssh/id_work")).unwrap());
        assert!(!agent.is_key_loaded(Path::new("/home/u/.ssh/id_other")).unwrap());
    }

    #[test]
    fn test_windows_compares_with_forward_slashes() {
        let runner = FakeRunner::new();
        runner.push_response(0, "256 SHA256:abc C:/Users/u/.ssh/id_work (ED25519)\n", "");
        let agent = SshAgent::new(Platform::Windows, &runner);

        assert!(
            agent
                .is_key_loaded(Path::new(r"C:\Users\u\.ssh\id_work"))
                .unwrap()
        );
    }

    #[test]
    fn test_add_key_per_platform() {
        let runner = FakeRunner::new();
        SshAgent::new(Platform::MacOs, &runner)
            .add_key(Path::new("/k/id_work"))
            .unwrap();
        SshAgent::new(Platform::Linux, &runner)
            .add_key(Path::new("/k/id_work"))
            .unwrap();

        assert_eq!(
            runner.call_lines(),
            vec![
                "ssh-add --apple-use-keychain /k/id_work",
                "ssh-add /k/id_work"
            ]
        );
    }

    #[test]
    fn test_add_key_failure_shows_agent_output() {
        let runner = FakeRunner::new();
        runner.push_response(
            1,
            "",
            "Warning: Identity file /k/id_work not accessible: No such file or directory.",
        );
        let agent = SshAgent::new(Platform::Linux, &runner);

        let err = agent.add_key(Path::new("/k/id_work")).unwrap_err();
        assert!(
            err.to_string()
                .contains("Identity file /k/id_work not accessible: No such file or directory.")
        );
    }
}
