//! Running external binaries (`git`, `ssh-add`).
//!
//! Everything that shells out goes through [`CommandRunner`] so the
//! projection logic can be tested without touching the real global git
//! configuration or ssh agent.

use std::process::Command;

use crate::error::{Error, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr, the way a terminal would have shown them
    pub fn combined(&self) -> String {
        let mut out = self.stdout.trim_end().to_string();
        let err = self.stderr.trim_end();
        if !err.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(err);
        }
        out
    }
}

pub trait CommandRunner {
    /// Run `program` with `args` to completion.
    ///
    /// A non-zero exit is reported through [`CommandOutput::status`]; only a
    /// failure to spawn the process at all is an `Err`.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run and turn a non-zero exit into [`Error::ExternalTool`]
    fn run_checked(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run(program, args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::ExternalTool {
                tool: format!("{program} {}", args.join(" ")),
                detail: describe_failure(&output),
            })
        }
    }
}

fn describe_failure(output: &CommandOutput) -> String {
    let status = match output.status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    };
    let text = output.combined();
    if text.is_empty() {
        status
    } else {
        format!("{status}\n{text}")
    }
}

/// Spawns real processes, blocking until they exit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        tracing::debug!(program, ?args, "running external command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::ExternalTool {
                tool: program.to_string(),
                detail: format!("could not be started: {e}"),
            })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(program, status = ?result.status, "external command finished");
        Ok(result)
    }
}
