//! Test utilities shared across test modules
//!
//! Provides a temp-dir backed [`Paths`] and a [`FakeRunner`] that records the
//! external commands a test triggers instead of spawning `git` or `ssh-add`.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use tempfile::TempDir;

use crate::error::Result;
use crate::paths::Paths;
use crate::runner::{CommandOutput, CommandRunner};

/// Create a Paths struct for testing using a temporary directory as home
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths::from_home(temp_dir.path())
}

/// A scripted [`CommandRunner`]
///
/// `git config --global` set/get/unset calls are served from an in-memory
/// map so tests can assert on the resulting global configuration. Anything
/// else returns queued responses, falling back to a successful empty output.
#[derive(Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<Vec<String>>>,
    pub git_global: RefCell<HashMap<String, String>>,
    pub responses: RefCell<VecDeque<CommandOutput>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: i32, stdout: &str, stderr: &str) {
        self.responses.borrow_mut().push_back(CommandOutput {
            status: Some(status),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
    }

    pub fn global(&self, key: &str) -> Option<String> {
        self.git_global.borrow().get(key).cloned()
    }

    pub fn set_global(&self, key: &str, value: &str) {
        self.git_global
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Every recorded call joined with spaces, for easy assertions
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.join(" ")).collect()
    }

    fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn git_config(&self, args: &[&str]) -> Option<CommandOutput> {
        match args {
            ["config", "--global", "--get", key] => Some(match self.global(key) {
                Some(value) => Self::ok(&format!("{value}\n")),
                None => CommandOutput {
                    status: Some(1),
                    stdout: String::new(),
                    stderr: String::new(),
                },
            }),
            ["config", "--global", "--unset", key] => {
                let removed = self.git_global.borrow_mut().remove(*key);
                Some(CommandOutput {
                    status: Some(if removed.is_some() { 0 } else { 5 }),
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
            ["config", "--global", key, value] => {
                self.set_global(key, value);
                Some(Self::ok(""))
            }
            _ => None,
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.borrow_mut().push(call);

        if program == "git" {
            if let Some(output) = self.git_config(args) {
                return Ok(output);
            }
        }

        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Self::ok("")))
    }
}
