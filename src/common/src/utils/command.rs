//! Subprocess execution with a hard deadline.
//!
//! Every external tool the monitor talks to (`systemctl`, `hostname`, `celery inspect`)
//! goes through [`CommandRunner`]. The system implementation kills the child when the
//! deadline passes and reports [`CommandError::TimedOut`], so a wedged tool costs one
//! timeout instead of the whole monitor.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            current_dir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("`{command}` exited with status {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommandError::TimedOut { .. })
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// Runs commands with `tokio::process`, capturing stdout and stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let mut command = tokio::process::Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        debug!("Running `{}` with timeout {:?}", spec, spec.timeout);

        let output = match tokio::time::timeout(spec.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(CommandError::Spawn {
                    command: spec.to_string(),
                    source,
                })
            }
            // dropping the output future kills the child
            Err(_) => {
                return Err(CommandError::TimedOut {
                    command: spec.to_string(),
                    timeout: spec.timeout,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(CommandError::Failed {
                command: spec.to_string(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedCommandRunner;

#[cfg(any(test, feature = "test-utils"))]
mod scripted {
    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&CommandSpec) -> Result<CommandOutput, CommandError> + Send + Sync>;

    /// Records every invocation and answers with a caller-supplied closure.
    pub struct ScriptedCommandRunner {
        responder: Responder,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl ScriptedCommandRunner {
        pub fn new<F>(responder: F) -> Self
        where
            F: Fn(&CommandSpec) -> Result<CommandOutput, CommandError> + Send + Sync + 'static,
        {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(vec![]),
            }
        }

        pub fn succeeding(stdout: &str) -> Self {
            let stdout = stdout.to_string();
            Self::new(move |_| Ok(CommandOutput::from_stdout(stdout.clone())))
        }

        pub fn failing(code: i32) -> Self {
            Self::new(move |spec| {
                Err(CommandError::Failed {
                    command: spec.to_string(),
                    code: Some(code),
                    stderr: String::new(),
                })
            })
        }

        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedCommandRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(spec.clone());
            }
            (self.responder)(spec)
        }
    }
}
