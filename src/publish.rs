use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::models::CalendarDate;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    NothingToCommit,
}

/// Pushes a working directory's changes somewhere durable.
///
/// The journal core never calls this; only the CLI's `commit` command does.
pub trait Publisher {
    fn publish(&self, workdir: &Path, message: &str) -> Result<PublishOutcome, PublishError>;
}

/// Commit message used for a day's publish
pub fn commit_message(date: &CalendarDate) -> String {
    format!("docs: update daily report {}", date)
}

/// Status check, stage everything, commit, push
#[derive(Debug, Clone)]
pub struct GitPublisher {
    program: String,
}

impl Default for GitPublisher {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    fn run(&self, workdir: &Path, args: &[&str]) -> Result<String, PublishError> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(%command, workdir = %workdir.display(), "running");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|source| PublishError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PublishError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, workdir: &Path, message: &str) -> Result<PublishOutcome, PublishError> {
        let status = self.run(workdir, &["status", "--porcelain"])?;
        if status.trim().is_empty() {
            tracing::info!(workdir = %workdir.display(), "no changes to commit");
            return Ok(PublishOutcome::NothingToCommit);
        }

        self.run(workdir, &["add", "."])?;
        self.run(workdir, &["commit", "-m", message])?;
        self.run(workdir, &["push"])?;
        tracing::info!(workdir = %workdir.display(), message, "published");
        Ok(PublishOutcome::Published)
    }
}
