// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Virtualenv creation and package installation through a shell.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::compose::Verbosity;

#[cfg(test)]
#[path = "./provision_test.rs"]
mod provision_test;

/// Runs shell command lines on behalf of provisioning.
pub trait Shell {
    /// Run `command` to completion, failing on a nonzero exit status.
    fn run(&self, command: &str) -> impl Future<Output = crate::Result<()>> + Send;
}

/// Runs commands with `/bin/sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell {
    verbosity: Verbosity,
}

impl SystemShell {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Shell for SystemShell {
    async fn run(&self, command: &str) -> crate::Result<()> {
        tracing::debug!(%command, "spawning shell");

        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command);

        if self.verbosity.streams_output() {
            let status = cmd.status().await?;
            if !status.success() {
                return Err(crate::Error::CommandFailed {
                    command: command.to_string(),
                    code: status.code(),
                });
            }
            return Ok(());
        }

        let output = cmd.output().await?;
        if !output.status.success() {
            // Captured output is the only clue to what went wrong
            eprintln!("{}", String::from_utf8_lossy(&output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            return Err(crate::Error::CommandFailed {
                command: command.to_string(),
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::trace!(stdout = %stdout.trim(), "command output");
        }
        Ok(())
    }
}

/// The script that activates the virtualenv at `venv_dir`.
pub fn activation_path(venv_dir: &Path) -> PathBuf {
    venv_dir.join("bin").join("activate")
}

/// Whether a virtualenv already exists at `venv_dir`.
pub fn is_provisioned(venv_dir: &Path) -> bool {
    activation_path(venv_dir).is_file()
}

/// Create a virtualenv at `venv_dir` with `tool`, returning its activation path.
///
/// `args` is passed through to the tool unquoted, so it may hold several
/// arguments.
pub async fn provision_environment<S: Shell>(
    shell: &S,
    venv_dir: &Path,
    args: &str,
    tool: &str,
) -> crate::Result<PathBuf> {
    let target = quote(&venv_dir.to_string_lossy());
    let command = match args.trim() {
        "" => format!("{tool} {target}"),
        args => format!("{tool} {args} {target}"),
    };
    shell.run(&command).await?;
    Ok(activation_path(venv_dir))
}

/// Install one requirement into the virtualenv behind `activation`.
pub async fn install_package<S: Shell>(
    shell: &S,
    activation: &Path,
    requirement: &str,
) -> crate::Result<()> {
    let command = format!(
        ". {} && pip install {}",
        quote(&activation.to_string_lossy()),
        quote(requirement)
    );
    shell.run(&command).await
}

/// Quote `value` as a single posix shell word.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
