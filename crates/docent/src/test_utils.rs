// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::Mutex;

use crate::provision::Shell;

/// A shell that records command lines instead of running them.
///
/// Commands that don't source an activation script are taken to create a
/// virtualenv, so `bin/activate` is made under their last argument.
#[derive(Debug, Default)]
pub struct RecordingShell {
    pub commands: Mutex<Vec<String>>,
    /// Fail any command containing this text.
    pub fail_on: Option<String>,
}

impl RecordingShell {
    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl Shell for RecordingShell {
    async fn run(&self, command: &str) -> crate::Result<()> {
        self.commands.lock().unwrap().push(command.to_string());

        if let Some(text) = &self.fail_on {
            if command.contains(text.as_str()) {
                return Err(crate::Error::CommandFailed {
                    command: command.to_string(),
                    code: Some(1),
                });
            }
        }

        if !command.starts_with(". ") {
            let target = command
                .rsplit(' ')
                .next()
                .unwrap()
                .trim_matches('\'');
            let bin = Path::new(target).join("bin");
            std::fs::create_dir_all(&bin)?;
            std::fs::write(bin.join("activate"), "# activate\n")?;
        }
        Ok(())
    }
}
