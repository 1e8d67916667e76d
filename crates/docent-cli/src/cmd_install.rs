// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the default `docent` install command.

use clap::Args;
use docent::{InstallOptions, InstallSpec, SystemShell};
use miette::Result;

/// Install packages into a virtualenv and expose scripts from it
#[derive(Debug, Args)]
pub struct CmdInstall {
    #[clap(flatten)]
    pub spec: crate::SpecFlags,

    /// Command used to create the virtualenv
    #[clap(long, env = "DOCENT_VIRTUALENV", default_value = docent::DEFAULT_VIRTUALENV_TOOL)]
    pub virtualenv: String,

    /// Don't record the install in a lock file inside the virtualenv
    #[clap(long)]
    pub no_lock: bool,
}

impl CmdInstall {
    pub async fn run(&mut self, spec: InstallSpec) -> Result<i32> {
        tracing::debug!(?spec, "resolved install spec");

        let shell = SystemShell::new(spec.verbosity);
        let options = InstallOptions {
            virtualenv: self.virtualenv.clone(),
            write_lock: !self.no_lock,
        };

        let report = docent::install(&spec, &shell, &options).await?;
        for wrapper in &report.exposed {
            tracing::debug!(wrapper = %wrapper.display(), "exposed");
        }

        Ok(0)
    }
}
