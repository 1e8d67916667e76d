// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Install orchestration: virtualenv, requirements, then wrappers.

use std::path::{Path, PathBuf};

use crate::compose::InstallSpec;
use crate::expose::{expose_script, load_template};
use crate::lock::{generate_lock, lock_path};
use crate::provision::{
    activation_path, install_package, is_provisioned, provision_environment, Shell,
};
use crate::DEFAULT_VIRTUALENV_TOOL;

#[cfg(test)]
#[path = "./install_test.rs"]
mod install_test;

/// Options for an install that don't come from the spec.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Command used to create the virtualenv.
    pub virtualenv: String,
    /// Write a lock file into the virtualenv when done.
    pub write_lock: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            virtualenv: DEFAULT_VIRTUALENV_TOOL.to_string(),
            write_lock: true,
        }
    }
}

/// What an install did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub venv_dir: PathBuf,
    pub activation: PathBuf,
    /// False when an existing virtualenv was reused.
    pub provisioned: bool,
    /// Requirements installed, in order.
    pub installed: Vec<String>,
    /// Wrapper scripts written, in order.
    pub exposed: Vec<PathBuf>,
}

/// Provision the virtualenv, install requirements and expose scripts.
///
/// An existing virtualenv (one with `bin/activate`) is reused as is.
/// Nothing is run when there are no scripts to expose or the wrapper
/// template can't be read.
pub async fn install<S: Shell>(
    spec: &InstallSpec,
    shell: &S,
    options: &InstallOptions,
) -> crate::Result<InstallReport> {
    if spec.to_expose_list.is_empty() {
        return Err(crate::Error::NothingToExpose);
    }

    let template = spec.template.as_deref().map(load_template).transpose()?;

    let mut report = InstallReport {
        venv_dir: spec.venv_dir.clone(),
        ..Default::default()
    };

    if is_provisioned(&spec.venv_dir) {
        tracing::info!(
            "Virtualenv {} exists. Skipping virtualenv installation.",
            spec.venv_dir.display()
        );
        report.activation = activation_path(&spec.venv_dir);
    } else {
        tracing::info!("Installing virtualenv to {}...", spec.venv_dir.display());
        report.activation =
            provision_environment(shell, &spec.venv_dir, &spec.venv_args, &options.virtualenv)
                .await?;
        report.provisioned = true;
    }

    if spec.has_requirements() {
        tracing::info!("Installing requirements...");
        for requirement in spec
            .pip_install_list
            .iter()
            .filter(|r| !r.trim().is_empty())
        {
            tracing::debug!(%requirement, "pip install");
            install_package(shell, &report.activation, requirement).await?;
            report.installed.push(requirement.clone());
        }
    }

    for to_expose in &spec.to_expose_list {
        tracing::info!("Exposing script {to_expose}...");
        let wrapper = expose_script(Path::new(to_expose), &report.activation, template.as_deref())?;
        report.exposed.push(wrapper);
    }

    if options.write_lock {
        let lock = generate_lock(&report)?;
        let path = lock_path(&spec.venv_dir);
        lock.save(&path)?;
        tracing::debug!(lock = %path.display(), "wrote lock file");
    }

    tracing::info!("Complete.");
    Ok(report)
}
