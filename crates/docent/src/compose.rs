// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Composition of command line options and a spec file into install options.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::spec::{resolve_path, SpecFile};
use crate::DEFAULT_VENV_NAME;

#[cfg(test)]
#[path = "./compose_test.rs"]
mod compose_test;

/// How much output an install produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No progress messages, subprocess output only on failure.
    Quiet,
    /// Progress messages, subprocess output only on failure.
    #[default]
    Normal,
    /// Progress messages and all subprocess output.
    Verbose,
}

impl Verbosity {
    /// Map the spec file's `verbose` value, where `None` is an explicit null.
    pub fn from_verbose_flag(verbose: Option<bool>) -> Self {
        match verbose {
            Some(true) => Self::Verbose,
            Some(false) => Self::Normal,
            None => Self::Quiet,
        }
    }

    /// The most detailed log level shown at this verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self {
            Self::Quiet => tracing::Level::ERROR,
            Self::Normal => tracing::Level::INFO,
            Self::Verbose => tracing::Level::DEBUG,
        }
    }

    /// Whether subprocess output goes straight to the terminal.
    pub fn streams_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Install options given on the command line (or through the environment).
///
/// Empty values mean "not given" and are filled from the spec file.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub pip_install_list: Vec<String>,
    pub to_expose_list: Vec<String>,
    pub venv_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub verbosity: Option<Verbosity>,
    pub venv_args: Option<String>,
}

/// Fully resolved install options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallSpec {
    /// Requirements to install, in order.
    pub pip_install_list: Vec<String>,

    /// Scripts to expose, in order.
    pub to_expose_list: Vec<String>,

    /// Virtualenv location.
    pub venv_dir: PathBuf,

    /// Alternate wrapper template, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    pub verbosity: Verbosity,

    /// Extra arguments for the virtualenv tool (may be empty).
    pub venv_args: String,

    /// Spec file that contributed to these options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl Default for InstallSpec {
    fn default() -> Self {
        Self {
            pip_install_list: Vec::new(),
            to_expose_list: Vec::new(),
            venv_dir: PathBuf::from(DEFAULT_VENV_NAME),
            template: None,
            verbosity: Verbosity::default(),
            venv_args: String::new(),
            source_file: None,
        }
    }
}

impl InstallSpec {
    /// Check if there is anything to install besides the virtualenv.
    pub fn has_requirements(&self) -> bool {
        self.pip_install_list.iter().any(|r| !r.trim().is_empty())
    }
}

/// Compose command line options with an optional spec file.
///
/// Command line values win; every option the command line left empty is
/// taken from the spec file, and anything still unset gets its default.
/// Relative paths from the spec file are resolved against its directory.
pub fn compose_spec(cli: &CliOptions, file: Option<&SpecFile>) -> crate::Result<InstallSpec> {
    let mut composed = InstallSpec::default();
    let base_dir = file.and_then(SpecFile::base_dir);

    composed.pip_install_list = if !cli.pip_install_list.is_empty() {
        cli.pip_install_list.clone()
    } else {
        file.map(|f| f.pip_install_list.clone()).unwrap_or_default()
    };

    composed.to_expose_list = if !cli.to_expose_list.is_empty() {
        cli.to_expose_list.clone()
    } else {
        file.map(|f| f.to_expose_list.clone()).unwrap_or_default()
    };

    let venv_dir = match given_path(cli.venv_dir.as_deref()) {
        Some(dir) => Some(resolve_path(dir, None)?),
        None => match given_path(file.and_then(|f| f.venv_dir.as_deref())) {
            Some(dir) => Some(resolve_path(dir, base_dir)?),
            None => None,
        },
    };
    if let Some(dir) = venv_dir {
        composed.venv_dir = dir;
    }

    composed.template = match given_path(cli.template.as_deref()) {
        Some(template) => Some(resolve_path(template, None)?),
        None => match given_path(file.and_then(|f| f.template.as_deref())) {
            Some(template) => Some(resolve_path(template, base_dir)?),
            None => None,
        },
    };

    composed.verbosity = cli
        .verbosity
        .or_else(|| file.and_then(|f| f.verbose).map(Verbosity::from_verbose_flag))
        .unwrap_or_default();

    composed.venv_args = given_str(cli.venv_args.as_deref())
        .or_else(|| given_str(file.and_then(|f| f.venv_args.as_deref())))
        .unwrap_or_default()
        .to_string();

    composed.source_file = file.and_then(|f| f.source_path.clone());

    Ok(composed)
}

fn given_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn given_str(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
