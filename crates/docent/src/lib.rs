// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! docent - Virtualenv Script Exposure
//!
//! This crate installs python tools into a virtualenv and then exposes them
//! outside of it through small wrapper scripts. Two tools that need
//! different versions of the same package can then live on one machine.
//!
//! # Overview
//!
//! An install is described by a [`SpecFile`] (json or yaml) merged with
//! command line options into an [`InstallSpec`]. Unrecognized keys in a
//! spec are rejected with a suggestion for the key that was most likely
//! meant, see [`find_match`].
//!
//! # Example
//!
//! ```json
//! {
//!     "pip_install_list": ["black==24.1.0"],
//!     "to_expose_list": ["black"],
//!     "venv_dir": "~/.local/share/docent/black",
//!     "venv_args": "--python=python3.12"
//! }
//! ```

pub mod compose;
pub mod error;
pub mod expose;
pub mod install;
pub mod lock;
pub mod matcher;
pub mod provision;
pub mod spec;

#[cfg(test)]
mod test_utils;

pub use compose::{compose_spec, CliOptions, InstallSpec, Verbosity};
pub use error::{Error, Result};
pub use expose::{expose_script, load_template, DEFAULT_TEMPLATE};
pub use install::{install, InstallOptions, InstallReport};
pub use lock::{generate_lock, lock_path, verify_lock, LockChange, LockChangeKind, LockFile};
pub use matcher::find_match;
pub use provision::{provision_environment, Shell, SystemShell};
pub use spec::{SpecFile, RECOGNIZED_KEYS};

/// Virtualenv directory used when none is given.
pub const DEFAULT_VENV_NAME: &str = "docent_virtualenv";

/// Command that creates virtualenvs unless overridden.
pub const DEFAULT_VIRTUALENV_TOOL: &str = "virtualenv";

/// Well-known filename for a starter spec written by `docent init`.
pub const DOCENT_SPEC_FILENAME: &str = "docent.json";

/// Well-known filename for lock files, inside the virtualenv.
pub const LOCK_FILENAME: &str = "docent.lock.yaml";
