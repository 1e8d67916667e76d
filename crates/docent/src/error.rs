// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for docent operations.

use miette::{Diagnostic, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with docent Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during docent operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// A function was called in a way its contract does not allow
    #[error("Invalid argument: {0}")]
    #[diagnostic(code(docent::invalid_argument))]
    InvalidArgument(String),

    /// Spec contains a key that is not a recognized option
    #[error("Unrecognized parameter in json spec `{key}'. Perhaps you meant `{suggestion}'")]
    #[diagnostic(
        code(docent::unrecognized_key),
        help("Recognized parameters are: {}", crate::spec::RECOGNIZED_KEYS.join(", "))
    )]
    UnrecognizedKey { key: String, suggestion: String },

    /// Spec file could not be parsed
    #[error("Invalid spec: {error}")]
    #[diagnostic(
        code(docent::invalid_spec),
        help("Check the spec syntax, it must be a single mapping of parameter names to values")
    )]
    InvalidSpec {
        #[source]
        error: SpecSyntaxError,
        #[source_code]
        content: String,
        #[label("here")]
        at: Option<SourceSpan>,
    },

    /// Lock file could not be parsed or written
    #[error("Invalid lock file: {path:?}")]
    #[diagnostic(
        code(docent::invalid_lock),
        help("Reinstall to regenerate the lock file")
    )]
    InvalidLock {
        path: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(docent::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Nothing to do without at least one script
    #[error("List of scripts to expose can't be empty")]
    #[diagnostic(
        code(docent::nothing_to_expose),
        help("Pass at least one script with -o/--expose or set to_expose_list in the spec")
    )]
    NothingToExpose,

    /// A provisioning or installation command failed
    #[error("Process returned nonzero exit status of {}", exit_status(.code))]
    #[diagnostic(code(docent::command_failed), help("While running: {command}"))]
    CommandFailed { command: String, code: Option<i32> },

    /// Wrapper template could not be read
    #[error("Wrapper template not found: {path:?}")]
    #[diagnostic(
        code(docent::template_not_found),
        help("Check the path given with -t/--template or the template key in the spec")
    )]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(docent::io_error))]
    Io(#[from] std::io::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<killed by signal>".to_string(),
    }
}

/// The underlying syntax error of a spec, by format.
#[derive(Error, Debug)]
pub enum SpecSyntaxError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
