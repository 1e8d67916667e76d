// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Spec file parsing and validation for json (or yaml) install specs.

use std::io::Read;
use std::path::{Path, PathBuf};

use miette::SourceSpan;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SpecSyntaxError;
use crate::matcher::find_match;

#[cfg(test)]
#[path = "./spec_test.rs"]
mod spec_test;

/// Every parameter name a spec may contain.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "pip_install_list",
    "to_expose_list",
    "venv_dir",
    "template",
    "verbose",
    "venv_args",
];

/// Install options as written in a spec file.
///
/// Every field is optional; anything left unset here is either provided
/// on the command line or falls back to a default when composed into an
/// [`crate::InstallSpec`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SpecFile {
    /// Requirements to install, anything pip understands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pip_install_list: Vec<String>,

    /// Scripts to expose from the virtualenv.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_expose_list: Vec<String>,

    /// Where the virtualenv should live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venv_dir: Option<PathBuf>,

    /// Path to an alternate wrapper script template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// `true` streams subprocess output, `false` only reports progress and
    /// an explicit `null` silences progress. `None` when the key is absent.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub verbose: Option<Option<bool>>,

    /// Extra arguments for the virtualenv tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venv_args: Option<String>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl SpecFile {
    /// Parse spec from a json string.
    pub fn from_json<S: Into<String>>(json: S) -> crate::Result<Self> {
        let json = json.into();
        let value: serde_json::Value =
            serde_json::from_str(&json).map_err(|e| invalid_spec(e.into(), &json))?;
        Self::from_value(value, json)
    }

    /// Parse spec from a yaml string.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Self> {
        let yaml = yaml.into();
        let value: serde_json::Value =
            serde_yaml::from_str(&yaml).map_err(|e| invalid_spec(e.into(), &yaml))?;
        Self::from_value(value, yaml)
    }

    /// Read a json spec from a stream such as stdin.
    ///
    /// Returns `None` when the stream holds nothing but whitespace.
    pub fn from_reader<R: Read>(mut reader: R) -> crate::Result<Option<Self>> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        if json.trim().is_empty() {
            return Ok(None);
        }
        Self::from_json(json).map(Some)
    }

    /// Load spec from file path.
    ///
    /// Files ending in `.yaml` or `.yml` are read as yaml, anything else
    /// as json.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let mut spec = if is_yaml {
            Self::from_yaml(content)?
        } else {
            Self::from_json(content)?
        };
        spec.source_path = Some(path.to_path_buf());
        Ok(spec)
    }

    /// The directory relative paths in this spec are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.source_path.as_deref().and_then(Path::parent)
    }

    fn from_value(value: serde_json::Value, content: String) -> crate::Result<Self> {
        // Unknown keys are reported with a suggestion before serde gets a
        // chance to reject them with a less helpful message
        if let serde_json::Value::Object(map) = &value {
            validate_keys(map.keys().map(String::as_str))?;
        }
        serde_json::from_value(value).map_err(|e| invalid_spec(SpecSyntaxError::Json(e), &content))
    }
}

/// Keep an explicit `null` apart from a missing key.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn invalid_spec(error: SpecSyntaxError, content: &str) -> crate::Error {
    let at = syntax_error_offset(&error, content).map(|offset| SourceSpan::from((offset, 1)));
    crate::Error::InvalidSpec {
        error,
        content: content.to_string(),
        at,
    }
}

/// Byte offset of a syntax error in `content`, when the parser knows it.
///
/// Errors raised while mapping an already parsed document onto
/// [`SpecFile`] carry no position.
fn syntax_error_offset(error: &SpecSyntaxError, content: &str) -> Option<usize> {
    if content.is_empty() {
        return None;
    }
    let offset = match error {
        SpecSyntaxError::Json(e) if e.line() > 0 => {
            let line_start: usize = content
                .split_inclusive('\n')
                .take(e.line() - 1)
                .map(str::len)
                .sum();
            line_start + e.column().saturating_sub(1)
        }
        SpecSyntaxError::Json(_) => return None,
        SpecSyntaxError::Yaml(e) => e.location()?.index(),
    };
    // Point at the last character when the parser ran off the end
    Some(offset.min(content.len().saturating_sub(1)))
}

/// Check that every key is a recognized parameter name.
///
/// When more than one key is unknown, the first in sorted order is the
/// one reported.
pub fn validate_keys<'a, I>(keys: I) -> crate::Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unknown: Vec<&str> = keys
        .into_iter()
        .filter(|key| !RECOGNIZED_KEYS.contains(key))
        .collect();
    unknown.sort_unstable();

    match unknown.first() {
        None => Ok(()),
        Some(key) => {
            let suggestion = find_match(key, RECOGNIZED_KEYS.iter().copied())?;
            Err(crate::Error::UnrecognizedKey {
                key: key.to_string(),
                suggestion: suggestion.to_string(),
            })
        }
    }
}

/// Resolve a path from a spec or the command line.
///
/// `~/` expands to the home directory, absolute paths are kept, and
/// relative paths are joined onto `base_dir` when one is given.
pub fn resolve_path(path: &Path, base_dir: Option<&Path>) -> crate::Result<PathBuf> {
    if let Ok(rel) = path.strip_prefix("~") {
        let home = dirs::home_dir().ok_or_else(|| {
            crate::Error::InvalidArgument("Cannot resolve ~ without HOME".to_string())
        })?;
        return Ok(home.join(rel));
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(match base_dir {
        Some(base) => base.join(path),
        None => path.to_path_buf(),
    })
}
