// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Install receipts recording what docent put where.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::install::InstallReport;
use crate::LOCK_FILENAME;

#[cfg(test)]
#[path = "./lock_test.rs"]
mod lock_test;

/// Lock file API version.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub enum LockApiVersion {
    #[serde(rename = "docent/v0/lock")]
    V0,
}

/// Receipt of a single install, stored inside the virtualenv.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LockFile {
    pub api: LockApiVersion,
    pub generated: GenerationMetadata,
    pub venv_dir: PathBuf,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<ExposedScript>,
}

/// Metadata about when and where the lock was generated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GenerationMetadata {
    pub timestamp: DateTime<Utc>,
    pub docent_version: String,
    pub hostname: String,
}

/// Wrapper script written by the install.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExposedScript {
    pub path: PathBuf,
    pub sha256: String,
}

/// Location of the lock file for a virtualenv.
pub fn lock_path(venv_dir: &Path) -> PathBuf {
    venv_dir.join(LOCK_FILENAME)
}

impl LockFile {
    /// Load a lock file from disk.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;
        serde_yaml::from_str(&yaml).map_err(|e| crate::Error::InvalidLock {
            path: path.to_path_buf(),
            error: e,
        })
    }

    /// Write this lock file to disk.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| crate::Error::InvalidLock {
            path: path.to_path_buf(),
            error: e,
        })?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

/// Generate a lock file from a finished install.
pub fn generate_lock(report: &InstallReport) -> crate::Result<LockFile> {
    let mut scripts = Vec::new();
    for path in &report.exposed {
        let path = dunce::canonicalize(path)?;
        let sha256 = hash_file(&path)?;
        scripts.push(ExposedScript { path, sha256 });
    }

    Ok(LockFile {
        api: LockApiVersion::V0,
        generated: GenerationMetadata {
            timestamp: Utc::now(),
            docent_version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string()),
        },
        venv_dir: report.venv_dir.clone(),
        requirements: report.installed.clone(),
        scripts,
    })
}

/// Verify the wrappers recorded in a lock file are still in place.
pub fn verify_lock(lock: &LockFile) -> crate::Result<Vec<LockChange>> {
    let mut changes = Vec::new();

    for script in &lock.scripts {
        if !script.path.is_file() {
            changes.push(LockChange {
                kind: LockChangeKind::ScriptRemoved,
                reference: script.path.display().to_string(),
                expected: Some(script.sha256.clone()),
                actual: None,
            });
            continue;
        }

        let actual = hash_file(&script.path)?;
        if actual != script.sha256 {
            changes.push(LockChange {
                kind: LockChangeKind::ScriptChanged,
                reference: script.path.display().to_string(),
                expected: Some(script.sha256.clone()),
                actual: Some(actual),
            });
        }
    }

    Ok(changes)
}

fn hash_file(path: &Path) -> crate::Result<String> {
    let content = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&content)))
}

/// A single detected change between lock and what is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockChange {
    pub kind: LockChangeKind,
    pub reference: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Types of lock mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockChangeKind {
    ScriptChanged,
    ScriptRemoved,
}
