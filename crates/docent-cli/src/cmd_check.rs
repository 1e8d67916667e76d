// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Verify that exposed scripts match the lock file of a virtualenv.

use std::path::PathBuf;

use clap::Args;
use miette::Result;

/// Verify exposed scripts match the lock file of a virtualenv
#[derive(Debug, Args)]
pub struct CmdCheck {
    /// The virtualenv to check
    #[clap(
        short = 'e',
        long = "virtualenv-dir",
        alias = "virtualenv_dir",
        env = "DOCENT_VENV_DIR",
        default_value = docent::DEFAULT_VENV_NAME
    )]
    venv_dir: PathBuf,

    /// Exit with error on mismatch
    #[clap(long)]
    strict: bool,
}

impl CmdCheck {
    pub async fn run(&mut self) -> Result<i32> {
        let lock_path = docent::lock_path(&self.venv_dir);

        if !lock_path.exists() {
            if self.strict {
                return Err(miette::miette!("No lock file found at {:?}", lock_path));
            } else {
                println!("Warning: No lock file found");
                return Ok(2);
            }
        }

        let lock = docent::LockFile::load(&lock_path)?;
        let changes = docent::verify_lock(&lock)?;

        if changes.is_empty() {
            println!("✓ Exposed scripts match lock file");
            return Ok(0);
        }

        // Report changes
        if self.strict {
            eprintln!("Error: Exposed scripts differ from lock file:");
        } else {
            println!("Warning: Exposed scripts differ from lock file:");
        }

        for change in &changes {
            match &change.kind {
                docent::LockChangeKind::ScriptChanged => {
                    println!("  - Script '{}' was modified", change.reference);
                    if let (Some(exp), Some(act)) = (&change.expected, &change.actual) {
                        println!("    Expected: {}", exp);
                        println!("    Actual:   {}", act);
                    }
                }
                docent::LockChangeKind::ScriptRemoved => {
                    println!("  - Script '{}' was removed", change.reference);
                }
            }
        }

        if self.strict {
            return Ok(1);
        }

        println!("\nRun docent again with the same spec to restore the scripts");
        Ok(0)
    }
}
