// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `docent show` command.

use clap::Args;
use colored::Colorize;
use docent::InstallSpec;
use miette::{IntoDiagnostic, Result};

/// Show the resolved install options without installing anything
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    pub spec: crate::SpecFlags,

    /// Output format: table, yaml, json
    #[clap(long, default_value = "table")]
    format: String,
}

impl CmdShow {
    pub async fn run(&mut self, spec: InstallSpec) -> Result<i32> {
        match self.format.as_str() {
            "yaml" => print!("{}", serde_yaml::to_string(&spec).into_diagnostic()?),
            "json" => println!("{}", serde_json::to_string_pretty(&spec).into_diagnostic()?),
            _ => self.show_table(&spec),
        }

        Ok(0)
    }

    fn show_table(&self, spec: &InstallSpec) {
        if let Some(source) = &spec.source_file {
            println!("{} {}", "Spec file:".bold(), source.display().to_string().cyan());
            println!();
        }

        let state = if docent::provision::is_provisioned(&spec.venv_dir) {
            "[exists]".yellow()
        } else {
            "[will be created]".dimmed()
        };
        println!(
            "{} {} {}",
            "Virtualenv:".bold(),
            spec.venv_dir.display().to_string().cyan(),
            state
        );
        if !spec.venv_args.is_empty() {
            println!("  args: {}", spec.venv_args);
        }
        println!();

        println!("{}", "Requirements:".bold());
        if spec.pip_install_list.is_empty() {
            println!("  {}", "(none)".dimmed());
        } else {
            for (i, requirement) in spec.pip_install_list.iter().enumerate() {
                println!("  {}. {}", i + 1, requirement.green());
            }
        }
        println!();

        println!("{}", "Exposed Scripts:".bold());
        if spec.to_expose_list.is_empty() {
            println!("  {}", "(none, install would fail)".red());
        } else {
            for (i, script) in spec.to_expose_list.iter().enumerate() {
                println!("  {}. {}", i + 1, script.green());
            }
        }
        println!();

        let template = spec
            .template
            .as_ref()
            .map(|t| t.display().to_string())
            .unwrap_or_else(|| "<default>".to_string());
        println!("{} {}", "Template:".bold(), template);
        println!("{} {:?}", "Verbosity:".bold(), spec.verbosity);
    }
}
