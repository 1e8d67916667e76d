// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `docent init` command.

use clap::Args;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

/// Create a starter spec file
#[derive(Debug, Args)]
pub struct CmdInit {
    /// Directory to create file in
    #[clap(default_value = ".")]
    path: PathBuf,

    /// Spec format: json or yaml
    #[clap(long, default_value = "json")]
    format: String,

    /// Add an initial requirement
    #[clap(short = 'i', long = "install", value_name = "REQUIREMENT")]
    requirements: Vec<String>,

    /// Add an initial script to expose
    #[clap(short = 'o', long = "expose", value_name = "SCRIPT")]
    scripts: Vec<String>,
}

impl CmdInit {
    pub async fn run(&mut self) -> Result<i32> {
        let (filename, content) = match self.format.as_str() {
            "yaml" => ("docent.yaml", self.generate_yaml_template()),
            "json" => (docent::DOCENT_SPEC_FILENAME, self.generate_json_template()?),
            other => {
                return Err(miette::miette!(
                    "Unknown spec format '{other}' (expected 'json' or 'yaml')"
                ));
            }
        };
        let spec_path = self.path.join(filename);

        // Check if file already exists
        if spec_path.exists() {
            return Err(miette::miette!("{filename} already exists at {:?}", spec_path));
        }

        std::fs::write(&spec_path, content)
            .map_err(|e| miette::miette!("Failed to write {filename}: {}", e))?;

        println!("Created {filename} at {:?}", spec_path);
        println!();
        println!("Next steps:");
        println!("  1. Edit the file to add your requirements and scripts");
        println!("  2. Run 'docent show -j {}' to preview the install", spec_path.display());
        println!("  3. Run 'docent -j {}' to install", spec_path.display());

        Ok(0)
    }

    fn generate_json_template(&self) -> Result<String> {
        let spec = serde_json::json!({
            "pip_install_list": self.requirements,
            "to_expose_list": self.scripts,
            "venv_dir": docent::DEFAULT_VENV_NAME,
            "template": null,
            "verbose": false,
            "venv_args": "",
        });
        let mut json = serde_json::to_string_pretty(&spec).into_diagnostic()?;
        json.push('\n');
        Ok(json)
    }

    fn generate_yaml_template(&self) -> String {
        let list = |items: &[String], example: &str| {
            if items.is_empty() {
                format!(" []\n#   - {example}\n")
            } else {
                format!(
                    "\n{}\n",
                    items
                        .iter()
                        .map(|i| format!("  - {}", i))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            }
        };

        format!(
            "# docent install specification\n\
            \n\
            # Packages to install, anything pip understands\n\
            pip_install_list:{}\
            \n\
            # Scripts to expose from the virtualenv (at least one)\n\
            to_expose_list:{}\
            \n\
            # Where the virtualenv should live, relative to this file\n\
            venv_dir: {}\n\
            \n\
            # Extra arguments for virtualenv\n\
            # venv_args: --python=python3\n\
            \n\
            # Alternate wrapper template, using %(activate_script)s and %(name)s\n\
            # template: wrapper.sh.in\n\
            \n\
            # Stream subprocess output\n\
            verbose: false\n",
            list(&self.requirements, "requests>=2"),
            list(&self.scripts, "bin/tool"),
            docent::DEFAULT_VENV_NAME,
        )
    }
}
