// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! docent - Virtualenv Script Exposure CLI

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docent::{CliOptions, InstallSpec, SpecFile, Verbosity};
use miette::Result;

mod cmd_check;
mod cmd_init;
mod cmd_install;
mod cmd_show;

use cmd_check::CmdCheck;
use cmd_init::CmdInit;
use cmd_install::CmdInstall;
use cmd_show::CmdShow;

const LONG_ABOUT: &str = "\
This command performs the following steps:

  1. Installs a virtual environment (with `virtualenv`)
  2. Installs a list of python packages into the virtualenv
  3. Exposes a list of scripts by creating wrapper scripts
     named as the scripts to be exposed.

This solves the problem of having two python scripts on the same
machine that need different versions of the same python package.

Options can either be set on the command line via flags or sent
wholesale in a json spec, with -j or on stdin. Flags given on the
command line take precedence over the spec.";

#[derive(Parser)]
#[clap(
    name = "docent",
    about = "Install python scripts into a virtualenv, then expose them outside of it",
    version,
    long_about = LONG_ABOUT,
    args_conflicts_with_subcommands = true
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(flatten)]
    install: CmdInstall,

    #[clap(subcommand)]
    cmd: Option<Command>,
}

#[derive(Parser)]
struct Logging {
    /// Be verbose, show subprocess output (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Be quiet
    #[clap(short, long, global = true)]
    quiet: bool,
}

impl Logging {
    /// Install the log subscriber for a resolved verbosity.
    ///
    /// Extra `-v` flags beyond the first raise the level to trace.
    fn configure(&self, verbosity: Verbosity) {
        let log_level = match (verbosity, self.verbose) {
            (Verbosity::Verbose, 2..) => tracing::Level::TRACE,
            (verbosity, _) => verbosity.log_level(),
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .init();
    }

    /// Verbosity requested on the command line, if any.
    fn verbosity(&self) -> Option<Verbosity> {
        match (self.quiet, self.verbose) {
            (true, _) => Some(Verbosity::Quiet),
            (false, 0) => None,
            (false, _) => Some(Verbosity::Verbose),
        }
    }
}

/// Install options shared by every command that reads a spec.
#[derive(Args, Clone, Debug, Default)]
pub struct SpecFlags {
    /// Specify a package to install. Understands whatever pip understands
    #[clap(short = 'i', long = "install", value_name = "REQUIREMENT")]
    pub pip_install_list: Vec<String>,

    /// Expose this script from the virtualenv
    #[clap(short = 'o', long = "expose", value_name = "SCRIPT")]
    pub to_expose_list: Vec<String>,

    /// Specify where the virtualenv should live
    #[clap(
        short = 'e',
        long = "virtualenv-dir",
        alias = "virtualenv_dir",
        env = "DOCENT_VENV_DIR"
    )]
    pub venv_dir: Option<PathBuf>,

    /// Specify alternate wrapper shell script template
    #[clap(short = 't', long, env = "DOCENT_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Specify extra arguments to virtualenv
    #[clap(
        short = 'a',
        long = "virtualenv-args",
        alias = "virtualenv_args",
        env = "DOCENT_VENV_ARGS",
        allow_hyphen_values = true
    )]
    pub venv_args: Option<String>,

    /// Interpret json-formatted spec file, '-' for stdin (overridden by cli flags)
    #[clap(short = 'j', long = "jsonspec", value_name = "PATH")]
    pub jsonspec: Option<PathBuf>,
}

impl SpecFlags {
    /// Load the spec file from -j, or from stdin when it isn't a terminal.
    pub fn load_spec_file(&self) -> Result<Option<SpecFile>> {
        match &self.jsonspec {
            Some(path) if path.as_os_str() == "-" => Ok(SpecFile::from_reader(std::io::stdin())?),
            Some(path) => Ok(Some(SpecFile::load(path)?)),
            None if std::io::stdin().is_terminal() => Ok(None),
            None => Ok(SpecFile::from_reader(std::io::stdin())?),
        }
    }

    /// Compose these flags with the spec file into install options.
    pub fn compose(&self, verbosity: Option<Verbosity>) -> Result<InstallSpec> {
        let file = self.load_spec_file()?;
        let cli = CliOptions {
            pip_install_list: self.pip_install_list.clone(),
            to_expose_list: self.to_expose_list.clone(),
            venv_dir: self.venv_dir.clone(),
            template: self.template.clone(),
            verbosity,
            venv_args: self.venv_args.clone(),
        };
        Ok(docent::compose_spec(&cli, file.as_ref())?)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved install options without installing anything
    Show(CmdShow),

    /// Create a starter spec file
    Init(CmdInit),

    /// Verify exposed scripts match the lock file of a virtualenv
    Check(CmdCheck),
}

impl Opt {
    async fn run(self) -> Result<i32> {
        let verbosity = self.logging.verbosity();

        // Commands that read a spec log at the verbosity it resolves to
        match self.cmd {
            None => {
                let mut cmd = self.install;
                let spec = cmd.spec.compose(verbosity)?;
                self.logging.configure(spec.verbosity);
                cmd.run(spec).await
            }
            Some(Command::Show(mut cmd)) => {
                let spec = cmd.spec.compose(verbosity)?;
                self.logging.configure(spec.verbosity);
                cmd.run(spec).await
            }
            Some(Command::Init(mut cmd)) => {
                self.logging.configure(verbosity.unwrap_or_default());
                cmd.run().await
            }
            Some(Command::Check(mut cmd)) => {
                self.logging.configure(verbosity.unwrap_or_default());
                cmd.run().await
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run().await?;
    std::process::exit(code);
}
