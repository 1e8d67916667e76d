// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::lock::{verify_lock, LockFile};
use crate::test_utils::RecordingShell;

#[fixture]
fn workdir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("bin")).unwrap();
    tmp
}

fn make_spec(tmp: &TempDir, requirements: &[&str], scripts: &[&str]) -> InstallSpec {
    InstallSpec {
        pip_install_list: requirements.iter().map(|r| r.to_string()).collect(),
        to_expose_list: scripts
            .iter()
            .map(|s| tmp.path().join("bin").join(s).display().to_string())
            .collect(),
        venv_dir: tmp.path().join("venv"),
        ..Default::default()
    }
}

#[rstest]
#[tokio::test]
async fn test_nothing_to_expose(workdir: TempDir) {
    let spec = make_spec(&workdir, &["black"], &[]);
    let shell = RecordingShell::default();

    let result = install(&spec, &shell, &InstallOptions::default()).await;

    assert!(matches!(result, Err(crate::Error::NothingToExpose)));
    assert!(shell.commands().is_empty(), "nothing should run");
}

#[rstest]
#[tokio::test]
async fn test_fresh_install(workdir: TempDir) {
    let spec = make_spec(&workdir, &["black", "", "isort==5.13"], &["black", "isort"]);
    let shell = RecordingShell::default();

    let report = install(&spec, &shell, &InstallOptions::default())
        .await
        .expect("Should install");

    assert!(report.provisioned);
    assert_eq!(report.activation, spec.venv_dir.join("bin").join("activate"));
    assert_eq!(report.installed, vec!["black", "isort==5.13"]);
    assert_eq!(report.exposed.len(), 2);

    let commands = shell.commands();
    assert_eq!(commands.len(), 3);
    assert!(commands[0].starts_with("virtualenv "));
    assert!(commands[1].ends_with("pip install 'black'"));
    assert!(commands[2].ends_with("pip install 'isort==5.13'"));

    for wrapper in &report.exposed {
        assert!(wrapper.is_file(), "{} should exist", wrapper.display());
    }

    let lock = LockFile::load(&spec.venv_dir.join(crate::LOCK_FILENAME)).unwrap();
    assert_eq!(lock.requirements, vec!["black", "isort==5.13"]);
    assert_eq!(lock.scripts.len(), 2);
    assert!(verify_lock(&lock).unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_existing_virtualenv_is_reused(workdir: TempDir) {
    let spec = make_spec(&workdir, &["black"], &["black"]);
    let bin = spec.venv_dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("activate"), "").unwrap();
    let shell = RecordingShell::default();

    let report = install(&spec, &shell, &InstallOptions::default())
        .await
        .unwrap();

    assert!(!report.provisioned);
    let commands = shell.commands();
    assert_eq!(commands.len(), 1);
    assert!(commands[0].contains("pip install"));
}

#[rstest]
#[tokio::test]
async fn test_custom_virtualenv_tool_and_args(workdir: TempDir) {
    let mut spec = make_spec(&workdir, &[], &["tool"]);
    spec.venv_args = "--clear".to_string();
    let shell = RecordingShell::default();
    let options = InstallOptions {
        virtualenv: "python3 -m venv".to_string(),
        write_lock: false,
    };

    install(&spec, &shell, &options).await.unwrap();

    assert_eq!(
        shell.commands(),
        vec![format!(
            "python3 -m venv --clear '{}'",
            spec.venv_dir.display()
        )]
    );
    assert!(!spec.venv_dir.join(crate::LOCK_FILENAME).exists());
}

#[rstest]
#[tokio::test]
async fn test_missing_template_runs_nothing(workdir: TempDir) {
    let mut spec = make_spec(&workdir, &["black"], &["black"]);
    spec.template = Some(workdir.path().join("missing.in"));
    let shell = RecordingShell::default();

    let result = install(&spec, &shell, &InstallOptions::default()).await;

    assert!(matches!(result, Err(crate::Error::TemplateNotFound { .. })));
    assert!(shell.commands().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_custom_template(workdir: TempDir) {
    let template = workdir.path().join("wrapper.in");
    std::fs::write(&template, "#!/bin/sh\n# wraps %(name)s").unwrap();
    let mut spec = make_spec(&workdir, &[], &["tool"]);
    spec.template = Some(template);
    let shell = RecordingShell::default();

    let report = install(&spec, &shell, &InstallOptions::default())
        .await
        .unwrap();

    let content = std::fs::read_to_string(&report.exposed[0]).unwrap();
    assert_eq!(content, "#!/bin/sh\n# wraps tool\n");
}

#[rstest]
#[tokio::test]
async fn test_failed_requirement_stops_install(workdir: TempDir) {
    let spec = make_spec(&workdir, &["good", "bad", "never"], &["tool"]);
    let shell = RecordingShell::failing_on("'bad'");

    let result = install(&spec, &shell, &InstallOptions::default()).await;

    assert!(matches!(result, Err(crate::Error::CommandFailed { .. })));
    let commands = shell.commands();
    assert_eq!(commands.len(), 3, "virtualenv, good, then bad");
    assert!(!workdir.path().join("bin").join("tool").exists());
    assert!(!spec.venv_dir.join(crate::LOCK_FILENAME).exists());
}
