// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::test_utils::RecordingShell;

#[rstest]
#[tokio::test]
async fn test_provision_environment_runs_tool() {
    let tmp = TempDir::new().unwrap();
    let venv = tmp.path().join("venv");
    let shell = RecordingShell::default();

    assert!(!is_provisioned(&venv));
    let activation = provision_environment(&shell, &venv, "", "virtualenv")
        .await
        .expect("Should provision");

    assert_eq!(activation, venv.join("bin").join("activate"));
    assert!(is_provisioned(&venv));
    assert_eq!(
        shell.commands(),
        vec![format!("virtualenv '{}'", venv.display())]
    );
}

#[rstest]
#[tokio::test]
async fn test_provision_environment_passes_args() {
    let tmp = TempDir::new().unwrap();
    let venv = tmp.path().join("venv");
    let shell = RecordingShell::default();

    provision_environment(&shell, &venv, "--python=python3 --clear", "virtualenv")
        .await
        .unwrap();

    assert_eq!(
        shell.commands(),
        vec![format!(
            "virtualenv --python=python3 --clear '{}'",
            venv.display()
        )]
    );
}

#[rstest]
#[tokio::test]
async fn test_install_package_quotes_requirement() {
    let shell = RecordingShell::default();
    install_package(&shell, Path::new("/envs/a/bin/activate"), "numpy>=1.26")
        .await
        .unwrap();

    assert_eq!(
        shell.commands(),
        vec![". '/envs/a/bin/activate' && pip install 'numpy>=1.26'".to_string()]
    );
}

#[rstest]
#[tokio::test]
async fn test_failed_command_propagates() {
    let shell = RecordingShell::failing_on("pip install");
    let result = install_package(&shell, Path::new("/envs/a/bin/activate"), "missing").await;

    assert!(matches!(
        result,
        Err(crate::Error::CommandFailed { code: Some(1), .. })
    ));
}

#[rstest]
#[case("plain", "'plain'")]
#[case("with space", "'with space'")]
#[case("it's", "'it'\\''s'")]
#[case("", "''")]
fn test_quote(#[case] value: &str, #[case] expected: &str) {
    assert_eq!(quote(value), expected);
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn test_system_shell_exit_status() {
    let shell = SystemShell::new(Verbosity::Quiet);
    shell.run("true").await.expect("true should succeed");

    match shell.run("exit 3").await {
        Err(crate::Error::CommandFailed { command, code }) => {
            assert_eq!(command, "exit 3");
            assert_eq!(code, Some(3));
        }
        other => panic!("Expected CommandFailed, got: {:?}", other),
    }
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn test_system_shell_runs_in_sh() {
    let tmp = TempDir::new().unwrap();
    let marker = tmp.path().join("marker");
    let shell = SystemShell::default();

    shell
        .run(&format!("echo hello > {}", quote(&marker.to_string_lossy())))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "hello\n");
}
