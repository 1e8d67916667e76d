// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

/// A temp dir holding a fake `venv/bin/activate`.
#[fixture]
fn venv() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("venv").join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let activation = bin.join("activate");
    std::fs::write(&activation, "# activate\n").unwrap();
    (tmp, activation)
}

#[rstest]
#[case("%(name)s", "tool")]
#[case(". %(activate_script)s", ". /env/bin/activate")]
#[case("100%% sure", "100% sure")]
#[case("%(unknown)s %", "%(unknown)s %")]
#[case("%(name)s%(name)s", "tooltool")]
#[case("%%(name)s", "%(name)s")]
#[case("no placeholders", "no placeholders")]
fn test_render_template(#[case] template: &str, #[case] expected: &str) {
    assert_eq!(render_template(template, "/env/bin/activate", "tool"), expected);
}

#[rstest]
fn test_expose_with_default_template(venv: (TempDir, PathBuf)) {
    let (tmp, activation) = venv;
    let name = tmp.path().join("black");

    let written = expose_script(&name, &activation, None).expect("Should expose");
    assert_eq!(written, name);

    let content = std::fs::read_to_string(&name).unwrap();
    let activation = dunce::canonicalize(&activation).unwrap();
    assert!(content.starts_with("#!/bin/sh\n"));
    assert!(content.contains(&format!(". '{}'", activation.display())));
    assert!(content.contains("exec black \"$@\""));
    assert!(content.ends_with('\n'));
}

#[rstest]
fn test_expose_with_custom_template(venv: (TempDir, PathBuf)) {
    let (tmp, activation) = venv;
    let name = tmp.path().join("tool");

    expose_script(&name, &activation, Some("#!/bin/bash\n# %(name)s")).unwrap();

    let content = std::fs::read_to_string(&name).unwrap();
    assert_eq!(content, "#!/bin/bash\n# tool\n");
}

#[cfg(unix)]
#[rstest]
fn test_exposed_script_is_executable(venv: (TempDir, PathBuf)) {
    use std::os::unix::fs::PermissionsExt;

    let (tmp, activation) = venv;
    let name = tmp.path().join("tool");
    expose_script(&name, &activation, None).unwrap();

    let mode = std::fs::metadata(&name).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[rstest]
fn test_expose_requires_activation(venv: (TempDir, PathBuf)) {
    let (tmp, _) = venv;
    let result = expose_script(&tmp.path().join("tool"), &tmp.path().join("nope"), None);
    assert!(matches!(result, Err(Error::ReadFailed { .. })));
}

#[rstest]
fn test_load_template(venv: (TempDir, PathBuf)) {
    let (tmp, _) = venv;
    let path = tmp.path().join("wrapper.in");
    std::fs::write(&path, "exec %(name)s").unwrap();

    assert_eq!(load_template(&path).unwrap(), "exec %(name)s");
    assert!(matches!(
        load_template(&tmp.path().join("missing.in")),
        Err(Error::TemplateNotFound { .. })
    ));
}
