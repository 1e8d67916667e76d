// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Wrapper scripts that run a virtualenv tool from outside the virtualenv.
//!
//! Templates use `%(activate_script)s` and `%(name)s` placeholders, with
//! `%%` for a literal percent sign.

use std::path::{Path, PathBuf};

use crate::Error;

#[cfg(test)]
#[path = "./expose_test.rs"]
mod expose_test;

/// Wrapper used when no template is given.
pub const DEFAULT_TEMPLATE: &str = "#!/bin/sh
# Generated by docent. Runs %(name)s from its virtualenv.
. '%(activate_script)s'
exec %(name)s \"$@\"";

const ACTIVATE_PLACEHOLDER: &str = "(activate_script)s";
const NAME_PLACEHOLDER: &str = "(name)s";

/// Read a wrapper template from disk.
pub fn load_template(path: &Path) -> crate::Result<String> {
    std::fs::read_to_string(path).map_err(|error| Error::TemplateNotFound {
        path: path.to_path_buf(),
        error,
    })
}

/// Fill in the placeholders of a wrapper template.
pub fn render_template(template: &str, activate_script: &str, name: &str) -> String {
    let mut rendered = String::with_capacity(template.len() + activate_script.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        rendered.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(tail) = after.strip_prefix('%') {
            rendered.push('%');
            rest = tail;
        } else if let Some(tail) = after.strip_prefix(ACTIVATE_PLACEHOLDER) {
            rendered.push_str(activate_script);
            rest = tail;
        } else if let Some(tail) = after.strip_prefix(NAME_PLACEHOLDER) {
            rendered.push_str(name);
            rest = tail;
        } else {
            rendered.push('%');
            rest = after;
        }
    }
    rendered.push_str(rest);
    rendered
}

/// Write an executable wrapper at `name` that activates `activation` and
/// runs the tool with the same file name.
///
/// Uses [`DEFAULT_TEMPLATE`] when no template is given. Returns the path
/// of the written wrapper.
pub fn expose_script(
    name: &Path,
    activation: &Path,
    template: Option<&str>,
) -> crate::Result<PathBuf> {
    let tool = name
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::InvalidArgument(format!("Cannot expose a script named {name:?}"))
        })?;

    // Wrappers are run from anywhere, so the activation path must not be relative
    let activation = dunce::canonicalize(activation).map_err(|error| Error::ReadFailed {
        path: activation.to_path_buf(),
        error,
    })?;

    let mut content = render_template(
        template.unwrap_or(DEFAULT_TEMPLATE),
        &activation.to_string_lossy(),
        tool,
    );
    content.push('\n');

    std::fs::write(name, content)?;
    set_executable(name)?;

    tracing::debug!(wrapper = %name.display(), activation = %activation.display(), "wrote wrapper");
    Ok(name.to_path_buf())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
