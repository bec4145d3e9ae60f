//! Shell scripts standing in for spotdl, scdl and yt-dlp.

use std::path::{Path, PathBuf};

/// Writes an executable `sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool");
    let mut permissions = std::fs::metadata(&path).expect("stat fake tool").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).expect("chmod fake tool");
    path
}

/// Script that appends its arguments to `log` and exits with `code`.
#[cfg(unix)]
pub fn recording_script(dir: &Path, name: &str, log: &Path, code: i32) -> PathBuf {
    write_script(
        dir,
        name,
        &format!("echo \"{name} $*\" >> '{}'\nexit {code}", log.display()),
    )
}
