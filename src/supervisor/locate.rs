use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::RenderError;
use crate::config::{SERVER_BIN_ENV, SERVER_BIN_NAME};

const LOG_TARGET: &str = "supervisor::locate";

/// Find the rendering process binary: the configured path, then
/// `$TABLE_VIEWER_SERVER_BIN`, then next to the running executable.
pub fn resolve_server_binary(explicit: Option<&Path>) -> Result<PathBuf, RenderError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(SERVER_BIN_ENV) {
        return Ok(PathBuf::from(path));
    }

    let exe = env::current_exe()?;
    let candidates = sibling_candidates(&exe);
    debug!(target = LOG_TARGET, exe = %exe.display(), ?candidates, "searching for server binary");
    candidates
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            RenderError::initialization(format!(
                "could not find {SERVER_BIN_NAME} next to {}; set {SERVER_BIN_ENV}",
                exe.display()
            ))
        })
}

/// Test and bench executables live in `target/<profile>/deps`, one level
/// below the binaries.
fn sibling_candidates(exe: &Path) -> Vec<PathBuf> {
    let file_name = format!("{SERVER_BIN_NAME}{}", env::consts::EXE_SUFFIX);
    let Some(dir) = exe.parent() else {
        return Vec::new();
    };
    let mut candidates = vec![dir.join(&file_name)];
    if dir.file_name().is_some_and(|name| name == "deps") {
        if let Some(profile_dir) = dir.parent() {
            candidates.push(profile_dir.join(&file_name));
        }
    }
    candidates
}
