use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the workspace directory
pub const WORKSPACE_DIR_ENV: &str = "BRAG_DIR";

/// Get the workspace directory holding the data files
///
/// Resolution order: explicit `--dir`, then `BRAG_DIR`, then the current directory.
pub fn get_workspace_dir(dir_flag: Option<&Path>) -> Result<PathBuf> {
    resolve_workspace_dir(dir_flag, env::var_os(WORKSPACE_DIR_ENV))
}

fn resolve_workspace_dir(dir_flag: Option<&Path>, env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = dir_flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return Ok(PathBuf::from(value));
    }
    env::current_dir().context("Failed to determine current directory")
}
