use std::{env, ffi::OsString, path::PathBuf};

use anyhow::{anyhow, Result};

const APP_DIR: &str = "wordtrack";

/// Directory for data that isn't part of the tracking file itself, like logs. It's not created
/// here.
pub fn state_dir() -> Result<PathBuf> {
    state_dir_from(|key| env::var_os(key))
}

fn state_dir_from(var: impl Fn(&str) -> Option<OsString>) -> Result<PathBuf> {
    let base = if cfg!(windows) {
        var("APPDATA")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("APPDATA should be present on Windows"))?
    } else {
        var("XDG_STATE_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".local/state")))
            .ok_or_else(|| anyhow!("Neither XDG_STATE_HOME nor HOME is set"))?
    };
    Ok(base.join(APP_DIR))
}
