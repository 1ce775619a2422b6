use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::warn;

pub const CONFIG_FILE_NAME: &str = "installer.yaml";
pub const LOG_FILE_NAME: &str = "cat-wallpaper-installer.log";

#[cfg(windows)]
pub fn to_wstring(s: impl AsRef<std::ffi::OsStr>) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    s.as_ref()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Directory holding the running executable.
pub fn exe_dir() -> Option<PathBuf> {
    let exe_path = env::current_exe().ok()?;
    exe_path.parent().map(Path::to_path_buf)
}

pub fn config_path() -> PathBuf {
    exe_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

pub fn log_path() -> PathBuf {
    let temp = env::temp_dir();
    if temp.as_os_str().is_empty() {
        return PathBuf::from(LOG_FILE_NAME);
    }
    temp.join(LOG_FILE_NAME)
}

/// The machine-wide application data directory (`%ProgramData%` on Windows).
pub fn machine_app_data_dir() -> Option<PathBuf> {
    resolve_machine_app_data(|key| env::var_os(key))
}

fn resolve_machine_app_data(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    // Primary
    if let Some(dir) = lookup("ProgramData").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    // Older profiles expose only ALLUSERSPROFILE, which points at the same folder.
    if let Some(dir) = lookup("ALLUSERSPROFILE").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    if cfg!(windows) {
        if let Some(drive) = lookup("SystemDrive").filter(|v| !v.is_empty()) {
            let mut root = drive;
            root.push("\\ProgramData");
            return Some(PathBuf::from(root));
        }
    }

    warn!("Could not resolve the machine application data directory from ProgramData/ALLUSERSPROFILE");
    None
}
