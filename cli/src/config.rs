use std::path::{Path, PathBuf};
use std::time::Duration;

use mathoku_bridge::native::{library_file_name, LIBRARY_NAME};

/// Matches the bridge's default per-call timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Resolve the library directory: explicit flag/env first, then the
/// directory of the running executable if the library sits next to it, then
/// ~/.mathoku/lib.
pub fn library_dir(custom: Option<&str>) -> PathBuf {
    if let Some(d) = custom {
        return PathBuf::from(d);
    }
    if let Some(dir) = exe_dir().filter(|dir| holds_library(dir)) {
        return dir;
    }
    default_library_dir()
}

pub fn default_library_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mathoku")
        .join("lib")
}

/// `0` disables the timeout.
pub fn call_timeout(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

fn holds_library(dir: &Path) -> bool {
    dir.join(library_file_name(LIBRARY_NAME)).is_file()
}
