use std::path::PathBuf;
use std::time::Duration;

use crate::native::{library_file_name, LIBRARY_NAME};

/// Default per-call timeout applied by the async facade.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the native library lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub library_dir: PathBuf,
    /// Artifact name without `lib` prefix or extension.
    pub library_name: String,
}

impl BridgeConfig {
    pub fn new(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
            library_name: LIBRARY_NAME.to_string(),
        }
    }

    /// Full platform-specific path, e.g. `<dir>/libmathoku.so`.
    pub fn library_path(&self) -> PathBuf {
        self.library_dir.join(library_file_name(&self.library_name))
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeConfig {
    /// `None` waits for the native call indefinitely.
    pub call_timeout: Option<Duration>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            call_timeout: Some(DEFAULT_CALL_TIMEOUT),
        }
    }
}
