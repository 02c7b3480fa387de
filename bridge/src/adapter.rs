//! Bridge adapter: owns the one-time library load and exposes typed calls.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock};

use mathoku::error::panic_message;
use mathoku::ffi::ABI_VERSION;
use tracing::{info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::guard::LoadGuard;
use crate::native::NativeLibrary;

/// The native call surface, as seen from the host.
pub trait Responder: Send + Sync {
    /// ABI version of the code answering calls. Anything compiled into the
    /// host shares the host's version.
    fn abi_version(&self) -> u32 {
        ABI_VERSION
    }

    fn greet(&self, name: &str) -> Result<String, BridgeError>;
    fn get_dummy_user_json(&self) -> Result<String, BridgeError>;
}

/// Calls `mathoku-core` linked into the host process. Used by static builds
/// and whenever no shared library is deployed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedResponder;

impl Responder for LinkedResponder {
    fn greet(&self, name: &str) -> Result<String, BridgeError> {
        Ok(mathoku::greet(name))
    }

    fn get_dummy_user_json(&self) -> Result<String, BridgeError> {
        mathoku::get_dummy_user_json()
            .map_err(|e| BridgeError::call_failure(format!("getDummyUserJson failed: {e}")))
    }
}

/// A panic inside a responder is the host-side view of a native abort.
fn catch_call<F>(operation: &str, call: F) -> Result<String, BridgeError>
where
    F: FnOnce() -> Result<String, BridgeError>,
{
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        Err(BridgeError::call_failure(format!(
            "{operation} panicked: {}",
            panic_message(&*payload)
        )))
    })
}

type SharedResponder = Arc<Box<dyn Responder>>;
type Loader = Arc<dyn Fn() -> Result<Box<dyn Responder>, BridgeError> + Send + Sync>;

/// One guard for the whole process: a shared library is loaded at most once,
/// whichever adapter asks first.
static PROCESS_LIBRARY: LazyLock<Arc<LoadGuard<Box<dyn Responder>>>> =
    LazyLock::new(|| Arc::new(LoadGuard::new()));

/// Typed call wrappers over a lazily loaded [`Responder`].
///
/// The first call triggers the load. A failed load is returned to that caller
/// and every later caller sharing the same guard.
#[derive(Clone)]
pub struct BridgeAdapter {
    guard: Arc<LoadGuard<Box<dyn Responder>>>,
    loader: Loader,
}

impl BridgeAdapter {
    /// Adapter with its own private load guard.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Responder>, BridgeError> + Send + Sync + 'static,
    {
        Self {
            guard: Arc::new(LoadGuard::new()),
            loader: Arc::new(loader),
        }
    }

    /// Adapter over the process-wide guard, loading the shared library
    /// described by `config`. If another process-wide adapter already loaded
    /// (or failed to load), that outcome wins and `config` is ignored.
    pub fn process_wide(config: &BridgeConfig) -> Self {
        Self {
            guard: Arc::clone(&PROCESS_LIBRARY),
            loader: dynamic_loader(config),
        }
    }

    /// Adapter loading the shared library described by `config` behind a
    /// private guard.
    pub fn dynamic(config: &BridgeConfig) -> Self {
        Self {
            guard: Arc::new(LoadGuard::new()),
            loader: dynamic_loader(config),
        }
    }

    /// Adapter over the statically linked responder.
    pub fn linked() -> Self {
        Self::new(|| Ok(Box::new(LinkedResponder) as Box<dyn Responder>))
    }

    /// Load the library now instead of on the first call.
    pub fn ensure_loaded(&self) -> Result<(), BridgeError> {
        self.responder().map(|_| ())
    }

    /// ABI version reported by the loaded responder. Loads on first use.
    pub fn abi_version(&self) -> Result<u32, BridgeError> {
        Ok(self.responder()?.abi_version())
    }

    pub fn greet(&self, name: &str) -> Result<String, BridgeError> {
        let responder = self.responder()?;
        catch_call("greet", || responder.greet(name))
    }

    pub fn get_dummy_user_json(&self) -> Result<String, BridgeError> {
        let responder = self.responder()?;
        catch_call("getDummyUserJson", || responder.get_dummy_user_json())
    }

    pub fn load_attempts(&self) -> usize {
        self.guard.attempts()
    }

    pub fn is_loaded(&self) -> bool {
        self.guard.is_loaded()
    }

    fn responder(&self) -> Result<SharedResponder, BridgeError> {
        self.guard.get_or_load(|| {
            let loaded = (self.loader)();
            match &loaded {
                Ok(_) => info!("native responder loaded"),
                Err(e) => warn!(code = e.code(), "native responder failed to load: {}", e.message),
            }
            loaded
        })
    }
}

impl fmt::Debug for BridgeAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeAdapter")
            .field("loaded", &self.guard.is_loaded())
            .field("load_attempts", &self.guard.attempts())
            .finish()
    }
}

fn dynamic_loader(config: &BridgeConfig) -> Loader {
    let path = config.library_path();
    Arc::new(move || {
        info!(path = %path.display(), "loading native library");
        let library = NativeLibrary::open(&path)?;
        Ok(Box::new(library) as Box<dyn Responder>)
    })
}
