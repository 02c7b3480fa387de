//! Dynamically loaded `libmathoku`.
//!
//! Symbols are resolved once when the library is opened. Every returned
//! string is copied into an owned `String` and released through the
//! library's own `mathoku_string_free`.

use std::ffi::OsString;
use std::path::Path;
use std::slice;

use libloading::Library;
use mathoku::ffi::{MathokuString, ABI_VERSION};

use crate::adapter::Responder;
use crate::error::BridgeError;

/// Artifact name of the native library, without `lib` prefix or extension.
pub const LIBRARY_NAME: &str = "mathoku";

type AbiVersionFn = unsafe extern "C" fn() -> u32;
type GreetFn = unsafe extern "C" fn(*const u8, usize) -> MathokuString;
type DummyUserJsonFn = unsafe extern "C" fn() -> MathokuString;
type LastErrorFn = unsafe extern "C" fn() -> MathokuString;
type StringFreeFn = unsafe extern "C" fn(MathokuString);

/// Platform file name for an artifact: `libmathoku.so`, `libmathoku.dylib`, `mathoku.dll`.
pub fn library_file_name(name: &str) -> OsString {
    libloading::library_filename(name)
}

pub struct NativeLibrary {
    abi_version: u32,
    greet: GreetFn,
    dummy_user_json: DummyUserJsonFn,
    last_error: LastErrorFn,
    string_free: StringFreeFn,
    // Owns the mapping the function pointers above point into.
    _library: Library,
}

impl NativeLibrary {
    /// Open the library at `path`, resolve its entry points and check the
    /// ABI version. Every failure here is a `LOAD_FAILURE`.
    pub fn open(path: &Path) -> Result<Self, BridgeError> {
        let library = unsafe { Library::new(path) }.map_err(|e| {
            BridgeError::load_failure(format!("failed to load {}: {e}", path.display()))
        })?;

        let abi_version: AbiVersionFn = unsafe { symbol(&library, "mathoku_abi_version", path)? };
        let greet: GreetFn = unsafe { symbol(&library, "mathoku_greet", path)? };
        let dummy_user_json: DummyUserJsonFn =
            unsafe { symbol(&library, "mathoku_get_dummy_user_json", path)? };
        let last_error: LastErrorFn = unsafe { symbol(&library, "mathoku_last_error", path)? };
        let string_free: StringFreeFn = unsafe { symbol(&library, "mathoku_string_free", path)? };

        let abi_version = unsafe { abi_version() };
        if abi_version != ABI_VERSION {
            return Err(BridgeError::load_failure(format!(
                "{} has ABI version {abi_version}, host expects {ABI_VERSION}",
                path.display()
            )));
        }

        Ok(Self {
            abi_version,
            greet,
            dummy_user_json,
            last_error,
            string_free,
            _library: library,
        })
    }

    /// Copy a library-owned string out and free it. Null means the call
    /// failed and the reason is in the thread's last error.
    fn take_string(&self, raw: MathokuString, operation: &str) -> Result<String, BridgeError> {
        self.copy_and_free(raw).ok_or_else(|| {
            BridgeError::call_failure(format!("{operation} failed: {}", self.last_error_message()))
        })
    }

    fn last_error_message(&self) -> String {
        let raw = unsafe { (self.last_error)() };
        self.copy_and_free(raw)
            .unwrap_or_else(|| "native call returned null".to_string())
    }

    fn copy_and_free(&self, raw: MathokuString) -> Option<String> {
        if raw.is_null() {
            return None;
        }
        let bytes = unsafe { slice::from_raw_parts(raw.ptr, raw.len) };
        let owned = String::from_utf8_lossy(bytes).into_owned();
        unsafe { (self.string_free)(raw) };
        Some(owned)
    }
}

impl Responder for NativeLibrary {
    fn abi_version(&self) -> u32 {
        self.abi_version
    }

    fn greet(&self, name: &str) -> Result<String, BridgeError> {
        let raw = unsafe { (self.greet)(name.as_ptr(), name.len()) };
        self.take_string(raw, "greet")
    }

    fn get_dummy_user_json(&self) -> Result<String, BridgeError> {
        let raw = unsafe { (self.dummy_user_json)() };
        self.take_string(raw, "getDummyUserJson")
    }
}

/// Resolve `name` and detach it from the `Symbol` borrow. The caller keeps
/// `library` alive for as long as the pointer is used.
unsafe fn symbol<T: Copy>(library: &Library, name: &str, path: &Path) -> Result<T, BridgeError> {
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }.map_err(|e| {
        BridgeError::load_failure(format!("missing symbol {name} in {}: {e}", path.display()))
    })?;
    Ok(*symbol)
}
