//! C ABI exported by `libmathoku`.
//!
//! Strings cross the boundary as UTF-8 bytes plus a length, so any text
//! (including text with NUL characters) survives the trip. Every
//! [`MathokuString`] returned here is allocated by this library and must be
//! handed back to [`mathoku_string_free`]. A null return means the call
//! failed; the reason is available from [`mathoku_last_error`] on the same
//! thread. Panics never unwind across the boundary.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::{ptr, slice, str};

use crate::api::simple::greet;
use crate::api::user::get_dummy_user_json;
use crate::error::{panic_message, CoreError};

/// Bumped whenever an exported signature changes. Hosts refuse to load a
/// library whose version differs from the one they were built against.
pub const ABI_VERSION: u32 = 2;

/// UTF-8 bytes owned by this library. A null `ptr` means "no string".
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MathokuString {
    pub ptr: *mut u8,
    pub len: usize,
}

impl MathokuString {
    pub const fn null() -> Self {
        Self {
            ptr: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    fn from_string(s: String) -> Self {
        let bytes = s.into_bytes().into_boxed_slice();
        let len = bytes.len();
        Self {
            ptr: Box::into_raw(bytes).cast(),
            len,
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn set_last_error(message: Option<String>) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

/// Run `body` behind the boundary: clear the last error, catch panics, and
/// turn the outcome into an owned string or null.
fn respond<F>(body: F) -> MathokuString
where
    F: FnOnce() -> Result<String, CoreError>,
{
    set_last_error(None);

    let outcome = panic::catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(CoreError::Panicked(panic_message(&*payload))));

    match outcome {
        Ok(response) => MathokuString::from_string(response),
        Err(e) => {
            set_last_error(Some(e.to_string()));
            MathokuString::null()
        }
    }
}

#[no_mangle]
pub extern "C" fn mathoku_abi_version() -> u32 {
    ABI_VERSION
}

/// Greet the `len` UTF-8 bytes at `name`.
///
/// # Safety
///
/// `name` must be null or point to `len` readable bytes that stay valid for
/// the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn mathoku_greet(name: *const u8, len: usize) -> MathokuString {
    respond(|| {
        if name.is_null() {
            return Err(CoreError::NullArgument("name"));
        }
        let bytes = unsafe { slice::from_raw_parts(name, len) };
        Ok(greet(str::from_utf8(bytes)?))
    })
}

#[no_mangle]
pub extern "C" fn mathoku_get_dummy_user_json() -> MathokuString {
    respond(get_dummy_user_json)
}

/// Message of the last failed call on the calling thread, or null if the
/// last call succeeded. The caller owns the returned string.
#[no_mangle]
pub extern "C" fn mathoku_last_error() -> MathokuString {
    LAST_ERROR
        .with(|slot| slot.borrow().clone())
        .map_or_else(MathokuString::null, MathokuString::from_string)
}

/// Release a string returned by this library. Null is ignored.
///
/// # Safety
///
/// `s` must be null or a value previously returned by this library, passed
/// back unchanged and not freed yet.
#[no_mangle]
pub unsafe extern "C" fn mathoku_string_free(s: MathokuString) {
    if !s.is_null() {
        drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(s.ptr, s.len)) });
    }
}
