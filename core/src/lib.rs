//! Mathoku native responder.
//!
//! Two pure entry points, [`greet`] and [`get_dummy_user_json`], exported to
//! hosts through the C ABI in [`ffi`] (and through JNI with the `android`
//! feature). Nothing here holds state or touches I/O.

pub mod api;
pub mod error;
pub mod ffi;
pub mod models;

#[cfg(feature = "android")]
mod jni_bridge;

pub use api::simple::greet;
pub use api::user::{dummy_user, get_dummy_user_json};
pub use error::CoreError;
