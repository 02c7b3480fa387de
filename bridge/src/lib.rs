//! Host side of the Mathoku bridge.
//!
//! - [`adapter`] loads the native library once and wraps its entry points in
//!   typed calls that fail with [`BridgeError`].
//! - [`facade`] dispatches those calls off the caller's context and hands back
//!   a [`Promise`].
//! - [`registry`] is the table of operations the front-end invokes by name.

pub mod adapter;
pub mod config;
pub mod error;
pub mod facade;
pub mod guard;
pub mod native;
pub mod registry;

pub use adapter::{BridgeAdapter, LinkedResponder, Responder};
pub use config::{BridgeConfig, FacadeConfig};
pub use error::{BridgeError, ErrorKind};
pub use facade::{AsyncFacade, Promise};
pub use registry::{NativeModule, NativeModules, MODULE_NAME, OPERATIONS};
