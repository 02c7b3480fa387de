use std::any::Any;

/// Failures inside the native library. Stringified before they cross the ABI.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("argument `{0}` is a null pointer")]
    NullArgument(&'static str),

    #[error("argument is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("native call panicked: {0}")]
    Panicked(String),
}

/// Extract the message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
