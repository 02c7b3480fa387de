#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mathoku_bridge::{BridgeAdapter, BridgeError, Responder};

/// Answers like the real library after sleeping `delay` on every call.
pub struct SlowResponder {
    pub delay: Duration,
}

impl Responder for SlowResponder {
    fn greet(&self, name: &str) -> Result<String, BridgeError> {
        thread::sleep(self.delay);
        Ok(mathoku::greet(name))
    }

    fn get_dummy_user_json(&self) -> Result<String, BridgeError> {
        thread::sleep(self.delay);
        mathoku::get_dummy_user_json().map_err(|e| BridgeError::call_failure(e.to_string()))
    }
}

/// Panics inside every call, like a native abort surfacing in the binding.
pub struct PanickingResponder;

impl Responder for PanickingResponder {
    fn greet(&self, _name: &str) -> Result<String, BridgeError> {
        panic!("native greet aborted")
    }

    fn get_dummy_user_json(&self) -> Result<String, BridgeError> {
        panic!("native getDummyUserJson aborted")
    }
}

/// Fails greet for names starting with `!`, succeeds otherwise.
pub struct PickyResponder;

impl Responder for PickyResponder {
    fn greet(&self, name: &str) -> Result<String, BridgeError> {
        if name.starts_with('!') {
            Err(BridgeError::call_failure(format!("refusing {name}")))
        } else {
            Ok(mathoku::greet(name))
        }
    }

    fn get_dummy_user_json(&self) -> Result<String, BridgeError> {
        mathoku::get_dummy_user_json().map_err(|e| BridgeError::call_failure(e.to_string()))
    }
}

pub fn slow_adapter(delay: Duration) -> BridgeAdapter {
    BridgeAdapter::new(move || Ok(Box::new(SlowResponder { delay }) as Box<dyn Responder>))
}

/// Adapter whose loader always fails, counting how often it is asked.
pub fn failing_adapter(loads: Arc<AtomicUsize>) -> BridgeAdapter {
    BridgeAdapter::new(move || {
        loads.fetch_add(1, Ordering::SeqCst);
        Err(BridgeError::load_failure("libmathoku.so: cannot open shared object file"))
    })
}
