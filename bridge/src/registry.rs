//! Native module table: what the front-end can invoke by name.
//!
//! Operations are declared statically with plain `fn` handlers, so the call
//! surface is checked at compile time. Lookup by name only happens at the
//! edge, for hosts that dispatch from strings (the dev console daemon, a JS
//! bridge).

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::BridgeError;
use crate::facade::{AsyncFacade, Promise};

/// Name the Mathoku module is registered under.
pub const MODULE_NAME: &str = "MathokuNative";

type Handler = fn(&AsyncFacade, &[Value]) -> Promise<String>;

pub struct Operation {
    pub name: &'static str,
    pub arity: usize,
    handler: Handler,
}

pub static OPERATIONS: &[Operation] = &[
    Operation {
        name: "greet",
        arity: 1,
        handler: greet,
    },
    Operation {
        name: "getDummyUserJson",
        arity: 0,
        handler: get_dummy_user_json,
    },
];

fn greet(facade: &AsyncFacade, args: &[Value]) -> Promise<String> {
    match args.first().and_then(Value::as_str) {
        Some(name) => facade.greet(name),
        None => Promise::settled(
            "greet",
            facade.scope().clone(),
            Err(BridgeError::call_failure("greet expects a string argument")),
        ),
    }
}

fn get_dummy_user_json(facade: &AsyncFacade, _args: &[Value]) -> Promise<String> {
    facade.get_dummy_user_json()
}

/// A module as the host sees it: a name plus the facade its operations run on.
pub struct NativeModule {
    name: &'static str,
    facade: AsyncFacade,
}

impl NativeModule {
    pub fn new(facade: AsyncFacade) -> Self {
        Self {
            name: MODULE_NAME,
            facade,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn facade(&self) -> &AsyncFacade {
        &self.facade
    }

    pub fn operations(&self) -> Vec<&'static str> {
        OPERATIONS.iter().map(|op| op.name).collect()
    }

    /// Invoke `method` by name. Unknown methods and argument mismatches come
    /// back as an already rejected promise.
    pub fn invoke(&self, method: &str, args: &[Value]) -> Promise<String> {
        let Some(operation) = OPERATIONS.iter().find(|op| op.name == method) else {
            return self.reject(format!("{} has no method named `{method}`", self.name));
        };
        if args.len() != operation.arity {
            return Promise::settled(
                operation.name,
                self.facade.scope().clone(),
                Err(BridgeError::call_failure(format!(
                    "{} expects {} argument(s), got {}",
                    operation.name,
                    operation.arity,
                    args.len()
                ))),
            );
        }
        (operation.handler)(&self.facade, args)
    }

    pub fn teardown(&self) {
        self.facade.teardown();
    }

    fn reject(&self, message: String) -> Promise<String> {
        Promise::settled(
            "invoke",
            self.facade.scope().clone(),
            Err(BridgeError::call_failure(message)),
        )
    }
}

/// Modules linked into the host, looked up by name.
#[derive(Default)]
pub struct NativeModules {
    modules: HashMap<&'static str, Arc<NativeModule>>,
}

impl NativeModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: NativeModule) -> Arc<NativeModule> {
        let module = Arc::new(module);
        self.modules.insert(module.name(), Arc::clone(&module));
        module
    }

    /// Look up a module. Missing modules fail immediately with `NOT_LINKED`.
    pub fn get(&self, name: &str) -> Result<Arc<NativeModule>, BridgeError> {
        self.modules.get(name).cloned().ok_or_else(|| {
            BridgeError::not_linked(format!(
                "{name} module is not linked. Did you register it with the host?"
            ))
        })
    }

    pub fn teardown_all(&self) {
        for module in self.modules.values() {
            module.teardown();
        }
    }
}
