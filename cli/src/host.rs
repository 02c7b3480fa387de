//! Stands in for the app's host process: builds the adapter, the facade and
//! the module registry from the console options.

use std::path::PathBuf;
use std::time::Duration;

use mathoku_bridge::{
    AsyncFacade, BridgeAdapter, BridgeConfig, FacadeConfig, NativeModule, NativeModules,
};
use tokio::runtime::Handle;

pub struct HostOptions {
    pub library_dir: PathBuf,
    pub linked: bool,
    pub call_timeout: Option<Duration>,
}

impl HostOptions {
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig::new(&self.library_dir)
    }

    pub fn adapter(&self) -> BridgeAdapter {
        if self.linked {
            BridgeAdapter::linked()
        } else {
            BridgeAdapter::process_wide(&self.bridge_config())
        }
    }

    pub fn facade(&self) -> AsyncFacade {
        let config = FacadeConfig {
            call_timeout: self.call_timeout,
        };
        AsyncFacade::new(self.adapter(), Handle::current(), config)
    }

    pub fn modules(&self) -> NativeModules {
        let mut modules = NativeModules::new();
        modules.register(NativeModule::new(self.facade()));
        modules
    }
}
