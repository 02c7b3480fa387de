//! Calls through the real `libmathoku` that cargo builds next to this test
//! binary. Kept in its own binary so the process-wide guard starts fresh.

use std::path::PathBuf;

use mathoku::ffi::ABI_VERSION;
use mathoku_bridge::{BridgeAdapter, BridgeConfig};

fn deps_dir() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    exe.parent().unwrap().to_path_buf()
}

#[test]
fn dynamic_adapter_calls_the_shared_library() {
    let config = BridgeConfig::new(deps_dir());
    assert!(config.library_path().is_file());

    let adapter = BridgeAdapter::dynamic(&config);
    assert_eq!(adapter.greet("Ada").unwrap(), "Hello, Ada from Rust!");
    assert_eq!(
        adapter.get_dummy_user_json().unwrap(),
        r#"{"name":"John Doe","email":"john.doe@example.com"}"#
    );
    assert_eq!(adapter.abi_version().unwrap(), ABI_VERSION);
    assert_eq!(adapter.load_attempts(), 1);
}

#[test]
fn backends_agree_on_any_text() {
    let dynamic = BridgeAdapter::dynamic(&BridgeConfig::new(deps_dir()));
    let linked = BridgeAdapter::linked();

    for name in ["", "Ada", "a\0b", "\0", "名前", "line\nbreak"] {
        assert_eq!(
            dynamic.greet(name).unwrap(),
            linked.greet(name).unwrap(),
            "backends disagree for {name:?}"
        );
    }
    assert_eq!(dynamic.greet("a\0b").unwrap(), "Hello, a\0b from Rust!");
}

#[test]
fn process_wide_adapters_share_one_load() {
    let config = BridgeConfig::new(deps_dir());
    let first = BridgeAdapter::process_wide(&config);
    // Ignored once the process-wide guard has loaded.
    let second = BridgeAdapter::process_wide(&BridgeConfig::new("/nonexistent"));

    first.ensure_loaded().unwrap();
    assert_eq!(first.abi_version().unwrap(), ABI_VERSION);
    assert_eq!(second.greet("Ada").unwrap(), "Hello, Ada from Rust!");
    assert!(second.is_loaded());
    assert_eq!(first.load_attempts(), 1);
    assert_eq!(second.load_attempts(), 1);
}
