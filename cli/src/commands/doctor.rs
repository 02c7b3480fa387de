use anyhow::Result;
use mathoku::ffi::ABI_VERSION;

use crate::commands::settled;
use crate::host::HostOptions;

/// Validate the environment the app would run in.
pub async fn run(options: &HostOptions) -> Result<()> {
    if options.linked {
        println!("🔗 Using the statically linked responder");
    } else {
        let path = options.bridge_config().library_path();
        println!("📦 Library: {}", path.display());

        if !path.is_file() {
            println!("❌ Not found. Build mathoku-core and copy the artifact there, or pass --library-dir.");
            anyhow::bail!("native library not found at {}", path.display());
        }
    }

    let facade = options.facade();
    let adapter = facade.adapter().clone();
    // The load guard may block, so keep it off the async thread.
    let loaded = tokio::task::spawn_blocking(move || {
        adapter.ensure_loaded()?;
        adapter.abi_version()
    })
    .await?;

    let abi_version = match loaded {
        Ok(version) => version,
        Err(e) => {
            println!("❌ {}", e.message);
            return Err(e.into());
        }
    };
    println!("✅ Loaded (ABI {abi_version}, host expects {ABI_VERSION})");

    let greeting = settled(facade.greet("doctor").await)?;
    println!("✅ Smoke test: {greeting}");
    Ok(())
}
