use anyhow::Result;
use mathoku_bridge::MODULE_NAME;

use crate::commands::settled;
use crate::host::HostOptions;

pub async fn run(options: &HostOptions, name: String) -> Result<()> {
    let modules = options.modules();
    let module = modules.get(MODULE_NAME)?;

    let greeting = settled(module.facade().greet(name).await)?;
    println!("{greeting}");
    Ok(())
}
