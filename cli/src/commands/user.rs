use anyhow::{Context, Result};
use mathoku::models::User;
use mathoku_bridge::MODULE_NAME;

use crate::commands::settled;
use crate::host::HostOptions;

pub async fn run(options: &HostOptions) -> Result<()> {
    let modules = options.modules();
    let module = modules.get(MODULE_NAME)?;

    let json = settled(module.facade().get_dummy_user_json().await)?;
    let user: User = serde_json::from_str(&json).context("Native library returned malformed user JSON")?;

    println!("{json}");
    println!("👤 {}", user.name);
    println!("   {}", user.email);
    Ok(())
}
