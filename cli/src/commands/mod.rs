pub mod daemon;
pub mod doctor;
pub mod greet;
pub mod user;

use anyhow::Result;
use mathoku_bridge::BridgeError;

/// Turn a settled promise into a console result.
pub fn settled(outcome: Option<Result<String, BridgeError>>) -> Result<String> {
    match outcome {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(e.into()),
        None => anyhow::bail!("call was discarded before it settled"),
    }
}
