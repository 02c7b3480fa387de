use std::io::{self, Write};

use anyhow::{Context, Result};
use mathoku_bridge::{NativeModule, MODULE_NAME};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::host::HostOptions;

/// One line of input: `{"id": 1, "method": "greet", "args": ["Ada"]}`.
#[derive(Deserialize, Debug)]
struct DaemonCommand {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
enum DaemonEvent {
    Ready {
        module: &'static str,
        operations: Vec<&'static str>,
    },
    Resolved {
        id: Value,
        value: String,
    },
    Rejected {
        id: Value,
        code: String,
        message: String,
    },
    Discarded {
        id: Value,
    },
    Error {
        error: String,
    },
}

fn emit(event: &DaemonEvent) -> Result<()> {
    let json = serde_json::to_string(event)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

fn parse_command(line: &str) -> Result<DaemonCommand, DaemonEvent> {
    serde_json::from_str(line).map_err(|e| DaemonEvent::Error {
        error: format!("Invalid JSON: {e}"),
    })
}

/// Dispatch every command as it arrives; results are written as they settle,
/// so they may come out of order. Match them up by `id`.
pub async fn run(options: &HostOptions) -> Result<()> {
    let modules = options.modules();
    let module = modules.get(MODULE_NAME)?;

    emit(&DaemonEvent::Ready {
        module: module.name(),
        operations: module.operations(),
    })?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => dispatch(&module, command, &mut pending),
                    Err(event) => emit(&event)?,
                }
            }
            Some(joined) = pending.join_next(), if !pending.is_empty() => {
                emit(&joined.unwrap_or_else(|e| DaemonEvent::Error { error: e.to_string() }))?;
            }
        }
    }

    // stdin closed: flush what is still in flight, then tear down.
    while let Some(joined) = pending.join_next().await {
        emit(&joined.unwrap_or_else(|e| DaemonEvent::Error { error: e.to_string() }))?;
    }
    modules.teardown_all();
    Ok(())
}

fn dispatch(module: &NativeModule, command: DaemonCommand, pending: &mut JoinSet<DaemonEvent>) {
    tracing::debug!(method = %command.method, "dispatching daemon command");
    let promise = module.invoke(&command.method, &command.args);
    let id = command.id;
    pending.spawn(async move {
        match promise.await {
            Some(Ok(value)) => DaemonEvent::Resolved { id, value },
            Some(Err(e)) => DaemonEvent::Rejected {
                id,
                code: e.code().to_string(),
                message: e.message,
            },
            None => DaemonEvent::Discarded { id },
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_command_with_defaults() {
        let command = parse_command(r#"{"method": "getDummyUserJson"}"#).unwrap();
        assert_eq!(command.method, "getDummyUserJson");
        assert_eq!(command.id, Value::Null);
        assert!(command.args.is_empty());
    }

    #[test]
    fn invalid_json_becomes_error_event() {
        let event = parse_command("{not json").unwrap_err();
        assert!(matches!(event, DaemonEvent::Error { ref error } if error.starts_with("Invalid JSON")));
    }

    #[test]
    fn events_are_tagged_by_type() {
        let resolved = DaemonEvent::Resolved {
            id: json!(7),
            value: "Hello, Ada from Rust!".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({"type": "resolved", "id": 7, "value": "Hello, Ada from Rust!"})
        );

        let rejected = DaemonEvent::Rejected {
            id: json!("a"),
            code: "LOAD_FAILURE".to_string(),
            message: "missing".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({"type": "rejected", "id": "a", "code": "LOAD_FAILURE", "message": "missing"})
        );
    }
}
