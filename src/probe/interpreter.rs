//! Interpreter detection
//!
//! Asks the interpreter to describe itself before any probe runs. Failing to
//! start it here is a fatal error; failing later is a per-probe outcome.

use crate::domain::InterpreterInfo;
use crate::error::InterpreterError;
use log::debug;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

const QUERY: &str = "import json, platform, sys\n\
print(json.dumps({\"executable\": sys.executable, \
\"version\": \"%d.%d.%d\" % tuple(sys.version_info[:3]), \
\"implementation\": platform.python_implementation(), \
\"platform\": sys.platform}))";

#[derive(Debug, Deserialize)]
struct QueryReply {
    executable: String,
    version: String,
    implementation: String,
    platform: String,
}

/// Start `python` once and read its identity
pub async fn detect(python: &str, limit: Duration) -> Result<InterpreterInfo, InterpreterError> {
    let output = Command::new(python)
        .arg("-c")
        .arg(QUERY)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = timeout(limit, output)
        .await
        .map_err(|_| InterpreterError::Timeout {
            command: python.to_string(),
            seconds: limit.as_secs(),
        })?
        .map_err(|source| InterpreterError::Spawn {
            command: python.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InterpreterError::query(
            python,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let info = parse_reply(python, stdout.trim())?;
    debug!("detected interpreter {}", info);
    Ok(info)
}

fn parse_reply(python: &str, reply: &str) -> Result<InterpreterInfo, InterpreterError> {
    let reply: QueryReply = serde_json::from_str(reply)
        .map_err(|e| InterpreterError::query(python, format!("unexpected reply: {}", e)))?;
    let version = semver::Version::parse(&reply.version).map_err(|e| {
        InterpreterError::query(python, format!("bad version '{}': {}", reply.version, e))
    })?;

    Ok(InterpreterInfo {
        command: python.to_string(),
        executable: reply.executable,
        version,
        implementation: reply.implementation,
        platform: reply.platform,
    })
}
