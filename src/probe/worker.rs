//! Interpreter worker process and its JSON-line protocol
//!
//! A worker is a Python process running [`DRIVER`]. Each request is one JSON
//! line on the worker's stdin; each reply is one JSON line on its stdout.
//! The driver moves the real stdin/stdout out of reach of imported code so
//! that a module printing or reading at import time cannot corrupt the
//! channel.

use crate::error::WorkerError;
use crate::probe::Attempt;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

/// Grace period for a worker to exit after its stdin is closed
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Python source run by every worker
pub const DRIVER: &str = r#"import importlib, io, json, os, sys

_requests = os.fdopen(os.dup(0), "r", encoding="utf-8")
_replies = os.fdopen(os.dup(1), "w", encoding="utf-8")
os.dup2(os.open(os.devnull, os.O_RDONLY), 0)
os.dup2(2, 1)
sys.stdin = io.StringIO()
sys.stdout = sys.stderr


def _run(request):
    target = request["target"]
    if request["op"] == "import":
        importlib.import_module(target)
        return None
    scope = {"__name__": "__probe__"}
    exec(compile(target, "<check>", "exec"), scope)
    value = scope.get("result")
    return None if value is None else str(value)


def _handle(request):
    try:
        return {"status": "ok", "value": _run(request)}
    except ImportError as exc:
        return {"status": "import_error", "error_type": type(exc).__name__, "message": str(exc)}
    except BaseException as exc:
        return {"status": "error", "error_type": type(exc).__name__, "message": str(exc)}


for _line in _requests:
    _line = _line.strip()
    if _line:
        _replies.write(json.dumps(_handle(json.loads(_line))) + "\n")
        _replies.flush()
"#;

/// Request sent to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "target", rename_all = "lowercase")]
pub enum DriverRequest<'a> {
    /// `importlib.import_module(target)`
    Import(&'a str),
    /// Execute a snippet; its `result` variable is returned as a string
    Exec(&'a str),
}

/// Reply written by the driver
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DriverReply {
    /// Completed without raising
    Ok {
        #[serde(default)]
        value: Option<String>,
    },
    /// Raised `ImportError` or a subclass
    ImportError { error_type: String, message: String },
    /// Raised anything else
    Error { error_type: String, message: String },
}

impl From<DriverReply> for Attempt {
    fn from(reply: DriverReply) -> Self {
        match reply {
            DriverReply::Ok { value } => Attempt::Completed { value },
            DriverReply::ImportError {
                error_type,
                message,
            } => Attempt::ImportError {
                error_type,
                message,
            },
            DriverReply::Error {
                error_type,
                message,
            } => Attempt::Raised {
                error_type,
                message,
            },
        }
    }
}

/// A running driver process
pub struct Worker {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl Worker {
    /// Start a worker with the given interpreter command
    pub fn spawn(command: &str) -> Result<Self, WorkerError> {
        let mut child = Command::new(command)
            .arg("-c")
            .arg(DRIVER)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| WorkerError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| WorkerError::protocol("worker stdin was not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WorkerError::protocol("worker stdout was not captured"))?;

        debug!("started interpreter worker '{}' (pid {:?})", command, child.id());
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        })
    }

    /// Send one request and wait for its reply
    pub async fn exchange(&mut self, request: &DriverRequest<'_>) -> Result<DriverReply, WorkerError> {
        let mut line =
            serde_json::to_string(request).map_err(|e| WorkerError::protocol(e.to_string()))?;
        line.push('\n');

        if let Err(e) = self.send(line.as_bytes()).await {
            if e.kind() == io::ErrorKind::BrokenPipe {
                return Err(WorkerError::Exited {
                    status: self.exit_status().await,
                });
            }
            return Err(e.into());
        }

        match self.stdout.next_line().await? {
            Some(reply) => serde_json::from_str(&reply)
                .map_err(|e| WorkerError::protocol(format!("{} in {:?}", e, reply))),
            None => Err(WorkerError::Exited {
                status: self.exit_status().await,
            }),
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdin.write_all(bytes).await?;
        self.stdin.flush().await
    }

    async fn exit_status(&mut self) -> Option<String> {
        timeout(EXIT_GRACE, self.child.wait())
            .await
            .ok()
            .and_then(|r| r.ok())
            .map(|status| status.to_string())
    }

    /// Close stdin and let the driver exit; kill it if it lingers
    pub async fn shutdown(self) {
        let Worker {
            mut child, stdin, ..
        } = self;
        drop(stdin);
        if timeout(EXIT_GRACE, child.wait()).await.is_err() {
            let _ = child.kill().await;
        }
    }

    /// Kill the worker immediately
    pub async fn kill(mut self) {
        let _ = self.child.kill().await;
    }
}

/// Run `<command> -m <module> <args...>` as a bounded subprocess
///
/// A zero exit status completes; a nonzero status is reported as a raised
/// error carrying the first line of stderr.
pub async fn run_module(command: &str, module: &str, args: &[&str], limit: Duration) -> Attempt {
    let display = format!("{} -m {} {}", command, module, args.join(" "));
    let output = Command::new(command)
        .arg("-m")
        .arg(module)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    match timeout(limit, output).await {
        Err(_) => Attempt::TimedOut(limit),
        Ok(Err(e)) => Attempt::Crashed(format!("failed to run '{}': {}", display.trim_end(), e)),
        Ok(Ok(output)) if output.status.success() => Attempt::Completed { value: None },
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first_line = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
            Attempt::Raised {
                error_type: "ExitStatus".to_string(),
                message: format!(
                    "'{}' returned {}{}",
                    display.trim_end(),
                    output.status,
                    if first_line.is_empty() {
                        String::new()
                    } else {
                        format!(": {}", first_line.trim())
                    }
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_string(&DriverRequest::Import("yaml")).unwrap();
        assert_eq!(json, r#"{"op":"import","target":"yaml"}"#);

        let json = serde_json::to_string(&DriverRequest::Exec("result = 1")).unwrap();
        assert_eq!(json, r#"{"op":"exec","target":"result = 1"}"#);
    }

    #[test]
    fn test_reply_ok() {
        let reply: DriverReply = serde_json::from_str(r#"{"status": "ok", "value": null}"#).unwrap();
        assert_eq!(reply, DriverReply::Ok { value: None });

        let reply: DriverReply =
            serde_json::from_str(r#"{"status": "ok", "value": "Hello World!"}"#).unwrap();
        assert_eq!(
            Attempt::from(reply),
            Attempt::Completed {
                value: Some("Hello World!".to_string())
            }
        );
    }

    #[test]
    fn test_reply_import_error() {
        let reply: DriverReply = serde_json::from_str(
            r#"{"status": "import_error", "error_type": "ModuleNotFoundError", "message": "No module named 'foo'"}"#,
        )
        .unwrap();
        assert_eq!(
            Attempt::from(reply),
            Attempt::ImportError {
                error_type: "ModuleNotFoundError".to_string(),
                message: "No module named 'foo'".to_string(),
            }
        );
    }

    #[test]
    fn test_reply_error() {
        let reply: DriverReply = serde_json::from_str(
            r#"{"status": "error", "error_type": "SyntaxError", "message": "invalid syntax"}"#,
        )
        .unwrap();
        assert!(matches!(Attempt::from(reply), Attempt::Raised { .. }));
    }

    #[test]
    fn test_reply_unknown_status_rejected() {
        assert!(serde_json::from_str::<DriverReply>(r#"{"status": "maybe"}"#).is_err());
    }

    #[test]
    fn test_driver_has_no_leading_indentation() {
        assert!(DRIVER.starts_with("import "));
        assert!(DRIVER.contains("_replies.flush()"));
    }

    #[tokio::test]
    async fn test_spawn_missing_interpreter() {
        let err = Worker::spawn("definitely-not-an-interpreter-xyz").err().unwrap();
        assert!(matches!(err, WorkerError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_run_module_missing_interpreter() {
        let attempt = run_module(
            "definitely-not-an-interpreter-xyz",
            "azdev",
            &["--help"],
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(attempt, Attempt::Crashed(_)));
    }
}
