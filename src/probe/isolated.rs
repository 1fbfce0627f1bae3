//! Isolated backend: a fresh worker for every probe
//!
//! Slower than the shared backend, but a module that corrupts interpreter
//! state or crashes the process cannot affect any other probe.

use super::worker::{run_module, DriverRequest, Worker};
use super::{Attempt, ProbeBackend};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

/// Backend starting one worker per probe
pub struct IsolatedInterpreter {
    python: String,
    limit: Duration,
}

impl IsolatedInterpreter {
    /// Create a backend for the given interpreter command
    pub fn new(python: impl Into<String>, limit: Duration) -> Self {
        Self {
            python: python.into(),
            limit,
        }
    }

    async fn request(&self, request: DriverRequest<'_>) -> Attempt {
        let mut worker = match Worker::spawn(&self.python) {
            Ok(worker) => worker,
            Err(e) => return Attempt::Crashed(e.to_string()),
        };

        match timeout(self.limit, worker.exchange(&request)).await {
            Ok(Ok(reply)) => {
                worker.shutdown().await;
                reply.into()
            }
            Ok(Err(e)) => {
                worker.kill().await;
                Attempt::Crashed(e.to_string())
            }
            Err(_) => {
                worker.kill().await;
                Attempt::TimedOut(self.limit)
            }
        }
    }
}

#[async_trait]
impl ProbeBackend for IsolatedInterpreter {
    async fn import_module(&mut self, module: &str) -> Attempt {
        self.request(DriverRequest::Import(module)).await
    }

    async fn exec_snippet(&mut self, code: &str) -> Attempt {
        self.request(DriverRequest::Exec(code)).await
    }

    async fn run_module(&mut self, module: &str, args: &[&str], limit: Duration) -> Attempt {
        run_module(&self.python, module, args, limit).await
    }
}
