//! Shared backend: one long-lived worker for every probe
//!
//! Modules loaded by earlier probes stay loaded, so a repeated import is a
//! cheap success. If a probe times out or the worker dies, the worker is
//! discarded and the next probe starts a new one.

use super::worker::{run_module, DriverRequest, Worker};
use super::{Attempt, ProbeBackend};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::timeout;

/// Backend reusing a single interpreter worker
pub struct SharedInterpreter {
    python: String,
    limit: Duration,
    worker: Option<Worker>,
    restarts: usize,
}

impl SharedInterpreter {
    /// Create a backend; the worker starts lazily on the first probe
    pub fn new(python: impl Into<String>, limit: Duration) -> Self {
        Self {
            python: python.into(),
            limit,
            worker: None,
            restarts: 0,
        }
    }

    /// Number of workers discarded after a timeout or crash
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    async fn request(&mut self, request: DriverRequest<'_>) -> Attempt {
        let mut worker = match self.worker.take() {
            Some(worker) => worker,
            None => match Worker::spawn(&self.python) {
                Ok(worker) => worker,
                Err(e) => return Attempt::Crashed(e.to_string()),
            },
        };

        match timeout(self.limit, worker.exchange(&request)).await {
            Ok(Ok(reply)) => {
                self.worker = Some(worker);
                reply.into()
            }
            Ok(Err(e)) => {
                warn!("{}; starting a fresh worker for the next probe", e);
                worker.kill().await;
                self.restarts += 1;
                Attempt::Crashed(e.to_string())
            }
            Err(_) => {
                warn!(
                    "probe exceeded {}s; killing the interpreter worker",
                    self.limit.as_secs()
                );
                worker.kill().await;
                self.restarts += 1;
                Attempt::TimedOut(self.limit)
            }
        }
    }
}

#[async_trait]
impl ProbeBackend for SharedInterpreter {
    async fn import_module(&mut self, module: &str) -> Attempt {
        self.request(DriverRequest::Import(module)).await
    }

    async fn exec_snippet(&mut self, code: &str) -> Attempt {
        self.request(DriverRequest::Exec(code)).await
    }

    async fn run_module(&mut self, module: &str, args: &[&str], limit: Duration) -> Attempt {
        run_module(&self.python, module, args, limit).await
    }

    async fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            debug!("stopping shared interpreter worker");
            worker.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Put `dir` at the front of the worker's module search path
    async fn add_to_path(backend: &mut SharedInterpreter, dir: &Path) {
        let code = format!("import sys\nsys.path.insert(0, {:?})", dir.to_str().unwrap());
        let attempt = backend.exec_snippet(&code).await;
        assert_eq!(attempt, Attempt::Completed { value: None });
    }

    #[tokio::test]
    async fn test_repeated_import_succeeds() {
        if !python_available() {
            return;
        }
        let mut backend = SharedInterpreter::new("python3", Duration::from_secs(30));
        for _ in 0..2 {
            let attempt = backend.import_module("json").await;
            assert_eq!(attempt, Attempt::Completed { value: None });
        }
        assert_eq!(backend.restarts(), 0);
        backend.shutdown().await;
    }

    #[tokio::test]
    async fn test_import_time_exception_is_raised_not_import_error() {
        if !python_available() {
            return;
        }
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("divides_by_zero.py"), "1 / 0\n").unwrap();
        fs::write(
            temp_dir.path().join("noisy.py"),
            "print('hello from import')\nVALUE = 1\n",
        )
        .unwrap();

        let mut backend = SharedInterpreter::new("python3", Duration::from_secs(30));
        add_to_path(&mut backend, temp_dir.path()).await;

        match backend.import_module("divides_by_zero").await {
            Attempt::Raised { error_type, .. } => assert_eq!(error_type, "ZeroDivisionError"),
            other => panic!("expected Raised, got {:?}", other),
        }
        assert!(matches!(
            backend.import_module("not_a_module_anywhere").await,
            Attempt::ImportError { .. }
        ));
        // printing at import time must not corrupt the reply channel
        assert_eq!(
            backend.import_module("noisy").await,
            Attempt::Completed { value: None }
        );
        assert_eq!(backend.restarts(), 0);
        backend.shutdown().await;
    }

    #[tokio::test]
    async fn test_timeout_kills_worker_and_next_import_restarts() {
        if !python_available() {
            return;
        }
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join("sleepy.py"),
            "import time\ntime.sleep(5)\n",
        )
        .unwrap();

        let limit = Duration::from_secs(2);
        let mut backend = SharedInterpreter::new("python3", limit);
        add_to_path(&mut backend, temp_dir.path()).await;

        assert_eq!(backend.import_module("sleepy").await, Attempt::TimedOut(limit));
        assert_eq!(backend.restarts(), 1);

        assert_eq!(
            backend.import_module("json").await,
            Attempt::Completed { value: None }
        );
        assert_eq!(backend.restarts(), 1);
        backend.shutdown().await;
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_a_crash_not_a_panic() {
        let mut backend = SharedInterpreter::new("definitely-not-an-interpreter-xyz", Duration::from_secs(5));
        let attempt = backend.import_module("json").await;
        assert!(matches!(attempt, Attempt::Crashed(_)));
        assert_eq!(backend.restarts(), 0);
        backend.shutdown().await;
    }
}
