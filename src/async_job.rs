//! Pollable handle for background work
//!
//! Name lookups and submissions run on tokio; the list polls their results from
//! its own (single) thread without blocking.

use crate::error::ConfirmError;
use anyhow::{anyhow, Result};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Helper struct for async jobs - polls a background task
#[derive(Debug)]
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T> AsyncJob<T> {
    /// Create a new async job with the given receiver
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Poll the job for completion
    /// Returns Some(result) if the job has completed, None if still running
    pub fn poll(&mut self) -> Option<Result<T>> {
        if let Some(rx) = &self.receiver {
            match rx.try_recv() {
                Ok(res) => {
                    self.receiver = None;
                    return Some(res);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    return Some(Err(ConfirmError::WorkerDisconnected.into()));
                }
            }
        }
        None
    }

    /// Block until the job reports. Only for callers that own no UI loop (CLI, tests).
    pub fn wait(mut self) -> Result<T> {
        match self.receiver.take() {
            Some(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(ConfirmError::WorkerDisconnected.into())),
            None => Err(anyhow!("Job already completed")),
        }
    }

    /// Check if the job is still running
    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Run `fut` in the background and return a handle to its result.
///
/// Uses the current tokio runtime when there is one, otherwise a dedicated
/// thread with its own runtime.
pub fn spawn_job<T, F>(fut: F) -> AsyncJob<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(async move {
            // Receiver gone means the owner was torn down; nothing to deliver to
            tx.send(fut.await).ok();
        });
    } else {
        std::thread::spawn(move || {
            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(fut),
                Err(e) => Err(anyhow!("Failed to create async runtime: {}", e)),
            };
            tx.send(result).ok();
        });
    }

    AsyncJob::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_pending_then_ready() {
        let (tx, rx) = mpsc::channel();
        let mut job: AsyncJob<u32> = AsyncJob::new(rx);
        assert!(job.poll().is_none());
        assert!(job.is_running());

        tx.send(Ok(7)).unwrap();
        assert_eq!(job.poll().unwrap().unwrap(), 7);
        assert!(!job.is_running());
        assert!(job.poll().is_none());
    }

    #[test]
    fn test_poll_disconnected() {
        let (tx, rx) = mpsc::channel::<Result<u32>>();
        let mut job = AsyncJob::new(rx);
        drop(tx);
        let err = job.poll().unwrap().unwrap_err();
        assert!(err.to_string().contains("disconnected"));
        assert!(!job.is_running());
    }

    #[test]
    fn test_spawn_job_without_runtime() {
        let job = spawn_job(async { Ok::<_, anyhow::Error>("done") });
        assert_eq!(job.wait().unwrap(), "done");
    }

    #[test]
    fn test_spawn_job_propagates_error() {
        let job: AsyncJob<()> = spawn_job(async { Err(anyhow!("boom")) });
        assert_eq!(job.wait().unwrap_err().to_string(), "boom");
    }
}
