//! Submission affordance state
//!
//! Orthogonal to the list: signing/sending never changes disclosure or row
//! content, only whether the confirm button is enabled and what feedback is shown.

use crate::async_job::AsyncJob;
use crate::notifications::{shorten, NotificationEntry};
use ethers::types::{Bytes, TxHash};
use tracing::{info, warn};

/// What confirming does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmType {
    /// Sign only; the host broadcasts later
    Sign,
    SignThenSend,
}

/// What a successful confirmation produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmResult {
    SignedTransaction(Bytes),
    SentTransaction(TxHash),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing submitted yet
    Idle,
    /// Waiting for the signer / network
    InProgress,
    Succeeded(ConfirmResult),
    Failed(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::InProgress)
    }
}

/// Tracks one confirmation attempt at a time
#[derive(Debug)]
pub struct Submission {
    confirm_type: ConfirmType,
    state: SubmissionState,
    job: Option<AsyncJob<ConfirmResult>>,
}

impl Submission {
    pub fn new(confirm_type: ConfirmType) -> Self {
        Self {
            confirm_type,
            state: SubmissionState::Idle,
            job: None,
        }
    }

    pub fn confirm_type(&self) -> ConfirmType {
        self.confirm_type
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The confirm button is disabled while a submission is running
    pub fn confirm_enabled(&self) -> bool {
        !self.state.is_loading()
    }

    /// Track a new submission. Returns false (and drops `job`) if one is already running.
    pub fn start(&mut self, job: AsyncJob<ConfirmResult>) -> bool {
        if self.state.is_loading() {
            warn!("Submission already in progress, ignoring new request");
            return false;
        }
        self.state = SubmissionState::InProgress;
        self.job = Some(job);
        true
    }

    /// Poll the running job; returns a notification once it finishes
    pub fn poll(&mut self) -> Option<NotificationEntry> {
        let result = self.job.as_mut()?.poll()?;
        self.job = None;

        let entry = match result {
            Ok(outcome) => {
                let message = match &outcome {
                    ConfirmResult::SignedTransaction(raw) => {
                        format!("[OK] Transaction signed ({} bytes)", raw.len())
                    }
                    ConfirmResult::SentTransaction(hash) => {
                        let hash = format!("{:?}", hash);
                        format!(
                            "[OK] Transaction sent ({}...{})",
                            &hash[..10],
                            &hash[hash.len() - 6..]
                        )
                    }
                };
                info!("{}", message);
                self.state = SubmissionState::Succeeded(outcome);
                NotificationEntry::new(message)
            }
            Err(e) => {
                let error = e.to_string();
                warn!("Transaction submission failed: {}", error);
                self.state = SubmissionState::Failed(error.clone());
                NotificationEntry::new(format!("[!!] Transaction failed: {}", shorten(&error, 50)))
            }
        };
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfirmError;
    use anyhow::Result;
    use std::sync::mpsc;

    fn job() -> (mpsc::Sender<Result<ConfirmResult>>, AsyncJob<ConfirmResult>) {
        let (tx, rx) = mpsc::channel();
        (tx, AsyncJob::new(rx))
    }

    #[test]
    fn test_initial_state() {
        let submission = Submission::new(ConfirmType::SignThenSend);
        assert_eq!(submission.state(), &SubmissionState::Idle);
        assert!(submission.confirm_enabled());
        assert_eq!(submission.confirm_type(), ConfirmType::SignThenSend);
    }

    #[test]
    fn test_in_progress_disables_confirm() {
        let mut submission = Submission::new(ConfirmType::Sign);
        let (_tx, job) = job();
        assert!(submission.start(job));
        assert!(!submission.confirm_enabled());
        assert!(submission.poll().is_none());
    }

    #[test]
    fn test_second_start_rejected() {
        let mut submission = Submission::new(ConfirmType::Sign);
        let (_tx1, first) = job();
        let (_tx2, second) = job();
        assert!(submission.start(first));
        assert!(!submission.start(second));
    }

    #[test]
    fn test_sent_transaction_success() {
        let mut submission = Submission::new(ConfirmType::SignThenSend);
        let (tx, job) = job();
        submission.start(job);
        tx.send(Ok(ConfirmResult::SentTransaction(TxHash::repeat_byte(0xab))))
            .unwrap();

        let entry = submission.poll().unwrap();
        assert!(entry.message.starts_with("[OK] Transaction sent (0xabababab"));
        assert!(matches!(
            submission.state(),
            SubmissionState::Succeeded(ConfirmResult::SentTransaction(_))
        ));
        assert!(submission.confirm_enabled());
    }

    #[test]
    fn test_signed_transaction_success() {
        let mut submission = Submission::new(ConfirmType::Sign);
        let (tx, job) = job();
        submission.start(job);
        tx.send(Ok(ConfirmResult::SignedTransaction(Bytes::from(vec![0u8; 110]))))
            .unwrap();
        assert_eq!(
            submission.poll().unwrap().message,
            "[OK] Transaction signed (110 bytes)"
        );
    }

    #[test]
    fn test_failure_sets_failed_state() {
        let mut submission = Submission::new(ConfirmType::Sign);
        let (tx, job) = job();
        submission.start(job);
        tx.send(Err(ConfirmError::Submission("user rejected".to_string()).into()))
            .unwrap();

        let entry = submission.poll().unwrap();
        assert_eq!(
            entry.message,
            "[!!] Transaction failed: Submission failed: user rejected"
        );
        assert_eq!(
            submission.state(),
            &SubmissionState::Failed("Submission failed: user rejected".to_string())
        );
        assert!(submission.confirm_enabled());
    }
}
