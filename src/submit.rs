//! Fire-and-forget score submission
//!
//! Finished runs are handed to a background worker over a channel. The simulation never
//! waits on it; failures are logged and dropped, with no retries.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::sim::GameEvent;

/// JSON body sent to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: u64,
}

impl ScoreSubmission {
    pub fn to_json(&self) -> Result<String, SubmitError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Where submissions go (HTTP client, file, log, ...)
pub trait ScoreTransport: Send + 'static {
    fn send(&mut self, body: &str) -> Result<(), SubmitError>;
}

/// Transport that only logs the body; the headless build uses it
#[derive(Debug, Default)]
pub struct LogTransport;

impl ScoreTransport for LogTransport {
    fn send(&mut self, body: &str) -> Result<(), SubmitError> {
        log::info!("Score submitted: {body}");
        Ok(())
    }
}

/// Handle to the submission worker
pub struct SubmissionQueue {
    sender: Option<Sender<ScoreSubmission>>,
    worker: Option<JoinHandle<()>>,
}

impl SubmissionQueue {
    /// Start the worker thread around `transport`
    pub fn spawn<T: ScoreTransport>(transport: T) -> Self {
        let (tx, rx) = mpsc::channel::<ScoreSubmission>();
        let worker = thread::spawn(move || run_worker(transport, rx));
        Self {
            sender: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue a score. Anonymous players are skipped (`Ok(false)`).
    pub fn submit(&self, username: &str, score: u64) -> Result<bool, SubmitError> {
        let username = username.trim();
        if username.is_empty() {
            log::debug!("Anonymous run, score {score} not submitted");
            return Ok(false);
        }
        let sender = self.sender.as_ref().ok_or(SubmitError::QueueClosed)?;
        sender
            .send(ScoreSubmission {
                username: username.to_string(),
                score,
            })
            .map_err(|_| SubmitError::QueueClosed)?;
        Ok(true)
    }

    /// Submit on every game-over in `events`
    pub fn handle_events(&self, username: &str, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::GameOver { score, .. } = event {
                if let Err(e) = self.submit(username, *score) {
                    log::warn!("Score submission not queued: {e}");
                }
            }
        }
    }

    /// Stop accepting work and wait for queued submissions to finish
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Score submission worker panicked");
            }
        }
    }
}

impl Drop for SubmissionQueue {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_worker<T: ScoreTransport>(mut transport: T, rx: Receiver<ScoreSubmission>) {
    for submission in rx {
        let result = submission
            .to_json()
            .and_then(|body| transport.send(&body));
        match result {
            Ok(()) => log::debug!(
                "Submitted {} for {}",
                submission.score,
                submission.username
            ),
            Err(e) => log::warn!("Score submission failed: {e}"),
        }
    }
}
