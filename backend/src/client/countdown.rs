// src/client/countdown.rs

use std::future::Future;
use std::time::Duration;

use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

/// Quiz time limit that triggers an auto-submit.
///
/// The callback runs at most once, when the limit elapses. `cancel` or
/// dropping the countdown before then tears it down. A callback that has
/// already started is left to finish.
pub struct QuizCountdown {
    deadline: Instant,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<bool>>,
}

impl QuizCountdown {
    pub fn start<F, Fut>(limit: Duration, on_expire: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now() + limit;
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = sleep_until(deadline) => {
                    tracing::debug!("Quiz time limit reached, auto-submitting");
                    on_expire().await;
                    true
                }
                // Fires on explicit cancel and when the sender is dropped.
                _ = cancel_rx => false,
            }
        });

        Self {
            deadline,
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }

    /// Countdown from a quiz time limit in minutes.
    pub fn from_minutes<F, Fut>(minutes: i64, on_expire: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let secs = u64::try_from(minutes).unwrap_or(0) * 60;
        Self::start(Duration::from_secs(secs), on_expire)
    }

    /// Time left before the callback fires. Zero once expired.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Waits until the countdown settles. Returns true if the callback ran.
    pub async fn finished(mut self) -> bool {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(false),
            None => false,
        }
    }
}

impl Drop for QuizCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
