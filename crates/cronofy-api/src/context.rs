//! Per-call deadline and cancellation.
//!
//! Every client operation takes a [`CallContext`]. When its deadline passes or
//! its cancellation signal fires, the in-flight request future is dropped,
//! which aborts the HTTP call, and the operation returns straight away.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a call stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupted {
    Cancelled,
    DeadlineExceeded,
}

/// Caller-supplied deadline and cancellation for one operation.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl CallContext {
    /// A context with no deadline and no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Builder method to set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Builder method to set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder method to attach a cancellation signal.
    ///
    /// The call is cancelled once the channel holds `true`.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if cancellation has already been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Drives `fut` until it completes, the deadline passes, or the call is cancelled.
    pub(crate) async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }

        let cancelled = wait_cancelled(self.cancel.clone());
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            output = fut => Ok(output),
            _ = cancelled => Err(Interrupted::Cancelled),
            _ = expired => Err(Interrupted::DeadlineExceeded),
        }
    }
}

/// Resolves once `cancel` holds `true`; never resolves without a signal or
/// after every sender is gone.
async fn wait_cancelled(cancel: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = cancel else {
        return std::future::pending().await;
    };

    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_runs_to_completion() {
        let ctx = CallContext::background();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_slow_future() {
        let ctx = CallContext::background().with_timeout(Duration::from_secs(1));
        let slow = tokio::time::sleep(Duration::from_secs(60));
        assert_eq!(ctx.run(slow).await, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn already_cancelled_short_circuits() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let ctx = CallContext::background().with_cancellation(rx);
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.run(async { 1 }).await, Err(Interrupted::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_in_flight_future() {
        let (tx, rx) = watch::channel(false);
        let ctx = CallContext::background().with_cancellation(rx);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(true);
        });

        let slow = tokio::time::sleep(Duration::from_secs(60));
        assert_eq!(ctx.run(slow).await, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn dropped_sender_does_not_cancel() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = CallContext::background().with_cancellation(rx);
        assert_eq!(ctx.run(async { "done" }).await, Ok("done"));
    }
}
