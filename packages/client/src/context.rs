//! Execution context for a single call
//!
//! A `Context` pairs a cancellation token with an optional deadline. Children
//! derived from a context are canceled when the parent is, and inherit the
//! earlier of the two deadlines.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Why a context stopped a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline scope handed down to the transport.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never canceled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child that can be canceled on its own.
    ///
    /// The returned guard cancels the child when dropped; canceling the
    /// child never affects `self`.
    #[must_use]
    pub fn with_cancel(&self) -> (Context, DropGuard) {
        let child = Context {
            token: self.token.child_token(),
            deadline: self.deadline,
        };
        let guard = child.token.clone().drop_guard();
        (child, guard)
    }

    /// Derive a child whose deadline is at most `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> (Context, DropGuard) {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> (Context, DropGuard) {
        let (mut child, guard) = self.with_cancel();
        child.deadline = Some(match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        });
        (child, guard)
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `fut` until it completes, the context is canceled, or the
    /// deadline passes, whichever comes first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        if self.token.is_cancelled() {
            return Err(ContextError::Canceled);
        }

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => Err(ContextError::Canceled),
                    () = tokio::time::sleep_until(deadline) => Err(ContextError::DeadlineExceeded),
                    out = fut => Ok(out),
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => Err(ContextError::Canceled),
                    out = fut => Ok(out),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_runs_to_completion() {
        let ctx = Context::background();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn timeout_interrupts_slow_future() {
        let (ctx, _guard) = Context::background().with_timeout(Duration::from_millis(20));
        let out = ctx
            .run(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(out, Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn parent_cancel_reaches_child() {
        let parent = Context::background();
        let (child, _guard) = parent.with_cancel();
        parent.cancel();
        assert!(child.is_canceled());
        assert_eq!(child.run(async {}).await, Err(ContextError::Canceled));
    }

    #[test]
    fn dropping_guard_cancels_only_the_child() {
        let parent = Context::background();
        let (child, guard) = parent.with_cancel();
        drop(guard);
        assert!(child.is_canceled());
        assert!(!parent.is_canceled());
    }

    #[tokio::test]
    async fn child_keeps_earlier_parent_deadline() {
        let (parent, _g1) = Context::background().with_timeout(Duration::from_millis(10));
        let (child, _g2) = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
    }
}
