//! One-shot completion signals
//!
//! Every dispatch returns a [`Completion`]: a future that resolves once the
//! scroll it describes has finished. Instant and no-op scrolls hand back an
//! already-resolved completion; animated ones resolve when their animator
//! reports rest. Completions from several animations join into one.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{join_all, BoxFuture};
use futures::task::noop_waker_ref;
use futures::FutureExt;
use tokio::sync::oneshot;

/// Future that resolves once a scroll has finished
///
/// Resolves at most once; polling after resolution keeps returning ready.
#[must_use = "a completion does nothing unless awaited or dropped deliberately"]
pub struct Completion {
    pending: Option<BoxFuture<'static, ()>>,
}

impl Completion {
    /// An already-resolved completion
    pub fn ready() -> Self {
        Self { pending: None }
    }

    /// A completion plus the signal that resolves it
    pub fn pending() -> (CompletionSignal, Self) {
        let (tx, rx) = oneshot::channel();
        let future = async move {
            if rx.await.is_err() {
                tracing::warn!("completion signal dropped before firing, resolving anyway");
            }
        };
        (
            CompletionSignal { tx },
            Self {
                pending: Some(future.boxed()),
            },
        )
    }

    /// Resolve once every part has resolved
    ///
    /// Parts make progress independently; the join only waits for them.
    pub fn join(parts: impl IntoIterator<Item = Completion>) -> Self {
        let mut pending: Vec<_> = parts.into_iter().filter_map(|c| c.pending).collect();
        match pending.len() {
            0 => Self::ready(),
            1 => Self {
                pending: pending.pop(),
            },
            _ => Self {
                pending: Some(join_all(pending).map(|_| ()).boxed()),
            },
        }
    }

    /// Poll once without blocking; true when resolved
    pub fn is_complete(&mut self) -> bool {
        if self.pending.is_none() {
            return true;
        }
        let mut cx = Context::from_waker(noop_waker_ref());
        self.poll_unpin(&mut cx).is_ready()
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(pending) = self.pending.as_mut() else {
            return Poll::Ready(());
        };
        match pending.as_mut().poll(cx) {
            Poll::Ready(()) => {
                self.pending = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::ready()
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

/// Resolves its [`Completion`]; consumed on use so it fires at most once
pub struct CompletionSignal {
    tx: oneshot::Sender<()>,
}

impl CompletionSignal {
    pub fn complete(self) {
        // The receiver may already be gone if nobody awaits the completion
        let _ = self.tx.send(());
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal").finish_non_exhaustive()
    }
}
