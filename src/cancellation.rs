use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::task::AtomicWaker;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    waker: AtomicWaker,
}

/// Cooperative cancellation shared between a caller and a running colorization.
/// Clones observe the same flag.
///
/// The token can also be awaited with [`CancellationToken::cancelled`], which is how
/// a colorization stops waiting on a tokenizer that is still being loaded.
/// Only the most recent task awaiting the token is woken.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.waker.wake();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once [`CancellationToken::cancel`] has been called on this token or a clone.
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Future returned by [`CancellationToken::cancelled`]
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Cancelled {
    inner: Arc<Inner>,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.inner.cancelled.load(Ordering::Acquire) {
            return Poll::Ready(());
        }
        self.inner.waker.register(cx.waker());
        // cancel() may have run between the load and the registration
        if self.inner.cancelled.load(Ordering::Acquire) {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
