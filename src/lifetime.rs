//! Screen lifetimes
//!
//! Every mounted screen owns a [`Lifetime`]. Async work started by the
//! screen runs under it so results that arrive after the screen is gone are
//! never applied to its state.

use std::future::Future;
use tokio_util::sync::{CancellationToken, DropGuard};

/// The screen ended before the operation's result could be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Screen closed before the operation finished")]
pub struct Ended;

#[derive(Debug, Clone, Default)]
pub struct Lifetime {
    token: CancellationToken,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lifetime that ends with this one, or earlier on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn end(&self) {
        self.token.cancel();
    }

    pub fn is_alive(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// A guard that ends this lifetime when dropped
    pub fn end_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Run a read-only operation, abandoning it as soon as the lifetime ends.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Ended> {
        if !self.is_alive() {
            return Err(Ended);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Ended),
            out = fut => Ok(out),
        }
    }

    /// Run a mutation to completion, then report whether its result may still
    /// be applied. Requests that change server state are never cut short.
    pub async fn settle<F: Future>(&self, fut: F) -> Result<F::Output, Ended> {
        let out = fut.await;
        if self.is_alive() {
            Ok(out)
        } else {
            Err(Ended)
        }
    }
}
