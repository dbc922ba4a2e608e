//! Transient notifications ("toasts")
//!
//! A pending toast can later be replaced in place by its outcome, so a
//! "Saving..." message turns into "Course added" or "Something went wrong"
//! instead of stacking up.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub level: ToastLevel,
    pub message: String,
}

/// Shared toast queue
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
    next_id: AtomicU64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: ToastLevel, message: String) -> ToastId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        toasts.push(Toast { id, level, message });
        id
    }

    /// Show a pending toast and return its id for later replacement
    pub fn pending(&self, message: impl Into<String>) -> ToastId {
        let message = message.into();
        tracing::debug!(%message, "toast pending");
        self.push(ToastLevel::Pending, message)
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        let message = message.into();
        tracing::info!(%message, "toast success");
        self.push(ToastLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        let message = message.into();
        tracing::warn!(%message, "toast error");
        self.push(ToastLevel::Error, message)
    }

    /// Replace a toast in place. Falls back to a new toast when the id is gone
    /// (already drained).
    pub fn resolve(&self, id: ToastId, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Error => tracing::warn!(%message, "toast error"),
            _ => tracing::info!(%message, "toast resolved"),
        }
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        match toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) => {
                toast.level = level;
                toast.message = message;
            }
            None => toasts.push(Toast { id, level, message }),
        }
    }

    /// Current toasts, oldest first
    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Take every toast that is no longer pending
    pub fn drain_settled(&self) -> Vec<Toast> {
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        let (settled, pending): (Vec<_>, Vec<_>) = toasts
            .drain(..)
            .partition(|t| t.level != ToastLevel::Pending);
        *toasts = pending;
        settled
    }
}
