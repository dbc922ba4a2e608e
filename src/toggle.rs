//! Status toggle
//!
//! Two-state control for a course's active flag. The displayed state only
//! changes when the server reports the new one; there is no optimistic flip.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::CourseStatusApi;
use crate::lifetime::Lifetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A request was already in flight; nothing was sent
    Ignored,
    /// The server reported this new state
    Toggled(bool),
    /// The request failed; the state is unchanged
    Failed,
    /// The screen ended before the response arrived
    Abandoned,
}

#[derive(Debug)]
pub struct StatusToggle {
    id: String,
    active: AtomicBool,
    pending: AtomicBool,
}

impl StatusToggle {
    pub fn new(id: impl Into<String>, active: bool) -> Self {
        Self {
            id: id.into(),
            active: AtomicBool::new(active),
            pending: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Flip the flag through the server. Activations while a request is in
    /// flight are dropped, not queued.
    pub async fn activate<A>(&self, api: &A, lifetime: &Lifetime) -> ToggleOutcome
    where
        A: CourseStatusApi + ?Sized,
    {
        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(id = %self.id, "toggle already pending, ignoring");
            return ToggleOutcome::Ignored;
        }

        let result = lifetime.settle(api.toggle_active(&self.id)).await;
        self.pending.store(false, Ordering::SeqCst);

        match result {
            Ok(Ok(active)) => {
                self.active.store(active, Ordering::SeqCst);
                tracing::info!(id = %self.id, active, "course status toggled");
                ToggleOutcome::Toggled(active)
            }
            Ok(Err(e)) => {
                tracing::warn!(id = %self.id, error = %e, "failed to toggle course status");
                ToggleOutcome::Failed
            }
            Err(_) => ToggleOutcome::Abandoned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;
    use crate::models::Course;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    fn course(active: bool) -> Course {
        serde_json::from_value(json!({ "_id": "c1", "activeStatus": active })).unwrap()
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let api = MockApi::new(vec![course(true)]);
        let toggle = StatusToggle::new("c1", true);
        let lifetime = Lifetime::new();

        assert_eq!(toggle.activate(&api, &lifetime).await, ToggleOutcome::Toggled(false));
        assert!(!toggle.is_active());
        assert_eq!(toggle.activate(&api, &lifetime).await, ToggleOutcome::Toggled(true));
        assert!(toggle.is_active());
        assert_eq!(api.call_count("toggle"), 2);
    }

    #[tokio::test]
    async fn test_activation_while_pending_is_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let api = Arc::new(MockApi::new(vec![course(true)]).with_toggle_gate(gate.clone()));
        let toggle = Arc::new(StatusToggle::new("c1", true));

        let first = {
            let api = api.clone();
            let toggle = toggle.clone();
            tokio::spawn(async move { toggle.activate(api.as_ref(), &Lifetime::new()).await })
        };

        while !toggle.is_pending() {
            tokio::task::yield_now().await;
        }

        let second = toggle.activate(api.as_ref(), &Lifetime::new()).await;
        assert_eq!(second, ToggleOutcome::Ignored);

        gate.add_permits(1);
        assert_eq!(first.await.unwrap(), ToggleOutcome::Toggled(false));
        assert_eq!(api.call_count("toggle"), 1);
        assert!(!toggle.is_pending());
    }

    #[tokio::test]
    async fn test_failure_keeps_state_and_clears_pending() {
        let api = MockApi::new(vec![course(false)]);
        api.set_fail_writes(true);
        let toggle = StatusToggle::new("c1", false);

        assert_eq!(toggle.activate(&api, &Lifetime::new()).await, ToggleOutcome::Failed);
        assert!(!toggle.is_active());
        assert!(!toggle.is_pending());
    }

    #[tokio::test]
    async fn test_ended_lifetime_discards_result() {
        let api = MockApi::new(vec![course(true)]);
        let toggle = StatusToggle::new("c1", true);
        let lifetime = Lifetime::new();
        lifetime.end();

        assert_eq!(toggle.activate(&api, &lifetime).await, ToggleOutcome::Abandoned);
        assert!(toggle.is_active());
        assert_eq!(api.call_count("toggle"), 1);
    }
}
