//! Entity form
//!
//! A controlled form bound to one draft. The draft is seeded from the record
//! being edited (or defaults when adding) and re-seeded whenever the seed
//! changes. Submitting sends the draft through the resource client and
//! reports the outcome to a [`FormListener`].

pub mod derive;

use crate::client::{ClientError, CrudApi};
use crate::lifetime::{Ended, Lifetime};
use crate::models::{Draft, Editable, Entity, EntityKind, FieldError};
use crate::notify::{ToastLevel, ToastQueue};

/// Error types for form operations
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Input rejected by the draft
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The backend call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The screen closed while the request was in flight
    #[error(transparent)]
    Ended(#[from] Ended),
}

/// Receives the outcome of a submit
pub trait FormListener {
    /// The record was persisted; the owning list should refresh
    fn on_saved(&mut self);

    /// The form should be dismissed
    fn on_close(&mut self);
}

/// Listener that only remembers what it was told
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReport {
    pub saved: bool,
    pub closed: bool,
}

impl FormListener for SubmitReport {
    fn on_saved(&mut self) {
        self.saved = true;
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}

fn saved_message(kind: EntityKind, update: bool) -> String {
    match (kind, update) {
        (EntityKind::Course, false) => "Course added".to_string(),
        (EntityKind::Course, true) => "Course updated".to_string(),
        (kind, false) => format!("{} created successfully", kind),
        (kind, true) => format!("{} updated successfully", kind),
    }
}

#[derive(Debug)]
pub struct EntityForm<E: Editable> {
    seed: Option<E>,
    draft: E::Draft,
}

impl<E: Editable> Default for EntityForm<E> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<E: Editable> EntityForm<E> {
    pub fn new(seed: Option<E>) -> Self {
        let draft = seed.as_ref().map(E::Draft::from_record).unwrap_or_default();
        Self {
            seed,
            draft,
        }
    }

    /// Replace the seed and re-initialize the draft from it
    pub fn set_seed(&mut self, seed: Option<E>) {
        self.draft = seed.as_ref().map(E::Draft::from_record).unwrap_or_default();
        self.seed = seed;
    }

    pub fn seed(&self) -> Option<&E> {
        self.seed.as_ref()
    }

    pub fn draft(&self) -> &E::Draft {
        &self.draft
    }

    /// True when submitting will update an existing record
    pub fn is_update(&self) -> bool {
        self.seed.is_some()
    }

    /// Apply one input edit by wire name
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        self.draft.set_field(field, value)
    }

    pub fn field(&self, field: &str) -> Option<String> {
        self.draft.field(field)
    }

    /// `(name, value)` pairs of the editable fields, in display order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        <E::Draft as Draft>::FIELDS
            .iter()
            .map(|name| (*name, self.draft.field(name).unwrap_or_default()))
            .collect()
    }

    /// Create or update the record.
    ///
    /// On success the listener hears `on_saved` then `on_close`. On failure
    /// `on_close` is only called when `close_on_failure` is set; otherwise
    /// the form stays open with the draft untouched. If the lifetime ends
    /// while the request is in flight the listener hears nothing.
    pub async fn submit<A, L>(
        &mut self,
        api: &A,
        toasts: &ToastQueue,
        lifetime: &Lifetime,
        listener: &mut L,
        close_on_failure: bool,
    ) -> Result<E, FormError>
    where
        A: CrudApi<E> + ?Sized,
        L: FormListener + ?Sized,
    {
        let update = self.seed.as_ref().map(|seed| seed.id().to_string());
        let toast = toasts.pending(if update.is_some() { "Updating..." } else { "Saving..." });

        let result = match &update {
            Some(id) => api.update(id, &self.draft).await,
            None => api.create(&self.draft).await,
        };

        // Toasts outlive the screen, so the outcome is always shown.
        let (level, message) = match &result {
            Ok(_) => (ToastLevel::Success, saved_message(E::KIND, update.is_some())),
            Err(_) => (ToastLevel::Error, "Something went wrong".to_string()),
        };
        toasts.resolve(toast, level, message);

        if !lifetime.is_alive() {
            tracing::debug!(kind = %E::KIND, "form closed before submit finished");
            return Err(Ended.into());
        }

        match result {
            Ok(record) => {
                tracing::info!(kind = %E::KIND, id = %record.id(), update = update.is_some(), "record saved");
                listener.on_saved();
                listener.on_close();
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(kind = %E::KIND, error = %e, "failed to save record");
                if close_on_failure {
                    listener.on_close();
                }
                Err(e.into())
            }
        }
    }
}
