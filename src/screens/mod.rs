//! Screens
//!
//! A screen owns the state of one page of the console: its list store,
//! modal, form and lifetime. The CRUD screen is generic over the entity and
//! is shared by Courses, Blog and News; Students and the Dashboard have
//! their own, smaller screens.

mod crud;
mod dashboard;
mod students;

pub use crud::CrudScreen;
pub use dashboard::{pad2, Dashboard, DashboardTotals};
pub use students::StudentsScreen;

use async_trait::async_trait;

use crate::form::FormError;
use crate::modal::ClickTarget;
use crate::table::RowAction;

/// Error types for screen operations
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// The action does not exist on this screen
    #[error("'{0}' is not available on this screen")]
    Unsupported(&'static str),

    /// Row numbers are 1-based positions on the current page
    #[error("No row {0} on this page")]
    NoSuchRow(usize),

    #[error("No form is open")]
    NoForm,

    #[error("No delete is awaiting confirmation")]
    NothingToConfirm,

    #[error("Already on the first page")]
    FirstPage,

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Actions the console can send to whichever screen is mounted.
///
/// Every action has a default that reports it as unsupported, so read-only
/// screens only implement what they offer.
#[async_trait]
pub trait Screen: Send {
    fn title(&self) -> &'static str;

    /// Refetch everything the screen shows
    async fn refresh(&mut self);

    fn render(&self) -> String;

    fn next_page(&mut self) -> Result<(), ScreenError> {
        Err(ScreenError::Unsupported("next"))
    }

    fn prev_page(&mut self) -> Result<(), ScreenError> {
        Err(ScreenError::Unsupported("prev"))
    }

    fn add(&mut self) -> Result<(), ScreenError> {
        Err(ScreenError::Unsupported("add"))
    }

    fn row_action(&mut self, _row: usize, action: RowAction) -> Result<(), ScreenError> {
        Err(ScreenError::Unsupported(match action {
            RowAction::View => "view",
            RowAction::Edit => "edit",
            RowAction::Delete => "delete",
        }))
    }

    async fn confirm(&mut self) -> Result<String, ScreenError> {
        Err(ScreenError::Unsupported("confirm"))
    }

    /// Dismiss whatever modal is open. Returns true if one was.
    fn cancel(&mut self) -> bool {
        false
    }

    /// Escape key. Returns true if a modal closed.
    fn escape(&mut self) -> bool {
        false
    }

    /// Pointer click. Returns true if a modal closed.
    fn click(&mut self, _target: ClickTarget) -> bool {
        false
    }

    fn set_field(&mut self, _field: &str, _value: &str) -> Result<(), ScreenError> {
        Err(ScreenError::Unsupported("set"))
    }

    async fn submit(&mut self) -> Result<String, ScreenError> {
        Err(ScreenError::Unsupported("submit"))
    }

    async fn toggle(&mut self, _row: usize) -> Result<String, ScreenError> {
        Err(ScreenError::Unsupported("toggle"))
    }
}

/// Convert a 1-based row number to a page index
pub(crate) fn row_index(row: usize) -> Result<usize, ScreenError> {
    row.checked_sub(1).ok_or(ScreenError::NoSuchRow(row))
}

/// Render labelled fields, one per line
pub(crate) fn render_fields<'a>(fields: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let fields: Vec<_> = fields.into_iter().collect();
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(name, value)| format!("  {:<width$} : {}\n", name, value, width = width))
        .collect()
}
