//! Modal controller
//!
//! Tracks which modal is open and the record it is about. Closing always
//! resets both.

use std::fmt;

use crate::models::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    #[default]
    None,
    Add,
    Edit,
    View,
    ConfirmDelete,
}

impl ModalMode {
    /// Whether a click on the backdrop dismisses this mode
    pub fn closes_on_backdrop(&self) -> bool {
        matches!(self, ModalMode::Add | ModalMode::Edit | ModalMode::View)
    }
}

impl fmt::Display for ModalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModalMode::None => "none",
            ModalMode::Add => "add",
            ModalMode::Edit => "edit",
            ModalMode::View => "view",
            ModalMode::ConfirmDelete => "confirm delete",
        };
        f.write_str(name)
    }
}

/// Keyboard input the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Where a pointer click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed overlay around the modal
    Backdrop,
    /// Anywhere inside the modal itself
    Body,
}

#[derive(Debug)]
pub struct ModalController<E: Entity> {
    mode: ModalMode,
    subject: Option<E>,
}

impl<E: Entity> Default for ModalController<E> {
    fn default() -> Self {
        Self {
            mode: ModalMode::None,
            subject: None,
        }
    }
}

impl<E: Entity> ModalController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, mode: ModalMode, subject: Option<E>) {
        tracing::debug!(kind = %E::KIND, %mode, subject = subject.as_ref().map(|s| s.id()), "modal opened");
        self.mode = mode;
        self.subject = subject;
    }

    pub fn close(&mut self) {
        self.mode = ModalMode::None;
        self.subject = None;
    }

    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    pub fn subject(&self) -> Option<&E> {
        self.subject.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.mode != ModalMode::None
    }

    /// Returns true when the key closed the modal
    pub fn handle_key(&mut self, key: Key) -> bool {
        if key == Key::Escape && self.is_open() {
            self.close();
            return true;
        }
        false
    }

    /// Returns true when the click closed the modal
    pub fn click(&mut self, target: ClickTarget) -> bool {
        if target == ClickTarget::Backdrop && self.mode.closes_on_backdrop() {
            self.close();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::News;
    use proptest::prelude::*;
    use serde_json::json;

    fn news() -> News {
        serde_json::from_value(json!({ "_id": "n1", "title": "Exam schedule" })).unwrap()
    }

    fn any_open_mode() -> impl Strategy<Value = ModalMode> {
        prop_oneof![
            Just(ModalMode::Add),
            Just(ModalMode::Edit),
            Just(ModalMode::View),
            Just(ModalMode::ConfirmDelete),
        ]
    }

    #[test]
    fn test_open_then_close_resets() {
        let mut modal = ModalController::new();
        modal.open(ModalMode::Edit, Some(news()));
        assert_eq!(modal.mode(), ModalMode::Edit);
        assert_eq!(modal.subject().map(|n| n.id.as_str()), Some("n1"));

        modal.close();
        assert_eq!(modal.mode(), ModalMode::None);
        assert!(modal.subject().is_none());
    }

    #[test]
    fn test_backdrop_does_not_close_confirm_delete() {
        let mut modal = ModalController::new();
        modal.open(ModalMode::ConfirmDelete, Some(news()));
        assert!(!modal.click(ClickTarget::Backdrop));
        assert_eq!(modal.mode(), ModalMode::ConfirmDelete);

        assert!(modal.handle_key(Key::Escape));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_backdrop_closes_view() {
        let mut modal = ModalController::new();
        modal.open(ModalMode::View, Some(news()));
        assert!(modal.click(ClickTarget::Backdrop));
        assert!(modal.subject().is_none());
    }

    #[test]
    fn test_escape_when_closed_is_noop() {
        let mut modal = ModalController::<News>::new();
        assert!(!modal.handle_key(Key::Escape));
        assert!(!modal.handle_key(Key::Other));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn prop_escape_always_closes(mode in any_open_mode()) {
            let mut modal = ModalController::new();
            modal.open(mode, Some(news()));
            prop_assert!(modal.handle_key(Key::Escape));
            prop_assert_eq!(modal.mode(), ModalMode::None);
            prop_assert!(modal.subject().is_none());
        }

        #[test]
        fn prop_body_click_never_closes(mode in any_open_mode()) {
            let mut modal = ModalController::new();
            modal.open(mode, Some(news()));
            prop_assert!(!modal.click(ClickTarget::Body));
            prop_assert_eq!(modal.mode(), mode);
        }
    }
}
