//! Read-only students screen

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::DropGuard;

use super::{render_fields, row_index, Screen, ScreenError};
use crate::client::ListApi;
use crate::config::UiConfig;
use crate::lifetime::Lifetime;
use crate::modal::{ClickTarget, Key, ModalController, ModalMode};
use crate::models::Student;
use crate::store::ListStore;
use crate::table::{RowAction, TableView, Tabular};

pub struct StudentsScreen {
    api: Arc<dyn ListApi<Student>>,
    store: ListStore<Student>,
    modal: ModalController<Student>,
    table: TableView,
    lifetime: Lifetime,
    _end_on_drop: DropGuard,
}

impl StudentsScreen {
    pub fn new(api: Arc<dyn ListApi<Student>>, ui: &UiConfig, parent: &Lifetime) -> Self {
        let lifetime = parent.child();
        Self {
            api,
            store: ListStore::new(),
            modal: ModalController::new(),
            table: TableView::new(ui.skeleton_rows),
            _end_on_drop: lifetime.end_on_drop(),
            lifetime,
        }
    }

    pub fn store(&self) -> &ListStore<Student> {
        &self.store
    }

    pub fn modal(&self) -> &ModalController<Student> {
        &self.modal
    }
}

#[async_trait]
impl Screen for StudentsScreen {
    fn title(&self) -> &'static str {
        "Students"
    }

    async fn refresh(&mut self) {
        self.store.refresh(self.api.as_ref(), &self.lifetime).await;
    }

    fn render(&self) -> String {
        let mut out = String::from("== Students ==\n");
        out.push_str(&self.table.render(&self.store, |_| None));
        if let Some(error) = self.store.error() {
            out.push_str(&format!("last refresh failed: {}\n", error));
        }
        if let (ModalMode::View, Some(student)) = (self.modal.mode(), self.modal.subject()) {
            out.push_str(&format!("\n[Student details]\n{}", render_fields(student.details())));
        }
        out
    }

    fn row_action(&mut self, row: usize, action: RowAction) -> Result<(), ScreenError> {
        if action != RowAction::View {
            return Err(ScreenError::Unsupported(match action {
                RowAction::Edit => "edit",
                _ => "delete",
            }));
        }
        if self.table.act(&self.store, &mut self.modal, row_index(row)?, action) {
            Ok(())
        } else {
            Err(ScreenError::NoSuchRow(row))
        }
    }

    fn cancel(&mut self) -> bool {
        let open = self.modal.is_open();
        self.modal.close();
        open
    }

    fn escape(&mut self) -> bool {
        self.modal.handle_key(Key::Escape)
    }

    fn click(&mut self, target: ClickTarget) -> bool {
        self.modal.click(target)
    }
}
