//! Generic list-table-modal screen for editable entities

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::DropGuard;

use super::{render_fields, row_index, Screen, ScreenError};
use crate::client::{CourseStatusApi, CrudApi};
use crate::config::UiConfig;
use crate::form::{EntityForm, SubmitReport};
use crate::lifetime::Lifetime;
use crate::modal::{ClickTarget, Key, ModalController, ModalMode};
use crate::models::{Course, Editable, Entity};
use crate::notify::ToastQueue;
use crate::store::{ListStore, Refresh};
use crate::table::{confirm_delete, DeleteOutcome, RowAction, TableView, Tabular};
use crate::toggle::{StatusToggle, ToggleOutcome};

/// Per-row status toggles, created on first use from the row's record
struct ToggleSet<E> {
    api: Arc<dyn CourseStatusApi>,
    initial: fn(&E) -> bool,
    toggles: HashMap<String, Arc<StatusToggle>>,
}

impl<E: Entity> ToggleSet<E> {
    fn get_or_seed(&mut self, record: &E) -> Arc<StatusToggle> {
        let initial = self.initial;
        self.toggles
            .entry(record.id().to_string())
            .or_insert_with(|| Arc::new(StatusToggle::new(record.id(), initial(record))))
            .clone()
    }

    fn state(&self, record: &E) -> Option<bool> {
        self.toggles.get(record.id()).map(|t| t.is_active())
    }
}

pub struct CrudScreen<E: Editable + Tabular, A: CrudApi<E>> {
    title: &'static str,
    api: Arc<A>,
    toasts: Arc<ToastQueue>,
    store: ListStore<E>,
    modal: ModalController<E>,
    form: EntityForm<E>,
    table: TableView,
    toggles: Option<ToggleSet<E>>,
    close_form_on_failure: bool,
    lifetime: Lifetime,
    _end_on_drop: DropGuard,
}

impl<E, A> CrudScreen<E, A>
where
    E: Editable + Tabular,
    A: CrudApi<E> + 'static,
{
    /// A screen living under `parent`; it also ends when dropped.
    /// `paged` selects page-number pagination with `ui.page_size` rows.
    pub fn new(
        title: &'static str,
        api: Arc<A>,
        toasts: Arc<ToastQueue>,
        ui: &UiConfig,
        paged: bool,
        parent: &Lifetime,
    ) -> Self {
        let lifetime = parent.child();
        let store = if paged {
            ListStore::paged(ui.page_size)
        } else {
            ListStore::new()
        };
        Self {
            title,
            api,
            toasts,
            store,
            modal: ModalController::new(),
            form: EntityForm::new(None),
            table: TableView::new(ui.skeleton_rows),
            toggles: None,
            close_form_on_failure: ui.close_form_on_failure,
            _end_on_drop: lifetime.end_on_drop(),
            lifetime,
        }
    }

    pub fn store(&self) -> &ListStore<E> {
        &self.store
    }

    pub fn modal(&self) -> &ModalController<E> {
        &self.modal
    }

    pub fn form(&self) -> &EntityForm<E> {
        &self.form
    }

    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    fn record_at(&self, row: usize) -> Result<&E, ScreenError> {
        self.store.get(row_index(row)?).ok_or(ScreenError::NoSuchRow(row))
    }

    fn editing(&self) -> bool {
        matches!(self.modal.mode(), ModalMode::Add | ModalMode::Edit)
    }

    fn render_modal(&self) -> String {
        match (self.modal.mode(), self.modal.subject()) {
            (ModalMode::None, _) => String::new(),
            (ModalMode::Add, _) | (ModalMode::Edit, _) => {
                let heading = if self.form.is_update() {
                    format!("Edit {}", E::KIND)
                } else {
                    format!("Add {}", E::KIND)
                };
                format!("\n[{}]\n{}", heading, render_fields(self.form.fields()))
            }
            (ModalMode::View, Some(record)) => {
                format!("\n[{} details]\n{}", E::KIND, render_fields(record.details()))
            }
            (ModalMode::ConfirmDelete, Some(record)) => format!(
                "\n[Delete {}] Delete \"{}\"? (confirm / cancel)\n",
                E::KIND.noun().to_lowercase(),
                record.label()
            ),
            (_, None) => String::new(),
        }
    }
}

impl<A> CrudScreen<Course, A>
where
    A: CrudApi<Course> + CourseStatusApi + 'static,
{
    /// Offer a per-row active/inactive toggle
    pub fn with_status_toggle(mut self) -> Self {
        let api: Arc<dyn CourseStatusApi> = self.api.clone();
        self.toggles = Some(ToggleSet {
            api,
            initial: |course: &Course| course.active_status,
            toggles: HashMap::new(),
        });
        self
    }
}

#[async_trait]
impl<E, A> Screen for CrudScreen<E, A>
where
    E: Editable + Tabular,
    A: CrudApi<E> + 'static,
{
    fn title(&self) -> &'static str {
        self.title
    }

    async fn refresh(&mut self) {
        if let Refresh::Loaded(_) = self.store.refresh(self.api.as_ref(), &self.lifetime).await {
            if let Some(toggles) = &mut self.toggles {
                toggles.toggles.retain(|_, t| t.is_pending());
            }
        }
    }

    fn render(&self) -> String {
        let mut out = format!("== {} ==\n", self.title);
        let toggles = self.toggles.as_ref();
        out.push_str(
            &self
                .table
                .render(&self.store, |record| toggles.and_then(|t| t.state(record))),
        );
        if let Some(pager) = self.store.pager() {
            out.push_str(&format!(
                "page {}{}\n",
                pager.page(),
                if pager.can_prev() { "" } else { " (prev disabled)" }
            ));
        }
        if let Some(error) = self.store.error() {
            out.push_str(&format!("last refresh failed: {}\n", error));
        }
        out.push_str(&self.render_modal());
        out
    }

    fn next_page(&mut self) -> Result<(), ScreenError> {
        if self.store.next_page() {
            Ok(())
        } else {
            Err(ScreenError::Unsupported("next"))
        }
    }

    fn prev_page(&mut self) -> Result<(), ScreenError> {
        if self.store.pager().is_none() {
            return Err(ScreenError::Unsupported("prev"));
        }
        if self.store.prev_page() {
            Ok(())
        } else {
            Err(ScreenError::FirstPage)
        }
    }

    fn add(&mut self) -> Result<(), ScreenError> {
        self.form.set_seed(None);
        self.modal.open(ModalMode::Add, None);
        Ok(())
    }

    fn row_action(&mut self, row: usize, action: RowAction) -> Result<(), ScreenError> {
        let index = row_index(row)?;
        if !self.table.act(&self.store, &mut self.modal, index, action) {
            return Err(ScreenError::NoSuchRow(row));
        }
        if action == RowAction::Edit {
            self.form.set_seed(self.modal.subject().cloned());
        }
        Ok(())
    }

    async fn confirm(&mut self) -> Result<String, ScreenError> {
        let outcome = confirm_delete(
            self.api.as_ref(),
            &mut self.store,
            &mut self.modal,
            &self.toasts,
            &self.lifetime,
        )
        .await;
        match outcome {
            DeleteOutcome::Deleted => Ok(format!("{} deleted", E::KIND)),
            DeleteOutcome::Failed => Ok(format!("{} was not deleted", E::KIND)),
            DeleteOutcome::Abandoned => Ok(String::new()),
            DeleteOutcome::NothingToDelete => Err(ScreenError::NothingToConfirm),
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

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), ScreenError> {
        if !self.editing() {
            return Err(ScreenError::NoForm);
        }
        self.form
            .set_field(field, value)
            .map_err(|e| ScreenError::Form(e.into()))
    }

    async fn submit(&mut self) -> Result<String, ScreenError> {
        if !self.editing() {
            return Err(ScreenError::NoForm);
        }

        let mut report = SubmitReport::default();
        let result = self
            .form
            .submit(
                self.api.as_ref(),
                &self.toasts,
                &self.lifetime,
                &mut report,
                self.close_form_on_failure,
            )
            .await;

        if report.saved {
            self.store.refresh(self.api.as_ref(), &self.lifetime).await;
        }
        if report.closed {
            self.modal.close();
        }

        let record = result?;
        Ok(format!("Saved {} \"{}\"", E::KIND.noun().to_lowercase(), record.label()))
    }

    async fn toggle(&mut self, row: usize) -> Result<String, ScreenError> {
        let record = self.record_at(row)?.clone();
        let toggles = self
            .toggles
            .as_mut()
            .ok_or(ScreenError::Unsupported("toggle"))?;
        let toggle = toggles.get_or_seed(&record);
        let api = toggles.api.clone();

        Ok(match toggle.activate(api.as_ref(), &self.lifetime).await {
            ToggleOutcome::Toggled(true) => format!("\"{}\" is now active", record.label()),
            ToggleOutcome::Toggled(false) => format!("\"{}\" is now inactive", record.label()),
            ToggleOutcome::Ignored => "Toggle already in progress".to_string(),
            ToggleOutcome::Failed => format!("Could not change the status of \"{}\"", record.label()),
            ToggleOutcome::Abandoned => String::new(),
        })
    }
}
