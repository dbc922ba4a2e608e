//! Table view
//!
//! Renders a list store as a plain-text table and turns row actions into
//! modal transitions. The delete-confirmation flow lives here too, since it
//! ties the modal, the client and the store together.

use chrono::{DateTime, TimeZone};
use std::fmt;

use crate::client::CrudApi;
use crate::lifetime::Lifetime;
use crate::modal::{ModalController, ModalMode};
use crate::models::{Blog, Course, Editable, Entity, News, Student};
use crate::notify::ToastQueue;
use crate::store::ListStore;

/// A record type that can be shown as a table row
pub trait Tabular: Entity {
    /// Column headers, without the leading serial column
    const COLUMNS: &'static [&'static str];

    /// Index into `COLUMNS` of the active/inactive column, if any
    const STATUS_COLUMN: Option<usize> = None;

    fn cells(&self) -> Vec<String>;

    /// Labelled fields for the view modal
    fn details(&self) -> Vec<(&'static str, String)>;
}

/// `dd/mm/yyyy`, or empty when the date is unknown
pub fn format_date<Tz>(date: Option<DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
}

/// Whole rupees with Indian digit grouping, e.g. `₹ 12,34,567`
pub fn format_inr(amount: Option<f64>) -> String {
    let rupees = amount.unwrap_or(0.0).round();
    let negative = rupees < 0.0;
    let digits = format!("{}", rupees.abs() as u64);

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    format!("₹ {}{}", if negative { "-" } else { "" }, grouped)
}

fn status_label(active: bool) -> String {
    let label = if active { "active" } else { "inactive" };
    label.to_string()
}

impl Tabular for Course {
    const COLUMNS: &'static [&'static str] = &[
        "Course",
        "Category",
        "Date Created",
        "Total Fee",
        "Duration",
        "Status",
    ];
    const STATUS_COLUMN: Option<usize> = Some(5);

    fn cells(&self) -> Vec<String> {
        vec![
            self.course_name.clone(),
            self.category.map(|c| c.label().to_string()).unwrap_or_default(),
            format_date(self.created_at),
            format_inr(self.total_fee),
            self.duration_label(),
            status_label(self.active_status),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Course", self.course_name.clone()),
            ("Description", self.description.clone()),
            ("Image", self.image.clone()),
            ("Category", self.category.map(|c| c.label().to_string()).unwrap_or_default()),
            ("Duration", self.duration_label()),
            ("Students", self.short_students_label()),
            ("Rating", self.rating.map(|r| r.to_string()).unwrap_or_default()),
            ("Total Fee", format_inr(self.total_fee)),
            (
                "Fee per Duration",
                self.fee_per_duration.map(|f| format_inr(Some(f))).unwrap_or_default(),
            ),
            ("Status", status_label(self.active_status)),
            ("Created", format_date(self.created_at)),
        ]
    }
}

impl Tabular for Blog {
    const COLUMNS: &'static [&'static str] = &["Title", "Category", "Author", "Date Created"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
            self.author.clone(),
            format_date(self.created_at),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Short Description", self.short_description.clone()),
            ("Image", self.image.clone()),
            ("Author", self.author.clone()),
            ("Category", self.category.map(|c| c.as_str().to_string()).unwrap_or_default()),
            ("Tags", self.tags.join(", ")),
            (
                "Reading Time",
                self.reading_time.map(|m| format!("{} min", m)).unwrap_or_default(),
            ),
            ("Content", self.content.clone()),
            ("Created", format_date(self.created_at)),
        ]
    }
}

impl Tabular for News {
    const COLUMNS: &'static [&'static str] = &["Title", "Short Description", "Published"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.short_description.clone(),
            format_date(self.date_published),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Short Description", self.short_description.clone()),
            ("Image", self.image.clone()),
            ("Published", format_date(self.date_published)),
            ("Source", self.source_link.clone().unwrap_or_default()),
            ("Content", self.content.clone()),
        ]
    }
}

impl Tabular for Student {
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Gender", "Courses", "Joined On"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.email.clone(),
            self.gender.clone().unwrap_or_default(),
            self.courses.len().to_string(),
            format_date(self.created_at),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.full_name()),
            ("Email", self.email.clone()),
            ("Image", self.image.clone()),
            ("Gender", self.gender.clone().unwrap_or_default()),
            ("Courses", self.courses.join(", ")),
            ("Joined On", format_date(self.created_at)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Placeholder shown while loading
    Skeleton,
    Data { serial: u64, cells: Vec<String> },
}

/// Row actions offered by every table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

impl RowAction {
    fn mode(&self) -> ModalMode {
        match self {
            RowAction::View => ModalMode::View,
            RowAction::Edit => ModalMode::Edit,
            RowAction::Delete => ModalMode::ConfirmDelete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
    /// No delete confirmation was open
    NothingToDelete,
    /// The screen ended before the response arrived
    Abandoned,
}

const SKELETON_CELL: &str = "░░░░";

#[derive(Debug, Clone, Copy)]
pub struct TableView {
    skeleton_rows: usize,
}

impl TableView {
    pub fn new(skeleton_rows: usize) -> Self {
        Self { skeleton_rows }
    }

    /// Skeleton rows while loading, otherwise one row per record in server order
    pub fn rows<E, F>(&self, store: &ListStore<E>, status: F) -> Vec<Row>
    where
        E: Tabular,
        F: Fn(&E) -> Option<bool>,
    {
        if store.is_loading() {
            return vec![Row::Skeleton; self.skeleton_rows];
        }
        store
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let mut cells = record.cells();
                if let (Some(column), Some(active)) = (E::STATUS_COLUMN, status(record)) {
                    if let Some(cell) = cells.get_mut(column) {
                        *cell = status_label(active);
                    }
                }
                Row::Data {
                    serial: store.serial(index),
                    cells,
                }
            })
            .collect()
    }

    /// Plain-text table with a header row. `status` overrides the status
    /// column with toggle state the list has not been refreshed with.
    pub fn render<E, F>(&self, store: &ListStore<E>, status: F) -> String
    where
        E: Tabular,
        F: Fn(&E) -> Option<bool>,
    {
        let rows = self.rows(store, status);
        let mut lines: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        lines.push(
            std::iter::once("Sl".to_string())
                .chain(E::COLUMNS.iter().map(|c| c.to_string()))
                .collect(),
        );
        for row in rows {
            lines.push(match row {
                Row::Skeleton => vec![SKELETON_CELL.to_string(); E::COLUMNS.len() + 1],
                Row::Data { serial, cells } => {
                    std::iter::once(serial.to_string()).chain(cells).collect()
                }
            });
        }

        let mut widths = vec![0usize; E::COLUMNS.len() + 1];
        for line in &lines {
            for (i, cell) in line.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        for (n, line) in lines.iter().enumerate() {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            out.push_str(padded.join(" | ").trim_end());
            out.push('\n');
            if n == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                out.push_str(&rule.join("-+-"));
                out.push('\n');
            }
        }
        if !store.is_loading() && store.records().is_empty() {
            out.push_str("(no records)\n");
        }
        out
    }

    /// Open the modal for the record at `index` on the current page.
    /// Returns false when there is no such row.
    pub fn act<E: Entity>(
        &self,
        store: &ListStore<E>,
        modal: &mut ModalController<E>,
        index: usize,
        action: RowAction,
    ) -> bool {
        match store.get(index) {
            Some(record) => {
                modal.open(action.mode(), Some(record.clone()));
                true
            }
            None => false,
        }
    }
}

/// Delete the record awaiting confirmation.
///
/// The modal closes whatever the outcome; the list is refetched only when
/// the delete call succeeded.
pub async fn confirm_delete<E, A>(
    api: &A,
    store: &mut ListStore<E>,
    modal: &mut ModalController<E>,
    toasts: &ToastQueue,
    lifetime: &Lifetime,
) -> DeleteOutcome
where
    E: Editable,
    A: CrudApi<E> + ?Sized,
{
    let id = match (modal.mode(), modal.subject()) {
        (ModalMode::ConfirmDelete, Some(subject)) => subject.id().to_string(),
        _ => return DeleteOutcome::NothingToDelete,
    };

    let result = api.delete(&id).await;
    match &result {
        Ok(()) => {
            tracing::info!(kind = %E::KIND, %id, "record deleted");
            toasts.success(format!("{} deleted successfully!", E::KIND));
        }
        Err(e) => {
            tracing::warn!(kind = %E::KIND, %id, error = %e, "failed to delete record");
            toasts.error(format!("Failed to delete {}!", E::KIND.noun().to_lowercase()));
        }
    }

    if !lifetime.is_alive() {
        return DeleteOutcome::Abandoned;
    }
    modal.close();

    match result {
        Ok(()) => {
            store.refresh(api, lifetime).await;
            DeleteOutcome::Deleted
        }
        Err(_) => DeleteOutcome::Failed,
    }
}
