//! Data models
//!
//! This module contains the record and draft types exchanged with the
//! institute backend. Models represent:
//! - Records as returned by the backend (Course, Blog, News, Student)
//! - Drafts, the form-side values that are submitted on create/update
//! - Small aggregate payloads such as the course status count

mod blog;
mod course;
pub mod lenient;
mod news;
mod student;

pub use blog::{Blog, BlogCategory, BlogDraft};
pub use course::{Course, CourseCategory, CourseDraft, CourseStatusCount, DurationUnit};
pub use news::{News, NewsDraft};
pub use student::Student;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// The resource families the console manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Blog,
    News,
    Student,
}

impl EntityKind {
    /// Human readable singular name, used in notifications
    pub fn noun(&self) -> &'static str {
        match self {
            EntityKind::Course => "Course",
            EntityKind::Blog => "Blog",
            EntityKind::News => "News",
            EntityKind::Student => "Student",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// A record persisted by the backend.
pub trait Entity: Clone + fmt::Debug + Send + Sync + DeserializeOwned + 'static {
    const KIND: EntityKind;

    /// Backend-assigned identifier
    fn id(&self) -> &str;

    /// Short name shown in confirmation prompts
    fn label(&self) -> &str;
}

/// A record type the console can create, update and delete.
pub trait Editable: Entity {
    type Draft: Draft<Record = Self>;
}

/// Form-side state of an entity being created or edited.
///
/// Fields are addressed by their wire names so a form can be driven from
/// plain `(name, value)` input events.
pub trait Draft: Serialize + Clone + Default + fmt::Debug + Send + Sync + 'static {
    type Record: Entity;

    /// Wire names of the editable fields, in display order
    const FIELDS: &'static [&'static str];

    /// Seed a draft from an existing record
    fn from_record(record: &Self::Record) -> Self;

    /// Apply one input edit, including any derived-field updates
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError>;

    /// Current text of a field as the form would display it
    fn field(&self, field: &str) -> Option<String>;
}

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value '{value}' for {field}")]
    InvalidChoice { field: &'static str, value: String },
}

/// Parse a select-style input; the empty string clears the choice.
pub(crate) fn parse_choice<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<Option<T>, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| FieldError::InvalidChoice {
            field,
            value: value.to_string(),
        })
}

/// Parse a checkbox-style input
pub(crate) fn parse_flag(field: &'static str, value: &str) -> Result<bool, FieldError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(FieldError::InvalidChoice {
            field,
            value: other.to_string(),
        }),
    }
}
