//! Course model
//!
//! This module defines the Course record, its form draft, and the
//! active/inactive status count shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{lenient, parse_choice, parse_flag, Draft, Editable, Entity, EntityKind, FieldError};
use crate::form::derive;

/// Course category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseCategory {
    Basic,
    Advance,
    Programming,
    Office,
}

impl CourseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseCategory::Basic => "basic",
            CourseCategory::Advance => "advance",
            CourseCategory::Programming => "programming",
            CourseCategory::Office => "office",
        }
    }

    /// Capitalized label for tables
    pub fn label(&self) -> &'static str {
        match self {
            CourseCategory::Basic => "Basic",
            CourseCategory::Advance => "Advance",
            CourseCategory::Programming => "Programming",
            CourseCategory::Office => "Office",
        }
    }
}

impl FromStr for CourseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(CourseCategory::Basic),
            "advance" => Ok(CourseCategory::Advance),
            "programming" => Ok(CourseCategory::Programming),
            "office" => Ok(CourseCategory::Office),
            _ => Err(format!("Invalid course category: {}", s)),
        }
    }
}

/// Unit of a course's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Day,
    Week,
    #[default]
    Month,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
            DurationUnit::Month => "month",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(DurationUnit::Day),
            "week" => Ok(DurationUnit::Week),
            "month" => Ok(DurationUnit::Month),
            _ => Err(format!("Invalid duration unit: {}", s)),
        }
    }
}

/// Course record as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub course_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_choice")]
    pub category: Option<CourseCategory>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient::choice_or_default")]
    pub duration_type: DurationUnit,
    /// Enrolled student count
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub students: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub short_students: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub fee_per_duration: Option<f64>,
    #[serde(default = "lenient::active_default", deserialize_with = "lenient::active_flag")]
    pub active_status: bool,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Short enrolled-student label, derived when the backend did not store one
    pub fn short_students_label(&self) -> String {
        match (&self.short_students, self.students) {
            (Some(label), _) => label.clone(),
            (None, Some(count)) => derive::short_count(count),
            (None, None) => String::new(),
        }
    }

    /// Duration with its unit, e.g. "3 month"
    pub fn duration_label(&self) -> String {
        match self.duration {
            Some(d) => format!("{} {}", d, self.duration_type),
            None => String::new(),
        }
    }
}

impl Entity for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.course_name
    }
}

impl Editable for Course {
    type Draft = CourseDraft;
}

/// Course form draft.
///
/// Numeric inputs are kept as typed text, exactly as a form would submit
/// them; `feePerDuration` and `shortStudents` are derived on edit.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub image: String,
    pub course_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CourseCategory>,
    pub duration: String,
    pub duration_type: DurationUnit,
    pub students: String,
    pub short_students: String,
    pub rating: String,
    pub total_fee: String,
    pub fee_per_duration: String,
    pub active_status: bool,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            image: String::new(),
            course_name: String::new(),
            description: String::new(),
            category: None,
            duration: String::new(),
            duration_type: DurationUnit::Month,
            students: String::new(),
            short_students: String::new(),
            rating: String::new(),
            total_fee: String::new(),
            fee_per_duration: String::new(),
            active_status: true,
        }
    }
}

fn number_text(value: Option<f64>) -> String {
    value.map(derive::format_number).unwrap_or_default()
}

impl Draft for CourseDraft {
    type Record = Course;

    const FIELDS: &'static [&'static str] = &[
        "image",
        "courseName",
        "description",
        "category",
        "duration",
        "durationType",
        "students",
        "rating",
        "totalFee",
        "feePerDuration",
        "activeStatus",
    ];

    fn from_record(course: &Course) -> Self {
        Self {
            image: course.image.clone(),
            course_name: course.course_name.clone(),
            description: course.description.clone(),
            category: course.category,
            duration: course.duration.map(|d| d.to_string()).unwrap_or_default(),
            duration_type: course.duration_type,
            students: course.students.map(|s| s.to_string()).unwrap_or_default(),
            short_students: course.short_students_label(),
            rating: number_text(course.rating),
            total_fee: number_text(course.total_fee),
            fee_per_duration: number_text(course.fee_per_duration),
            active_status: course.active_status,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "image" => self.image = value.to_string(),
            "courseName" => self.course_name = value.to_string(),
            "description" => self.description = value.to_string(),
            "category" => self.category = parse_choice("category", value)?,
            "durationType" => {
                self.duration_type =
                    parse_choice("durationType", value)?.unwrap_or_default();
            }
            "rating" => self.rating = value.to_string(),
            "activeStatus" => self.active_status = parse_flag("activeStatus", value)?,
            "duration" => {
                self.duration = value.to_string();
                if !self.total_fee.trim().is_empty() {
                    self.fee_per_duration =
                        derive::fee_per_duration(&self.total_fee, &self.duration);
                }
            }
            "totalFee" => {
                self.total_fee = value.to_string();
                self.fee_per_duration = derive::fee_per_duration(&self.total_fee, &self.duration);
            }
            "feePerDuration" => {
                self.fee_per_duration = value.to_string();
                self.total_fee = derive::total_fee(&self.fee_per_duration, &self.duration);
            }
            "students" => {
                self.students = value.to_string();
                self.short_students = derive::short_count_input(value);
            }
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, field: &str) -> Option<String> {
        let value = match field {
            "image" => self.image.clone(),
            "courseName" => self.course_name.clone(),
            "description" => self.description.clone(),
            "category" => self.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
            "duration" => self.duration.clone(),
            "durationType" => self.duration_type.as_str().to_string(),
            "students" => self.students.clone(),
            "shortStudents" => self.short_students.clone(),
            "rating" => self.rating.clone(),
            "totalFee" => self.total_fee.clone(),
            "feePerDuration" => self.fee_per_duration.clone(),
            "activeStatus" => self.active_status.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Active/inactive course totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStatusCount {
    #[serde(default)]
    pub active_courses: u64,
    #[serde(default)]
    pub inactive_courses: u64,
}

impl CourseStatusCount {
    pub fn total(&self) -> u64 {
        self.active_courses + self.inactive_courses
    }
}
