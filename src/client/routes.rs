//! Backend routes per entity
//!
//! Paths are relative to the entity family's configured prefix
//! (`/courseapi`, `/blogapi`, ...). Update and delete paths get the
//! percent-encoded record id appended.

use crate::models::{Blog, Course, Editable, Entity, News, Student};

/// How a count endpoint reports its total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountShape {
    /// `{ "count": n }`
    Count,
    /// `{ "data": { "activeCourses": a, "inactiveCourses": i } }`
    StatusTotals,
}

/// Read routes of an entity
pub trait Routed: Entity {
    const LIST: &'static str;
    /// Envelope field holding the list
    const LIST_FIELD: &'static str;
    const COUNT: &'static str;
    const COUNT_SHAPE: CountShape;
}

/// Write routes of an editable entity
pub trait WriteRouted: Routed + Editable {
    const CREATE: &'static str;
    const UPDATE: &'static str;
    const DELETE: &'static str;
}

impl Routed for Course {
    const LIST: &'static str = "/courses";
    const LIST_FIELD: &'static str = "courseData";
    const COUNT: &'static str = "/course-status-count";
    const COUNT_SHAPE: CountShape = CountShape::StatusTotals;
}

impl WriteRouted for Course {
    const CREATE: &'static str = "/course";
    const UPDATE: &'static str = "/update/course/";
    const DELETE: &'static str = "/delete/course/";
}

/// Course-only: flips the active flag
pub const COURSE_TOGGLE: &str = "/toggle-status/";

impl Routed for Blog {
    const LIST: &'static str = "/blogs";
    const LIST_FIELD: &'static str = "blogData";
    const COUNT: &'static str = "/blogs/count";
    const COUNT_SHAPE: CountShape = CountShape::Count;
}

impl WriteRouted for Blog {
    const CREATE: &'static str = "/blog";
    const UPDATE: &'static str = "/update/blog/";
    const DELETE: &'static str = "/blog/";
}

impl Routed for News {
    const LIST: &'static str = "/news/all";
    const LIST_FIELD: &'static str = "newsData";
    const COUNT: &'static str = "/news/count";
    const COUNT_SHAPE: CountShape = CountShape::Count;
}

impl WriteRouted for News {
    const CREATE: &'static str = "/news";
    const UPDATE: &'static str = "/update/news/";
    const DELETE: &'static str = "/delete/news/";
}

impl Routed for Student {
    const LIST: &'static str = "/users";
    const LIST_FIELD: &'static str = "userData";
    const COUNT: &'static str = "/users/count";
    const COUNT_SHAPE: CountShape = CountShape::Count;
}
