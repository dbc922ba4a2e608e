//! Institute Admin - administrative console for an educational institute
//!
//! This library provides the core functionality of the console: a resource
//! client for the institute's REST backend and the list, modal, form, table
//! and toggle components the Courses, Blog, News and Students screens are
//! built from.

pub mod client;
pub mod config;
pub mod console;
pub mod form;
pub mod lifetime;
pub mod modal;
pub mod models;
pub mod notify;
pub mod screens;
pub mod store;
pub mod table;
pub mod toggle;
