//! Configuration management
//!
//! This module handles loading and parsing configuration for the admin console.
//! Configuration can be loaded from:
//! - admin.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::EntityKind;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Console behaviour configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Route prefix of each resource family
    #[serde(default)]
    pub routes: RouteConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            routes: RouteConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

/// Route prefixes, one per resource family.
///
/// The backend mounts each family under its own router (`/courseapi`,
/// `/blogapi`, ...), so endpoint paths are joined onto these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_course_prefix")]
    pub course: String,
    #[serde(default = "default_blog_prefix")]
    pub blog: String,
    #[serde(default = "default_news_prefix")]
    pub news: String,
    #[serde(default = "default_student_prefix")]
    pub student: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            course: default_course_prefix(),
            blog: default_blog_prefix(),
            news: default_news_prefix(),
            student: default_student_prefix(),
        }
    }
}

impl RouteConfig {
    /// Prefix for the given entity kind
    pub fn prefix(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Course => &self.course,
            EntityKind::Blog => &self.blog,
            EntityKind::News => &self.news,
            EntityKind::Student => &self.student,
        }
    }
}

fn default_course_prefix() -> String {
    "/courseapi".to_string()
}

fn default_blog_prefix() -> String {
    "/blogapi".to_string()
}

fn default_news_prefix() -> String {
    "/newsapi".to_string()
}

fn default_student_prefix() -> String {
    "/api".to_string()
}

/// Console behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Records per page on paginated screens
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Placeholder rows shown while a list is loading
    #[serde(default = "default_skeleton_rows")]
    pub skeleton_rows: usize,
    /// Close the add/edit form even when saving failed
    #[serde(default)]
    pub close_form_on_failure: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            skeleton_rows: default_skeleton_rows(),
            close_form_on_failure: false,
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_skeleton_rows() -> usize {
    5
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the file without validating it
    fn read(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - INSTITUTE_API_BASE_URL
    /// - INSTITUTE_API_TIMEOUT_SECS
    /// - INSTITUTE_ROUTES_COURSE / _BLOG / _NEWS / _STUDENT
    /// - INSTITUTE_UI_PAGE_SIZE
    /// - INSTITUTE_UI_CLOSE_FORM_ON_FAILURE
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("INSTITUTE_API_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("INSTITUTE_API_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.api.timeout_secs = timeout;
            }
        }

        if let Ok(prefix) = std::env::var("INSTITUTE_ROUTES_COURSE") {
            self.api.routes.course = prefix;
        }
        if let Ok(prefix) = std::env::var("INSTITUTE_ROUTES_BLOG") {
            self.api.routes.blog = prefix;
        }
        if let Ok(prefix) = std::env::var("INSTITUTE_ROUTES_NEWS") {
            self.api.routes.news = prefix;
        }
        if let Ok(prefix) = std::env::var("INSTITUTE_ROUTES_STUDENT") {
            self.api.routes.student = prefix;
        }

        if let Ok(size) = std::env::var("INSTITUTE_UI_PAGE_SIZE") {
            if let Ok(size) = size.parse::<u32>() {
                self.ui.page_size = size;
            }
        }
        if let Ok(flag) = std::env::var("INSTITUTE_UI_CLOSE_FORM_ON_FAILURE") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.ui.close_form_on_failure = true,
                "0" | "false" | "no" => self.ui.close_form_on_failure = false,
                _ => {} // Ignore invalid values
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.ui.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "ui.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
