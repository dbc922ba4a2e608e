//! Blog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

use super::{lenient, parse_choice, parse_flag, Draft, Editable, Entity, EntityKind, FieldError};

/// Blog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogCategory {
    Technology,
    Business,
    Education,
    Design,
}

impl BlogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogCategory::Technology => "technology",
            BlogCategory::Business => "business",
            BlogCategory::Education => "education",
            BlogCategory::Design => "design",
        }
    }
}

impl FromStr for BlogCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technology" => Ok(BlogCategory::Technology),
            "business" => Ok(BlogCategory::Business),
            "education" => Ok(BlogCategory::Education),
            "design" => Ok(BlogCategory::Design),
            _ => Err(format!("Invalid blog category: {}", s)),
        }
    }
}

/// Blog post record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub short_description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient::opt_choice")]
    pub category: Option<BlogCategory>,
    #[serde(default, deserialize_with = "lenient::references")]
    pub tags: Vec<String>,
    /// Reading time in minutes
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub reading_time: Option<u32>,
    #[serde(default = "lenient::active_default", deserialize_with = "lenient::active_flag")]
    pub active_status: bool,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Blog {
    const KIND: EntityKind = EntityKind::Blog;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl Editable for Blog {
    type Draft = BlogDraft;
}

/// Blog form draft. Tags are typed as one comma-separated string and sent
/// as a list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    pub title: String,
    pub image: String,
    pub short_description: String,
    pub content: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BlogCategory>,
    #[serde(serialize_with = "serialize_tags")]
    pub tags: String,
    pub reading_time: String,
    pub active_status: bool,
}

impl Default for BlogDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            image: String::new(),
            short_description: String::new(),
            content: String::new(),
            author: String::new(),
            category: None,
            tags: String::new(),
            reading_time: String::new(),
            active_status: true,
        }
    }
}

/// Split a comma-separated tag input, trimming and dropping empties
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn serialize_tags<S: Serializer>(tags: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(split_tags(tags))
}

impl Draft for BlogDraft {
    type Record = Blog;

    const FIELDS: &'static [&'static str] = &[
        "image",
        "title",
        "shortDescription",
        "content",
        "author",
        "category",
        "tags",
        "readingTime",
        "activeStatus",
    ];

    fn from_record(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            image: blog.image.clone(),
            short_description: blog.short_description.clone(),
            content: blog.content.clone(),
            author: blog.author.clone(),
            category: blog.category,
            tags: blog.tags.join(", "),
            reading_time: blog.reading_time.map(|m| m.to_string()).unwrap_or_default(),
            active_status: blog.active_status,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "image" => self.image = value.to_string(),
            "shortDescription" => self.short_description = value.to_string(),
            "content" => self.content = value.to_string(),
            "author" => self.author = value.to_string(),
            "category" => self.category = parse_choice("category", value)?,
            "tags" => self.tags = value.to_string(),
            "readingTime" => self.reading_time = value.to_string(),
            "activeStatus" => self.active_status = parse_flag("activeStatus", value)?,
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, field: &str) -> Option<String> {
        let value = match field {
            "title" => self.title.clone(),
            "image" => self.image.clone(),
            "shortDescription" => self.short_description.clone(),
            "content" => self.content.clone(),
            "author" => self.author.clone(),
            "category" => self.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
            "tags" => self.tags.clone(),
            "readingTime" => self.reading_time.clone(),
            "activeStatus" => self.active_status.to_string(),
            _ => return None,
        };
        Some(value)
    }
}
