//! News model

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient, Draft, Editable, Entity, EntityKind, FieldError};

/// News item record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct News {
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
    #[serde(default, deserialize_with = "lenient::opt_offset_datetime")]
    pub date_published: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub source_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for News {
    const KIND: EntityKind = EntityKind::News;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl Editable for News {
    type Draft = NewsDraft;
}

/// News form draft; `datePublished` is a `YYYY-MM-DD` date input
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsDraft {
    pub title: String,
    pub image: String,
    pub short_description: String,
    pub content: String,
    pub date_published: String,
    pub source_link: String,
}

impl Draft for NewsDraft {
    type Record = News;

    const FIELDS: &'static [&'static str] = &[
        "title",
        "image",
        "shortDescription",
        "content",
        "datePublished",
        "sourceLink",
    ];

    fn from_record(news: &News) -> Self {
        Self {
            title: news.title.clone(),
            image: news.image.clone(),
            short_description: news.short_description.clone(),
            content: news.content.clone(),
            date_published: news
                .date_published
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            source_link: news.source_link.clone().unwrap_or_default(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "image" => self.image = value.to_string(),
            "shortDescription" => self.short_description = value.to_string(),
            "content" => self.content = value.to_string(),
            "datePublished" => self.date_published = value.trim().to_string(),
            "sourceLink" => self.source_link = value.to_string(),
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
            "datePublished" => self.date_published.clone(),
            "sourceLink" => self.source_link.clone(),
            _ => return None,
        };
        Some(value)
    }
}
