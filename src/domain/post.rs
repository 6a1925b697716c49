//! Post domain model
//!
//! Posts are the records a loop iterates over. The loop engine never creates
//! them; it only reads what a post source hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric post identifier
pub type PostId = u64;

/// A blog post record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,

    pub title: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub author: String,

    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Pinned to the top of listings unless excluded
    #[serde(default)]
    pub sticky: bool,
}

impl Post {
    /// Creates a post dated now with a slug derived from the title
    pub fn new(id: PostId, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            slug: slugify(&title),
            title,
            content: String::new(),
            excerpt: String::new(),
            author: String::new(),
            date: Utc::now(),
            categories: Vec::new(),
            tags: Vec::new(),
            sticky: false,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Returns true if the post is filed under the category (name or slug, case-insensitive)
    pub fn in_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category) || slugify(c) == category)
    }

    /// Returns true if the post carries the tag (name or slug, case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag) || slugify(t) == tag)
    }
}

/// Lowercases and replaces runs of non-alphanumerics with a single `-`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
