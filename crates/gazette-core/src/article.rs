//! The published-article data model.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A published article.
///
/// Articles are created once by the posting endpoint and never updated or
/// deleted. The `slug` is the unique, lowercase identifier used in URLs;
/// the `timestamp` is server-assigned epoch seconds at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Display title.
    pub title: String,
    /// Unique URL identifier, lowercase.
    pub slug: String,
    /// Short summary shown on the listing page.
    pub description: String,
    /// Full article body.
    pub content: String,
    /// Publication time, epoch seconds.
    pub timestamp: i64,
}

impl Article {
    /// Creates an article stamped with the current time.
    ///
    /// The slug is lowercased so lookups are case-insensitive.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        slug: &str,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.to_lowercase(),
            description: description.into(),
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Formats the publication time as a human-readable date,
    /// e.g. "Friday, 07 August 2026".
    #[must_use]
    pub fn published_on(&self) -> String {
        DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.format("%A, %d %B %Y").to_string())
            .unwrap_or_default()
    }
}
