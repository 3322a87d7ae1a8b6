//! Public records returned by the catalog client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default page size for searches.
pub const DEFAULT_SEARCH_LIMIT: u32 = 25;

/// Default number of records for the popular listing.
pub const DEFAULT_POPULAR_COUNT: usize = 12;

/// A search-result entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// Catalog work key (e.g. `/works/OL45883W`).
    pub id: String,
    /// Title, "Untitled" when the catalog has none.
    pub title: String,
    /// Author display names.
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    /// Positive cover identifier, absent when there is no cover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub publisher: Vec<String>,
    #[serde(default)]
    pub isbn_list: Vec<String>,
    #[serde(default)]
    pub language_list: Vec<String>,
    /// At most five subjects.
    #[serde(default)]
    pub subject_list: Vec<String>,
}

/// Full record for a single work, merged from the work and its first edition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    /// Canonical work key (`/works/{id}`).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub publisher: Vec<String>,
    #[serde(default)]
    pub isbn_list: Vec<String>,
    #[serde(default)]
    pub language_list: Vec<String>,
    #[serde(default)]
    pub subject_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
}

/// Search fields collected by the search view.
///
/// Any subset may be set. Requiring at least one non-empty field is the
/// caller's policy; see [`SearchCriteria::has_any`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl SearchCriteria {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Default::default()
        }
    }

    pub fn by_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Default::default()
        }
    }

    /// Trimmed title, `None` when missing or blank.
    pub fn title(&self) -> Option<&str> {
        trimmed(&self.title)
    }

    /// Trimmed author, `None` when missing or blank.
    pub fn author(&self) -> Option<&str> {
        trimmed(&self.author)
    }

    /// Trimmed subject, `None` when missing or blank.
    pub fn subject(&self) -> Option<&str> {
        trimmed(&self.subject)
    }

    /// Whether at least one field has non-blank content.
    pub fn has_any(&self) -> bool {
        self.title().is_some() || self.author().is_some() || self.subject().is_some()
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub docs: Vec<BookSummary>,
    /// Total number of matches reported by the catalog (not just this page).
    pub num_found: u64,
    /// Offset the catalog reports for this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Served from the in-memory cache.
    #[serde(default)]
    pub from_cache: bool,
    /// Docs come from the built-in fallback list because the catalog failed.
    #[serde(default)]
    pub fallback: bool,
}

/// Cover image size accepted by the covers host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CoverSize {
    /// Small; the default, it paints fastest.
    #[default]
    S,
    M,
    L,
}

impl CoverSize {
    /// Parse a size letter, falling back to [`CoverSize::S`] for anything else.
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim() {
            "M" | "m" => CoverSize::M,
            "L" | "l" => CoverSize::L,
            _ => CoverSize::S,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverSize::S => "S",
            CoverSize::M => "M",
            CoverSize::L => "L",
        }
    }
}

impl fmt::Display for CoverSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_trims_and_ignores_blank() {
        let criteria = SearchCriteria {
            title: Some("  Dune ".to_string()),
            author: Some("   ".to_string()),
            subject: None,
        };
        assert_eq!(criteria.title(), Some("Dune"));
        assert_eq!(criteria.author(), None);
        assert!(criteria.has_any());
        assert!(!SearchCriteria::default().has_any());
    }

    #[test]
    fn test_cover_size_lossy_parse() {
        assert_eq!(CoverSize::from_str_lossy("M"), CoverSize::M);
        assert_eq!(CoverSize::from_str_lossy("l"), CoverSize::L);
        assert_eq!(CoverSize::from_str_lossy("X"), CoverSize::S);
        assert_eq!(CoverSize::from_str_lossy(""), CoverSize::S);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = BookSummary {
            id: "/works/OL1W".to_string(),
            title: "Book".to_string(),
            authors: vec![],
            first_publish_year: Some(1999),
            cover_id: None,
            publisher: vec![],
            isbn_list: vec![],
            language_list: vec![],
            subject_list: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["firstPublishYear"], 1999);
        assert!(json.get("coverId").is_none());
        assert!(json["isbnList"].as_array().unwrap().is_empty());
    }
}
