//! Normalization of raw catalog JSON into book records.
//!
//! The catalog returns loosely shaped documents: fields go missing, arrays
//! show up as scalars, descriptions are sometimes objects. Every accessor
//! here guards the shape and substitutes a default instead of failing.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::types::{BookDetail, BookSummary};

/// Title used when a document carries none.
pub const UNTITLED: &str = "Untitled";

/// Display name used when an author entry cannot be resolved.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Maximum subjects kept per record.
pub const MAX_SUBJECTS: usize = 5;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

// ============================================================================
// Field guards
// ============================================================================

/// Non-empty trimmed string at `key`.
fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// String elements of the array at `key`. Missing or non-array input yields
/// an empty list; non-string elements are dropped.
fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Positive cover id. Zero and the `-1` sentinel mean "no cover".
fn cover_id(value: Option<&Value>) -> Option<i64> {
    value.and_then(Value::as_i64).filter(|id| *id > 0)
}

/// Text that may be a plain string or an object such as
/// `{"type": "/type/text", "value": "..."}`.
fn text_value(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("text"))
            .and_then(Value::as_str)?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Trailing non-empty segment of a slash-separated key.
pub fn last_segment(key: &str) -> Option<&str> {
    key.rsplit('/').find(|s| !s.is_empty())
}

/// First four-digit year in a free-form date ("June 1997", "1997-06-26").
pub fn parse_year(date: &str) -> Option<i32> {
    YEAR_RE
        .captures(date)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ============================================================================
// Search documents
// ============================================================================

/// Whether a raw search document is worth showing: it needs a work key, a
/// title, and either a cover or at least one author.
///
/// Keyless documents cannot be opened and would collapse into one entry when
/// records are deduplicated by id.
pub fn is_displayable(doc: &Value) -> bool {
    str_field(doc, "key").is_some()
        && str_field(doc, "title").is_some()
        && (cover_id(doc.get("cover_i")).is_some() || !string_list(doc, "author_name").is_empty())
}

/// Normalize a raw search document.
pub fn summary_from_doc(doc: &Value) -> BookSummary {
    let mut subjects = string_list(doc, "subject");
    subjects.truncate(MAX_SUBJECTS);

    BookSummary {
        id: str_field(doc, "key").unwrap_or_default(),
        title: str_field(doc, "title").unwrap_or_else(|| UNTITLED.to_string()),
        authors: string_list(doc, "author_name"),
        first_publish_year: doc
            .get("first_publish_year")
            .and_then(Value::as_i64)
            .and_then(|y| i32::try_from(y).ok()),
        cover_id: cover_id(doc.get("cover_i")),
        publisher: string_list(doc, "publisher"),
        isbn_list: string_list(doc, "isbn"),
        language_list: string_list(doc, "language"),
        subject_list: subjects,
    }
}

// ============================================================================
// Authors
// ============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KeyRef {
    pub key: String,
}

/// One entry of a work's `authors` array.
///
/// Variant order matters for untagged deserialization: an object carrying a
/// direct `name` wins over a reference.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AuthorRef {
    /// A bare name.
    Name(String),
    /// An object with a direct name field.
    Named { name: String },
    /// `{"author": {"key": "/authors/OL1A"}, ...}` as returned on works.
    Linked { author: KeyRef },
    /// `{"key": "/authors/OL1A"}`.
    Keyed { key: String },
    /// Anything else.
    Other(Value),
}

impl AuthorRef {
    /// Display string for this entry.
    ///
    /// References are not resolved over the network; they render as the
    /// trailing segment of their key.
    pub fn display_name(&self) -> String {
        let resolved = match self {
            AuthorRef::Name(name) | AuthorRef::Named { name } => Some(name.trim()),
            AuthorRef::Linked { author } => last_segment(&author.key),
            AuthorRef::Keyed { key } => last_segment(key),
            AuthorRef::Other(_) => None,
        };
        resolved
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string()
    }
}

fn author_names(work: &Value) -> Vec<String> {
    work.get("authors")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    serde_json::from_value::<AuthorRef>(entry.clone())
                        .unwrap_or(AuthorRef::Other(Value::Null))
                        .display_name()
                })
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Works and editions
// ============================================================================

/// Build a detail record from a work document and, when available, the
/// editions listing for that work.
pub fn detail_from_work(key: &str, work: &Value, editions: Option<&Value>) -> BookDetail {
    let mut subjects = string_list(work, "subjects");
    subjects.truncate(MAX_SUBJECTS);

    let cover_id = work
        .get("covers")
        .and_then(Value::as_array)
        .and_then(|covers| covers.iter().find_map(|c| cover_id(Some(c))));

    let mut detail = BookDetail {
        id: key.to_string(),
        title: str_field(work, "title").unwrap_or_else(|| UNTITLED.to_string()),
        authors: author_names(work),
        first_publish_year: work
            .get("first_publish_date")
            .and_then(Value::as_str)
            .and_then(parse_year),
        cover_id,
        publisher: Vec::new(),
        isbn_list: Vec::new(),
        language_list: Vec::new(),
        subject_list: subjects,
        description: text_value(work.get("description")),
        first_sentence: text_value(work.get("first_sentence")),
        edition_count: None,
    };

    if let Some(editions) = editions {
        apply_editions(&mut detail, editions);
    }

    detail
}

fn apply_editions(detail: &mut BookDetail, editions: &Value) {
    let entries = editions
        .get("entries")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let Some(first) = entries.first() else {
        return;
    };

    detail.publisher = string_list(first, "publishers");

    let isbn_13 = string_list(first, "isbn_13");
    detail.isbn_list = if isbn_13.is_empty() {
        string_list(first, "isbn_10")
    } else {
        isbn_13
    };

    detail.language_list = first
        .get("languages")
        .and_then(Value::as_array)
        .map(|langs| {
            langs
                .iter()
                .filter_map(|lang| match lang {
                    Value::String(code) => Some(code.as_str()),
                    Value::Object(_) => lang.get("key").and_then(Value::as_str),
                    _ => None,
                })
                .filter_map(last_segment)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if detail.first_sentence.is_none() {
        detail.first_sentence = text_value(first.get("first_sentence"));
    }

    let size = editions
        .get("size")
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .unwrap_or(entries.len() as u64);
    detail.edition_count = Some(u32::try_from(size).unwrap_or(u32::MAX).max(1));
}
