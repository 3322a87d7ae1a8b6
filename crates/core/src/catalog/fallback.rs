//! Built-in book list served when the catalog cannot be reached.

use super::types::{BookSummary, SearchCriteria, SearchResult};

struct FallbackBook {
    id: &'static str,
    title: &'static str,
    authors: &'static [&'static str],
    first_publish_year: i32,
    cover_id: i64,
    subjects: &'static [&'static str],
}

/// Records with cover ids known to resolve on the covers host.
static FALLBACK_BOOKS: &[FallbackBook] = &[
    FallbackBook {
        id: "/works/OL82563W",
        title: "Harry Potter and the Philosopher's Stone",
        authors: &["J. K. Rowling"],
        first_publish_year: 1997,
        cover_id: 10521270,
        subjects: &["Fantasy", "Magic", "Wizards"],
    },
    FallbackBook {
        id: "/works/OL27448W",
        title: "The Lord of the Rings",
        authors: &["J.R.R. Tolkien"],
        first_publish_year: 1954,
        cover_id: 14625765,
        subjects: &["Fantasy", "Middle Earth"],
    },
    FallbackBook {
        id: "/works/OL1168083W",
        title: "Nineteen Eighty-Four",
        authors: &["George Orwell"],
        first_publish_year: 1949,
        cover_id: 12725646,
        subjects: &["Dystopias", "Totalitarianism"],
    },
    FallbackBook {
        id: "/works/OL66554W",
        title: "Pride and Prejudice",
        authors: &["Jane Austen"],
        first_publish_year: 1813,
        cover_id: 14348537,
        subjects: &["Courtship", "England", "Fiction"],
    },
    FallbackBook {
        id: "/works/OL468431W",
        title: "The Great Gatsby",
        authors: &["F. Scott Fitzgerald"],
        first_publish_year: 1925,
        cover_id: 10590366,
        subjects: &["American fiction", "Wealth"],
    },
];

impl FallbackBook {
    fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.to_string(),
            title: self.title.to_string(),
            authors: self.authors.iter().map(|a| a.to_string()).collect(),
            first_publish_year: Some(self.first_publish_year),
            cover_id: Some(self.cover_id),
            publisher: Vec::new(),
            isbn_list: Vec::new(),
            language_list: Vec::new(),
            subject_list: self.subjects.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Title and author filters are case-insensitive substring matches and
    /// both must hold when both are given. Subject is not matched.
    fn matches(&self, title: Option<&str>, author: Option<&str>) -> bool {
        let title_ok = title.map_or(true, |t| self.title.to_lowercase().contains(t));
        let author_ok = author.map_or(true, |a| {
            self.authors.iter().any(|name| name.to_lowercase().contains(a))
        });
        title_ok && author_ok
    }
}

/// The complete fallback list.
pub fn fallback_books() -> Vec<BookSummary> {
    FALLBACK_BOOKS.iter().map(FallbackBook::to_summary).collect()
}

/// Fallback result for a failed search.
pub fn fallback_result(criteria: &SearchCriteria) -> SearchResult {
    let title = criteria.title().map(str::to_lowercase);
    let author = criteria.author().map(str::to_lowercase);

    let docs: Vec<BookSummary> = FALLBACK_BOOKS
        .iter()
        .filter(|book| book.matches(title.as_deref(), author.as_deref()))
        .map(FallbackBook::to_summary)
        .collect();

    SearchResult {
        num_found: docs.len() as u64,
        docs,
        start: Some(0),
        from_cache: false,
        fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_returns_everything() {
        let result = fallback_result(&SearchCriteria::by_subject("poetry"));
        assert_eq!(result.docs.len(), FALLBACK_BOOKS.len());
        assert_eq!(result.num_found, FALLBACK_BOOKS.len() as u64);
        assert!(result.fallback);
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let result = fallback_result(&SearchCriteria::by_title("  GATSBY "));
        assert_eq!(result.docs.len(), 1);
        assert_eq!(result.docs[0].title, "The Great Gatsby");
        assert_eq!(result.num_found, 1);
    }

    #[test]
    fn test_title_and_author_are_anded() {
        let criteria = SearchCriteria {
            title: Some("lord".to_string()),
            author: Some("austen".to_string()),
            subject: None,
        };
        let result = fallback_result(&criteria);
        assert!(result.docs.is_empty());
        assert_eq!(result.num_found, 0);

        let criteria = SearchCriteria {
            title: Some("lord".to_string()),
            author: Some("tolkien".to_string()),
            subject: None,
        };
        assert_eq!(fallback_result(&criteria).docs.len(), 1);
    }

    #[test]
    fn test_unmatched_query_is_empty() {
        let result = fallback_result(&SearchCriteria::by_title("zzzz-no-such-book"));
        assert!(result.docs.is_empty());
        assert_eq!(result.num_found, 0);
    }

    #[test]
    fn test_fallback_records_have_covers() {
        assert!(fallback_books().iter().all(|b| b.cover_id.is_some()));
    }
}
