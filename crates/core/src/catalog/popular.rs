//! "Popular books" listing.
//!
//! The catalog has no popularity endpoint, so the listing is assembled from a
//! fixed set of queries that reliably return well-known works with covers.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::client::CatalogClient;
use super::types::{BookSummary, SearchCriteria, SearchResult};
use crate::metrics;

/// Cover ids at or above this rarely resolve to an image.
pub const COVER_ID_CEILING: i64 = 8_000_000;

/// Ceiling used for the top-up query.
pub const RELAXED_COVER_ID_CEILING: i64 = 10_000_000;

/// Stop querying once this many candidates per requested record are held.
pub const CANDIDATE_MULTIPLIER: usize = 3;

const SEED_LIMIT: u32 = 25;
const TOP_UP_LIMIT: u32 = 50;
const TOP_UP_SUBJECT: &str = "literature";

#[derive(Debug, Clone, Copy)]
enum Seed {
    Author(&'static str),
    Title(&'static str),
    Subject(&'static str),
}

impl Seed {
    fn criteria(self) -> SearchCriteria {
        match self {
            Seed::Author(a) => SearchCriteria::by_author(a),
            Seed::Title(t) => SearchCriteria::by_title(t),
            Seed::Subject(s) => SearchCriteria::by_subject(s),
        }
    }
}

/// Queries issued in order until enough candidates are collected.
const SEEDS: [Seed; 12] = [
    Seed::Author("J.K. Rowling"),
    Seed::Author("Stephen King"),
    Seed::Author("Agatha Christie"),
    Seed::Title("The Lord of the Rings"),
    Seed::Author("George Orwell"),
    Seed::Author("Jane Austen"),
    Seed::Title("Dune"),
    Seed::Author("Ernest Hemingway"),
    Seed::Subject("science fiction"),
    Seed::Subject("fantasy"),
    Seed::Subject("mystery"),
    Seed::Subject("classics"),
];

/// Quality gate for the popular listing.
///
/// Requires a cover id in `(0, cover_ceiling)`, a title longer than two
/// characters that is not a placeholder ("unnamed"), at least one author, and
/// a first publish year in `(1700, 2025)`.
pub fn is_popular_candidate(book: &BookSummary, cover_ceiling: i64) -> bool {
    let cover_ok = book
        .cover_id
        .is_some_and(|id| id > 0 && id < cover_ceiling);
    let title_ok =
        book.title.chars().count() > 2 && !book.title.to_lowercase().contains("unnamed");
    let year_ok = book
        .first_publish_year
        .is_some_and(|y| y > 1700 && y < 2025);

    cover_ok && title_ok && !book.authors.is_empty() && year_ok
}

/// Drop repeated ids (first one wins) and order by ascending cover id.
pub fn dedup_by_cover(books: Vec<BookSummary>, seen: &mut HashSet<String>) -> Vec<BookSummary> {
    let mut unique: Vec<BookSummary> = books
        .into_iter()
        .filter(|b| seen.insert(b.id.clone()))
        .collect();
    // Lower ids are older uploads and more likely to resolve to a real image.
    unique.sort_by_key(|b| b.cover_id.unwrap_or(i64::MAX));
    unique
}

/// Slice a page of at most `count` records starting at `offset`.
pub fn page(books: &[BookSummary], count: usize, offset: usize) -> Vec<BookSummary> {
    books.iter().skip(offset).take(count).cloned().collect()
}

impl CatalogClient {
    /// A deterministic stand-in for "trending books".
    ///
    /// Queries run one at a time so that the early exit keeps request volume
    /// down. Failed queries are logged and skipped; if all of them fail the
    /// result is empty.
    pub async fn get_popular(&self, target_count: usize, offset: usize) -> SearchResult {
        let wanted = target_count.saturating_mul(CANDIDATE_MULTIPLIER);
        let mut candidates: Vec<BookSummary> = Vec::new();

        for seed in SEEDS {
            if candidates.len() >= wanted {
                debug!("Popular: collected {} candidates, stopping", candidates.len());
                break;
            }

            match self
                .fetch_search(&seed.criteria(), SEED_LIMIT, 0)
                .await
            {
                Ok(result) => candidates.extend(
                    result
                        .docs
                        .into_iter()
                        .filter(|b| is_popular_candidate(b, COVER_ID_CEILING)),
                ),
                Err(e) => warn!("Popular query {:?} failed: {}", seed, e),
            }
        }

        let mut seen = HashSet::new();
        let mut unique = dedup_by_cover(candidates, &mut seen);

        if unique.len() < target_count {
            info!(
                "Popular: only {} of {} records, topping up with '{}'",
                unique.len(),
                target_count,
                TOP_UP_SUBJECT
            );
            match self
                .fetch_search(&SearchCriteria::by_subject(TOP_UP_SUBJECT), TOP_UP_LIMIT, 0)
                .await
            {
                Ok(result) => {
                    let extra: Vec<BookSummary> = result
                        .docs
                        .into_iter()
                        .filter(|b| is_popular_candidate(b, RELAXED_COVER_ID_CEILING))
                        .collect();
                    unique.extend(dedup_by_cover(extra, &mut seen));
                }
                Err(e) => warn!("Popular top-up query failed: {}", e),
            }
        }

        metrics::POPULAR_CANDIDATES.observe(unique.len() as f64);

        SearchResult {
            docs: page(&unique, target_count, offset),
            num_found: unique.len() as u64,
            start: Some(offset as u64),
            from_cache: false,
            fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, cover: Option<i64>, year: Option<i32>) -> BookSummary {
        BookSummary {
            id: id.to_string(),
            title: format!("Book {}", id),
            authors: vec!["Someone".to_string()],
            first_publish_year: year,
            cover_id: cover,
            publisher: vec![],
            isbn_list: vec![],
            language_list: vec![],
            subject_list: vec![],
        }
    }

    #[test]
    fn test_candidate_cover_bounds() {
        assert!(is_popular_candidate(&book("a", Some(1), Some(1990)), COVER_ID_CEILING));
        assert!(!is_popular_candidate(&book("a", None, Some(1990)), COVER_ID_CEILING));
        assert!(!is_popular_candidate(
            &book("a", Some(8_000_000), Some(1990)),
            COVER_ID_CEILING
        ));
        assert!(is_popular_candidate(
            &book("a", Some(8_000_000), Some(1990)),
            RELAXED_COVER_ID_CEILING
        ));
    }

    #[test]
    fn test_candidate_year_bounds() {
        assert!(!is_popular_candidate(&book("a", Some(5), Some(1700)), COVER_ID_CEILING));
        assert!(!is_popular_candidate(&book("a", Some(5), Some(2025)), COVER_ID_CEILING));
        assert!(!is_popular_candidate(&book("a", Some(5), None), COVER_ID_CEILING));
        assert!(is_popular_candidate(&book("a", Some(5), Some(2024)), COVER_ID_CEILING));
    }

    #[test]
    fn test_candidate_title_and_authors() {
        let mut b = book("a", Some(5), Some(1990));
        b.title = "It".to_string();
        assert!(!is_popular_candidate(&b, COVER_ID_CEILING));

        b.title = "Unnamed Collection".to_string();
        assert!(!is_popular_candidate(&b, COVER_ID_CEILING));

        b.title = "Carrie".to_string();
        b.authors.clear();
        assert!(!is_popular_candidate(&b, COVER_ID_CEILING));
    }

    #[test]
    fn test_dedup_keeps_first_and_sorts() {
        let mut first = book("x", Some(300), Some(1990));
        first.title = "First".to_string();
        let mut dup = book("x", Some(10), Some(1990));
        dup.title = "Duplicate".to_string();

        let mut seen = HashSet::new();
        let unique = dedup_by_cover(
            vec![first, book("y", Some(200), Some(1990)), dup],
            &mut seen,
        );

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "y");
        assert_eq!(unique[1].id, "x");
        assert_eq!(unique[1].title, "First");
    }

    #[test]
    fn test_page_bounds() {
        let books: Vec<_> = (0..5)
            .map(|i| book(&i.to_string(), Some(i + 1), Some(1990)))
            .collect();
        assert_eq!(page(&books, 3, 0).len(), 3);
        assert_eq!(page(&books, 3, 4).len(), 1);
        assert!(page(&books, 3, 9).is_empty());
    }

    #[test]
    fn test_seed_list_size() {
        assert_eq!(SEEDS.len(), 12);
    }
}
