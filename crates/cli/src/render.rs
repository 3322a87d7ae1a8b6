//! Text rendering for the search and detail views.

use std::fmt::Write;

use bookshelf_core::{format_author_list, BookDetail, CatalogClient, CoverSize, SearchResult};

/// Paginated result grid as numbered lines.
pub fn search_page(client: &CatalogClient, result: &SearchResult, offset: usize) -> String {
    let mut out = String::new();

    if result.fallback {
        let _ = writeln!(out, "Catalog unavailable, showing offline picks.");
    }

    if result.docs.is_empty() {
        let _ = writeln!(out, "No books found.");
        return out;
    }

    let first = offset + 1;
    let last = offset + result.docs.len();
    let _ = writeln!(
        out,
        "Showing {}-{} of {}{}",
        first,
        last,
        result.num_found,
        if result.from_cache { " (cached)" } else { "" }
    );

    for (i, book) in result.docs.iter().enumerate() {
        let year = book
            .first_publish_year
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>3}. {}{} by {}",
            first + i,
            book.title,
            year,
            format_author_list(&book.authors)
        );
        let _ = writeln!(out, "     id: {}", book.id);
        if let Some(url) = client.cover_url(book.cover_id, CoverSize::S) {
            let _ = writeln!(out, "     cover: {}", url);
        }
    }

    out
}

/// Single work page.
pub fn detail_page(client: &CatalogClient, detail: &BookDetail) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", detail.title);
    let _ = writeln!(out, "by {}", format_author_list(&detail.authors));
    let _ = writeln!(out);

    if let Some(year) = detail.first_publish_year {
        let _ = writeln!(out, "First published: {}", year);
    }
    if let Some(count) = detail.edition_count {
        let _ = writeln!(out, "Editions: {}", count);
    }
    list_line(&mut out, "Publisher", &detail.publisher);
    list_line(&mut out, "ISBN", &detail.isbn_list);
    list_line(&mut out, "Language", &detail.language_list);
    list_line(&mut out, "Subjects", &detail.subject_list);
    if let Some(url) = client.cover_url(detail.cover_id, CoverSize::L) {
        let _ = writeln!(out, "Cover: {}", url);
    }

    if let Some(sentence) = &detail.first_sentence {
        let _ = writeln!(out, "\n\"{}\"", sentence);
    }
    if let Some(description) = &detail.description {
        let _ = writeln!(out, "\n{}", description);
    }

    out
}

fn list_line(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        let _ = writeln!(out, "{}: {}", label, values.join(", "));
    }
}
