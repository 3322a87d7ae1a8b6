//! Pure presentation helpers shared by the views.

use super::normalize::UNKNOWN_AUTHOR;
use super::types::CoverSize;

/// Default covers host.
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Cover image URL on the default covers host.
///
/// Returns `None` when there is no cover: a missing id, the `-1` sentinel, or
/// any other non-positive value.
pub fn build_cover_url(cover_id: Option<i64>, size: CoverSize) -> Option<String> {
    cover_url_with_base(DEFAULT_COVERS_URL, cover_id, size)
}

pub(crate) fn cover_url_with_base(
    base: &str,
    cover_id: Option<i64>,
    size: CoverSize,
) -> Option<String> {
    let id = cover_id.filter(|id| *id > 0)?;
    Some(format!(
        "{}/b/id/{}-{}.jpg",
        base.trim_end_matches('/'),
        id,
        size
    ))
}

/// Human-readable author line.
pub fn format_author_list<S: AsRef<str>>(authors: &[S]) -> String {
    match authors {
        [] => UNKNOWN_AUTHOR.to_string(),
        [one] => one.as_ref().to_string(),
        [first, second] => format!("{} & {}", first.as_ref(), second.as_ref()),
        [first, second, rest @ ..] => format!(
            "{}, {} & {} more",
            first.as_ref(),
            second.as_ref(),
            rest.len()
        ),
    }
}
