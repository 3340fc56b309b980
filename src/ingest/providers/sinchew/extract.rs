// src/ingest/providers/sinchew/extract.rs
//! Field extraction over the loosely-named hot-list item.

use url::Url;

use super::raw::{RawHotItem, TextField};
use crate::ingest::clean_text;

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.trim().is_empty())
}

/// Title of a hot item, trimmed. Empty string means "discard".
///
/// An object title wins outright, even over `post_title`; otherwise the first
/// non-blank of `post_title`, plain `title`.
pub fn extract_title(item: &RawHotItem) -> String {
    if let Some(TextField::Rendered { rendered }) = &item.title {
        return rendered.as_deref().unwrap_or_default().trim().to_string();
    }
    let plain = match &item.title {
        Some(TextField::Plain(s)) => Some(s.as_str()),
        _ => None,
    };
    non_blank(&item.post_title)
        .or(plain.filter(|v| !v.trim().is_empty()))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Absolute URL of a hot item, or `None` when no URL-bearing field is set.
pub fn extract_url(item: &RawHotItem, base: &Url) -> Option<String> {
    let href = [&item.the_permalink, &item.permalink, &item.link, &item.url]
        .into_iter()
        .find_map(non_blank)?
        .trim();

    if href.starts_with("http") {
        return Some(href.to_string());
    }
    match base.join(href) {
        Ok(abs) => Some(abs.to_string()),
        Err(e) => {
            tracing::debug!(error = %e, href, "unresolvable relative url");
            None
        }
    }
}

/// Cleaned excerpt for hover text: `post_excerpt` first, then `excerpt`.
pub fn extract_excerpt(item: &RawHotItem) -> Option<String> {
    let excerpt = match &item.excerpt {
        Some(TextField::Plain(s)) => Some(s.as_str()),
        Some(TextField::Rendered { rendered }) => rendered.as_deref(),
        None => None,
    };
    item.post_excerpt
        .as_deref()
        .and_then(clean_text)
        .or_else(|| excerpt.and_then(clean_text))
}

/// Relative age such as "2小时前", when the upstream sent a non-blank one.
pub fn extract_info(item: &RawHotItem) -> Option<String> {
    non_blank(&item.date_diff).map(|s| s.trim().to_string())
}
