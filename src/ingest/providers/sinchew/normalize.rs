// src/ingest/providers/sinchew/normalize.rs
use metrics::counter;
use std::collections::HashSet;
use url::Url;

use super::extract::{extract_excerpt, extract_info, extract_title, extract_url};
use super::raw::{RawAltItem, RawHotItem};
use crate::ingest::clean_text;
use crate::ingest::types::{ExtraInfo, NewsExtra, NewsId, NewsItem};

/// Map hot-list items to canonical records, in upstream order.
/// Items without a usable title or url are dropped.
pub fn normalize_hot(items: Vec<RawHotItem>, base: &Url) -> Vec<NewsItem> {
    let mut out = Vec::with_capacity(items.len());
    let mut dropped = 0u64;

    for it in items {
        let url = extract_url(&it, base);
        let title = clean_text(&extract_title(&it));
        let (Some(url), Some(title)) = (url, title) else {
            dropped += 1;
            continue;
        };

        out.push(NewsItem {
            id: it.identifier().unwrap_or_else(|| NewsId::Str(url.clone())),
            title,
            url,
            pub_date: it.time.clone(),
            extra: NewsExtra {
                info: extract_info(&it).map_or(ExtraInfo::Absent, ExtraInfo::Text),
                hover: extract_excerpt(&it),
            },
        });
    }

    if dropped > 0 {
        tracing::debug!(dropped, "hot items without title or url");
        counter!("hotlist_discarded_total", "endpoint" => "primary").increment(dropped);
    }
    out
}

/// Map content-API posts to canonical records. The API carries no age signal,
/// so `info` is marked not-applicable. Repeated links keep the first entry.
pub fn normalize_alt(items: Vec<RawAltItem>) -> Vec<NewsItem> {
    let mut out = Vec::with_capacity(items.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut dropped = 0u64;

    for it in items {
        let link = it
            .link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        let title = it
            .title
            .as_ref()
            .and_then(|t| t.rendered.as_deref())
            .and_then(clean_text);
        let (Some(link), Some(title)) = (link, title) else {
            dropped += 1;
            continue;
        };
        if !seen.insert(link.to_string()) {
            continue;
        }

        out.push(NewsItem {
            id: NewsId::Num(it.id),
            title,
            url: link.to_string(),
            pub_date: it.date.clone(),
            extra: NewsExtra {
                info: ExtraInfo::NotApplicable,
                hover: it
                    .excerpt
                    .as_ref()
                    .and_then(|e| e.rendered.as_deref())
                    .and_then(clean_text),
            },
        });
    }

    if dropped > 0 {
        tracing::debug!(dropped, "alternate posts without title or link");
        counter!("hotlist_discarded_total", "endpoint" => "alternate").increment(dropped);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::providers::sinchew::raw::{Rendered, TextField};

    fn base() -> Url {
        Url::parse("https://www.sinchew.com.my").unwrap()
    }

    fn hot(id: Option<NewsId>, title: &str, link: Option<&str>) -> RawHotItem {
        RawHotItem {
            id,
            title: Some(TextField::Plain(title.into())),
            link: link.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn discards_missing_title_or_url() {
        let items = vec![
            hot(Some(NewsId::Num(1)), "no url", None),
            hot(Some(NewsId::Num(2)), "   ", Some("/b")),
            hot(Some(NewsId::Num(3)), "kept", Some("/c")),
        ];
        let out = normalize_hot(items, &base());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NewsId::Num(3));
        assert_eq!(out[0].url, "https://www.sinchew.com.my/c");
    }

    #[test]
    fn id_falls_back_to_url() {
        let out = normalize_hot(vec![hot(None, "x", Some("https://example.com/x"))], &base());
        assert_eq!(out[0].id, NewsId::Str("https://example.com/x".into()));
    }

    #[test]
    fn hot_fields_pass_through() {
        let it = RawHotItem {
            id: Some(NewsId::Str("99".into())),
            post_title: Some("<b>标题</b>".into()),
            the_permalink: Some("https://www.sinchew.com.my/n/99".into()),
            time: Some("2024-05-01 10:00:00".into()),
            date_diff: Some("2小时前".into()),
            post_excerpt: Some("<p>摘要\n 内容</p>".into()),
            ..Default::default()
        };
        let out = normalize_hot(vec![it], &base());
        assert_eq!(out[0].title, "标题");
        assert_eq!(out[0].pub_date.as_deref(), Some("2024-05-01 10:00:00"));
        assert_eq!(out[0].extra.info, ExtraInfo::Text("2小时前".into()));
        assert_eq!(out[0].extra.hover.as_deref(), Some("摘要 内容"));
    }

    #[test]
    fn alt_marks_info_not_applicable_and_dedups() {
        let post = |id: i64, link: &str, title: Option<&str>| RawAltItem {
            id,
            link: Some(link.into()),
            title: Some(Rendered {
                rendered: title.map(str::to_string),
            }),
            excerpt: Some(Rendered {
                rendered: Some("<p>Hello&nbsp; world</p>".into()),
            }),
            date: Some("2024-05-01T10:00:00".into()),
        };
        let out = normalize_alt(vec![
            post(1, "https://x/1", Some("<em>One</em>")),
            post(2, "https://x/1", Some("dup")),
            post(3, "https://x/3", None),
            post(4, "https://x/4", Some("Four")),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "One");
        assert_eq!(out[0].id, NewsId::Num(1));
        assert_eq!(out[0].extra.info, ExtraInfo::NotApplicable);
        assert_eq!(out[0].extra.hover.as_deref(), Some("Hello world"));
        assert_eq!(out[1].id, NewsId::Num(4));
    }
}
