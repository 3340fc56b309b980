// tests/extract_fields.rs
use serde_json::json;
use sinchew_hot::ingest::clean_text;
use sinchew_hot::ingest::providers::sinchew::extract::{extract_title, extract_url};
use sinchew_hot::ingest::providers::sinchew::normalize::normalize_hot;
use sinchew_hot::ingest::providers::sinchew::raw::RawHotItem;
use sinchew_hot::NewsId;
use url::Url;

fn item(v: serde_json::Value) -> RawHotItem {
    serde_json::from_value(v).expect("raw hot item")
}

fn base() -> Url {
    Url::parse("https://www.sinchew.com.my").unwrap()
}

#[test]
fn nested_title_wins_over_sibling_plain_title() {
    let it = item(json!({
        "post_title": "sibling",
        "title": { "rendered": "  rendered one " }
    }));
    assert_eq!(extract_title(&it), "rendered one");
}

#[test]
fn relative_url_is_anchored_at_base_origin() {
    let it = item(json!({ "url": "/a/b" }));
    assert_eq!(
        extract_url(&it, &base()).as_deref(),
        Some("https://www.sinchew.com.my/a/b")
    );
}

#[test]
fn absolute_url_is_returned_unchanged() {
    let abs = "http://cdn.example.org/x/y?z=1#frag";
    let it = item(json!({ "the_permalink": abs, "url": "/ignored" }));
    assert_eq!(extract_url(&it, &base()).as_deref(), Some(abs));
}

#[test]
fn discard_rules_hold_together() {
    let items = vec![
        item(json!({ "ID": 1, "title": "no url anywhere" })),
        item(json!({ "ID": 2, "title": { "rendered": "" }, "link": "/two" })),
        item(json!({ "ID": 3, "title": "both", "link": "/three" })),
    ];
    let out = normalize_hot(items, &base());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, NewsId::Num(3));
}

#[test]
fn hover_round_trip_has_no_angle_brackets() {
    let cleaned = clean_text("<p>Hello&nbsp; world</p>").unwrap();
    assert_eq!(cleaned, "Hello world");
    assert!(!cleaned.contains('<') && !cleaned.contains('>'));
}

#[test]
fn identifier_falls_back_to_url_exactly() {
    let out = normalize_hot(
        vec![item(json!({ "title": "x", "link": "https://example.com/x" }))],
        &base(),
    );
    assert_eq!(out[0].id, NewsId::Str("https://example.com/x".into()));
    assert_eq!(
        serde_json::to_value(&out[0]).unwrap()["id"],
        json!("https://example.com/x")
    );
}

#[test]
fn escaped_brackets_in_titles_are_kept_as_text() {
    let out = normalize_hot(
        vec![item(json!({
            "ID": 9,
            "title": "<b>Ringgit &lt; 4.5, index &gt; 1600 today</b>",
            "link": "/m"
        }))],
        &base(),
    );
    assert_eq!(out[0].title, "Ringgit < 4.5, index > 1600 today");
}

#[test]
fn wrongly_typed_fields_do_not_drop_the_item() {
    let items = vec![
        item(json!({ "ID": 1, "title": "t", "the_permalink": false, "link": "/a" })),
        item(json!({ "ID": 2, "title": "u", "link": "/b", "time": 1714550000 })),
        item(json!({ "ID": 3, "id": 4, "title": "v", "link": "/c" })),
    ];
    let out = normalize_hot(items, &base());
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].url, "https://www.sinchew.com.my/a");
    assert_eq!(out[1].pub_date.as_deref(), Some("1714550000"));
    assert_eq!(out[2].id, NewsId::Num(3));
}
