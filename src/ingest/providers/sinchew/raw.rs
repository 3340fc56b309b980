// src/ingest/providers/sinchew/raw.rs
//! Wire shapes. Every hot-list field is optional because deployments disagree
//! on naming; priority between candidates lives in `extract`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::ingest::types::NewsId;

/// Accept any JSON for a field and keep it only if it has the expected type.
/// Upstream sends `false`, numbers or arrays where a string is missing.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(d)?;
    Ok(serde_json::from_value(v).ok())
}

/// Publish time is passed through as text; numeric timestamps are kept as
/// their decimal form.
fn lenient_time<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A field that is either a plain string or a `{ "rendered": ... }` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Rendered {
        #[serde(default, deserialize_with = "lenient")]
        rendered: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawHotItem {
    #[serde(rename = "ID", default, deserialize_with = "lenient")]
    pub upper_id: Option<NewsId>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<NewsId>,
    #[serde(default, deserialize_with = "lenient")]
    pub the_permalink: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub permalink: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub post_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<TextField>,
    #[serde(default, deserialize_with = "lenient")]
    pub post_excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub excerpt: Option<TextField>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_diff: Option<String>,
}

impl RawHotItem {
    /// Upstream id: `ID` first, then `id`.
    pub fn identifier(&self) -> Option<NewsId> {
        self.upper_id.clone().or_else(|| self.id.clone())
    }
}

/// Envelope of `/hot-post-list/`. `result` is kept untyped so one malformed
/// entry doesn't sink the whole page.
#[derive(Debug, Default, Deserialize)]
pub struct HotListResponse {
    #[serde(default)]
    pub result: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Rendered {
    #[serde(default, deserialize_with = "lenient")]
    pub rendered: Option<String>,
}

/// One `wp/v2/posts` entry. Required upstream, but modelled as optional so
/// the normalizer can discard instead of the parser failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawAltItem {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<Rendered>,
    #[serde(default, deserialize_with = "lenient")]
    pub excerpt: Option<Rendered>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hot_item_accepts_both_title_shapes() {
        let a: RawHotItem = serde_json::from_value(json!({ "title": "plain" })).unwrap();
        let b: RawHotItem =
            serde_json::from_value(json!({ "title": { "rendered": "nested" } })).unwrap();
        let c: RawHotItem = serde_json::from_value(json!({ "title": {} })).unwrap();
        assert_eq!(a.title, Some(TextField::Plain("plain".into())));
        assert_eq!(
            b.title,
            Some(TextField::Rendered {
                rendered: Some("nested".into())
            })
        );
        assert_eq!(c.title, Some(TextField::Rendered { rendered: None }));
    }

    #[test]
    fn hot_item_id_is_number_or_string() {
        let a: RawHotItem = serde_json::from_value(json!({ "ID": 42 })).unwrap();
        let b: RawHotItem = serde_json::from_value(json!({ "ID": "42a" })).unwrap();
        assert_eq!(a.identifier(), Some(NewsId::Num(42)));
        assert_eq!(b.identifier(), Some(NewsId::Str("42a".into())));
    }

    #[test]
    fn upper_and_lower_id_together_prefer_upper() {
        let it: RawHotItem =
            serde_json::from_value(json!({ "ID": 1, "id": 2, "title": "t" })).unwrap();
        assert_eq!(it.identifier(), Some(NewsId::Num(1)));

        let lower: RawHotItem = serde_json::from_value(json!({ "id": "x9" })).unwrap();
        assert_eq!(lower.identifier(), Some(NewsId::Str("x9".into())));

        let bad_upper: RawHotItem =
            serde_json::from_value(json!({ "ID": false, "id": 3 })).unwrap();
        assert_eq!(bad_upper.identifier(), Some(NewsId::Num(3)));
    }

    #[test]
    fn wrong_typed_fields_become_none() {
        for bad in [json!(false), json!(17), json!(["a"]), json!(null)] {
            let it: RawHotItem = serde_json::from_value(json!({
                "the_permalink": bad,
                "permalink": bad,
                "link": bad,
                "url": bad,
                "post_title": bad,
                "post_excerpt": bad,
                "date_diff": bad,
            }))
            .unwrap();
            assert_eq!(it, RawHotItem::default(), "value {bad}");
        }
        for bad in [json!(false), json!(17), json!(null)] {
            let it: RawHotItem =
                serde_json::from_value(json!({ "title": bad, "excerpt": bad })).unwrap();
            assert_eq!(it.title, None, "value {bad}");
            assert_eq!(it.excerpt, None, "value {bad}");
        }
    }

    #[test]
    fn nested_rendered_of_wrong_type_is_none() {
        let it: RawHotItem =
            serde_json::from_value(json!({ "title": { "rendered": false } })).unwrap();
        assert_eq!(it.title, Some(TextField::Rendered { rendered: None }));
    }

    #[test]
    fn time_keeps_numbers_as_text() {
        let n: RawHotItem = serde_json::from_value(json!({ "time": 1714550000 })).unwrap();
        let b: RawHotItem = serde_json::from_value(json!({ "time": false })).unwrap();
        let a: RawHotItem = serde_json::from_value(json!({ "time": ["x"] })).unwrap();
        assert_eq!(n.time.as_deref(), Some("1714550000"));
        assert_eq!(b.time, None);
        assert_eq!(a.time, None);
    }

    #[test]
    fn alt_item_requires_numeric_id() {
        assert!(serde_json::from_value::<RawAltItem>(json!({ "link": "x" })).is_err());
        let ok: RawAltItem = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!(ok.link, None);

        let loose: RawAltItem = serde_json::from_value(json!({
            "id": 2,
            "link": false,
            "title": { "rendered": 5 },
            "excerpt": false,
            "date": false
        }))
        .unwrap();
        assert_eq!(loose.link, None);
        assert_eq!(loose.title, Some(Rendered { rendered: None }));
        assert_eq!(loose.excerpt, None);
        assert_eq!(loose.date, None);
    }
}
