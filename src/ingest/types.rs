// src/ingest/types.rs
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream identifier: numeric on most deployments, string on some.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NewsId {
    Num(i64),
    Str(String),
}

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsId::Num(n) => write!(f, "{n}"),
            NewsId::Str(s) => f.write_str(s),
        }
    }
}

/// `extra.info` is tri-state on the wire: a string, `false` (not applicable
/// for this source), or omitted (no value upstream).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtraInfo {
    Text(String),
    #[default]
    Absent,
    NotApplicable,
}

impl ExtraInfo {
    pub fn is_absent(&self) -> bool {
        matches!(self, ExtraInfo::Absent)
    }
}

impl Serialize for ExtraInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtraInfo::Text(s) => serializer.serialize_str(s),
            ExtraInfo::NotApplicable => serializer.serialize_bool(false),
            ExtraInfo::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ExtraInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InfoVisitor;

        impl<'de> Visitor<'de> for InfoVisitor {
            type Value = ExtraInfo;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, false, or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ExtraInfo, E> {
                Ok(ExtraInfo::Text(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<ExtraInfo, E> {
                if v {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(ExtraInfo::NotApplicable)
                }
            }

            fn visit_none<E: de::Error>(self) -> Result<ExtraInfo, E> {
                Ok(ExtraInfo::Absent)
            }

            fn visit_unit<E: de::Error>(self) -> Result<ExtraInfo, E> {
                Ok(ExtraInfo::Absent)
            }
        }

        deserializer.deserialize_any(InfoVisitor)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsExtra {
    #[serde(default, skip_serializing_if = "ExtraInfo::is_absent")]
    pub info: ExtraInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
}

/// Canonical record shared by every source feeding the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    pub id: NewsId,
    pub title: String,
    pub url: String, // always absolute
    #[serde(rename = "pubDate", default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>, // raw upstream string, never parsed
    #[serde(default)]
    pub extra: NewsExtra,
}

/// A pollable source. Implementations swallow their own failures: the worst
/// outcome of `fetch_latest` is an empty list.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_latest(&self) -> Vec<NewsItem>;
    fn name(&self) -> &'static str;
}
