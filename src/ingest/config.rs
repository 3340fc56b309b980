// src/ingest/config.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

pub const ENV_CONFIG_PATH: &str = "HOTLIST_CONFIG_PATH";
pub const ENV_PAGE: &str = "HOTLIST_PAGE";
pub const ENV_RANGE: &str = "HOTLIST_RANGE";
pub const ENV_RUNTIME: &str = "HOTLIST_RUNTIME";

pub const DEFAULT_BASE_URL: &str = "https://www.sinchew.com.my";
pub const DEFAULT_CONFIG_TOML: &str = "config/hotlist.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/hotlist.json";

/// Ranking window accepted by the hot-list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "6H")]
    SixHours,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
}

impl TimeRange {
    pub fn code(self) -> &'static str {
        match self {
            TimeRange::SixHours => "6H",
            TimeRange::OneDay => "1D",
            TimeRange::OneWeek => "1W",
        }
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "6H" => Ok(TimeRange::SixHours),
            "1D" => Ok(TimeRange::OneDay),
            "1W" => Ok(TimeRange::OneWeek),
            other => Err(anyhow!("unknown hot-list range: {other}")),
        }
    }
}

/// Where the process runs. Resolved once at startup, never probed per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// Request-scoped proxy/edge runtime: tighter egress, more upstream blocking.
    Edge,
    #[default]
    Server,
}

impl RuntimeKind {
    /// `$HOTLIST_RUNTIME` (`edge` | `server`); anything else means server.
    pub fn detect() -> Self {
        std::env::var(ENV_RUNTIME)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_edge(self) -> bool {
        self == RuntimeKind::Edge
    }
}

impl FromStr for RuntimeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" | "worker" | "proxy" => Ok(RuntimeKind::Edge),
            "server" | "node" => Ok(RuntimeKind::Server),
            other => Err(anyhow!("unknown runtime kind: {other}")),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_page() -> u32 {
    3
}
fn default_range() -> TimeRange {
    TimeRange::SixHours
}
fn default_fallback_page() -> u32 {
    1
}
fn default_cache_bust() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotListConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page requested first. Tuned against upstream anti-bot behaviour.
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_range")]
    pub range: TimeRange,
    /// Lowest, always-populated page used as the secondary attempt.
    #[serde(default = "default_fallback_page")]
    pub fallback_page: u32,
    /// Append `_={millis}` to hot-list requests.
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub runtime: RuntimeKind,
}

impl Default for HotListConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page: default_page(),
            range: default_range(),
            fallback_page: default_fallback_page(),
            cache_bust: default_cache_bust(),
            timeout_secs: default_timeout_secs(),
            runtime: RuntimeKind::default(),
        }
    }
}

impl HotListConfig {
    /// Parsed base origin. Validated on load, so this only fails for configs
    /// built by hand.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("invalid base_url {}", self.base_url))
    }

    fn validate(self) -> Result<Self> {
        let base = self.base()?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("base_url must be http(s): {}", self.base_url);
        }
        if self.page == 0 || self.fallback_page == 0 {
            bail!("page numbers start at 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(self)
    }

    /// Apply `HOTLIST_PAGE`, `HOTLIST_RANGE` and `HOTLIST_RUNTIME` on top.
    /// Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_PAGE) {
            match raw.trim().parse::<u32>() {
                Ok(p) if p > 0 => self.page = p,
                _ => tracing::warn!(value = %raw, "ignoring invalid {ENV_PAGE}"),
            }
        }
        if let Ok(raw) = std::env::var(ENV_RANGE) {
            match raw.parse::<TimeRange>() {
                Ok(r) => self.range = r,
                Err(e) => tracing::warn!(error = %e, "ignoring invalid {ENV_RANGE}"),
            }
        }
        if std::env::var(ENV_RUNTIME).is_ok() {
            self.runtime = RuntimeKind::detect();
        }
        self
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<HotListConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading hot-list config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())?.validate()
}

/// Load config using env var + fallbacks, then env overrides:
/// 1) $HOTLIST_CONFIG_PATH
/// 2) config/hotlist.toml
/// 3) config/hotlist.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<HotListConfig> {
    let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else if Path::new(DEFAULT_CONFIG_TOML).exists() {
        load_config_from(Path::new(DEFAULT_CONFIG_TOML))?
    } else if Path::new(DEFAULT_CONFIG_JSON).exists() {
        load_config_from(Path::new(DEFAULT_CONFIG_JSON))?
    } else {
        HotListConfig::default()
    };
    base.with_env_overrides().validate()
}

fn parse_config(s: &str, hint_ext: &str) -> Result<HotListConfig> {
    match hint_ext {
        "toml" => toml::from_str(s).context("parsing hot-list config toml"),
        "json" => serde_json::from_str(s).context("parsing hot-list config json"),
        _ => serde_json::from_str(s)
            .or_else(|_| toml::from_str(s))
            .map_err(|_| anyhow!("unsupported hot-list config format")),
    }
}
