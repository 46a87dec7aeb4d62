//! Curator configuration.
//!
//! Handles loading, validating, and merging `curator.toml`. Stock defaults are
//! the base layer; a user file overrides just the keys it sets, and two
//! environment variables override the client credentials last.
//!
//! ## Configuration Options
//!
//! ```toml
//! [[blogs]]
//! name = "menswear-daily"         # Blog sub-domain, without .tumblr.com
//! divider = "〰️〰️〰️"               # Line above the caption footer
//! followers = "12k+ followers!"   # Optional footer text
//! submit_phrase = "Got pics? Send them to {sub_domain}!"
//! keywords = ["suit", "tailoring"] # Tags that make this blog a suggested target
//!
//! [tags]
//! choices = ["menswear, style", "beach"]  # Extra tag groups offered per post
//!
//! [reblog]
//! states = ["published", "queue"] # Reblog state is picked at random from these
//!
//! [submissions]
//! request_title = "Submissions are open"
//! request_body = "Send us your **best** shots."  # Markdown
//!
//! [client]
//! base_url = "https://api.tumblr.com/v2"
//! timeout_secs = 30
//! api_key = ""        # or CURATOR_API_KEY
//! oauth_token = ""    # or CURATOR_OAUTH_TOKEN
//! ```
//!
//! Unknown keys are rejected to catch typos early. Note that `[[blogs]]` is an
//! array: a user file that sets it replaces the stock blog list entirely.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const API_KEY_ENV: &str = "CURATOR_API_KEY";
pub const OAUTH_TOKEN_ENV: &str = "CURATOR_OAUTH_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Curator configuration loaded from `curator.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CuratorConfig {
    /// Destination blogs, in the order they are offered.
    pub blogs: Vec<BlogConfig>,
    pub tags: TagsConfig,
    pub reblog: ReblogConfig,
    pub submissions: SubmissionsConfig,
    pub client: ClientConfig,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            blogs: vec![
                BlogConfig {
                    name: "menswear-daily".to_string(),
                    divider: "〰️〰️〰️〰️〰️".to_string(),
                    followers: Some("Join 12k+ followers!".to_string()),
                    submit_phrase: "Got pics? Share them with {sub_domain}:".to_string(),
                    keywords: vec!["suit".to_string(), "menswear".to_string()],
                },
                BlogConfig {
                    name: "beach-boys-archive".to_string(),
                    divider: "🌊🌊🌊🌊🌊".to_string(),
                    followers: None,
                    submit_phrase: "Been to the beach? Tell {sub_domain}:".to_string(),
                    keywords: vec!["beach".to_string(), "swimwear".to_string()],
                },
            ],
            tags: TagsConfig::default(),
            reblog: ReblogConfig::default(),
            submissions: SubmissionsConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl CuratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blogs.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[blogs]] entry is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for blog in &self.blogs {
            if blog.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "blogs.name must not be empty".into(),
                ));
            }
            if !seen.insert(blog.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "blog '{}' is listed twice",
                    blog.name
                )));
            }
        }
        if self.reblog.states.is_empty() {
            return Err(ConfigError::Validation(
                "reblog.states must not be empty".into(),
            ));
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "client.timeout_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn blog(&self, name: &str) -> Option<&BlogConfig> {
        self.blogs.iter().find(|b| b.name == name)
    }

    pub fn blog_names(&self) -> Vec<String> {
        self.blogs.iter().map(|b| b.name.clone()).collect()
    }
}

/// One destination blog and its caption footer text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    pub name: String,
    pub divider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<String>,
    /// Call to action before the submit link; `{sub_domain}` is substituted.
    pub submit_phrase: String,
    pub keywords: Vec<String>,
}

impl BlogConfig {
    pub fn submit_phrase(&self) -> String {
        self.submit_phrase.replace("{sub_domain}", &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    /// Extra tag groups offered after the info-list tags. A group may hold
    /// several comma-separated tags.
    pub choices: Vec<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            choices: vec![
                "menswear, style".to_string(),
                "beach, summer".to_string(),
                "model".to_string(),
                "photography".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReblogConfig {
    pub states: Vec<String>,
}

impl Default for ReblogConfig {
    fn default() -> Self {
        Self {
            states: vec!["published".to_string(), "queue".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionsConfig {
    pub request_title: String,
    /// Markdown body of the submission-request post.
    pub request_body: String,
}

impl Default for SubmissionsConfig {
    fn default() -> Self {
        Self {
            request_title: "Submissions are open".to_string(),
            request_body: "Send us your **best** shots through the submit page.\n\n\
                           Credit the model and photographer so we can tag them."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key: String,
    /// OAuth2 bearer token used for every authenticated call.
    pub oauth_token: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tumblr.com/v2".to_string(),
            timeout_secs: 30,
            api_key: String::new(),
            oauth_token: String::new(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CuratorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CuratorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CuratorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Apply credential overrides from the environment.
pub fn apply_env_overrides<F>(config: &mut CuratorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
        config.client.api_key = key;
    }
    if let Some(token) = lookup(OAUTH_TOKEN_ENV).filter(|v| !v.is_empty()) {
        config.client.oauth_token = token;
    }
}

/// Load config from `path`, merged over stock defaults, with environment
/// credential overrides applied.
pub fn load_config(path: &Path) -> Result<CuratorConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(base, overlay)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Returns a fully-commented stock `curator.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Tumblr Curator Configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Destination blogs
# ---------------------------------------------------------------------------
# Each [[blogs]] entry is a blog you can publish to. Setting any [[blogs]]
# entry replaces this whole list.
[[blogs]]
name = "menswear-daily"
# Line shown above the footer of every caption.
divider = "〰️〰️〰️〰️〰️"
# Optional text shown before the follow link.
followers = "Join 12k+ followers!"
# Shown before the submit link. {sub_domain} becomes the blog name.
submit_phrase = "Got pics? Share them with {sub_domain}:"
# Posts tagged with any of these list this blog first when picking targets.
keywords = ["suit", "menswear"]

[[blogs]]
name = "beach-boys-archive"
divider = "🌊🌊🌊🌊🌊"
submit_phrase = "Been to the beach? Tell {sub_domain}:"
keywords = ["beach", "swimwear"]

# ---------------------------------------------------------------------------
# Extra tags
# ---------------------------------------------------------------------------
[tags]
# Groups offered in the tag selector. A group may hold several
# comma-separated tags. A post never carries more than 30 tags.
choices = ["menswear, style", "beach, summer", "model", "photography"]

# ---------------------------------------------------------------------------
# Reblogs
# ---------------------------------------------------------------------------
[reblog]
# Each reblog is published with one of these states, picked at random.
states = ["published", "queue"]

# ---------------------------------------------------------------------------
# Submission request post
# ---------------------------------------------------------------------------
[submissions]
request_title = "Submissions are open"
# Markdown, rendered to HTML when posted.
request_body = """Send us your **best** shots through the submit page.

Credit the model and photographer so we can tag them."""

# ---------------------------------------------------------------------------
# Remote API client
# ---------------------------------------------------------------------------
[client]
base_url = "https://api.tumblr.com/v2"
timeout_secs = 30
# Prefer the CURATOR_API_KEY / CURATOR_OAUTH_TOKEN environment variables.
api_key = ""
oauth_token = ""
"##
}
