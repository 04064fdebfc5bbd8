//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatui/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub placeholder: Option<String>,
    pub follow_up_placeholder: Option<String>,
    pub system_name: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub placeholder: Option<String>,
    pub system_name: Option<String>,
    pub user_name: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PLACEHOLDER: &str = "Type a message...";
pub const DEFAULT_FOLLOW_UP_PLACEHOLDER: &str = "Type a follow up...";
pub const DEFAULT_SYSTEM_NAME: &str = "System";
pub const DEFAULT_USER_NAME: &str = "You";

// ============================================================================
// Widget Options (what the widget is constructed with)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetOptions {
    pub api_url: String,
    /// Input prompt while the conversation is empty.
    pub placeholder: String,
    /// Input prompt once at least one turn exists.
    pub follow_up_placeholder: String,
    pub system_name: String,
    pub user_name: String,
}

impl WidgetOptions {
    /// Options with every optional value at its default.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_overrides(api_url, None, None, None, None)
    }

    /// Build options from the explicitly provided values.
    ///
    /// The follow-up placeholder falls back to an explicit `placeholder`
    /// before its own default, so a host that only sets one prompt sees it
    /// throughout the conversation.
    pub fn with_overrides(
        api_url: impl Into<String>,
        placeholder: Option<String>,
        follow_up_placeholder: Option<String>,
        system_name: Option<String>,
        user_name: Option<String>,
    ) -> Self {
        let placeholder = non_empty(placeholder);
        let follow_up_placeholder = non_empty(follow_up_placeholder)
            .or_else(|| placeholder.clone())
            .unwrap_or_else(|| DEFAULT_FOLLOW_UP_PLACEHOLDER.to_string());

        Self {
            api_url: api_url.into(),
            placeholder: placeholder.unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
            follow_up_placeholder,
            system_name: non_empty(system_name).unwrap_or_else(|| DEFAULT_SYSTEM_NAME.to_string()),
            user_name: non_empty(user_name).unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub widget: WidgetOptions,
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// No endpoint URL in CLI, env, or config file.
    MissingEndpoint,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingEndpoint => write!(
                f,
                "no endpoint URL configured (use --url, CHATUI_API_URL, or [endpoint] url in the config file)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chatui/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatui").join("config.toml"))
}

/// Load config from `~/.chatui/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ChatConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<ChatConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# chatui Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [widget]
# placeholder = "Type a message..."
# follow_up_placeholder = "Type a follow up..."
# system_name = "System"             # Or set CHATUI_SYSTEM_NAME env var
# user_name = "You"                  # Or set CHATUI_USER_NAME env var

# [endpoint]
# url = "http://localhost:8080/chat" # Or set CHATUI_API_URL env var
# timeout_secs = 60

# [endpoint.headers]
# X-Client = "chatui"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment supplied by the caller.
pub fn resolve_with(
    config: &ChatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // URL: CLI → env → config, no default. A blank source falls through
    let present = |url: &String| !url.trim().is_empty();
    let api_url = cli
        .url
        .clone()
        .filter(present)
        .or_else(|| env("CHATUI_API_URL").filter(present))
        .or_else(|| config.endpoint.url.clone().filter(present))
        .ok_or(ConfigError::MissingEndpoint)?;

    // Display names: CLI → env → config → default
    let system_name = cli
        .system_name
        .clone()
        .or_else(|| env("CHATUI_SYSTEM_NAME"))
        .or_else(|| config.widget.system_name.clone());
    let user_name = cli
        .user_name
        .clone()
        .or_else(|| env("CHATUI_USER_NAME"))
        .or_else(|| config.widget.user_name.clone());

    // Placeholders: CLI → config → default
    let placeholder = cli
        .placeholder
        .clone()
        .or_else(|| config.widget.placeholder.clone());

    let widget = WidgetOptions::with_overrides(
        api_url,
        placeholder,
        config.widget.follow_up_placeholder.clone(),
        system_name,
        user_name,
    );

    Ok(ResolvedConfig {
        widget,
        timeout: config.endpoint.timeout_secs.map(Duration::from_secs),
        headers: config
            .endpoint
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    })
}
