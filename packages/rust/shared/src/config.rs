//! Application configuration for patterndocs.
//!
//! User config lives at `~/.patterndocs/patterndocs.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PatternDocsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "patterndocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".patterndocs";

/// Metadata feed the descriptions are generated from.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/find-sec-bugs/find-sec-bugs/master/plugin/src/main/resources/metadata/messages.xml";

/// Where description files land, relative to the working directory.
/// The directory is expected to exist already; patterndocs never creates it.
pub const DEFAULT_OUTPUT_DIR: &str = "../src/main/resources/docs/description";

// ---------------------------------------------------------------------------
// Config structs (matching patterndocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pattern feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[feed]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL of the bug-pattern metadata feed.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// HTTP timeout for the feed request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one `<id>.md` file per bug pattern.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.patterndocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PatternDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.patterndocs/patterndocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PatternDocsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PatternDocsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PatternDocsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PatternDocsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PatternDocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("url"));
        assert!(toml_str.contains("find-sec-bugs"));
        assert!(toml_str.contains("docs/description"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.feed.url, DEFAULT_FEED_URL);
        assert_eq!(parsed.feed.timeout_secs, 30);
        assert_eq!(parsed.output.dir, DEFAULT_OUTPUT_DIR);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[output]
dir = "/tmp/descriptions"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.dir, "/tmp/descriptions");
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.timeout_secs, 30);
    }

    #[test]
    fn unreadable_config_is_an_io_error() {
        let missing = std::env::temp_dir().join("patterndocs-no-such-config.toml");
        let result = load_config_from(&missing);
        assert!(matches!(result, Err(PatternDocsError::Io { .. })));
    }
}
