//! Application configuration for SeoForge.
//!
//! User config lives at `~/.seoforge/seoforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeoForgeError};
use crate::types::StyleProfile;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "seoforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".seoforge";

/// Desktop browser user-agent sent when scraping pages.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// ---------------------------------------------------------------------------
// Config structs (matching seoforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// The site the content is written for.
    #[serde(default)]
    pub site: SiteConfig,

    /// Page and sitemap fetching.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Writing constraints and truncation budget.
    #[serde(default)]
    pub style: StyleConfig,
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model identifier pinned for every phase.
    #[serde(default = "default_model")]
    pub model: String,

    /// API root; the chat completions path is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Brand the persona writes for.
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Audience the content must align with.
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Sitemap listing the only URLs allowed as internal-link targets.
    #[serde(default = "default_sitemap_url")]
    pub sitemap_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            audience: default_audience(),
            sitemap_url: default_sitemap_url(),
        }
    }
}

fn default_brand() -> String {
    "Hire Overseas".into()
}
fn default_audience() -> String {
    "US businesses/users looking to hire workers remotely".into()
}
fn default_sitemap_url() -> String {
    "https://hireoverseas.com/sitemap.xml".into()
}

impl SiteConfig {
    /// Host name of the sitemap URL, used to name the site in prompts.
    pub fn site_host(&self) -> String {
        url::Url::parse(&self.sitemap_url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| self.brand.clone())
    }
}

/// `[scrape]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Connect + read timeout for sitemap and page requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with page requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

/// `[style]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Preset name: "classic" or "extended".
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Overrides the preset's per-page character budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_char_limit: Option<usize>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            scrape_char_limit: None,
        }
    }
}

fn default_profile() -> String {
    "classic".into()
}

impl AppConfig {
    /// Resolve the `[style]` section into a concrete profile.
    pub fn style_profile(&self) -> Result<StyleProfile> {
        let mut profile = StyleProfile::by_name(&self.style.profile)?;
        if let Some(limit) = self.style.scrape_char_limit {
            if limit == 0 {
                return Err(SeoForgeError::config("style.scrape_char_limit must be positive"));
            }
            profile.scrape_char_limit = limit;
        }
        Ok(profile)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.seoforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| SeoForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.seoforge/seoforge.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| SeoForgeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SeoForgeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SeoForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SeoForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SeoForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve the completion API key.
///
/// An explicit key (CLI flag) wins; otherwise the env var named by
/// `openai.api_key_env` is read. A missing or empty key is a config error.
pub fn resolve_api_key(config: &AppConfig, explicit: Option<&str>) -> Result<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    let var_name = &config.openai.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(SeoForgeError::config(format!(
            "missing OpenAI API key. Set the {var_name} environment variable or pass --api-key."
        ))),
    }
}
