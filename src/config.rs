use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::util::{secret_from_env, SecretString};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub organization: OrganizationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Gemini,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Gemini => "gemini",
            Provider::Anthropic => "anthropic",
            Provider::OpenAI => "openai",
            Provider::OpenAICompatible => "openai-compatible",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>, // For OpenAI-compatible APIs and test servers

    /// Optional: Override max_tokens for generation requests
    /// If not specified, uses provider-specific defaults:
    /// - gemini: 8192
    /// - anthropic: 4096
    /// - openai: 4096
    /// - openai-compatible (ollama): 16384
    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Get max_tokens value, using provider-specific default if not specified
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(tokens) = self.max_tokens {
            return tokens;
        }

        match self.provider {
            Provider::Gemini => 8192,
            Provider::Anthropic => 4096,
            Provider::OpenAI => 4096,
            Provider::OpenAICompatible => 16384,
        }
    }

    /// Get API key from the environment variable named in config.
    /// openai-compatible endpoints may run without a key (local models).
    pub fn get_api_key(&self) -> Result<SecretString> {
        let required = self.provider != Provider::OpenAICompatible;
        secret_from_env(self.api_key_env.as_deref(), required)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: "gemini-2.5-flash".to_string(),
            api_key_env: Some("GEMINI_API_KEY".to_string()),
            base_url: None,
            max_tokens: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,
}

impl GitHubConfig {
    pub fn get_token(&self) -> Result<SecretString> {
        secret_from_env(Some(&self.token_env), true)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            api_base: default_api_base(),
            timeout_secs: default_github_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Display name used in prompts and greetings
    #[serde(default = "default_org_name")]
    pub name: String,
    /// Account that owns the project repositories on the source host
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Known project names, in match order
    #[serde(default = "default_projects")]
    pub projects: Vec<String>,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            name: default_org_name(),
            owner: default_owner(),
            projects: default_projects(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Directory for repo_map.json and summaries.json.
    /// Defaults to `<user cache dir>/onboardbot`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Keep caches in memory only
    #[serde(default)]
    pub disabled: bool,
}

impl CacheConfig {
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.dir {
            return dir.clone();
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("onboardbot")
    }
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_github_timeout() -> u64 {
    30
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_org_name() -> String {
    "Cornell AppDev".to_string()
}

fn default_owner() -> String {
    "cuappdev".to_string()
}

fn default_projects() -> Vec<String> {
    [
        "eatery",
        "resell",
        "uplift",
        "score",
        "navi",
        "hustle",
        "coursegrab",
        "volume",
        "scooped",
        "all-in",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load config from the working directory or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        if let Ok(config) = Self::load_from_path("onboardbot.toml") {
            debug!("Loaded config from ./onboardbot.toml");
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("onboardbot").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, Provider::Gemini);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.api_key_env, Some("GEMINI_API_KEY".to_string()));
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.organization.owner, "cuappdev");
        assert_eq!(config.organization.projects.len(), 10);
        assert!(!config.cache.disabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"gemini\""));
        assert!(toml_str.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[llm]
provider = "openai-compatible"
model = "llama3"
api_key_env = "none"
base_url = "http://localhost:11434/v1"

[organization]
projects = ["resell", "eatery"]
"#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, Provider::OpenAICompatible);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.organization.projects, vec!["resell", "eatery"]);
        assert_eq!(config.organization.owner, "cuappdev");
        assert_eq!(config.github.api_base, "https://api.github.com");
    }

    #[test]
    fn test_max_tokens_provider_defaults() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.get_max_tokens(), 8192);

        llm.provider = Provider::Anthropic;
        assert_eq!(llm.get_max_tokens(), 4096);

        llm.provider = Provider::OpenAICompatible;
        assert_eq!(llm.get_max_tokens(), 16384);

        llm.max_tokens = Some(2000);
        assert_eq!(llm.get_max_tokens(), 2000);
    }

    #[test]
    #[serial]
    fn test_api_key_from_env() {
        env::set_var("ONBOARDBOT_TEST_LLM_KEY", "key_123");
        let mut config = Config::default();
        config.llm.api_key_env = Some("ONBOARDBOT_TEST_LLM_KEY".to_string());
        assert_eq!(config.llm.get_api_key().unwrap().expose(), "key_123");
        env::remove_var("ONBOARDBOT_TEST_LLM_KEY");
    }

    #[test]
    #[serial]
    fn test_api_key_openai_compatible_missing_ok() {
        let mut config = Config::default();
        config.llm.provider = Provider::OpenAICompatible;
        config.llm.api_key_env = Some("ONBOARDBOT_NONEXISTENT_KEY_OAI_999".to_string());
        assert!(config.llm.get_api_key().unwrap().is_empty());
    }

    #[test]
    fn test_cache_dir_override() {
        let cache = CacheConfig {
            dir: Some(PathBuf::from("/tmp/onboardbot-cache")),
            disabled: false,
        };
        assert_eq!(cache.resolve_dir(), PathBuf::from("/tmp/onboardbot-cache"));
    }
}
