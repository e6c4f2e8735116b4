use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Remote inference provider. Unknown values are rejected at
/// deserialization time instead of at the first network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    OpenaiCompatible,
    AzureOpenai,
    Ollama,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenaiCompatible => write!(f, "openai-compatible"),
            Provider::AzureOpenai => write!(f, "azure-openai"),
            Provider::Ollama => write!(f, "ollama"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,

    /// Name of the environment variable holding the API credential.
    /// The credential itself never lives in the config file.
    /// "none" (or absence, for ollama) means no credential is needed.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Base URL for openai-compatible providers, or the Azure/Ollama endpoint.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Azure OpenAI deployment name.
    #[serde(default)]
    pub deployment: Option<String>,

    /// Azure OpenAI API version query parameter.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Optional override for max output tokens. If not specified, the
    /// report variant picks its own default (512 for summaries, 800 for
    /// requirement extraction).
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenaiCompatible,
            model: "microsoft/codebert-base".to_string(),
            api_key_env: Some("HUGGINGFACE_TOKEN".to_string()),
            base_url: None,
            deployment: None,
            api_version: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions to annotate, matched case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Character budget per artifact before truncation.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Maximum remote inference attempts per artifact.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_chars: default_max_chars(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["java".to_string()]
}

fn default_max_chars() -> usize {
    2000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load config from repo root or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        // Try repo root first (per-repo config)
        if let Ok(config) = Self::load_from_path("legacylens.toml") {
            debug!("Loaded config from ./legacylens.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("legacylens").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        // Return defaults
        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the API credential from the environment variable named in
    /// config. Returns None when no credential is configured or the
    /// variable is unset/empty — the pipeline then degrades to fallback
    /// annotations rather than failing.
    pub fn resolve_api_key(&self) -> Option<String> {
        let env_var = self.llm.api_key_env.as_deref()?;
        if env_var.to_lowercase() == "none" {
            return None;
        }
        match env::var(env_var) {
            Ok(v) if !v.trim().is_empty() => Some(v),
            _ => None,
        }
    }
}
