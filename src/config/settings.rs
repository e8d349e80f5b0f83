//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable consulted when `gateway.api_key` is not set.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Connection settings for the inference provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the REST API, without a trailing version segment.
    pub base_url: String,
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-2.5-flash-lite"`).
    pub model: String,
    /// Maximum seconds to wait for any single HTTP request.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.5-flash-lite".into(),
            timeout_secs: 60,
        }
    }
}

impl GatewayConfig {
    /// The configured key if non-empty, otherwise the environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// SamplingConfig
// ---------------------------------------------------------------------------

/// Sampling policy shared by the extraction and resolution calls.
///
/// Low temperature and a small top-k bias the model toward deterministic
/// digit reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_k: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// PromptConfig
// ---------------------------------------------------------------------------

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert at reading analog gas meters from photographs.
The meter shows a mechanical odometer-style counter of rolling digit wheels.
Report exactly what the counter shows; never invent digits.";

const DEFAULT_IMAGE_PROMPT: &str = "\
Process the image and extract the reading and the date.

Rules:
1. Put the counter value in the field `read`, using only digits and the
   decimal point, keeping every digit position shown on the meter.
2. Replace any digit you cannot read with confidence by the character `?`.
3. Put the date visible in the image (e.g. a timestamp overlay) in the field
   `date`, or an empty string if there is none.";

/// Instructions sent with every extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Domain framing, sent as the system message.
    pub system_prompt: String,
    /// Task description, sent with the image in the user message.
    pub image_prompt: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            image_prompt: DEFAULT_IMAGE_PROMPT.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ResolveConfig
// ---------------------------------------------------------------------------

/// Settings for resolving `?` digits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Reject resolved readings whose length, alphabet or fixed digits differ
    /// from the ambiguous input. When `false` any marker-free answer is
    /// accepted verbatim.
    pub strict_output: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            strict_output: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gas_meter_reader::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub sampling: SamplingConfig,
    pub prompts: PromptConfig,
    pub resolve: ResolveConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.gateway.base_url, loaded.gateway.base_url);
        assert_eq!(original.gateway.api_key, loaded.gateway.api_key);
        assert_eq!(original.gateway.model, loaded.gateway.model);
        assert_eq!(original.sampling, loaded.sampling);
        assert_eq!(original.prompts.system_prompt, loaded.prompts.system_prompt);
        assert_eq!(original.prompts.image_prompt, loaded.prompts.image_prompt);
        assert_eq!(original.resolve.strict_output, loaded.resolve.strict_output);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.gateway.model, GatewayConfig::default().model);
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[sampling]\ntop_k = 3\n").unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.sampling.top_k, 3);
        assert!((config.sampling.temperature - 0.1).abs() < f32::EPSILON);
        assert!(config.resolve.strict_output);
        assert_eq!(config.gateway.timeout_secs, 60);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.gateway.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.gateway.model, "gemini-2.5-flash-lite");
        assert!(cfg.gateway.api_key.is_none());
        assert!((cfg.sampling.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(cfg.sampling.top_k, 10);
        assert!(cfg.prompts.image_prompt.contains("`read`"));
        assert!(cfg.prompts.image_prompt.contains('?'));
        assert!(cfg.resolve.strict_output);
    }

    #[test]
    fn configured_api_key_wins_over_environment() {
        let cfg = GatewayConfig {
            api_key: Some("from-file".into()),
            ..GatewayConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("from-file"));
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.gateway.api_key = Some("k-test".into());
        cfg.gateway.model = "gemini-2.5-flash".into();
        cfg.sampling.temperature = 0.0;
        cfg.resolve.strict_output = false;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.gateway.api_key, Some("k-test".into()));
        assert_eq!(loaded.gateway.model, "gemini-2.5-flash");
        assert_eq!(loaded.sampling.temperature, 0.0);
        assert!(!loaded.resolve.strict_output);
    }
}
