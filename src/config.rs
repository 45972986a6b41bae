use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CookscaleConfig {
    /// Language pair used for translation
    #[serde(default)]
    pub languages: LanguageConfig,
    /// Initial value of the "translate to target language" preference
    #[serde(default)]
    pub translate_to_target: bool,
    /// LLM endpoint shared by the extractor and the translator
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Source and target language tags
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language the extracted recipe is written in
    #[serde(default = "default_source_language")]
    pub source: String,
    /// Language the recipe can be translated into
    #[serde(default = "default_target_language")]
    pub target: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source: default_source_language(),
            target: default_target_language(),
        }
    }
}

/// Configuration for the OpenAI-compatible endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model identifier (e.g., "gpt-4.1-mini")
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

// Default value functions
fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "nl".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout() -> u64 {
    30
}

impl CookscaleConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COOKSCALE__ prefix
    /// 2. cookscale.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COOKSCALE__PROVIDER__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration, see [`CookscaleConfig::load`]
pub fn load_config() -> Result<CookscaleConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("cookscale").required(false))
        // Use double underscore for nested: COOKSCALE__LANGUAGES__TARGET
        .add_source(
            Environment::with_prefix("COOKSCALE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::env;

    #[test]
    fn test_default_values() {
        assert_eq!(default_source_language(), "en");
        assert_eq!(default_target_language(), "nl");
        assert_eq!(default_temperature(), 0.2);
        assert_eq!(default_max_tokens(), 4000);
        assert_eq!(default_timeout(), 30);
    }

    #[test]
    fn test_language_config_default() {
        let languages = LanguageConfig::default();
        assert_eq!(languages.source, "en");
        assert_eq!(languages.target, "nl");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "translate_to_target = true\n[languages]\ntarget = \"fr\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: CookscaleConfig = settings.try_deserialize().unwrap();

        assert!(config.translate_to_target);
        assert_eq!(config.languages.source, "en");
        assert_eq!(config.languages.target, "fr");
        assert_eq!(config.provider.model, "gpt-4.1-mini");
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_load_config_without_file() {
        let keys_to_clear: Vec<String> = env::vars()
            .filter(|(k, _)| k.starts_with("COOKSCALE__"))
            .map(|(k, _)| k)
            .collect();

        for key in keys_to_clear {
            env::remove_var(&key);
        }

        // Every field has a default, so an empty environment still loads
        let config = load_config().unwrap();
        assert!(!config.translate_to_target);
        assert_eq!(config.languages, LanguageConfig::default());
    }
}
