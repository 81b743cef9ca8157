//! Global configuration types for mendr.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! HTTP server, the two generator variants, the embedder, the healing loop,
//! and persistence. Every section and field has a default, so an empty file
//! (or no file at all) yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Temperature used by the primary generator when none is configured.
pub const DEFAULT_PRIMARY_TEMPERATURE: f64 = 0.7;

/// Temperature used by the fallback generator when none is configured.
pub const DEFAULT_FALLBACK_TEMPERATURE: f64 = 0.9;

/// Top-level configuration.
///
/// Loaded from `~/.mendr/config.toml` (or `$MENDR_DATA_DIR/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Generator used for the plain attempt and the first healing attempt.
    #[serde(default)]
    pub primary: GeneratorConfig,

    /// Generator used for the last healing attempt.
    #[serde(default)]
    pub fallback: GeneratorConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub healing: HealingConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Settings for one language generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Well-known provider name ("gemini", "openai", "mistral") used to pick
    /// a base URL when `base_url` is not set.
    pub provider: String,
    /// Override the provider's default base URL.
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature; the role default applies when unset.
    pub temperature: Option<f64>,
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            base_url: None,
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            temperature: None,
            max_tokens: 1024,
        }
    }
}

/// Settings for the local embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier, e.g. "bge-small-en-v1.5".
    pub model: String,
    /// Where downloaded model files are cached. Defaults to `{data_dir}/models`.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "bge-small-en-v1.5".to_string(),
            cache_dir: None,
        }
    }
}

/// Settings for the healing loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealingConfig {
    /// Number of memories retrieved for each healing prompt.
    pub memory_k: usize,
    /// Overall time budget for one `ask` call. No deadline when unset.
    pub deadline_secs: Option<u64>,
}

impl Default for HealingConfig {
    fn default() -> Self {
        Self {
            memory_k: 2,
            deadline_secs: None,
        }
    }
}

/// Extra refusal phrases on top of the built-in set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub extra_phrases: Vec<String>,
}

/// Memory bootstrap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Statements added to the memory store on every start.
    pub seed: Vec<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            seed: vec![
                "The user is asking for help building a system. \
                 Your primary goal is to be a helpful assistant."
                    .to_string(),
                "A 'self-healing' system automatically detects and recovers from failures."
                    .to_string(),
            ],
        }
    }
}

/// Interaction/feedback persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Set to false to run without durable logs.
    pub enabled: bool,
    /// SQLite file name inside the data directory.
    pub file_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: "mendr.db".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.primary.model, "gemini-1.5-flash");
        assert_eq!(config.primary.api_key_env, "GOOGLE_API_KEY");
        assert!(config.primary.temperature.is_none());
        assert_eq!(config.healing.memory_k, 2);
        assert!(config.healing.deadline_secs.is_none());
        assert_eq!(config.memory.seed.len(), 2);
        assert!(config.database.enabled);
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.fallback.provider, "gemini");
        assert!(config.classifier.extra_phrases.is_empty());
    }

    #[test]
    fn test_global_config_deserialize_partial_sections() {
        let toml_str = r#"
[server]
port = 9090

[fallback]
model = "gemini-1.5-pro"
temperature = 1.1

[healing]
deadline_secs = 30

[classifier]
extra_phrases = ["no comment"]

[memory]
seed = []
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.fallback.model, "gemini-1.5-pro");
        assert_eq!(config.fallback.temperature, Some(1.1));
        assert_eq!(config.fallback.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.primary.model, "gemini-1.5-flash");
        assert_eq!(config.healing.deadline_secs, Some(30));
        assert_eq!(config.healing.memory_k, 2);
        assert_eq!(config.classifier.extra_phrases, vec!["no comment"]);
        assert!(config.memory.seed.is_empty());
    }

    #[test]
    fn test_role_default_temperatures_differ() {
        assert!(DEFAULT_FALLBACK_TEMPERATURE > DEFAULT_PRIMARY_TEMPERATURE);
    }
}
