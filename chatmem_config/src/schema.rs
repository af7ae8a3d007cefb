use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    /// Provider used when a request does not name one.
    #[serde(default = "ProvidersConfig::default_provider")]
    pub default: String,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default: Self::default_provider(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl ProvidersConfig {
    fn default_provider() -> String {
        "gemini".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeminiConfig {
    /// Also read from GEMINI_API_KEY / GOOGLE_API_KEY when absent here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "GeminiConfig::default_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Self::default_model(),
        }
    }
}

impl GeminiConfig {
    fn default_model() -> String {
        "gemini-2.0-flash".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "OllamaConfig::default_host")]
    pub host: String,
    #[serde(default = "OllamaConfig::default_model")]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            model: Self::default_model(),
        }
    }
}

impl OllamaConfig {
    fn default_host() -> String {
        "http://localhost:11434".to_string()
    }

    fn default_model() -> String {
        "llama3".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_redis_url")]
    pub redis_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: Self::default_redis_url(),
        }
    }
}

impl StoreConfig {
    fn default_redis_url() -> String {
        "redis://localhost:6379/0".to_string()
    }
}

/// Bounds for the memory strategies. All bounds are message counts.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MemoryConfig {
    /// Strategy used when a request does not name one: none | window | rolling.
    #[serde(default = "MemoryConfig::default_strategy")]
    pub strategy: String,
    /// Window size for the sliding-window strategy.
    #[serde(default = "MemoryConfig::default_window_size")]
    pub window_size: usize,
    /// Message count that triggers rolling summarization.
    #[serde(default = "MemoryConfig::default_threshold")]
    pub threshold: usize,
    /// Messages kept verbatim after a summarization pass.
    #[serde(default = "MemoryConfig::default_keep_recent")]
    pub keep_recent: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            strategy: Self::default_strategy(),
            window_size: Self::default_window_size(),
            threshold: Self::default_threshold(),
            keep_recent: Self::default_keep_recent(),
        }
    }
}

impl MemoryConfig {
    fn default_strategy() -> String {
        "rolling".to_string()
    }

    const fn default_window_size() -> usize {
        10
    }

    const fn default_threshold() -> usize {
        10
    }

    const fn default_keep_recent() -> usize {
        4
    }
}

impl Config {
    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("chatmem"))
    }

    fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load the config file, falling back to defaults when it is absent.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("no config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;
        info!("loaded config from {}", config_path.display());

        Ok(config)
    }

    /// Write a template config file for editing. Refuses to overwrite.
    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "providers": {
    "default": "gemini",
    "gemini": {
      "api_key": "your-gemini-api-key-here",
      "model": "gemini-2.0-flash"
    },
    "ollama": {
      "host": "http://localhost:11434",
      "model": "llama3"
    }
  },
  "store": {
    "redis_url": "redis://localhost:6379/0"
  },
  "memory": {
    "strategy": "rolling",
    "window_size": 10,
    "threshold": 10,
    "keep_recent": 4
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("  1. Add your Gemini API key (or set GEMINI_API_KEY), or point");
        println!("     providers.default at 'ollama' for a local model");
        println!("  2. Ensure Redis is running at the configured URL");
        println!("  3. Run 'chatmem chat --session <name>' to start a conversation");
        println!();
        println!("Memory options:");
        println!("  - strategy: rolling | window | none");
        println!("  - threshold / keep_recent: bounds for rolling summarization");
        println!("  - window_size: bound for the sliding window");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.providers.default, "gemini");
        assert_eq!(config.providers.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.providers.ollama.model, "llama3");
        assert_eq!(config.store.redis_url, "redis://localhost:6379/0");
        assert_eq!(config.memory.strategy, "rolling");
        assert_eq!(config.memory.threshold, 10);
        assert_eq!(config.memory.keep_recent, 4);
        assert_eq!(config.memory.window_size, 10);
    }

    #[test]
    fn partial_config_fills_in_defaults() -> anyhow::Result<()> {
        let config: Config = serde_json::from_str(
            r#"{ "memory": { "strategy": "window", "window_size": 2 } }"#,
        )?;

        assert_eq!(config.memory.strategy, "window");
        assert_eq!(config.memory.window_size, 2);
        assert_eq!(config.memory.keep_recent, 4);
        assert_eq!(config.providers.default, "gemini");
        Ok(())
    }
}
