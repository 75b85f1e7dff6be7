//! Layered application configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`branchtale.toml` shipped with the crate)
//! 2. `~/.config/branchtale/branchtale.toml`
//! 3. `./branchtale.toml`
//! 4. An explicit file, e.g. from `--config`
//! 5. `BRANCHTALE_<SECTION>__<KEY>` environment variables

use branchtale_core::TreeLimits;
use branchtale_error::{BranchtaleError, BranchtaleResult, ConfigError};
use branchtale_models::ProviderConfig;
use branchtale_narrative::StoryPrompt;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../branchtale.toml");

/// Language model server settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Base URL of an OpenAI-compatible server
    pub base_url: String,
    /// Model requested for every story
    pub model: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Completion token cap
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Environment variable holding the API key; `None` sends no key
    #[serde(default)]
    pub api_key_env: Option<String>,
}

/// Structural bounds on generated trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeSettings {
    /// Maximum depth, root = 1
    pub max_depth: usize,
    /// Maximum options per node
    pub max_branching: usize,
}

/// PostgreSQL store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// Environment variable holding the connection string
    pub url_env: String,
    /// Maximum pooled connections
    pub pool_size: u32,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

/// Top-level Branchtale configuration.
///
/// # Example
///
/// ```no_run
/// use branchtale::BranchtaleConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BranchtaleConfig::load()?;
/// println!("Generating with {}", config.provider.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BranchtaleConfig {
    /// `[provider]` section
    pub provider: ProviderSettings,
    /// `[tree]` section
    pub tree: TreeSettings,
    /// `[database]` section
    pub database: DatabaseSettings,
    /// `[logging]` section
    pub logging: LoggingSettings,
}

impl BranchtaleConfig {
    /// The bundled defaults alone, ignoring user files and the environment.
    pub fn bundled() -> BranchtaleResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> BranchtaleResult<Self> {
        debug!("Loading configuration from file");
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration from every source.
    pub fn load() -> BranchtaleResult<Self> {
        Self::load_with(None::<&Path>)
    }

    /// Load configuration from every source plus an optional explicit file.
    ///
    /// User config files are optional and skipped if not found; an explicit
    /// file must exist.
    #[instrument(skip(explicit))]
    pub fn load_with(explicit: Option<impl AsRef<Path>>) -> BranchtaleResult<Self> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/branchtale/branchtale.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("branchtale").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(
            Environment::with_prefix("BRANCHTALE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> BranchtaleResult<Self> {
        builder
            .build()
            .map_err(|e| {
                BranchtaleError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BranchtaleError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Provider connection settings, with the API key read from the environment.
    ///
    /// # Errors
    ///
    /// Fails if `api_key_env` names a variable that is unset.
    pub fn provider_config(&self) -> BranchtaleResult<ProviderConfig> {
        let config = ProviderConfig::new(&self.provider.base_url, &self.provider.model);
        match &self.provider.api_key_env {
            Some(var) => Ok(config.with_api_key_from_env(var)?),
            None => Ok(config),
        }
    }

    /// Prompt settings for the story generator.
    pub fn story_prompt(&self) -> BranchtaleResult<StoryPrompt> {
        StoryPrompt::builder()
            .model(Some(self.provider.model.clone()))
            .temperature(self.provider.temperature)
            .max_tokens(self.provider.max_tokens)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid prompt settings: {}", e)).into())
    }

    /// Tree limits for the response parser.
    pub fn tree_limits(&self) -> TreeLimits {
        TreeLimits {
            max_depth: self.tree.max_depth,
            max_branching: self.tree.max_branching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults() {
        let config = BranchtaleConfig::bundled().unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(config.tree_limits(), TreeLimits::default());
        assert_eq!(config.database.url_env, "DATABASE_URL");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_prompt_follows_provider_settings() {
        let mut config = BranchtaleConfig::bundled().unwrap();
        config.provider.model = "local-llama".to_string();
        config.provider.max_tokens = Some(4096);

        let prompt = config.story_prompt().unwrap();
        assert_eq!(prompt.model().as_deref(), Some("local-llama"));
        assert_eq!(*prompt.max_tokens(), Some(4096));
        assert_eq!(*prompt.temperature(), Some(0.7));
    }

    #[test]
    fn test_provider_without_key() {
        let mut config = BranchtaleConfig::bundled().unwrap();
        config.provider.api_key_env = None;
        config.provider.base_url = "http://localhost:8080/".to_string();

        let provider = config.provider_config().unwrap();
        assert_eq!(provider.api_key, None);
        assert_eq!(provider.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_key_variable_is_an_error() {
        let mut config = BranchtaleConfig::bundled().unwrap();
        config.provider.api_key_env = Some("BRANCHTALE_TEST_UNSET_KEY_VARIABLE".to_string());
        assert!(config.provider_config().is_err());
    }
}
