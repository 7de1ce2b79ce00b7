//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from storyarc.toml)
//! - User overrides (~/.config/storyarc/storyarc.toml, then ./storyarc.toml)
//! - Environment variables, after loading `.env`

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyarc_core::{TargetCounts, TargetRange};
use storyarc_error::{ConfigError, StoryError, StoryResult};
use storyarc_interface::StoryDriver;
use storyarc_models::{AnthropicClient, BedrockClient};
use storyarc_narrative::{
    CompletionClient, GenerationParams, LengthConstrainedGenerator, NarrativeSession, RetryPolicy,
    StoryController,
};
use tracing::{debug, info, instrument};

const DEFAULT_CONFIG: &str = include_str!("../storyarc.toml");

/// Environment variable to configuration key.
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("STORYARC_PROVIDER", "provider"),
    ("MODEL_ID", "model.model_id"),
    ("AWS_REGION", "model.region"),
    ("AWS_PROFILE", "model.profile"),
    ("AWS_BEARER_TOKEN_BEDROCK", "credentials.bedrock_token"),
    ("ANTHROPIC_API_KEY", "credentials.anthropic_api_key"),
];

/// Which transport serves completions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Amazon Bedrock runtime
    #[default]
    #[display("bedrock")]
    Bedrock,
    /// Anthropic Messages API
    #[display("anthropic")]
    Anthropic,
}

/// Model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ModelConfig {
    /// Model or inference profile identifier
    model_id: String,
    /// Bedrock region
    region: String,
    /// AWS profile name, recorded for tracing
    profile: String,
}

/// Target count defaults and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TargetsConfig {
    /// Initial target for every act
    default: usize,
    /// Smallest accepted target
    min: usize,
    /// Largest accepted target
    max: usize,
}

impl TargetsConfig {
    /// Accepted range.
    pub fn range(&self) -> TargetRange {
        TargetRange {
            min: self.min,
            max: self.max,
        }
    }

    /// Initial per-act targets.
    pub fn counts(&self) -> TargetCounts {
        TargetCounts::uniform(self.default)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ServerConfig {
    /// Bind host
    host: String,
    /// Bind port
    port: u16,
}

impl ServerConfig {
    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Provider credentials. Only ever populated from the environment.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    bedrock_token: Option<String>,
    #[serde(default)]
    anthropic_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("bedrock_token", &redact(&self.bedrock_token))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .finish()
    }
}

/// Complete Storyarc configuration.
///
/// # Example
///
/// ```no_run
/// use storyarc::StoryConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryConfig::load()?;
/// println!("Listening on {}", config.server().address());
/// let controller = config.build_controller()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct StoryConfig {
    /// Selected provider
    #[serde(default)]
    provider: Provider,
    /// Model selection
    model: ModelConfig,
    /// Sampling parameters
    #[serde(default)]
    generation: GenerationParams,
    /// Retry policy
    #[serde(default)]
    retry: RetryPolicy,
    /// Length window and correction rounds
    #[serde(default)]
    length: LengthConstrainedGenerator,
    /// Target counts
    targets: TargetsConfig,
    /// HTTP listener
    server: ServerConfig,
    #[getter(skip)]
    #[serde(default)]
    credentials: Credentials,
}

impl StoryConfig {
    /// Load from every source, reading overrides from the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when a file cannot be parsed or a value is invalid.
    #[instrument]
    pub fn load() -> StoryResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let mut builder = defaults();
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyarc/storyarc.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("storyarc").required(false));

        finish(builder, |key| std::env::var(key).ok())
    }

    /// Bundled defaults overlaid with `overrides`, ignoring the environment.
    pub fn from_toml(overrides: &str) -> StoryResult<Self> {
        Self::from_toml_with_env(overrides, |_| None)
    }

    /// Bundled defaults overlaid with `overrides`, then with variables from `env`.
    pub fn from_toml_with_env(
        overrides: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> StoryResult<Self> {
        let builder = defaults().add_source(File::from_str(overrides, FileFormat::Toml));
        finish(builder, env)
    }

    /// Build the transport for the selected provider.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the provider's credential is missing.
    pub fn build_driver(&self) -> StoryResult<Box<dyn StoryDriver>> {
        let model = &self.model;
        match self.provider {
            Provider::Bedrock => {
                let token = self
                    .credentials
                    .bedrock_token
                    .as_deref()
                    .ok_or_else(|| ConfigError::new("AWS_BEARER_TOKEN_BEDROCK is not set"))?;
                info!(region = %model.region, profile = %model.profile, model = %model.model_id, "Using Bedrock");
                Ok(Box::new(
                    BedrockClient::new(token, &model.region, &model.model_id)
                        .with_profile(&model.profile),
                ))
            }
            Provider::Anthropic => {
                let key = self
                    .credentials
                    .anthropic_api_key
                    .as_deref()
                    .ok_or_else(|| ConfigError::new("ANTHROPIC_API_KEY is not set"))?;
                info!(model = %model.model_id, "Using Anthropic");
                Ok(Box::new(AnthropicClient::new(key, &model.model_id)))
            }
        }
    }

    /// Controller over `driver` with this configuration's parameters and targets.
    pub fn controller<D: StoryDriver>(&self, driver: D) -> StoryController<D> {
        let client = CompletionClient::new(driver)
            .with_params(self.generation.clone())
            .with_retry(self.retry.clone());
        let session = NarrativeSession::new()
            .with_target_range(self.targets.range())
            .with_target_counts(self.targets.counts());
        StoryController::with_session(client, self.length.clone(), session)
    }

    /// Controller over the configured provider.
    pub fn build_controller(&self) -> StoryResult<StoryController<Box<dyn StoryDriver>>> {
        Ok(self.controller(self.build_driver()?))
    }
}

fn defaults() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

fn finish(
    mut builder: ConfigBuilder<DefaultState>,
    env: impl Fn(&str) -> Option<String>,
) -> StoryResult<StoryConfig> {
    for (variable, key) in ENV_OVERRIDES {
        let value = env(variable).filter(|value| !value.trim().is_empty());
        if value.is_some() {
            debug!(variable, key, "Applying environment override");
        }
        builder = builder
            .set_override_option(key, value)
            .map_err(|e| config_error(format!("Invalid override for {}: {}", variable, e)))?;
    }

    let config: StoryConfig = builder
        .build()
        .map_err(|e| config_error(format!("Failed to build configuration: {}", e)))?
        .try_deserialize()
        .map_err(|e| config_error(format!("Failed to parse configuration: {}", e)))?;

    config
        .targets
        .range()
        .check(storyarc_core::ActLabel::Setup, config.targets.default)
        .map_err(|_| {
            config_error(format!(
                "Default target {} is outside [{}, {}]",
                config.targets.default, config.targets.min, config.targets.max
            ))
        })?;
    Ok(config)
}

#[track_caller]
fn config_error(message: String) -> StoryError {
    StoryError::from(ConfigError::new(message))
}
