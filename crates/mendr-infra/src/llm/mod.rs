//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `mendr-core`, plus the factory ([`create_generator`])
//! that turns a `[primary]`/`[fallback]` config section into a
//! [`LanguageGenerator`].
//!
//! [`LlmProvider`]: mendr_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;

use mendr_core::llm::box_provider::BoxLlmProvider;
use mendr_core::llm::generator::LanguageGenerator;
use mendr_types::config::GeneratorConfig;
use mendr_types::error::ConfigError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::custom_defaults;

/// Read the API key from the environment variable named in the config.
///
/// An unset or blank variable is a [`ConfigError::MissingApiKey`].
pub fn resolve_api_key(env_var: &str) -> Result<SecretString, ConfigError> {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(ConfigError::MissingApiKey(env_var.to_string())),
    }
}

/// Create a [`BoxLlmProvider`] from a generator config section.
///
/// `base_url`, when set, wins over the well-known provider presets.
pub fn create_provider(
    config: &GeneratorConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, ConfigError> {
    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenAiCompatibleProvider::new(custom_defaults(
            &config.provider,
            base_url,
            api_key,
            &config.model,
        )),
        None => match config.provider.as_str() {
            "gemini" => OpenAiCompatibleProvider::gemini(api_key, &config.model),
            "openai" => OpenAiCompatibleProvider::openai(api_key, &config.model),
            "mistral" => OpenAiCompatibleProvider::mistral(api_key, &config.model),
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown provider '{other}'; set base_url for custom endpoints"
                )));
            }
        },
    };
    Ok(BoxLlmProvider::new(provider))
}

/// Build a generator for one role.
///
/// `default_temperature` applies when the section leaves `temperature` unset,
/// which keeps the fallback hotter than the primary by default.
pub fn create_generator(
    config: &GeneratorConfig,
    default_temperature: f64,
) -> Result<LanguageGenerator, ConfigError> {
    let api_key = resolve_api_key(&config.api_key_env)?;
    let provider = create_provider(config, api_key)?;
    let temperature = config.temperature.unwrap_or(default_temperature);

    tracing::debug!(
        provider = provider.name(),
        model = %config.model,
        temperature,
        "Created language generator"
    );

    Ok(LanguageGenerator::new(
        provider,
        config.model.clone(),
        temperature,
        config.max_tokens,
    ))
}
