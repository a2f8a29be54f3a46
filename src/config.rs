use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.lead-triage/config.toml`.
///
/// Every section is optional; missing keys take the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outreach message generation.
    pub generator: GeneratorConfig,
    /// WhatsApp Cloud API dispatch.
    pub whatsapp: WhatsAppConfig,
    /// Batch processing limits.
    pub batch: BatchConfig,
}

/// Settings for the chat-completions message generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Set to `false` to always use the built-in templates.
    pub enabled: bool,
    /// API key; resolved from `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Pick template wording at random instead of the canonical text.
    pub vary_fallback: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            enabled: true,
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 100,
            temperature: 0.9,
            timeout_secs: 20,
            vary_fallback: false,
        }
    }
}

impl GeneratorConfig {
    /// `true` when the remote generator can be used.
    pub fn is_usable(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Credentials and limits for the WhatsApp Cloud API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Resolved from `WHATSAPP_ACCESS_TOKEN` when unset.
    pub access_token: Option<String>,
    /// Resolved from `WHATSAPP_PHONE_NUMBER_ID` when unset.
    pub phone_number_id: Option<String>,
    /// Resolved from `WHATSAPP_BUSINESS_ACCOUNT_ID` when unset.
    pub business_account_id: Option<String>,
    pub api_base: String,
    /// Minimum gap between two API requests.
    pub min_interval_ms: u64,
    pub timeout_secs: u64,
    /// Prefixed to 10-digit numbers before sending. Empty disables it.
    pub default_country_code: String,
    /// Send messages instead of only producing `wa.me` links.
    pub auto_send: bool,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        WhatsAppConfig {
            access_token: None,
            phone_number_id: None,
            business_account_id: None,
            api_base: "https://graph.facebook.com/v18.0".to_string(),
            min_interval_ms: 1000,
            timeout_secs: 30,
            default_country_code: "1".to_string(),
            auto_send: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Message generations in flight at once.
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig { concurrency: 10 }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<input_dir>/.lead-triage/config.toml`
/// 3. `~/.config/lead-triage/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(input_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = input_dir.join(".lead-triage").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("lead-triage").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Fill unset secrets from environment lookups.
///
/// This is the only place environment state enters the program; the
/// resulting [`Config`] is handed to collaborators explicitly.
pub fn resolve_secrets<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let fill = |slot: &mut Option<String>, var: &str| {
        if slot.is_none() {
            *slot = lookup(var).filter(|v| !v.trim().is_empty());
        }
    };

    fill(&mut config.generator.api_key, "OPENAI_API_KEY");
    fill(&mut config.whatsapp.access_token, "WHATSAPP_ACCESS_TOKEN");
    fill(&mut config.whatsapp.phone_number_id, "WHATSAPP_PHONE_NUMBER_ID");
    fill(&mut config.whatsapp.business_account_id, "WHATSAPP_BUSINESS_ACCOUNT_ID");
}
