use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_message, templates, GeneratorError};
use crate::config::GeneratorConfig;
use crate::models::RiskCategory;

/// Produces the outreach text for one lead.
///
/// Implementations see only the lead's name and category.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, lead_name: &str, category: RiskCategory)
        -> Result<String, GeneratorError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Chat completions response body (only the fields read here).
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

const SYSTEM_PROMPT: &str = "You write short, personalized WhatsApp messages for sales outreach. \
Vary greeting, structure and call to action between messages and never reuse the same phrasing.";

fn category_context(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::High => "The lead is high risk: they missed a demo, went quiet for a long time, or ignored our link. Be direct and propose meeting today or tomorrow.",
        RiskCategory::Medium => "The lead is medium risk: some engagement, but they need a gentle nudge. Be encouraging and suggest this week.",
        RiskCategory::Low => "The lead is low risk: engaged and recently active or already attended. Be friendly and confirm the upcoming demo.",
    }
}

/// Build the completion request for one lead.
pub fn build_request(config: &GeneratorConfig, lead_name: &str, category: RiskCategory) -> ChatRequest {
    let prompt = format!(
        "Write one WhatsApp message for a lead named \"{lead_name}\" categorized as {category} risk.\n\
         {context}\n\
         Keep it under 160 characters, mention the name naturally, avoid emojis and \
         excessive punctuation, and reply with the message text only.",
        context = category_context(category),
    );

    ChatRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Extract and check the message text of a completion.
pub fn parse_response(response: ChatResponse) -> Result<String, GeneratorError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().trim_matches('"').trim().to_string())
        .unwrap_or_default();

    check_message(&text)?;
    Ok(text)
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Chat completions client.
pub struct OpenAiGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(OpenAiGenerator { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl MessageGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        lead_name: &str,
        category: RiskCategory,
    ) -> Result<String, GeneratorError> {
        let request = build_request(&self.config, lead_name, category);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: ChatResponse = response.json().await?;
        parse_response(data)
    }
}

/// Built-in templates. Deterministic unless `vary` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator {
    pub vary: bool,
}

impl TemplateGenerator {
    pub fn compose(&self, lead_name: &str, category: RiskCategory) -> String {
        if self.vary {
            templates::render_varied(category, lead_name, &mut rand::thread_rng())
        } else {
            templates::render(category, lead_name)
        }
    }
}

#[async_trait]
impl MessageGenerator for TemplateGenerator {
    async fn generate(
        &self,
        lead_name: &str,
        category: RiskCategory,
    ) -> Result<String, GeneratorError> {
        Ok(self.compose(lead_name, category))
    }
}

/// Tries an optional primary generator and falls back to templates on any
/// error or rejected output. Never fails.
pub struct FallbackGenerator {
    primary: Option<Box<dyn MessageGenerator>>,
    fallback: TemplateGenerator,
}

impl FallbackGenerator {
    pub fn new(primary: Option<Box<dyn MessageGenerator>>, fallback: TemplateGenerator) -> Self {
        FallbackGenerator { primary, fallback }
    }

    /// Wire up from configuration: the remote generator is used only when
    /// enabled, keyed, and `allow_remote` is set.
    pub fn from_config(config: &GeneratorConfig, allow_remote: bool) -> Result<Self, GeneratorError> {
        let fallback = TemplateGenerator {
            vary: config.vary_fallback,
        };
        let primary: Option<Box<dyn MessageGenerator>> = if allow_remote && config.is_usable() {
            Some(Box::new(OpenAiGenerator::new(config.clone())?))
        } else {
            None
        };
        Ok(FallbackGenerator::new(primary, fallback))
    }

    pub fn uses_remote(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn message_for(&self, lead_name: &str, category: RiskCategory) -> String {
        if let Some(primary) = &self.primary {
            match primary.generate(lead_name, category).await {
                Ok(message) => return message,
                Err(e) => {
                    tracing::warn!(lead = lead_name, error = %e, "message generation failed, using template");
                }
            }
        }
        self.fallback.compose(lead_name, category)
    }
}

#[async_trait]
impl MessageGenerator for FallbackGenerator {
    async fn generate(
        &self,
        lead_name: &str,
        category: RiskCategory,
    ) -> Result<String, GeneratorError> {
        Ok(self.message_for(lead_name, category).await)
    }
}
