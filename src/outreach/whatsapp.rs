//! WhatsApp outreach: click-to-chat links and Cloud API dispatch.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::phone::{clean_digits, with_country_code};
use super::DispatchError;
use crate::config::WhatsAppConfig;
use crate::models::DeliveryReport;

/// Bytes left unescaped in link text: alphanumerics and `_ . - ~ /`.
/// Spaces become `%20`, never `+`.
const LINK_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// `https://wa.me/<phone>?text=<message>` with the message percent-encoded.
///
/// `None` when the phone or the message is empty.
pub fn contact_link(phone: &str, message: &str) -> Option<String> {
    let phone = phone.trim();
    if phone.is_empty() || message.trim().is_empty() {
        return None;
    }
    Some(format!(
        "https://wa.me/{}?text={}",
        utf8_percent_encode(phone, LINK_TEXT),
        utf8_percent_encode(message, LINK_TEXT)
    ))
}

/// Cloud API request body for a plain text message.
pub fn build_payload(to: &str, body: &str) -> Value {
    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": to,
        "type": "text",
        "text": { "body": body }
    })
}

/// Interpret a Cloud API response: the message id on success, the API's
/// error message otherwise.
pub fn parse_api_response(success: bool, body: &Value) -> Result<Option<String>, DispatchError> {
    if success {
        Ok(body
            .get("messages")
            .and_then(|m| m.get(0))
            .and_then(|m| m.get("id"))
            .and_then(|id| id.as_str())
            .map(str::to_string))
    } else {
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        Err(DispatchError::Api(message.to_string()))
    }
}

/// One message queued for dispatch.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub lead_name: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// WhatsApp Cloud API client with a minimum interval between requests.
pub struct WhatsAppSender {
    client: Client,
    config: WhatsAppConfig,
    last_request: Mutex<Option<Instant>>,
}

impl WhatsAppSender {
    pub fn new(config: WhatsAppConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(WhatsAppSender {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// `true` when an access token and phone number id are present.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.config.access_token) && present(&self.config.phone_number_id)
    }

    /// Digits-only recipient with the default country code applied.
    pub fn format_recipient(&self, phone: &str) -> Option<String> {
        clean_digits(phone).map(|p| with_country_code(&p, &self.config.default_country_code))
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id.as_deref().unwrap_or_default()
        )
    }

    async fn throttle(&self) {
        let interval = Duration::from_millis(self.config.min_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Send a text message; returns the API-assigned message id, if any.
    pub async fn send_text(&self, phone: &str, text: &str) -> Result<Option<String>, DispatchError> {
        if !self.is_configured() {
            return Err(DispatchError::NotConfigured);
        }
        let to = self.format_recipient(phone).ok_or(DispatchError::InvalidPhone)?;

        self.throttle().await;

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.config.access_token.as_deref().unwrap_or_default())
            .json(&build_payload(&to, text))
            .send()
            .await?;

        let success = response.status().is_success();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        parse_api_response(success, &body)
    }

    /// Send every item in order. Failures are recorded per item and never
    /// stop the batch; `on_sent` is called after each item.
    pub async fn send_batch<F>(&self, items: &[Outbound], mut on_sent: F) -> Vec<DeliveryReport>
    where
        F: FnMut(&DeliveryReport),
    {
        let mut reports = Vec::with_capacity(items.len());

        for item in items {
            let result = match (item.phone.as_deref(), item.message.as_deref()) {
                (Some(phone), Some(message)) if !phone.is_empty() && !message.is_empty() => {
                    self.send_text(phone, message).await
                }
                _ => Err(DispatchError::MissingInput),
            };

            let report = match result {
                Ok(message_id) => DeliveryReport {
                    lead_name: item.lead_name.clone(),
                    success: true,
                    message_id,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(lead = %item.lead_name, error = %e, "WhatsApp dispatch failed");
                    DeliveryReport {
                        lead_name: item.lead_name.clone(),
                        success: false,
                        message_id: None,
                        error: Some(e.to_string()),
                    }
                }
            };

            on_sent(&report);
            reports.push(report);
        }

        reports
    }
}

/// How to obtain Cloud API credentials.
pub fn setup_instructions() -> &'static str {
    "WhatsApp Cloud API setup

 1. Create or open a Meta Business account at https://business.facebook.com/
 2. At https://developers.facebook.com/ create a Business app and add the WhatsApp product
 3. Under WhatsApp > Getting Started, copy:
      - the access token          -> WHATSAPP_ACCESS_TOKEN
      - the phone number id       -> WHATSAPP_PHONE_NUMBER_ID
      - the business account id   -> WHATSAPP_BUSINESS_ACCOUNT_ID
    or set them under [whatsapp] in .lead-triage/config.toml
 4. Add and verify your business phone number

Notes:
 - Test numbers can receive messages immediately after setup
 - Sending to other numbers requires Meta's approval
 - Business-initiated conversations may require approved templates
"
}
