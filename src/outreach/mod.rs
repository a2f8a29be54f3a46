//! Outreach collaborators: everything that happens after a lead is classified.
//!
//! - [`phone`] — digits-only contact numbers.
//! - [`templates`] — built-in message wording per risk category.
//! - [`generator`] — [`generator::MessageGenerator`] implementations: a
//!   chat-completions client and the template fallback.
//! - [`whatsapp`] — `wa.me` links and WhatsApp Cloud API dispatch.
//!
//! Each collaborator receives its configuration in its constructor and only
//! sees a lead's name, category, phone and message text.

pub mod generator;
pub mod phone;
pub mod templates;
pub mod whatsapp;

/// Errors from message generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP request to the completion API failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The completion was returned but is not usable as a message.
    #[error("generated message rejected: {0}")]
    Rejected(#[from] MessageRejected),
}

/// Why a message text is unsuitable for sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageRejected {
    #[error("message is empty")]
    Empty,
    #[error("message too long for WhatsApp (max 200 characters recommended)")]
    TooLong,
    #[error("message too short to be meaningful")]
    TooShort,
}

/// Upper bound on message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 200;
/// Lower bound on trimmed message length, in characters.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Check that `message` is suitable for a WhatsApp text.
pub fn check_message(message: &str) -> Result<(), MessageRejected> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(MessageRejected::Empty);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(MessageRejected::TooLong);
    }
    if trimmed.chars().count() < MIN_MESSAGE_CHARS {
        return Err(MessageRejected::TooShort);
    }
    Ok(())
}

/// Errors from WhatsApp Cloud API dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Access token or phone number id is missing.
    #[error("WhatsApp API not configured: set WHATSAPP_ACCESS_TOKEN and WHATSAPP_PHONE_NUMBER_ID")]
    NotConfigured,

    #[error("Invalid phone number format")]
    InvalidPhone,

    #[error("Missing phone number or message")]
    MissingInput,

    #[error("Request timeout - WhatsApp API did not respond in time")]
    Timeout,

    #[error("Network error: {0}")]
    Http(reqwest::Error),

    /// The API rejected the message.
    #[error("{0}")]
    Api(String),
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else {
            DispatchError::Http(err)
        }
    }
}
