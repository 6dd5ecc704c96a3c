//! Digest building around the extracted body: envelope, summarizer prompt,
//! icon classification, the webhook notification and forwarding.

use crate::config::{DigestConfig, IconRule};
use crate::error::Result;
use crate::parser::{extract_body_with, truncate_chars};
use mailparse::MailHeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an expert email auditor and summarizer. \
Do two things:\n\
1. Summary: who sent the message and what is it about (for example a server alert or a bill due).\n\
2. Key data: if the text contains a verification code, OTP, amount or deadline, list each one \
separately. Omit this section when there is none.";

/// Subject and sender read from the top-level headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub subject: String,
    pub from: String,
}

impl Envelope {
    /// Read the envelope from a raw message
    ///
    /// Encoded words in the subject are decoded. A missing subject or
    /// sender, or headers that cannot be parsed at all, are replaced by the
    /// configured defaults.
    #[must_use]
    pub fn from_raw(raw: &str, config: &DigestConfig) -> Self {
        let headers = match mailparse::parse_headers(raw.as_bytes()) {
            Ok((headers, _)) => headers,
            Err(e) => {
                warn!("Unreadable headers, using envelope defaults: {e}");
                Vec::new()
            }
        };

        let first_non_empty = |key: &str| {
            headers
                .get_first_value(key)
                .filter(|value| !value.trim().is_empty())
        };

        Self {
            subject: first_non_empty("Subject").unwrap_or_else(|| config.default_subject.clone()),
            from: first_non_empty("From").unwrap_or_else(|| config.default_sender.clone()),
        }
    }
}

/// One chat message sent to the summarization model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Input for a [`Summarizer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub messages: Vec<ChatMessage>,
}

impl SummaryRequest {
    /// The user message, i.e. the email content
    #[must_use]
    pub fn content(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map_or("", |m| m.content.as_str())
    }
}

/// Build the summarizer request for a decoded body
#[must_use]
pub fn summary_prompt(body: &str, config: &DigestConfig) -> SummaryRequest {
    let excerpt = truncate_chars(body, config.summary_input_chars);

    SummaryRequest {
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: SYSTEM_PROMPT.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: format!("Email content:\n{excerpt}"),
            },
        ],
    }
}

/// Pick the icon of the first rule with a keyword contained in `summary`
#[must_use]
pub fn classify_icon<'a>(summary: &str, rules: &'a [IconRule], default: &'a str) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| summary.contains(k.as_str())))
        .map_or(default, |rule| rule.icon.as_str())
}

/// A rendered notification for the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub icon: String,
    pub text: String,
}

impl Notification {
    #[must_use]
    pub fn new(envelope: &Envelope, summary: &str, config: &DigestConfig) -> Self {
        let icon = classify_icon(summary, &config.icons, &config.default_icon).to_string();
        let text = format!(
            "{icon} New email\n\
             --------------------\n\
             From: {}\n\
             Subject: {}\n\
             --------------------\n\
             {summary}\n",
            envelope.from, envelope.subject
        );

        Self { icon, text }
    }

    /// JSON body for a text-message webhook
    #[must_use]
    pub fn to_webhook_payload(&self) -> serde_json::Value {
        json!({
            "msgtype": "text",
            "text": { "content": self.text },
        })
    }
}

/// Produces a summary of an email body, typically by calling an AI model
pub trait Summarizer {
    fn summarize(&self, request: &SummaryRequest) -> Result<String>;
}

/// Delivers a webhook payload
pub trait Notifier {
    fn notify(&self, webhook_url: &str, payload: &serde_json::Value) -> Result<()>;
}

/// Hands the original, untouched message to another mailbox
pub trait Forwarder {
    fn forward(&self, raw: &str, to: &str) -> Result<()>;
}

/// Everything produced for one incoming message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    pub envelope: Envelope,

    /// Decoded body, or the raw fallback
    pub body: String,

    pub summary: String,

    pub notification: Notification,

    /// Whether the notification reached the notifier successfully
    pub delivered: bool,

    /// Whether the message reached the forwarder successfully
    pub forwarded: bool,
}

/// Extract, summarize, notify and forward for one raw message
///
/// Never fails. A summarizer failure becomes the summary text; notifier and
/// forwarder failures are logged and reported in [`Digest::delivered`] and
/// [`Digest::forwarded`].
#[must_use]
pub fn process_message<S, N, F>(
    raw: &str,
    config: &DigestConfig,
    summarizer: &S,
    notifier: &N,
    forwarder: &F,
) -> Digest
where
    S: Summarizer + ?Sized,
    N: Notifier + ?Sized,
    F: Forwarder + ?Sized,
{
    let envelope = Envelope::from_raw(raw, config);
    let body = extract_body_with(raw, &config.extract).into_text();

    let summary = summarizer
        .summarize(&summary_prompt(&body, config))
        .unwrap_or_else(|e| {
            warn!("Summarizer failed: {e}");
            format!("Summarizer unavailable: {e}")
        });

    let notification = Notification::new(&envelope, &summary, config);

    let delivered = match config.webhook_url.as_deref() {
        Some(url) => match notifier.notify(url, &notification.to_webhook_payload()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Notification failed: {e}");
                false
            }
        },
        None => {
            debug!("No webhook configured, skipping notification");
            false
        }
    };

    let forwarded = match config.forward_to.as_deref() {
        Some(to) => match forwarder.forward(raw, to) {
            Ok(()) => true,
            Err(e) => {
                warn!("Forwarding to {to} failed: {e}");
                false
            }
        },
        None => {
            debug!("No forwarding address configured");
            false
        }
    };

    debug!("Digested email: {} from {}", envelope.subject, envelope.from);

    Digest {
        envelope,
        body,
        summary,
        notification,
        delivered,
        forwarded,
    }
}
