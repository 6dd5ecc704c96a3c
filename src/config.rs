//! Configuration for extraction and digest building

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Characters of the raw message kept when extraction falls back
pub const DEFAULT_FALLBACK_CHARS: usize = 2000;

/// Characters of the decoded body handed to the summarizer
pub const DEFAULT_SUMMARY_INPUT_CHARS: usize = 4000;

/// Options for [`crate::extract_body_with`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub fallback_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fallback_chars: DEFAULT_FALLBACK_CHARS,
        }
    }
}

impl ExtractOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One keyword-to-icon classification rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRule {
    pub icon: String,
    pub keywords: Vec<String>,
}

impl IconRule {
    #[must_use]
    pub fn new(icon: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            icon: icon.into(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Configuration for [`crate::process_message`]
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub extract: ExtractOptions,

    pub summary_input_chars: usize,

    /// Subject used when the message has none
    pub default_subject: String,

    /// Sender used when the message has no readable `From`
    pub default_sender: String,

    /// The original message is forwarded here when set
    pub forward_to: Option<String>,

    /// Notification is skipped when unset
    pub webhook_url: Option<String>,

    /// Evaluated in order; the first rule with a matching keyword wins
    pub icons: Vec<IconRule>,

    pub default_icon: String,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            summary_input_chars: DEFAULT_SUMMARY_INPUT_CHARS,
            default_subject: "(no subject)".into(),
            default_sender: "(unknown sender)".into(),
            forward_to: None,
            webhook_url: None,
            icons: default_icon_rules(),
            default_icon: "📧".into(),
        }
    }
}

impl DigestConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_icon_rules() -> Vec<IconRule> {
    vec![
        IconRule::new("🚨", &["报警", "紧急", "错误", "失败", "Alert", "Error"]),
        IconRule::new("💰", &["金额", "账单", "支付", "Payment", "Bill"]),
        IconRule::new("🔐", &["验证码", "OTP", "Code", "登录"]),
        IconRule::new("📦", &["快递", "发货", "Delivery"]),
    ]
}
