//! Core types for body extraction

use crate::parser::truncate_chars;
use std::fmt;

/// Unparsed header text of a message or a MIME part
///
/// Headers are looked up on demand with [`crate::get_header`]; nothing is
/// parsed until a field is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderBlock<'a>(pub &'a str);

impl<'a> HeaderBlock<'a> {
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Undecoded payload that follows a header block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodySpan<'a>(pub &'a str);

impl<'a> BodySpan<'a> {
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A header block and the body span that follows it
///
/// Produced by splitting either the whole message or one segment of a
/// multipart body. Both halves borrow from the raw message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MimePart<'a> {
    pub headers: HeaderBlock<'a>,
    pub body: BodySpan<'a>,
}

/// Declared `Content-Transfer-Encoding` of a body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    Base64,
    QuotedPrintable,
    /// 7bit, 8bit, binary, unknown or absent: passed through unchanged
    #[default]
    Identity,
}

impl TransferEncoding {
    /// Parse from a header value, case-insensitively
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("base64") => Self::Base64,
            Some("quoted-printable") => Self::QuotedPrintable,
            _ => Self::Identity,
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Identity => write!(f, "identity"),
        }
    }
}

/// Outcome of body extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The pipeline ran to completion
    Decoded(String),

    /// The pipeline failed; holds the truncated raw message
    Fallback(String),
}

impl Extraction {
    /// Fallback holding the first `max_chars` characters of `raw`
    #[must_use]
    pub fn fallback(raw: &str, max_chars: usize) -> Self {
        Self::Fallback(truncate_chars(raw, max_chars).to_string())
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Decoded(text) | Self::Fallback(text) => text,
        }
    }

    /// Collapse into plain text, discarding how it was obtained
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Decoded(text) | Self::Fallback(text) => text,
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
