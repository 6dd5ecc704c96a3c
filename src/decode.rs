//! Transfer-encoding decoders

use crate::error::Result;
use crate::types::TransferEncoding;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::{Captures, Regex};
use tracing::debug;

// Soft line break: '=' followed by any run of line terminators
static SOFT_BREAK_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"=[\r\n]+").unwrap());

static QP_ESCAPE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"=([0-9A-Fa-f]{2})").unwrap());

/// Decode `content` according to a declared transfer-encoding name
///
/// Never fails: content that cannot be decoded is returned unchanged.
#[must_use]
pub fn decode_content(content: &str, encoding: Option<&str>) -> String {
    decode_with(content, &TransferEncoding::from_header(encoding))
}

/// Decode `content` with an already parsed transfer encoding
#[must_use]
pub fn decode_with(content: &str, encoding: &TransferEncoding) -> String {
    if content.is_empty() {
        return String::new();
    }

    match encoding {
        TransferEncoding::Base64 => try_decode_base64(content).unwrap_or_else(|e| {
            debug!("Keeping undecoded content: {e}");
            content.to_string()
        }),
        TransferEncoding::QuotedPrintable => decode_quoted_printable(content),
        TransferEncoding::Identity => content.to_string(),
    }
}

/// Decode base64 content into UTF-8 text
///
/// All whitespace is removed first, so line-wrapped bodies decode as one
/// block. Padding is required.
pub fn try_decode_base64(content: &str) -> Result<String> {
    let clean: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(clean)?;
    Ok(String::from_utf8(bytes)?)
}

/// Simplified quoted-printable decoding
///
/// Each `=XX` escape becomes the single character with code point `XX`.
/// Multi-byte UTF-8 sequences spread over several escapes are not
/// reassembled, so `=C3=A9` yields two Latin-1 characters rather than `é`.
#[must_use]
pub fn decode_quoted_printable(content: &str) -> String {
    let joined = SOFT_BREAK_REGEX.replace_all(content, "");
    QP_ESCAPE_REGEX
        .replace_all(&joined, |caps: &Captures<'_>| {
            u8::from_str_radix(&caps[1], 16)
                .map_or_else(|_| caps[0].to_string(), |b| char::from(b).to_string())
        })
        .into_owned()
}
