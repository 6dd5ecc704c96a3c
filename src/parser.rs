//! Body extraction pipeline

use crate::config::ExtractOptions;
use crate::decode::decode_content;
use crate::error::Result;
use crate::types::{BodySpan, Extraction, HeaderBlock, MimePart};
use regex::Regex;
use std::borrow::Cow;
use tracing::{debug, warn};

static BOUNDARY_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r#"(?i)boundary="?([^";\s]+)"?"#).unwrap());

/// Turn raw message bytes into text, replacing invalid UTF-8 sequences
#[must_use]
pub fn materialize(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Split text at the first blank line into headers and body
///
/// `\r\n\r\n` is looked for before `\n\n`. Without a blank line the whole
/// text is the body and the headers are empty.
#[must_use]
pub fn split_headers_body(text: &str) -> MimePart<'_> {
    let found = text
        .find("\r\n\r\n")
        .map(|idx| (idx, 4))
        .or_else(|| text.find("\n\n").map(|idx| (idx, 2)));

    match found {
        Some((idx, sep_len)) => MimePart {
            headers: HeaderBlock(&text[..idx]),
            body: BodySpan(&text[idx + sep_len..]),
        },
        None => MimePart {
            headers: HeaderBlock::default(),
            body: BodySpan(text),
        },
    }
}

/// Look up the first header line named `name`, case-insensitively
///
/// Folded continuation lines and encoded words are not handled; the value
/// is the rest of the matching physical line, trimmed. A field with an
/// empty value yields `Some("")`, never the text of the following line.
pub fn get_header<'a>(headers: HeaderBlock<'a>, name: &str) -> Result<Option<&'a str>> {
    let pattern = Regex::new(&format!(r"(?im)^{}:[ \t]*(.*)$", regex::escape(name)))?;

    Ok(pattern
        .captures(headers.as_str())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim()))
}

/// Extract the `boundary` parameter from a content-type value
#[must_use]
pub fn extract_boundary(content_type: &str) -> Option<&str> {
    BOUNDARY_REGEX
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Pick the best textual part of a multipart body
///
/// The first `text/plain` part wins outright. Otherwise the first
/// `text/html` part is returned. Content-types are matched as written, so
/// `Text/Plain` is neither. Nested multiparts are not descended into.
pub fn select_best_part<'a>(body: &'a str, boundary: &str) -> Result<Option<MimePart<'a>>> {
    let delimiter = format!("--{boundary}");
    let mut best: Option<MimePart<'a>> = None;

    for segment in body.split(delimiter.as_str()) {
        let trimmed = segment.trim();
        if trimmed.is_empty() || trimmed == "--" {
            continue;
        }

        let part = split_headers_body(segment);
        let content_type = get_header(part.headers, "content-type")?.unwrap_or_default();

        if content_type.contains("text/plain") {
            debug!("Selected text/plain part");
            return Ok(Some(part));
        }
        if content_type.contains("text/html") && best.is_none() {
            best = Some(part);
        }
    }

    if best.is_some() {
        debug!("Selected text/html part");
    }
    Ok(best)
}

/// Extract the decoded body of a raw message
///
/// Always returns text: see [`extract_body_with`] for the fallback rules.
#[must_use]
pub fn extract_body(raw: &str) -> String {
    extract_body_with(raw, &ExtractOptions::default()).into_text()
}

/// Extract the decoded body of a raw message given as bytes
#[must_use]
pub fn extract_body_from_bytes(raw: &[u8]) -> String {
    extract_body(&materialize(raw))
}

/// Extract the decoded body, reporting whether the fallback was used
///
/// Any error in the pipeline yields [`Extraction::Fallback`] with the first
/// `options.fallback_chars` characters of `raw`, untouched.
#[must_use]
pub fn extract_body_with(raw: &str, options: &ExtractOptions) -> Extraction {
    match try_extract_body(raw) {
        Ok(text) => Extraction::Decoded(text),
        Err(e) => {
            warn!("Body extraction failed, using raw text: {e}");
            Extraction::fallback(raw, options.fallback_chars)
        }
    }
}

/// The extraction pipeline without its failure boundary
pub fn try_extract_body(raw: &str) -> Result<String> {
    let message = split_headers_body(raw);
    let content_type = get_header(message.headers, "content-type")?;
    let transfer_encoding = get_header(message.headers, "content-transfer-encoding")?;

    if let Some(content_type) = content_type
        && content_type.to_lowercase().contains("multipart")
    {
        match extract_boundary(content_type) {
            Some(boundary) => {
                debug!("Walking multipart body with boundary {boundary}");
                if let Some(part) = select_best_part(message.body.as_str(), boundary)? {
                    let encoding = get_header(part.headers, "content-transfer-encoding")?;
                    return Ok(decode_content(part.body.as_str(), encoding));
                }
                debug!("No textual part found, decoding top-level body");
            }
            None => debug!("Multipart content-type without boundary"),
        }
    }

    Ok(decode_content(message.body.as_str(), transfer_encoding))
}

/// Longest prefix of `text` holding at most `max` characters
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices().nth(max).map_or(text, |(idx, _)| &text[..idx])
}
