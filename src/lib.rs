// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Body Extraction
//!
//! Best-effort extraction of a readable, decoded text body from a raw
//! RFC 5322 / MIME message, for consumers such as summarizers and
//! notification renderers.
//!
//! # Features
//!
//! - Header/body splitting over borrowed slices, no copies
//! - Case-insensitive header lookup on demand
//! - Single-level multipart walk preferring `text/plain` over `text/html`
//! - Base64 and quoted-printable transfer decoding
//! - Never fails: malformed input degrades to truncated raw text
//! - Digest helpers: envelope, summarizer prompt, icon classification,
//!   webhook payload
//!
//! # Example
//!
//! ```rust
//! use email_digest::extract_body;
//!
//! let raw = "Content-Type: multipart/alternative; boundary=\"X\"\r\n\r\n\
//!            --X\r\n\
//!            Content-Type: text/plain\r\n\
//!            Content-Transfer-Encoding: base64\r\n\r\n\
//!            SGVsbG8=\r\n\
//!            --X--\r\n";
//!
//! assert_eq!(extract_body(raw), "Hello");
//! ```

mod config;
mod decode;
mod digest;
mod error;
mod parser;
mod types;

pub use config::*;
pub use decode::{decode_content, decode_quoted_printable, decode_with, try_decode_base64};
pub use digest::*;
pub use error::{ParseError, Result};
pub use parser::*;
pub use types::*;
