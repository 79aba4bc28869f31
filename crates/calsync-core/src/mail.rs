//! Raw message decoding.
//!
//! Turns the raw RFC 5322 bytes of one delivered email into a decoded
//! subject and a plain-text body. MIME structure, quoted-printable transfer
//! encoding, and encoded-word subject headers are all handled by
//! `mail-parser`; this module only decides which parts contribute to the
//! body.

use mail_parser::{MessageParser, MimeHeaders};
use thiserror::Error;

/// Errors decoding a raw message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The bytes could not be parsed as an email message at all.
    #[error("message headers could not be parsed")]
    Malformed,
}

/// A decoded message: subject plus concatenated plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Decoded subject header; empty when the header is absent.
    pub subject: String,
    /// Concatenated text of every `text/plain` part, in message order.
    /// Empty when the message carries no plain-text part.
    pub body: String,
}

/// Decodes raw message bytes into subject and plain-text body.
///
/// HTML parts and attachments are ignored. A message without any
/// `text/plain` part decodes to an empty body rather than an error, so that
/// classification downstream can reject it with context.
pub fn decode(raw: &[u8]) -> Result<DecodedMessage, DecodeError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or(DecodeError::Malformed)?;

    let subject = message.subject().unwrap_or_default().to_string();

    let mut body = String::new();
    for id in &message.text_body {
        let Some(part) = message.parts.get(*id) else {
            continue;
        };
        // The text-body list also references HTML parts when no plain-text
        // sibling exists; those are not part of the decoded body.
        let is_html = part
            .content_type()
            .is_some_and(|ct| ct.subtype().is_some_and(|s| s.eq_ignore_ascii_case("html")));
        if is_html {
            continue;
        }
        if let Some(text) = part.text_contents() {
            body.push_str(text);
        }
    }

    Ok(DecodedMessage { subject, body })
}
