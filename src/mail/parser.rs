//! Raw message text parser.
//!
//! Accepts RFC822-style text:
//!
//! ```text
//! Subject: Test message
//! From: john@example.org
//! To: bob@example.org
//!
//! Hello world!!
//! ```
//!
//! Header names are case-insensitive and unknown headers are ignored. The
//! body is everything after the first empty line, kept verbatim.

use crate::{RelayError, Result};

use super::types::Message;

fn invalid(reason: impl Into<String>) -> RelayError {
    RelayError::InvalidMessage(reason.into())
}

fn required(value: Option<String>, header: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(invalid(format!("empty {header} header"))),
        None => Err(invalid(format!("missing {header} header"))),
    }
}

/// Parse raw message text into a [`Message`].
///
/// # Errors
///
/// Returns [`RelayError::InvalidMessage`] if a header line has no colon, or
/// if `Subject`, `From` or `To` is missing, empty or repeated.
pub fn parse_message(text: &str) -> Result<Message> {
    let mut subject = None;
    let mut from = None;
    let mut to = None;
    let mut body = "";
    let mut rest = text;

    while !rest.is_empty() {
        let (line, next) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };
        let line = line.strip_suffix('\r').unwrap_or(line);
        rest = next;

        if line.is_empty() {
            body = rest;
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| invalid(format!("malformed header line: {line}")))?;
        let (slot, header) = match name.trim().to_ascii_lowercase().as_str() {
            "subject" => (&mut subject, "Subject"),
            "from" => (&mut from, "From"),
            "to" => (&mut to, "To"),
            _ => continue,
        };
        if slot.is_some() {
            return Err(invalid(format!("repeated {header} header")));
        }
        *slot = Some(value.trim().to_string());
    }

    Ok(Message {
        subject: required(subject, "Subject")?,
        body: body.to_string(),
        sender_id: required(from, "From")?,
        receiver_id: required(to, "To")?,
    })
}
