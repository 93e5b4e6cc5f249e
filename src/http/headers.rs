//! Header field parsing.
//!
//! # Responsibilities
//! - Parse one `Name: Value` field line per call
//! - Report how many bytes the line used
//! - Signal the empty line that ends the header section
//!
//! # Design Decisions
//! - Field names are case-sensitive map keys; last write wins
//! - Names and values are trimmed of surrounding spaces (U+0020 only)
//! - A name ending in a space before `:` is rejected

use std::collections::HashMap;

use serde::Serialize;

use crate::http::error::{ParseError, ParseResult, RequestPart};
use crate::http::{find_crlf, CRLF};

/// Outcome of parsing a single field line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// No complete line yet; nothing consumed.
    Incomplete,
    /// One field was stored.
    Field { consumed: usize },
    /// The empty line ending the header section.
    End { consumed: usize },
}

/// Header fields keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one field line starting at offset 0 of `data`.
    ///
    /// Never looks past the first CRLF. On success the field is stored,
    /// replacing any earlier value under the same name.
    pub fn parse(&mut self, data: &[u8]) -> ParseResult<FieldStatus> {
        let Some(line_end) = find_crlf(data) else {
            return Ok(FieldStatus::Incomplete);
        };
        if line_end == 0 {
            return Ok(FieldStatus::End {
                consumed: CRLF.len(),
            });
        }

        let line = &data[..line_end];
        let separator = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(ParseError::MissingSeparator)?;
        if separator == 0 {
            return Err(ParseError::EmptyFieldName);
        }
        if line[separator - 1] == b' ' {
            return Err(ParseError::FieldNameWhitespace);
        }

        let name = to_text(trim_spaces(&line[..separator]))?;
        let value = to_text(trim_spaces(&line[separator + 1..]))?;

        self.fields.insert(name, value);
        Ok(FieldStatus::Field {
            consumed: line_end + CRLF.len(),
        })
    }

    /// Look up a field by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn trim_spaces(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b != b' ').map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn to_text(bytes: &[u8]) -> ParseResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| ParseError::InvalidUtf8(RequestPart::Header))
}
