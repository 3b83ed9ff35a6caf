//! Timestamp input/output formats.

use chrono::format::{Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use std::fmt::{self, Write};

/// How a timestamp field reads its operand and what it hands on.
///
/// Formats use chrono's strftime syntax (`%Y-%m-%dT%H:%M:%S%:z`).
///
/// - `input: None` parses RFC 3339.
/// - A custom input format without an offset is read as UTC.
/// - `output: None` keeps the parsed instant as [`Value::Timestamp`];
///   otherwise the instant is re-rendered as text.
///
/// [`Value::Timestamp`]: crate::Value::Timestamp
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TimeFormat {
    /// Format of the incoming text.
    pub input: Option<String>,
    /// Format of the outgoing text.
    pub output: Option<String>,
}

impl TimeFormat {
    /// RFC 3339 in, timestamp value out.
    #[must_use]
    pub const fn rfc3339() -> Self {
        Self {
            input: None,
            output: None,
        }
    }

    /// Set the input format.
    #[must_use]
    pub fn input(mut self, format: impl Into<String>) -> Self {
        self.input = Some(format.into());
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn output(mut self, format: impl Into<String>) -> Self {
        self.output = Some(format.into());
        self
    }

    pub(crate) fn parse_input(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        match &self.input {
            Some(format) => parse_with(s, format),
            None => DateTime::parse_from_rfc3339(s).ok(),
        }
    }

    /// Read text that is already in the output format and render it again.
    ///
    /// Formats too coarse to rebuild an instant from (`%Y`, `%Y-%m`) keep the
    /// text as-is once it matches the format.
    pub(crate) fn read_output(&self, s: &str) -> Option<String> {
        let format = self.output.as_deref()?;
        if let Some(t) = parse_with(s, format) {
            return self.format_output(&t).and_then(Result::ok);
        }
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, s, StrftimeItems::new(format)).ok()?;
        Some(s.to_string())
    }

    /// `None` when no output format is set.
    pub(crate) fn format_output(
        &self,
        t: &DateTime<FixedOffset>,
    ) -> Option<Result<String, fmt::Error>> {
        let format = self.output.as_deref()?;
        let mut out = String::new();
        // Invalid specifiers surface as fmt::Error rather than a panic
        Some(write!(out, "{}", t.format(format)).map(|()| out))
    }
}

fn parse_with(s: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(t) = DateTime::parse_from_str(s, format) {
        return Some(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
        return Some(t.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(s, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc().fixed_offset())
}
