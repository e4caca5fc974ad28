//! Purpose: Describe how the CSV row reader tokenizes its input.
//! Exports: `ReaderConfig`, `HeaderStrategy`, `TrimStrategy`.
//! Role: Serde-loadable settings shared by callers and the CSV row reader.
//! Invariants: Every tokenizer character is a single ASCII byte once validated.
//! Invariants: The delimiter never collides with quote, escape, comment, or line endings.
use serde::{Deserialize, Serialize};

use crate::reader::error::{ReaderError, ReaderErrorKind};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    #[default]
    None,
    FirstLine,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimStrategy {
    #[default]
    None,
    Headers,
    Fields,
    All,
}

impl From<TrimStrategy> for csv::Trim {
    fn from(strategy: TrimStrategy) -> Self {
        match strategy {
            TrimStrategy::None => csv::Trim::None,
            TrimStrategy::Headers => csv::Trim::Headers,
            TrimStrategy::Fields => csv::Trim::Fields,
            TrimStrategy::All => csv::Trim::All,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub delimiter: char,
    pub quote: char,
    /// `None` means quotes are escaped by doubling them.
    pub escape: Option<char>,
    pub comment: Option<char>,
    pub trim: TrimStrategy,
    pub header: HeaderStrategy,
    /// Accept rows whose field count differs from the first row.
    pub flexible: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            escape: None,
            comment: None,
            trim: TrimStrategy::None,
            header: HeaderStrategy::None,
            flexible: false,
        }
    }
}

/// Tokenizer bytes derived from a validated `ReaderConfig`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ByteSettings {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: Option<u8>,
    pub comment: Option<u8>,
}

impl ReaderConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ReaderError> {
        serde_json::from_str(input).map_err(|err| {
            ReaderError::new(ReaderErrorKind::InvalidConfiguration)
                .with_message("invalid reader configuration")
                .with_source(err)
        })
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, header: HeaderStrategy) -> Self {
        self.header = header;
        self
    }

    pub fn with_trim(mut self, trim: TrimStrategy) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    pub(crate) fn validate(&self) -> Result<ByteSettings, ReaderError> {
        let delimiter = ascii_byte(self.delimiter, "delimiter")?;
        let quote = ascii_byte(self.quote, "quote")?;
        let escape = self.escape.map(|c| ascii_byte(c, "escape")).transpose()?;
        let comment = self.comment.map(|c| ascii_byte(c, "comment")).transpose()?;

        if delimiter == b'\n' || delimiter == b'\r' {
            return Err(invalid("delimiter cannot be a line terminator"));
        }
        if delimiter == quote {
            return Err(invalid("delimiter and quote must differ"));
        }
        if escape == Some(delimiter) {
            return Err(invalid("delimiter and escape must differ"));
        }
        if comment == Some(delimiter) {
            return Err(invalid("delimiter and comment must differ"));
        }

        Ok(ByteSettings {
            delimiter,
            quote,
            escape,
            comment,
        })
    }
}

fn ascii_byte(value: char, name: &str) -> Result<u8, ReaderError> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(invalid(format!("{name} must be a single ASCII character, got {value:?}")))
    }
}

fn invalid(message: impl Into<String>) -> ReaderError {
    ReaderError::new(ReaderErrorKind::InvalidConfiguration).with_message(message)
}
