// Structured row-reader errors, chained under decode errors by the cursor.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReaderErrorKind {
    InvalidConfiguration,
    UnsupportedEncoding,
    InvalidEncoding,
    InvalidInput,
    Io,
}

#[derive(Debug)]
pub struct ReaderError {
    kind: ReaderErrorKind,
    message: Option<String>,
    row: Option<usize>,
    line: Option<u64>,
    snippet: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ReaderError {
    pub fn new(kind: ReaderErrorKind) -> Self {
        Self {
            kind,
            message: None,
            row: None,
            line: None,
            snippet: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ReaderErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(row) = self.row {
            write!(f, " (row: {row})")?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {line})")?;
        }
        if let Some(snippet) = &self.snippet {
            write!(f, " (near: {snippet:?})")?;
        }
        Ok(())
    }
}

impl StdError for ReaderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}
