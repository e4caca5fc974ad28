// Decode error model: kind, context builders, coding path, and chained reader causes.
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    DataCorrupted,
    ValueAlreadyParsed,
}

/// One step of a coding path: a named property or a positional element.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum CodingKey {
    Name(String),
    Index(usize),
}

impl From<&str> for CodingKey {
    fn from(name: &str) -> Self {
        CodingKey::Name(name.to_string())
    }
}

impl From<String> for CodingKey {
    fn from(name: String) -> Self {
        CodingKey::Name(name)
    }
}

impl From<usize> for CodingKey {
    fn from(index: usize) -> Self {
        CodingKey::Index(index)
    }
}

impl fmt::Display for CodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingKey::Name(name) => f.write_str(name),
            CodingKey::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Where in the target structure a value is being decoded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CodingPath(Vec<CodingKey>);

impl CodingPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<CodingKey>) {
        self.0.push(key.into());
    }

    pub fn pushed(mut self, key: impl Into<CodingKey>) -> Self {
        self.push(key);
        self
    }

    pub fn keys(&self) -> &[CodingKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<CodingKey>> for CodingPath {
    fn from(keys: Vec<CodingKey>) -> Self {
        Self(keys)
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (pos, key) in self.0.iter().enumerate() {
            if pos > 0 && matches!(key, CodingKey::Name(_)) {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    row: Option<usize>,
    key: Option<CodingKey>,
    coding_path: CodingPath,
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            row: None,
            key: None,
            coding_path: CodingPath::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn key(&self) -> Option<&CodingKey> {
        self.key.as_ref()
    }

    pub fn coding_path(&self) -> &CodingPath {
        &self.coding_path
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_key(mut self, key: impl Into<CodingKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_coding_path(mut self, coding_path: CodingPath) -> Self {
        self.coding_path = coding_path;
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Chains a cause that is still owned elsewhere, such as a buffered record.
    pub fn with_shared_source(mut self, source: Arc<dyn StdError + Send + Sync>) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(row) = self.row {
            write!(f, " (row: {row})")?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {key})")?;
        }
        write!(f, " (path: {})", self.coding_path)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{CodingKey, CodingPath, Error, ErrorKind};
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn coding_path_renders_dotted_with_indices() {
        let path = CodingPath::new()
            .pushed("rows")
            .pushed(3usize)
            .pushed("name");
        assert_eq!(path.to_string(), "rows[3].name");
        assert_eq!(CodingPath::new().to_string(), "<root>");
    }

    #[test]
    fn display_includes_context_fields() {
        let err = Error::new(ErrorKind::ValueAlreadyParsed)
            .with_message("row already consumed")
            .with_row(4)
            .with_key("price")
            .with_coding_path(CodingPath::from(vec![CodingKey::from("items")]));
        assert_eq!(
            err.to_string(),
            "ValueAlreadyParsed: row already consumed (row: 4) (key: price) (path: items)"
        );
    }

    #[test]
    fn source_is_chained() {
        let err = Error::new(ErrorKind::DataCorrupted)
            .with_source(io::Error::new(io::ErrorKind::InvalidData, "bad bytes"));
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "bad bytes");
        assert_eq!(err.kind(), ErrorKind::DataCorrupted);
    }
}
