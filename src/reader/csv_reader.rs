// CSV row reader over an in-memory byte buffer, tokenized by the `csv` crate.
use std::io;

use bstr::ByteSlice;
use tracing::debug;

use crate::reader::config::{HeaderStrategy, ReaderConfig};
use crate::reader::encoding::Encoding;
use crate::reader::error::{ReaderError, ReaderErrorKind};
use crate::reader::RowReader;

const MAX_SNIPPET_CHARS: usize = 64;

#[derive(Debug)]
pub struct CsvRowReader {
    reader: csv::Reader<io::Cursor<Vec<u8>>>,
    record: csv::ByteRecord,
    encoding: Encoding,
    delimiter: u8,
    headers: Option<Vec<String>>,
    row_index: usize,
}

impl CsvRowReader {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        encoding: Encoding,
        config: &ReaderConfig,
    ) -> Result<Self, ReaderError> {
        let settings = config.validate()?;
        let input = encoding.prepare(bytes.into())?;
        let has_headers = config.header == HeaderStrategy::FirstLine;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(settings.delimiter)
            .quote(settings.quote)
            .escape(settings.escape)
            .double_quote(settings.escape.is_none())
            .comment(settings.comment)
            .trim(config.trim.into())
            .flexible(config.flexible)
            .has_headers(has_headers)
            .from_reader(io::Cursor::new(input));

        let headers = if has_headers {
            let raw = reader.byte_headers().map_err(|err| {
                ReaderError::new(ReaderErrorKind::InvalidInput)
                    .with_message("cannot read header row")
                    .with_source(err)
            })?;
            let names = raw
                .iter()
                .map(|field| encoding.decode_field(field))
                .collect::<Result<Vec<_>, _>>()?;
            Some(names)
        } else {
            None
        };

        debug!(
            %encoding,
            delimiter = ?config.delimiter,
            header = ?config.header,
            columns = headers.as_ref().map(Vec::len),
            flexible = config.flexible,
            "csv row reader ready"
        );

        Ok(Self {
            reader,
            record: csv::ByteRecord::new(),
            encoding,
            delimiter: settings.delimiter,
            headers,
            row_index: 0,
        })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn snippet(&self) -> String {
        let joined = bstr::join([self.delimiter], self.record.iter());
        let text = joined.to_str_lossy();
        match text.char_indices().nth(MAX_SNIPPET_CHARS) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.into_owned(),
        }
    }
}

impl RowReader for CsvRowReader {
    type Error = ReaderError;

    fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    fn row_index(&self) -> usize {
        self.row_index
    }

    fn parse_row(&mut self) -> Result<Option<Vec<String>>, ReaderError> {
        let row = self.row_index;
        match self.reader.read_byte_record(&mut self.record) {
            Ok(false) => Ok(None),
            Ok(true) => {
                self.row_index += 1;
                let mut fields = Vec::with_capacity(self.record.len());
                for raw in self.record.iter() {
                    match self.encoding.decode_field(raw) {
                        Ok(field) => fields.push(field),
                        Err(err) => {
                            let mut err = err.with_row(row).with_snippet(self.snippet());
                            if let Some(position) = self.record.position() {
                                err = err.with_line(position.line());
                            }
                            return Err(err);
                        }
                    }
                }
                Ok(Some(fields))
            }
            Err(err) => {
                self.row_index += 1;
                let kind = match err.kind() {
                    csv::ErrorKind::Io(_) => ReaderErrorKind::Io,
                    _ => ReaderErrorKind::InvalidInput,
                };
                let mut failure = ReaderError::new(kind)
                    .with_message(describe(&err))
                    .with_row(row);
                if let Some(position) = err.position() {
                    failure = failure.with_line(position.line());
                }
                Err(failure.with_source(err))
            }
        }
    }
}

fn describe(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Io(io_err) => format!("read failed: {io_err}"),
        _ => "malformed record".to_string(),
    }
}
