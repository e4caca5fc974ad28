// One-record-ahead cursor over a row reader with peek and forward-only skip.
use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::error::{CodingKey, CodingPath, Error, ErrorKind};
use crate::core::record::Record;
use crate::reader::RowReader;
use crate::reader::config::ReaderConfig;
use crate::reader::csv_reader::CsvRowReader;
use crate::reader::encoding::Encoding;

/// Pull-based record stream that always holds the next row already parsed.
///
/// `used` is the record last handed out by [`RecordCursor::fetch_record`];
/// `next` is the parsed record waiting behind it. The reader only advances
/// while `next` is being refilled, so peeking never parses a row twice.
#[derive(Debug)]
pub struct RecordCursor<R: RowReader> {
    reader: R,
    used: Record<R::Error>,
    next: Record<R::Error>,
}

impl RecordCursor<CsvRowReader> {
    /// Builds a CSV reader over `bytes` and primes the first record.
    pub fn from_bytes(
        bytes: impl Into<Vec<u8>>,
        encoding: Encoding,
        config: &ReaderConfig,
    ) -> Result<Self, Error> {
        let reader = CsvRowReader::new(bytes, encoding, config).map_err(|err| {
            Error::new(ErrorKind::DataCorrupted)
                .with_message("cannot initialize the row reader")
                .with_source(err)
        })?;
        Ok(Self::new(reader))
    }
}

impl<R: RowReader> RecordCursor<R> {
    pub fn new(mut reader: R) -> Self {
        let next = parse_next(&mut reader);
        Self {
            reader,
            used: Record::Start,
            next,
        }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.reader.headers()
    }

    pub fn is_at_end(&self) -> bool {
        self.next.is_end()
    }

    /// Total row count, known only once the input is exhausted.
    pub fn records_count(&self) -> Option<usize> {
        match self.next {
            Record::End { index } => Some(index),
            _ => None,
        }
    }

    pub fn next_record_index(&self) -> usize {
        self.next.index()
    }

    /// Consumes the waiting record. `Ok(None)` means no more records.
    ///
    /// A malformed row is consumed too: the error is returned and the
    /// following row becomes next. `context` only runs on that path.
    pub fn fetch_record<F>(&mut self, context: F) -> Result<Option<Vec<String>>, Error>
    where
        F: FnOnce() -> CodingPath,
    {
        self.used = mem::replace(&mut self.next, Record::Start);
        match &mut self.used {
            Record::Row { fields, .. } => {
                self.next = parse_next(&mut self.reader);
                Ok(Some(mem::take(fields)))
            }
            Record::End { index } => {
                self.next = Record::End { index: *index };
                Ok(None)
            }
            Record::ParsingError { error, index } => {
                let err = corrupted_row(error, *index, context);
                self.next = parse_next(&mut self.reader);
                Err(err)
            }
            Record::Start => unreachable!("a consumed record cannot regress to Start"),
        }
    }

    /// Same outcome as `fetch_record` without consuming or advancing.
    pub fn peek_next_record<F>(&self, context: F) -> Result<Option<&[String]>, Error>
    where
        F: FnOnce() -> CodingPath,
    {
        match &self.next {
            Record::Row { fields, .. } => Ok(Some(fields)),
            Record::End { .. } => Ok(None),
            Record::ParsingError { error, index } => Err(corrupted_row(error, *index, context)),
            Record::Start => unreachable!("the next record is primed at construction"),
        }
    }

    /// Skips forward until `target_index` is the next record.
    ///
    /// Returns `false` when the input ends first. Parsing errors met on the
    /// way abort the skip.
    pub fn move_before_record<F>(
        &mut self,
        target_index: usize,
        key: impl Into<CodingKey>,
        context: F,
    ) -> Result<bool, Error>
    where
        F: Fn() -> CodingPath,
    {
        let current = self.next_record_index();
        if target_index == current {
            return Ok(true);
        }
        if target_index < current {
            return Err(Error::new(ErrorKind::ValueAlreadyParsed)
                .with_message(format!(
                    "record {target_index} was already parsed; next record is {current}"
                ))
                .with_row(target_index)
                .with_key(key)
                .with_coding_path(context()));
        }

        debug!(from = current, to = target_index, "skipping ahead");
        while self.next_record_index() < target_index {
            if self.fetch_record(&context)?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn into_reader(self) -> R {
        self.reader
    }
}

impl<R: RowReader> Iterator for RecordCursor<R> {
    type Item = Result<Vec<String>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetch_record(CodingPath::new).transpose()
    }
}

fn parse_next<R: RowReader>(reader: &mut R) -> Record<R::Error> {
    let index = reader.row_index();
    match reader.parse_row() {
        Ok(Some(fields)) => {
            trace!(row = index, fields = fields.len(), "parsed row");
            Record::Row { fields, index }
        }
        Ok(None) => {
            debug!(rows = index, "reached end of input");
            Record::End { index }
        }
        Err(error) => {
            debug!(row = index, %error, "row reader failed");
            Record::ParsingError {
                error: Arc::new(error),
                index,
            }
        }
    }
}

fn corrupted_row<E, F>(error: &Arc<E>, index: usize, context: F) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
    F: FnOnce() -> CodingPath,
{
    Error::new(ErrorKind::DataCorrupted)
        .with_message(format!("cannot parse row {index}"))
        .with_row(index)
        .with_coding_path(context())
        .with_shared_source(Arc::clone(error) as Arc<dyn std::error::Error + Send + Sync>)
}
