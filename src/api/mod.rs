//! Purpose: Define the stable public Rust API boundary for rowcursor.
//! Exports: Cursor, record, error, and row-reader types needed by decoding containers.
//! Role: Public, additive-only surface; hides module layout from callers.
//! Invariants: Decoding containers reach the cursor only through this module.

pub use crate::core::cursor::RecordCursor;
pub use crate::core::error::{CodingKey, CodingPath, Error, ErrorKind};
pub use crate::core::record::Record;
pub use crate::reader::RowReader;
pub use crate::reader::config::{HeaderStrategy, ReaderConfig, TrimStrategy};
pub use crate::reader::csv_reader::CsvRowReader;
pub use crate::reader::encoding::Encoding;
pub use crate::reader::error::{ReaderError, ReaderErrorKind};
