//! Purpose: Define the row-reader seam the record cursor pulls from.
//! Exports: `RowReader`, plus the CSV implementation and its config/encoding/error types.
//! Role: Leaf collaborator boundary; the cursor never tokenizes input itself.
//! Invariants: `parse_row` is the only operation that moves a reader forward.
//! Invariants: `row_index` advances by one per produced row or failed row, never on end of input.
pub mod config;
pub mod csv_reader;
pub mod encoding;
pub mod error;

use std::error::Error as StdError;

/// A sequential source of rows, each an ordered list of string fields.
pub trait RowReader {
    type Error: StdError + Send + Sync + 'static;

    /// Column names, when the input declares a header row. Fixed after construction.
    fn headers(&self) -> Option<&[String]>;

    /// Zero-based index of the row the next `parse_row` call will produce.
    fn row_index(&self) -> usize;

    /// `Ok(None)` once the input is exhausted.
    fn parse_row(&mut self) -> Result<Option<Vec<String>>, Self::Error>;
}
