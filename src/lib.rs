//! Purpose: Record-cursor layer for row-oriented text decoders.
//! Exports: `api` (cursor, errors, row-reader seam, CSV reader), `core`, `reader`.
//! Role: Turns a fallible sequential row reader into a one-ahead buffered record stream.
//! Invariants: The cursor is always one parse ahead of consumption.
//! Invariants: Error context is only built on error paths.
pub mod api;
pub mod core;
pub mod reader;
