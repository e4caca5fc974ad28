// Core modules implementing the record slot, the buffered cursor, and error modeling.
pub mod cursor;
pub mod error;
pub mod record;
