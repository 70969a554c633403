//! I/O module
//!
//! Handles command-file parsing and account output.
//!
//! # Components
//!
//! - `csv_format` - Record conversion and output serialization (CSV or JSON)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_csv_record, write_accounts, write_accounts_csv, write_accounts_json, CsvRecord,
};
pub use sync_reader::SyncReader;
