//! CSV output for search results
//!
//! ```text
//! ┌──────────┐   ┌──────────┐         ┌──────────┐
//! │ search-0 │   │ search-1 │   ...   │ search-N │
//! └────┬─────┘   └────┬─────┘         └────┬─────┘
//!      │ matches      │ matches            │ matches
//!      ▼              ▼                    ▼
//!  A_output.csv   B_output.csv  ...   Z_output.csv
//! ```
//!
//! Each worker writes the file for the key it just searched. A key whose
//! search found nothing gets no file.

pub mod writer;

pub use writer::{write_csv, ResultWriter, WriteSummary, CSV_HEADER};
