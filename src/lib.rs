//! # Sweeper - Tabular Cleaning & Conversion Pipeline
//!
//! Sweeper is a small library for cleaning and reformatting tabular data
//! files. A caller supplies raw file bytes in a declared format (CSV or
//! XLSX), an ordered list of cleaning operations, and a requested output
//! format; the pipeline loads the table, applies the operations in exactly
//! that order, and returns the serialized result together with a suggested
//! file name and MIME label.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sweeper::{ConvertRequest, Operation};
//!
//! # fn example() -> sweeper::Result<()> {
//! let request = ConvertRequest {
//!     file_name: "sales.csv".to_owned(),
//!     bytes: std::fs::read("sales.csv")?,
//!     input_format: "csv".to_owned(),
//!     operations: vec![Operation::Deduplicate, Operation::FillMissingNumeric],
//!     output_format: "xlsx".to_owned(),
//! };
//!
//! let output = sweeper::run(&request)?;
//! std::fs::write(&output.file_name, &output.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`loader`]: parses input bytes into the working table
//! - [`profile`]: per-column classification and statistics
//! - [`transform`]: the cleaning operations (deduplicate, fill, select)
//! - [`export`]: serializes the table to the output format
//! - [`pipeline`]: sequences one load → transform → export run
//! - [`error`]: error types and the crate [`Result`] alias
//!
//! ## Execution Model
//!
//! A run is single-threaded, synchronous, and owns its table exclusively:
//! each invocation builds a fresh `DataFrame` from the request bytes and
//! discards it after export. The first stage error aborts the run; there is
//! no partial output and no retry.

#![warn(clippy::all, rust_2018_idioms)]

pub mod error;
pub mod export;
pub mod format;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod profile;
pub mod transform;

pub use error::{Result, SweeperError};
pub use format::FileFormat;
pub use pipeline::{run, ConvertOutput, ConvertRequest};
pub use transform::Operation;
