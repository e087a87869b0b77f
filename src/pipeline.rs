//! Sequences load → transforms → export for a single request.
//!
//! The controller is strictly linear: the first stage error aborts the run
//! and no partial output is produced. Every invocation builds its own table
//! from the request bytes; nothing persists across runs.

use crate::error::Result;
use crate::export;
use crate::format::FileFormat;
use crate::loader;
use crate::transform::Operation;
use polars::prelude::DataFrame;
use std::path::Path;

/// One conversion request from the caller.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Input file name, used to derive the suggested output name.
    pub file_name: String,
    /// Raw input file content.
    pub bytes: Vec<u8>,
    /// Declared input format tag (`"csv"` / `"xlsx"`).
    pub input_format: String,
    /// Cleaning steps, applied in exactly this order.
    pub operations: Vec<Operation>,
    /// Requested output format tag.
    pub output_format: String,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    /// Fully materialized output file content.
    pub bytes: Vec<u8>,
    /// Suggested output file name: the input name with its extension
    /// replaced by the output format's canonical extension.
    pub file_name: String,
    /// MIME-type label for the output format.
    pub mime_type: &'static str,
}

/// Run the full pipeline for `request`.
///
/// # Errors
///
/// Fails with the first error raised by any stage: an unsupported format
/// tag, malformed input bytes, or an unknown column in a selection. On
/// failure no output bytes are returned.
pub fn run(request: &ConvertRequest) -> Result<ConvertOutput> {
    let input_format = FileFormat::from_tag(&request.input_format)?;
    let output_format = FileFormat::from_tag(&request.output_format)?;

    tracing::info!(
        file = %request.file_name,
        from = %input_format,
        to = %output_format,
        steps = request.operations.len(),
        "starting conversion run"
    );

    let df = loader::load(&request.bytes, input_format)?;
    tracing::debug!(rows = df.height(), columns = df.width(), "table loaded");

    let df = apply_operations(df, &request.operations)?;

    let bytes = export::export(&df, output_format)?;
    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        bytes = bytes.len(),
        "conversion complete"
    );

    Ok(ConvertOutput {
        bytes,
        file_name: output_file_name(&request.file_name, output_format),
        mime_type: output_format.mime_type(),
    })
}

fn apply_operations(mut df: DataFrame, operations: &[Operation]) -> Result<DataFrame> {
    for (idx, operation) in operations.iter().enumerate() {
        df = operation.apply(df)?;
        tracing::debug!(
            step = idx + 1,
            operation = ?operation,
            rows = df.height(),
            columns = df.width(),
            "applied transform"
        );
    }
    Ok(df)
}

/// Input name with its extension swapped for the output format's canonical
/// one; a name without an extension gets the extension appended.
pub fn output_file_name(input_name: &str, format: FileFormat) -> String {
    Path::new(input_name)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned()
}
