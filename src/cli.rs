use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use sweeper::format::FileFormat;
use sweeper::pipeline::{self, ConvertRequest};
use sweeper::profile::{self, ColumnKind};
use sweeper::transform::{operations_from_flags, Operation};

#[derive(Parser)]
#[command(name = "sweeper", about = "Clean and convert tabular data files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a file to another format, optionally cleaning it on the way
    Convert {
        /// Path to the input file (.csv or .xlsx)
        file: PathBuf,

        /// Output format tag (csv, xlsx). Defaults to the input format.
        #[arg(long)]
        to: Option<String>,

        /// Output file path. Defaults to the input name with the output
        /// format's extension.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Remove full-row duplicates, keeping the first occurrence
        #[arg(long)]
        dedupe: bool,

        /// Fill missing cells in numeric columns with the column mean
        #[arg(long)]
        fill_missing: bool,

        /// Comma-separated list of columns to keep, in order
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Path to a JSON file holding an ordered operation list
        /// (overrides the cleaning flags)
        #[arg(long)]
        ops: Option<PathBuf>,
    },
    /// Print a per-column profile of a file
    Profile {
        /// Path to the input file (.csv or .xlsx)
        file: PathBuf,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            file,
            to,
            output,
            dedupe,
            fill_missing,
            columns,
            ops,
        } => handle_convert(file, to, output, dedupe, fill_missing, columns, ops),
        Commands::Profile { file } => handle_profile(&file),
    }
}

fn handle_convert(
    file: PathBuf,
    to: Option<String>,
    output: Option<PathBuf>,
    dedupe: bool,
    fill_missing: bool,
    columns: Option<Vec<String>>,
    ops: Option<PathBuf>,
) -> Result<()> {
    let input_format = FileFormat::from_path(&file)?;
    let bytes = std::fs::read(&file)
        .with_context(|| format!("Failed to read input file: {}", file.display()))?;

    let operations = match ops {
        Some(ops_path) => load_operations(&ops_path)?,
        None => operations_from_flags(dedupe, fill_missing, columns),
    };

    let output_format = to.unwrap_or_else(|| input_format.extension().to_owned());

    let request = ConvertRequest {
        file_name: file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        bytes,
        input_format: input_format.extension().to_owned(),
        operations,
        output_format,
    };

    let result = pipeline::run(&request).context("Conversion failed")?;

    let output_path = output.unwrap_or_else(|| PathBuf::from(&result.file_name));
    std::fs::write(&output_path, &result.bytes)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    println!(
        "Wrote {} ({}, {} bytes)",
        output_path.display(),
        result.mime_type,
        result.bytes.len()
    );
    Ok(())
}

fn handle_profile(file: &Path) -> Result<()> {
    let input_format = FileFormat::from_path(file)?;
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read input file: {}", file.display()))?;

    let df = sweeper::loader::load(&bytes, input_format)?;
    let profiles = profile::classify(&df)?;

    println!("{}: {} rows, {} columns", file.display(), df.height(), df.width());
    for p in profiles {
        let kind = match p.kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::NonNumeric => "non-numeric",
        };
        let mean = p
            .mean
            .map(|m| format!("{m:.3}"))
            .unwrap_or_else(|| "-".to_owned());
        println!(
            "  {:<24} {:<12} non-null {:>6}  missing {:>6}  mean {mean}",
            p.name, kind, p.non_null, p.nulls
        );
    }
    Ok(())
}

fn load_operations(path: &Path) -> Result<Vec<Operation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read operations file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse operations JSON")
}
