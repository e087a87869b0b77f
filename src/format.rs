//! Supported file formats and their metadata.

use crate::error::{Result, SweeperError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A recognized table serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Parse a caller-supplied format tag. Tags are matched
    /// case-insensitively; anything outside the supported set fails with
    /// [`SweeperError::UnsupportedFormat`] naming the offending tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(SweeperError::UnsupportedFormat(tag.to_owned())),
        }
    }

    /// Derive the format from a file path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_tag(ext)
    }

    /// Canonical file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME-type label for download boundaries.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
