//! Raw genotype export parser
//!
//! Reads 23andMe-style exports: `#`-prefixed header comments followed by
//! whitespace-separated `rsid  chromosome  position  genotype` lines.

use std::path::{Path, PathBuf};

use snpsig_common::VariantRecord;
use tracing::debug;

use crate::error::{AnnotateError, Result};

/// Parser for raw genotype export files
pub struct GenomeParser {
    /// Stop after this many records (None reads everything)
    record_limit: Option<usize>,
}

impl GenomeParser {
    /// Create a parser that reads every record
    pub fn new() -> Self {
        GenomeParser { record_limit: None }
    }

    /// Create a parser that stops after `limit` records
    pub fn with_limit(limit: usize) -> Self {
        GenomeParser {
            record_limit: Some(limit),
        }
    }

    /// Parse export text into records, preserving file order.
    ///
    /// Comment lines, blank lines and lines without exactly four fields are
    /// skipped; field values are carried verbatim, identifiers included.
    pub fn parse(&self, content: &str) -> Vec<VariantRecord> {
        let mut records = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                debug!(
                    line = line_num + 1,
                    fields = fields.len(),
                    "Skipping line with unexpected field count"
                );
                continue;
            }

            records.push(VariantRecord::new(
                fields[0], fields[1], fields[2], fields[3],
            ));

            if let Some(limit) = self.record_limit {
                if records.len() >= limit {
                    debug!(limit, "Reached record limit");
                    break;
                }
            }
        }

        records
    }

    /// Read and parse an export file
    pub fn parse_file(&self, path: &Path) -> Result<Vec<VariantRecord>> {
        if !path.exists() {
            return Err(AnnotateError::FileNotFound(path.display().to_string()));
        }

        debug!(path = %path.display(), "Reading genotype export");
        let content = std::fs::read_to_string(path)?;
        Ok(self.parse(&content))
    }
}

impl Default for GenomeParser {
    fn default() -> Self {
        GenomeParser::new()
    }
}

/// Normalize a user-supplied input path.
///
/// Export paths tend to arrive pasted from a file manager, wrapped in
/// quotes and padded with whitespace; both are stripped before use.
pub fn normalize_input_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
        })
        .unwrap_or(trimmed);

    PathBuf::from(unquoted.trim())
}
