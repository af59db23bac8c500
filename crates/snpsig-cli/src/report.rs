//! CSV report output

use std::path::Path;

use snpsig_common::AnnotationResult;
use tracing::debug;

use crate::error::Result;

/// Report column headers, in output order
pub const REPORT_HEADER: [&str; 4] = ["SNP", "Chromosome", "Position", "Implications"];

/// Write the annotation report as CSV.
///
/// One row per result, in the order given. The header row is written even
/// when there are no results.
pub fn write_report(results: &[AnnotationResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    if results.is_empty() {
        // serialize only emits headers alongside a first row
        writer.write_record(REPORT_HEADER)?;
    }

    for result in results {
        writer.serialize(result)?;
    }

    writer.flush()?;
    debug!(rows = results.len(), path = %path.display(), "Report written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use snpsig_common::VariantRecord;
    use tempfile::tempdir;

    use super::*;

    fn sample_results() -> Vec<AnnotationResult> {
        vec![
            AnnotationResult::new(
                VariantRecord::new("rs4477212", "1", "82154", "AA"),
                "pathogenic",
            ),
            AnnotationResult::new(
                VariantRecord::new("rs3094315", "1", "752566", "AG"),
                "No known implications",
            ),
        ]
    }

    #[test]
    fn test_report_rows_and_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report(&sample_results(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "SNP,Chromosome,Position,Implications");
        assert_eq!(lines[1], "rs4477212,1,82154,pathogenic");
        assert_eq!(lines[2], "rs3094315,1,752566,No known implications");
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report(&[], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "SNP,Chromosome,Position,Implications");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let results = vec![AnnotationResult::new(
            VariantRecord::new("rs1", "1", "100", "CT"),
            "pathogenic, drug-response",
        )];
        write_report(&results, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"pathogenic, drug-response\""));
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let results = sample_results();
        let err = write_report(&results, Path::new("/nonexistent/dir/report.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to write report"));
    }
}
