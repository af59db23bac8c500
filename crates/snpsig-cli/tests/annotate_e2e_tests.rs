//! End-to-end tests for the snpsig binary
//!
//! These tests validate the full annotation workflow including:
//! - Parsing a raw genotype export
//! - Fetching summaries from a mocked E-utilities endpoint
//! - Per-record failure handling
//! - Report layout and row order
//! - Configuration errors

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, NamedTempFile, TempDir};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build an esummary body with a significance value
fn summary_body(significance: &str) -> String {
    format!(
        "<eSummaryResult><DocumentSummarySet status=\"OK\"><DocumentSummary>\
         <SNP_ID>0</SNP_ID>\
         <CLINICAL_SIGNIFICANCE>{significance}</CLINICAL_SIGNIFICANCE>\
         </DocumentSummary></DocumentSummarySet></eSummaryResult>"
    )
}

/// Helper to build an esummary body with no significance element
fn summary_body_without_significance() -> String {
    "<eSummaryResult><DocumentSummarySet status=\"OK\"><DocumentSummary>\
     <SNP_ID>0</SNP_ID>\
     </DocumentSummary></DocumentSummarySet></eSummaryResult>"
        .to_string()
}

/// Helper to write a genotype export to a temp file
fn write_export(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Helper to mount a significance response for one identifier
async fn mount_summary(server: &MockServer, rsid: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .and(query_param("id", rsid))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Helper for the snpsig command with fast test timings
fn snpsig_cmd(server_uri: &str, output_dir: &TempDir) -> (Command, std::path::PathBuf) {
    let output = output_dir.path().join("report.csv");

    let mut cmd = Command::cargo_bin("snpsig").unwrap();
    cmd.arg("--eutils-base-url")
        .arg(server_uri)
        .arg("--email")
        .arg("test@example.com")
        .arg("-o")
        .arg(&output)
        .env("SNPSIG_MIN_INTERVAL_MS", "1")
        .env("SNPSIG_JITTER_MS", "0")
        .env("SNPSIG_BACKOFF_BASE_MS", "5");

    (cmd, output)
}

// ============================================================================
// Full Workflow Tests
// ============================================================================

#[tokio::test]
async fn test_annotate_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_summary(&mock_server, "rs1", summary_body("Pathogenic")).await;
    for rsid in ["rs2", "rs3", "rs4", "rs5"] {
        mount_summary(&mock_server, rsid, summary_body_without_significance()).await;
    }

    let export = write_export(
        "# rsid\tchromosome\tposition\tgenotype\n\
         rs1\t1\t100\tAA\n\
         rs2\t2\t200\tAG\n\
         rs3\t3\t300\tGG\n\
         rs4\t4\t400\tTT\n\
         rs5\t5\t500\tCC\n",
    );

    let dir = tempdir().unwrap();
    let (mut cmd, output) = snpsig_cmd(&mock_server.uri(), &dir);
    cmd.arg(export.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Annotated 5 variants"));

    let report = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "SNP,Chromosome,Position,Implications");
    assert_eq!(lines[1], "rs1,1,100,Pathogenic");
    assert_eq!(lines[2], "rs2,2,200,No known implications");
    assert_eq!(lines[3], "rs3,3,300,No known implications");
    assert_eq!(lines[4], "rs4,4,400,No known implications");
    assert_eq!(lines[5], "rs5,5,500,No known implications");
}

#[tokio::test]
async fn test_failed_and_empty_fetches_still_produce_rows() {
    let mock_server = MockServer::start().await;
    mount_summary(&mock_server, "rs1", summary_body("benign")).await;
    // rs2 has no mock: every attempt is answered with 404
    mount_summary(&mock_server, "rs3", summary_body("")).await;

    let export = write_export("rs1\t1\t100\tAA\nrs2\t1\t200\tAG\nrs3\tX\t300\tCT\n");

    let dir = tempdir().unwrap();
    let (mut cmd, output) = snpsig_cmd(&mock_server.uri(), &dir);
    cmd.arg(export.path());

    cmd.assert().success();

    let report = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "rs1,1,100,benign");
    assert!(lines[2].starts_with("rs2,1,200,Error fetching information:"));
    // An empty significance element yields an empty cell, not the marker
    assert_eq!(lines[3], "rs3,X,300,");
}

#[tokio::test]
async fn test_quoted_input_path_is_accepted() {
    let mock_server = MockServer::start().await;
    mount_summary(&mock_server, "rs1", summary_body("benign")).await;

    let export = write_export("rs1\t1\t100\tAA\n");
    let quoted = format!("\"{}\"", export.path().display());

    let dir = tempdir().unwrap();
    let (mut cmd, output) = snpsig_cmd(&mock_server.uri(), &dir);
    cmd.arg(quoted);

    cmd.assert().success();

    let report = std::fs::read_to_string(&output).unwrap();
    assert!(report.contains("rs1,1,100,benign"));
}

#[tokio::test]
async fn test_record_limit_flag() {
    let mock_server = MockServer::start().await;
    mount_summary(&mock_server, "rs1", summary_body("pathogenic")).await;
    // Records past the limit may not be fetched
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(summary_body("benign")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let export = write_export("rs1\t1\t100\tAA\nrs2\t1\t200\tAG\nrs3\t2\t300\tCC\n");

    let dir = tempdir().unwrap();
    let (mut cmd, output) = snpsig_cmd(&mock_server.uri(), &dir);
    cmd.arg(export.path()).arg("--limit").arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Annotated 1 variants"));

    let report = std::fs::read_to_string(&output).unwrap();
    assert_eq!(report.lines().count(), 2);
}

#[tokio::test]
async fn test_empty_export_writes_header_only_report() {
    let mock_server = MockServer::start().await;

    let export = write_export("# only header comments\n");

    let dir = tempdir().unwrap();
    let (mut cmd, output) = snpsig_cmd(&mock_server.uri(), &dir);
    cmd.arg(export.path());

    cmd.assert().success();

    let report = std::fs::read_to_string(&output).unwrap();
    assert_eq!(report.trim_end(), "SNP,Chromosome,Position,Implications");
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_missing_input_file_fails() {
    let mock_server = MockServer::start().await;

    let dir = tempdir().unwrap();
    let (mut cmd, output) = snpsig_cmd(&mock_server.uri(), &dir);
    cmd.arg("/nonexistent/genome.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("File not found"));

    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_email_fails() {
    let mock_server = MockServer::start().await;

    let export = write_export("rs1\t1\t100\tAA\n");
    let dir = tempdir().unwrap();
    let output = dir.path().join("report.csv");

    let mut cmd = Command::cargo_bin("snpsig").unwrap();
    cmd.arg(export.path())
        .arg("--eutils-base-url")
        .arg(mock_server.uri())
        .arg("-o")
        .arg(&output)
        .env_remove("SNPSIG_EMAIL");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("e-mail"));

    assert!(!output.exists());
}

#[test]
fn test_input_argument_is_required() {
    let mut cmd = Command::cargo_bin("snpsig").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
