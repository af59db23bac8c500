//! Annotation pipeline
//!
//! Drives a full run: parse the genotype export, fan fetches out across a
//! bounded pool of in-flight requests, gather results in input order and
//! write the report.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use snpsig_common::{AnnotationResult, VariantRecord};
use tracing::{info, warn};

use crate::client::AnnotationClient;
use crate::config::AnnotateConfig;
use crate::error::{AnnotateError, Result};
use crate::parser::GenomeParser;
use crate::rate_limit::RequestPacer;
use crate::report;

/// Statistics for a completed annotation run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of records annotated
    pub records: usize,

    /// Wall-clock duration of the run in seconds
    pub duration_secs: f64,

    /// Where the report was written
    pub output_path: PathBuf,
}

/// Coordinates concurrent annotation fetches over one run's records
pub struct AnnotationPipeline {
    config: AnnotateConfig,
    client: AnnotationClient,
}

impl AnnotationPipeline {
    /// Create a pipeline from validated configuration.
    ///
    /// The request pacer is created here and shared with every fetch the
    /// client makes, so the request rate holds across all workers.
    pub fn new(config: AnnotateConfig) -> Result<Self> {
        config.validate().map_err(AnnotateError::Config)?;

        let pacer =
            Arc::new(RequestPacer::new(&config.rate_limit).map_err(AnnotateError::Config)?);
        let client = AnnotationClient::new(config.clone(), pacer)?;

        Ok(AnnotationPipeline { config, client })
    }

    /// Annotate records with bounded concurrency, preserving input order.
    ///
    /// Exactly one result is produced per record, `results[i]` for
    /// `records[i]`, regardless of the order fetches complete in; a fetch
    /// that cannot be completed degrades to an error string in its row.
    pub async fn annotate_records(&self, records: Vec<VariantRecord>) -> Vec<AnnotationResult> {
        let total = records.len();
        info!(
            records = total,
            concurrency = self.config.concurrency,
            "Annotating records"
        );

        let progress = ProgressBar::new(total as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress.set_message("Annotating variants");

        let client = &self.client;
        let progress_ref = &progress;

        let results: Vec<AnnotationResult> = stream::iter(records)
            .map(|record| async move {
                let significance = client.fetch_significance(&record.rsid).await;
                progress_ref.inc(1);
                AnnotationResult::new(record, significance)
            })
            .buffered(self.config.concurrency)
            .collect()
            .await;

        progress.finish_and_clear();
        info!(results = results.len(), "Annotation fetches complete");

        results
    }

    /// Run the full pipeline: read records, annotate them, write the report.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let start = Instant::now();

        info!(input = %input.display(), "Phase 1: Reading genotype export");
        let parser = match self.config.record_limit {
            Some(limit) => {
                warn!(limit, "Record limit set, truncating input");
                GenomeParser::with_limit(limit)
            }
            None => GenomeParser::new(),
        };
        let records = parser.parse_file(input)?;
        info!(records = records.len(), "Parsed genotype export");

        info!("Phase 2: Fetching annotations");
        let results = self.annotate_records(records).await;

        info!(output = %output.display(), "Phase 3: Writing report");
        report::write_report(&results, output)?;

        for result in results.iter().take(5) {
            info!(
                rsid = %result.rsid,
                chromosome = %result.chromosome,
                position = %result.position,
                implications = %result.clinical_significance,
                "Result preview"
            );
        }

        let duration_secs = start.elapsed().as_secs_f64();
        info!(
            records = results.len(),
            "Annotation run complete in {:.2}s", duration_secs
        );

        Ok(RunSummary {
            records: results.len(),
            duration_secs,
            output_path: output.to_path_buf(),
        })
    }
}
