//! snpsig - SNP clinical significance annotator

use std::path::PathBuf;
use std::process;

use clap::Parser;
use snpsig_cli::config::AnnotateConfig;
use snpsig_cli::parser::normalize_input_path;
use snpsig_cli::pipeline::AnnotationPipeline;
use snpsig_common::logging::{init_logging, LogConfig, LogLevel};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "snpsig")]
#[command(
    author,
    version,
    about = "Annotate raw genotype exports with dbSNP clinical significance"
)]
struct Cli {
    /// Path to the raw genotype export (23andMe-style)
    input: String,

    /// Output CSV path (defaults to snp_analysis_results.csv in the
    /// download directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Contact e-mail sent to NCBI with every request
    #[arg(long, env = "SNPSIG_EMAIL")]
    email: Option<String>,

    /// NCBI API key (raises the allowed request rate)
    #[arg(long, env = "SNPSIG_API_KEY")]
    api_key: Option<String>,

    /// Base URL of the NCBI E-utilities service
    #[arg(long, env = "SNPSIG_EUTILS_BASE_URL")]
    eutils_base_url: Option<String>,

    /// Number of concurrent fetches
    #[arg(short, long)]
    workers: Option<usize>,

    /// Annotate only the first N records
    #[arg(short, long)]
    limit: Option<usize>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Environment configures logging; the verbose flag raises the level
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    // Initialize logging (ignore errors as the CLI should work without logging)
    let _ = init_logging(&log_config);

    if let Err(e) = run(cli).await {
        error!(error = %e, "Annotation run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute one annotation run with the merged configuration
async fn run(cli: Cli) -> snpsig_cli::Result<()> {
    // Environment first, command-line flags on top
    let mut config = AnnotateConfig::from_env();
    if let Some(email) = cli.email {
        config.email = email;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(base_url) = cli.eutils_base_url {
        config.eutils_base_url = base_url;
    }
    if let Some(workers) = cli.workers {
        config.concurrency = workers;
    }
    if let Some(limit) = cli.limit {
        config.record_limit = Some(limit);
    }
    if let Some(timeout) = cli.timeout_secs {
        config.timeout_secs = timeout;
    }

    let input = normalize_input_path(&cli.input);
    let output = cli.output.unwrap_or_else(default_output_path);

    let pipeline = AnnotationPipeline::new(config)?;
    let summary = pipeline.run(&input, &output).await?;

    println!(
        "Annotated {} variants in {:.2}s",
        summary.records, summary.duration_secs
    );
    println!("Report written to {}", output.display());

    Ok(())
}

/// Default report location: the user's download directory
fn default_output_path() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snp_analysis_results.csv")
}
