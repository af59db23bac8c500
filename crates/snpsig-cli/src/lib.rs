//! snpsig CLI Library
//!
//! Annotates raw genotype exports with clinical significance data fetched
//! from NCBI dbSNP.
//!
//! # Overview
//!
//! The crate is organized around a single pipeline:
//!
//! - **Parsing**: read 23andMe-style exports into records ([`parser`])
//! - **Fetching**: paced, retrying esummary lookups ([`client`], [`rate_limit`])
//! - **Extraction**: pull `CLINICAL_SIGNIFICANCE` out of summary XML ([`summary`])
//! - **Reporting**: write the ordered CSV report ([`report`])
//!
//! [`pipeline::AnnotationPipeline`] ties the stages together and guarantees
//! one output row per input record, in input order.

pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod rate_limit;
pub mod report;
pub mod summary;

// Re-export commonly used types
pub use config::AnnotateConfig;
pub use error::{AnnotateError, Result};
pub use pipeline::{AnnotationPipeline, RunSummary};
