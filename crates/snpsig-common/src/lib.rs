//! SNPSig Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and utilities for the snpsig workspace.
//!
//! # Overview
//!
//! This crate provides the functionality shared across snpsig workspace
//! members:
//!
//! - **Logging**: Centralized tracing configuration and initialization
//! - **Types**: Shared domain types (variant records and annotation results)
//!
//! # Example
//!
//! ```no_run
//! use snpsig_common::logging::{LogConfig, init_logging};
//! use snpsig_common::VariantRecord;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!
//!     let record = VariantRecord::new("rs4477212", "1", "82154", "AA");
//!     println!("loaded {}", record.rsid);
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{AnnotationResult, VariantRecord};
