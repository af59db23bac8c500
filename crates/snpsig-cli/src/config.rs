// Annotation fetch configuration

use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimitConfig;

/// Configuration for fetching dbSNP annotations through NCBI E-utilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateConfig {
    /// Base URL for the E-utilities endpoints
    pub eutils_base_url: String,

    /// Entrez database queried for summaries (e.g., "snp")
    pub database: String,

    /// Contact e-mail sent with every request (NCBI asks clients to
    /// identify themselves; requests without one may be blocked)
    pub email: String,

    /// Tool name sent with every request
    pub tool: String,

    /// NCBI API key (raises the allowed request rate when set)
    pub api_key: Option<String>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Total attempts per identifier, including the first
    pub max_attempts: u32,

    /// Base retry delay in milliseconds; doubles after each failure
    pub backoff_base_ms: u64,

    /// Number of concurrent in-flight fetches
    pub concurrency: usize,

    /// Annotate only the first N records (None = all)
    pub record_limit: Option<usize>,

    /// Request pacing policy shared by all fetch workers
    pub rate_limit: RateLimitConfig,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        AnnotateConfig {
            eutils_base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            database: "snp".to_string(),
            // No default identity: the caller must supply one
            email: String::new(),
            tool: "snpsig".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_attempts: 3,
            backoff_base_ms: 1000,
            concurrency: 2,
            record_limit: None,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AnnotateConfig {
    /// Create new config with builder pattern
    pub fn builder() -> AnnotateConfigBuilder {
        AnnotateConfigBuilder::default()
    }

    /// Get URL for the esummary endpoint
    pub fn esummary_url(&self) -> String {
        format!("{}/esummary.fcgi", self.eutils_base_url.trim_end_matches('/'))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.eutils_base_url.is_empty() {
            return Err("E-utilities base URL cannot be empty".to_string());
        }

        if self.database.is_empty() {
            return Err("Database name cannot be empty".to_string());
        }

        if self.email.is_empty() {
            return Err(
                "A contact e-mail is required (--email or SNPSIG_EMAIL); NCBI asks every client to identify itself"
                    .to_string(),
            );
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.max_attempts == 0 {
            return Err("At least one fetch attempt is required".to_string());
        }

        if self.concurrency == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }

        self.rate_limit.validate()?;

        Ok(())
    }
}

/// Builder for AnnotateConfig
#[derive(Debug, Default)]
pub struct AnnotateConfigBuilder {
    eutils_base_url: Option<String>,
    database: Option<String>,
    email: Option<String>,
    tool: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
    backoff_base_ms: Option<u64>,
    concurrency: Option<usize>,
    record_limit: Option<usize>,
    rate_limit: Option<RateLimitConfig>,
}

impl AnnotateConfigBuilder {
    pub fn eutils_base_url(mut self, url: String) -> Self {
        self.eutils_base_url = Some(url);
        self
    }

    pub fn database(mut self, database: String) -> Self {
        self.database = Some(database);
        self
    }

    pub fn email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    pub fn tool(mut self, tool: String) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn api_key(mut self, key: String) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn backoff_base_ms(mut self, ms: u64) -> Self {
        self.backoff_base_ms = Some(ms);
        self
    }

    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = Some(workers);
        self
    }

    pub fn record_limit(mut self, limit: usize) -> Self {
        self.record_limit = Some(limit);
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn build(self) -> AnnotateConfig {
        let default = AnnotateConfig::default();

        AnnotateConfig {
            eutils_base_url: self.eutils_base_url.unwrap_or(default.eutils_base_url),
            database: self.database.unwrap_or(default.database),
            email: self.email.unwrap_or(default.email),
            tool: self.tool.unwrap_or(default.tool),
            api_key: self.api_key,
            timeout_secs: self.timeout_secs.unwrap_or(default.timeout_secs),
            max_attempts: self.max_attempts.unwrap_or(default.max_attempts),
            backoff_base_ms: self.backoff_base_ms.unwrap_or(default.backoff_base_ms),
            concurrency: self.concurrency.unwrap_or(default.concurrency),
            record_limit: self.record_limit,
            rate_limit: self.rate_limit.unwrap_or(default.rate_limit),
        }
    }
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl AnnotateConfig {
    /// Configuration for tests: placeholder identity, short timings, no jitter
    pub fn test_config() -> Self {
        AnnotateConfig {
            eutils_base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            database: "snp".to_string(),
            email: "test@example.com".to_string(),
            tool: "snpsig".to_string(),
            api_key: None,
            timeout_secs: 5,
            max_attempts: 3,
            backoff_base_ms: 40,
            concurrency: 2,
            record_limit: None,
            rate_limit: RateLimitConfig::test_config(),
        }
    }

    /// Configuration for production (full dataset, polite pacing)
    pub fn production_config() -> Self {
        AnnotateConfig::default()
    }
}

// ============================================================================
// Environment Variable Support
// ============================================================================

impl AnnotateConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = AnnotateConfig::default();

        AnnotateConfig {
            eutils_base_url: std::env::var("SNPSIG_EUTILS_BASE_URL")
                .unwrap_or(default.eutils_base_url),
            database: std::env::var("SNPSIG_DATABASE").unwrap_or(default.database),
            email: std::env::var("SNPSIG_EMAIL").unwrap_or(default.email),
            tool: std::env::var("SNPSIG_TOOL").unwrap_or(default.tool),
            api_key: std::env::var("SNPSIG_API_KEY").ok(),
            timeout_secs: std::env::var("SNPSIG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            max_attempts: std::env::var("SNPSIG_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_attempts),
            backoff_base_ms: std::env::var("SNPSIG_BACKOFF_BASE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.backoff_base_ms),
            concurrency: std::env::var("SNPSIG_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.concurrency),
            record_limit: std::env::var("SNPSIG_RECORD_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok()),
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
