//! Observability (structured logging)
//!
//! Page assembly logs through `tracing`; this module installs the
//! subscriber that renders those events.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging stack
///
/// Sets up:
/// - Structured logging with JSON formatting (release) or pretty formatting (debug)
/// - Environment-based log level filtering via `RUST_LOG`
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use acton_htmx_page::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init() -> anyhow::Result<()> {
    init_with(&ObservabilityConfig::default())
}

/// Initialize the logging stack for a specific configuration
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_with(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    tracing::debug!(service = %config.service_name, "Observability initialized");
    Ok(())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to startup logs
    pub service_name: String,

    /// Emit JSON lines instead of pretty output
    pub json: bool,

    /// Log verbosity used when `RUST_LOG` is not set
    pub verbose: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "acton-htmx-page".to_string(),
            json: !cfg!(debug_assertions),
            verbose: cfg!(debug_assertions),
        }
    }
}

impl ObservabilityConfig {
    /// Create new observability config
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Force JSON output
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Enable trace-level logging for this crate
    #[must_use]
    pub const fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug,acton_htmx_page=trace"
        } else {
            "info"
        }
    }
}
