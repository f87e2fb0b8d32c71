//! Configuration
//!
//! Every setting can be given as a flag or through the environment; a `.env`
//! file is loaded first by the binary.

use clap::{Args, ValueEnum};

use crate::{
    auth::{Caller, Role},
    domain::orders::DEFAULT_STOCK_UPDATE_ATTEMPTS,
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
}

/// Database settings.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Checkout settings.
#[derive(Debug, Clone, Copy, Args)]
pub struct CheckoutConfig {
    /// Compare-and-swap attempts per stock write during checkout
    #[arg(
        long,
        env = "STOCK_UPDATE_ATTEMPTS",
        default_value_t = DEFAULT_STOCK_UPDATE_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub stock_update_attempts: u32,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            stock_update_attempts: DEFAULT_STOCK_UPDATE_ATTEMPTS,
        }
    }
}

/// Identity of the already-authenticated caller.
#[derive(Debug, Clone, Args)]
pub struct CallerArgs {
    /// Email of the caller
    #[arg(long = "as", env = "CALLER_EMAIL")]
    pub caller_email: String,

    /// Role of the caller (admin, salesman, customer)
    #[arg(long, env = "CALLER_ROLE", default_value = "customer")]
    pub role: Role,
}

impl CallerArgs {
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller::new(self.caller_email.clone(), self.role)
    }
}
