use super::{
    DEFAULT_BIND_ADDRESS, DEFAULT_FALLBACK_SEED, DEFAULT_SCB_ENDPOINT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_UHR_ENDPOINT,
};
use crate::core::ConfigProvider;
use crate::domain::model::StatisticsFilter;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_positive_number, validate_socket_addr, validate_url, Validate,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "admission-stats")]
#[command(about = "University admission statistics: yearly totals, home regions and gender split")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Read settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_UHR_ENDPOINT)]
    pub uhr_endpoint: String,

    #[arg(long, global = true, default_value = DEFAULT_SCB_ENDPOINT)]
    pub scb_endpoint: String,

    #[arg(long, global = true, help = "UHR API key (falls back to $UHR_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, global = true, help = "Fail instead of serving synthetic data when a source is down")]
    pub no_fallback: bool,

    #[arg(long, global = true, default_value_t = DEFAULT_FALLBACK_SEED)]
    pub fallback_seed: u64,

    #[arg(long, global = true, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    #[arg(long, global = true, help = "Include error details in HTTP responses")]
    pub development: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Fills the API key from `$UHR_API_KEY` when no flag was given.
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("UHR_API_KEY").ok().filter(|k| !k.is_empty());
        }
        self
    }
}

impl ConfigProvider for CliConfig {
    fn uhr_endpoint(&self) -> &str {
        &self.uhr_endpoint
    }

    fn scb_endpoint(&self) -> &str {
        &self.scb_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn fallback_enabled(&self) -> bool {
        !self.no_fallback
    }

    fn fallback_seed(&self) -> u64 {
        self.fallback_seed
    }

    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn is_development(&self) -> bool {
        self.development
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("uhr_endpoint", &self.uhr_endpoint)?;
        validate_url("scb_endpoint", &self.scb_endpoint)?;
        validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        validate_socket_addr("bind", &self.bind)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the JSON HTTP API
    Serve,

    /// List program statistics matching a filter
    Statistics {
        #[arg(long)]
        university_id: Option<String>,

        #[arg(long)]
        from_year: Option<i32>,

        #[arg(long)]
        to_year: Option<i32>,

        #[arg(long, help = "Program id prefix, e.g. kth-cs")]
        program_id: Option<String>,
    },

    /// Yearly totals for one university
    University { university_id: String },

    /// Applicant share per home region
    Geographic {
        university_id: String,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Gender split of applicants and accepted students
    Gender {
        university_id: String,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long, help = "Exact program id, e.g. kth-cs")]
        program_id: Option<String>,
    },
}

impl Command {
    /// Builds the filter of a `statistics` invocation.
    pub fn statistics_filter(&self) -> Option<StatisticsFilter> {
        match self {
            Command::Statistics {
                university_id,
                from_year,
                to_year,
                program_id,
            } => Some(StatisticsFilter {
                university_id: university_id.clone(),
                from_year: *from_year,
                to_year: *to_year,
                program_id: program_id.clone(),
            }),
            _ => None,
        }
    }
}
