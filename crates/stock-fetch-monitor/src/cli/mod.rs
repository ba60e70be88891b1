/*
[INPUT]:  Command-line arguments
[OUTPUT]: Parsed CLI commands and query parameters
[POS]:    CLI layer - argument definitions
[UPDATE]: When adding subcommands or flags
*/

pub mod commands;
pub mod init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use stock_fetch_monitor::params::{QueryParams, ValidationError, parse_date};

#[derive(Parser, Debug)]
#[command(name = "stock-fetch", version, about = "Submit and follow bulk stock-data fetch tasks")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_path: Option<PathBuf>,
    /// Override the configured service URL
    #[arg(long, value_name = "URL", global = true)]
    pub server: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a fetch task and follow its progress until it ends
    Query(QueryArgs),
    /// Show the service's current task
    Status,
    /// Manage the data-source token
    #[command(subcommand)]
    Token(TokenCommand),
    /// Manage generated files
    #[command(subcommand)]
    Files(FilesCommand),
    /// Write a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Stock codes separated by commas or spaces, e.g. "600519,000001"
    #[arg(long, required = true, num_args = 1..)]
    pub codes: Vec<String>,
    /// First trading day, YYYYMMDD or YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,
    /// Look-back years used when no start date is given
    #[arg(long)]
    pub years: Option<u32>,
}

impl QueryArgs {
    pub fn to_params(&self, default_years: u32) -> Result<QueryParams, ValidationError> {
        Ok(QueryParams {
            codes: QueryParams::parse_codes(&self.codes.join(","))?,
            start_date: self.start.as_deref().map(parse_date).transpose()?,
            end_date: self.end.as_deref().map(parse_date).transpose()?,
            years: self.years.unwrap_or(default_years),
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Show whether a token is configured
    Show,
    /// Store a new token on the service
    Set { token: String },
}

#[derive(Subcommand, Debug)]
pub enum FilesCommand {
    List,
    Delete {
        path: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Download {
        path: String,
        /// Target directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },
}
