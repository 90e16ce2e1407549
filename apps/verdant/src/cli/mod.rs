//! # Verdant CLI Module
//!
//! This module implements the CLI interface for Verdant. Each invocation
//! works on a fresh session over the sample store.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `routes` - Show views and their endpoints
//! - `dashboard` - Show dashboard projects and totals
//! - `market` - List marketplace credits with a filter and sort
//! - `credit` - Show one marketplace listing
//! - `review` - Show the authority panel
//! - `approve` / `reject` - Decide a pending submission
//! - `balance` - Show the credit balance
//! - `upload` - Run the upload wizard end to end

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use verdant_core::LedgerError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Verdant - carbon-credit platform
///
/// Browse verified projects and marketplace listings, review submissions,
/// and walk through the project upload wizard.
#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show views and the endpoints serving them
    Routes,

    /// Show dashboard projects and totals
    Dashboard {
        /// Open one project's details
        #[arg(long)]
        project: Option<u64>,
    },

    /// List marketplace credits
    Market {
        /// Category to show ("all" for every category)
        #[arg(short = 'C', long, default_value = "all")]
        category: String,

        /// Sort key (price, co2Amount, rating)
        #[arg(short, long, default_value = "price")]
        sort: String,
    },

    /// Show one marketplace listing
    Credit {
        /// Listing id
        id: u64,
    },

    /// Show the authority review panel
    Review {
        /// Tab to show (pending, recent)
        #[arg(short, long, default_value = "pending")]
        tab: String,
    },

    /// Approve a pending submission
    Approve {
        /// Submission id
        id: u64,
    },

    /// Reject a pending submission
    Reject {
        /// Submission id
        id: u64,
    },

    /// Show the credit balance
    Balance {
        /// History timeframe (week, month, year)
        #[arg(short, long, default_value = "month")]
        timeframe: String,
    },

    /// Run the upload wizard with the given form and files
    Upload {
        /// Project name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Project location
        #[arg(short, long, default_value = "")]
        location: String,

        /// Project category
        #[arg(short = 'C', long, default_value = "reforestation")]
        category: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Expected CO2 reduction in tons
        #[arg(long)]
        expected_co2: Option<String>,

        /// Project area in hectares
        #[arg(long)]
        area: Option<String>,

        /// Project description
        #[arg(short, long)]
        description: Option<String>,

        /// Files to attach (repeatable)
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LedgerError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::Routes) => cmd_routes(json_mode),
        Some(Commands::Dashboard { project }) => cmd_dashboard(&config, json_mode, project),
        Some(Commands::Market { category, sort }) => {
            cmd_market(&config, json_mode, &category, &sort)
        }
        Some(Commands::Credit { id }) => cmd_credit(&config, json_mode, id),
        Some(Commands::Review { tab }) => cmd_review(&config, json_mode, &tab),
        Some(Commands::Approve { id }) => {
            cmd_decide(&config, json_mode, id, verdant_core::Verdict::Approved)
        }
        Some(Commands::Reject { id }) => {
            cmd_decide(&config, json_mode, id, verdant_core::Verdict::Rejected)
        }
        Some(Commands::Balance { timeframe }) => cmd_balance(&config, json_mode, &timeframe),
        Some(Commands::Upload {
            name,
            location,
            category,
            start_date,
            end_date,
            expected_co2,
            area,
            description,
            files,
        }) => {
            let form = UploadForm {
                name,
                location,
                category,
                start_date,
                end_date,
                expected_co2,
                area,
                description,
            };
            cmd_upload(&config, json_mode, &form, &files).await
        }
        None => {
            // No subcommand - show the route table by default
            cmd_routes(json_mode)
        }
    }
}
