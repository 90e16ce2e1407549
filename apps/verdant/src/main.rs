//! # Verdant - Carbon Credit Platform Server
//!
//! The main binary for the Verdant carbon-credit platform.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based), one endpoint group per view
//! - CLI interface for browsing, reviewing and uploading
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     apps/verdant (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐     │
//! │  │   CLI       │    │   HTTP API  │    │  Config (toml +  │     │
//! │  │  (clap)     │    │   (axum)    │    │  VERDANT_* env)  │     │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘     │
//! │         │                  │                    │               │
//! │         └──────────────────┼────────────────────┘               │
//! │                            ▼                                    │
//! │                    ┌───────────────┐                            │
//! │                    │ verdant-core  │                            │
//! │                    │ (THE LOGIC)   │                            │
//! │                    └───────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! verdant server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! verdant market --category reforestation --sort price
//! verdant review --tab recent
//! verdant upload -n "Mangrove Belt" -l "Kerala" -f site.jpg -f plots.csv
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdant::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing. VERDANT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("VERDANT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "verdant=debug,verdant_core=debug,tower_http=debug"
    } else {
        "verdant=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Verdant startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗   ██╗███████╗██████╗ ██████╗  █████╗ ███╗   ██╗████████╗
  ██║   ██║██╔════╝██╔══██╗██╔══██╗██╔══██╗████╗  ██║╚══██╔══╝
  ██║   ██║█████╗  ██████╔╝██║  ██║███████║██╔██╗ ██║   ██║
  ╚██╗ ██╔╝██╔══╝  ██╔══██╗██║  ██║██╔══██║██║╚██╗██║   ██║
   ╚████╔╝ ███████╗██║  ██║██████╔╝██║  ██║██║ ╚████║   ██║
    ╚═══╝  ╚══════╝╚═╝  ╚═╝╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═══╝   ╚═╝

  Carbon Credit Platform v{}

  Verified Projects • Transparent Trading • Open Review
"#,
        env!("CARGO_PKG_VERSION")
    );
}
