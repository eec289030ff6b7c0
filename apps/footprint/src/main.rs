//! # Footprint
//!
//! Measures the object footprint of JSON documents: how many objects,
//! references and primitives the document becomes once loaded as an object
//! graph.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              apps/footprint (THE BINARY)         │
//! │                                                  │
//! │  ┌─────────┐    ┌──────────┐    ┌────────────┐   │
//! │  │  CLI    │───►│  config  │    │   loader   │   │
//! │  │ (clap)  │    │  (toml)  │    │   (json)   │   │
//! │  └────┬────┘    └──────────┘    └─────┬──────┘   │
//! │       │                               │          │
//! │       └───────────────┬───────────────┘          │
//! │                       ▼                          │
//! │              ┌─────────────────┐                 │
//! │              │ footprint-core  │                 │
//! │              │  (THE ENGINE)   │                 │
//! │              └─────────────────┘                 │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! footprint measure -f data.json
//! footprint measure -f data.json --skip-type 'char[]' --json-mode
//! footprint trace -f data.json --limit 20
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // FOOTPRINT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FOOTPRINT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "footprint=debug"
    } else {
        "footprint=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so stdout stays clean for results.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
