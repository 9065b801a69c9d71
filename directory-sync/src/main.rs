//! Cosmos directory cache publisher
//!
//! A batch job that harvests network metadata from cosmos.directory, reshapes
//! it into wallet-ready chain records and publishes one JSON document to S3
//! behind CloudFront.
//!
//! ```sh
//! directory-sync init       # Generate a .env template
//! directory-sync build      # Harvest and print the envelope
//! directory-sync publish    # Harvest, upload and invalidate
//! ```

mod aggregate;
mod cmd;
mod config;
mod directory;
mod error;
mod harvest;
mod pipeline;
mod publish;
mod record;
mod telemetry;

use clap::Parser;
use cmd::{Cli, Commands};
use dotenvy::dotenv;

use crate::telemetry::Telemetry;

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    // Load .env before clap resolves `env` defaults.
    dotenv().ok();
    let cli = Cli::parse();

    // Initialize rustls crypto provider (ring)
    rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
        .expect("Failed to initialize rustls crypto provider");

    let telemetry = Telemetry::new()
        .with_name(env!("CARGO_PKG_NAME"))
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_log_level(concat!(env!("CARGO_CRATE_NAME"), "=info,warn"))
        .register();

    let result = match cli.command {
        Commands::Init { output, force } => cmd::init::run(&output, force),
        Commands::Build {
            directories,
            output,
            pretty,
        } => cmd::build::run(&directories, &output, pretty).await,
        Commands::Publish {
            directories,
            target,
        } => cmd::publish::run(&directories, target).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "run failed");
        drop(telemetry);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
