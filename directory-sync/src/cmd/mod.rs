//! CLI definitions and command implementations for the directory sync job.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DirectoryArgs, PublishArgs};

pub mod build;
pub mod init;
pub mod publish;

/// Cosmos directory cache publisher. Harvests chain metadata and publishes
/// it as a single JSON document behind a CDN.
#[derive(Debug, Parser)]
#[command(name = "directory-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a `.env` template listing every setting.
    Init {
        /// Output path for the template.
        #[arg(short, long, default_value = ".env")]
        output: PathBuf,

        /// Overwrite the file if it already exists.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Harvest both directories and write the envelope locally.
    Build {
        #[command(flatten)]
        directories: DirectoryArgs,

        /// Output path, or `-` for stdout.
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print the JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// Harvest both directories, upload the envelope and invalidate the CDN.
    Publish {
        #[command(flatten)]
        directories: DirectoryArgs,

        #[command(flatten)]
        target: PublishArgs,
    },
}
