//! Command modules for the pipeline CLI.
//!
//! Defines the CLI structure using clap's derive API and organizes
//! subcommands into separate modules for maintainability.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial command structure.

pub mod generate;
pub mod config_cmd;

/// Command-line demonstration harness for the training-step pipeline.
#[derive(clap::Parser)]
#[command(name = "pipeline")]
#[command(about = "Training-step pipeline - turns a transcript into structured training steps", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate training steps from a transcript file
    Generate {
        /// Path to the transcript text file
        transcript_file: std::string::String,

        /// A supporting knowledge URL to fetch; may be passed more than once
        #[arg(long = "url")]
        urls: std::vec::Vec<std::string::String>,

        /// Path to a JSON file overriding PipelineConfig defaults
        #[arg(long)]
        config_file: std::option::Option<std::string::String>,

        /// Write the assembled result as JSON to this path instead of stdout
        #[arg(long)]
        output: std::option::Option<std::string::String>,
    },

    /// Print the default pipeline configuration as JSON
    DefaultConfig,
}
