//! Pipeline CLI - command-line demonstration harness for the training-step
//! pipeline.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial CLI structure with clap subcommands.

mod commands;
mod display;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();

    match cli.command {
        commands::Commands::Generate { transcript_file, urls, config_file, output } => {
            commands::generate::execute(&transcript_file, &urls, config_file.as_deref(), output.as_deref()).await?;
        }
        commands::Commands::DefaultConfig => {
            commands::config_cmd::execute().await?;
        }
    }

    std::result::Result::Ok(())
}
