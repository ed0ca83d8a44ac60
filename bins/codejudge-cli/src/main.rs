mod commands;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codejudge-cli")]
#[command(about = "CodeJudge CLI - Run code and get AI reviews through a CodeJudge server", long_about = None)]
struct Cli {
    /// CodeJudge server base URL
    #[arg(long, global = true, env = "CODEJUDGE_SERVER", default_value = "http://localhost:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up and list its endpoints
    Health,

    /// Execute a source file
    Run {
        /// Source file to execute
        #[arg(short, long)]
        file: PathBuf,

        /// Language identifier (inferred from the extension if omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Program input (stdin)
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read program input from a file
        #[arg(long)]
        input_file: Option<PathBuf>,

        /// Print the raw JSON response
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Request an AI code review of a source file
    Review {
        /// Source file to review
        #[arg(short, long)]
        file: PathBuf,

        /// Language identifier (inferred from the extension if omitted)
        #[arg(short, long)]
        language: Option<String>,

        /// Problem statement giving the reviewer context
        #[arg(short, long)]
        problem: Option<String>,

        /// Print the raw JSON response
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            commands::health(&client, &cli.server).await?;
        }
        Commands::Run {
            file,
            language,
            input,
            input_file,
            json,
        } => {
            let stdin = match input_file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read input file {}", path.display()))?,
                None => input.unwrap_or_default(),
            };
            commands::run_file(&client, &cli.server, &file, language.as_deref(), stdin, json)
                .await?;
        }
        Commands::Review {
            file,
            language,
            problem,
            json,
        } => {
            commands::review_file(&client, &cli.server, &file, language.as_deref(), problem, json)
                .await?;
        }
    }

    Ok(())
}
