use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod llm;
mod pipeline;
mod report;
mod scan;
mod util;

use cli::PipelineArgs;

#[derive(Parser)]
#[command(name = "legacylens", version)]
#[command(about = "Annotate legacy source trees with modernization reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate per-file modernization summaries
    Summarize {
        /// Source root to scan (defaults to current directory)
        #[arg(default_value = ".")]
        source_root: String,

        /// Output markdown file path
        #[arg(short = 'o', long, default_value = "reports/code-summaries.md")]
        output: String,

        /// Report title
        #[arg(long, default_value = "Code Summaries")]
        title: String,

        #[command(flatten)]
        args: PipelineArgs,
    },

    /// Extract functional and non-functional requirements per file
    Requirements {
        /// Source root to scan (defaults to current directory)
        #[arg(default_value = ".")]
        source_root: String,

        /// Entity name for prompt context (e.g., "Policy")
        #[arg(long)]
        entity: String,

        /// Industry name for prompt context (e.g., "Insurance")
        #[arg(long)]
        industry: String,

        /// Output markdown file path
        #[arg(short = 'o', long, default_value = "reports/requirements.md")]
        output: String,

        /// Report title (defaults to "<industry> <entity> Requirements")
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        args: PipelineArgs,
    },

    /// Write the modernization-gap catalog report
    Gaps {
        /// Output markdown file path
        #[arg(short = 'o', long, default_value = "reports/gap-analysis.md")]
        output: String,

        /// Report title
        #[arg(long, default_value = "Gap Analysis")]
        title: String,
    },

    /// Write the system-inventory report
    Inventory {
        /// Output markdown file path
        #[arg(short = 'o', long, default_value = "reports/system-inventory.md")]
        output: String,

        /// Report title
        #[arg(long, default_value = "System Inventory")]
        title: String,
    },

    /// Validate the resolved configuration and credentials
    ConfigCheck {
        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            source_root,
            output,
            title,
            args,
        } => {
            cli::summarize::run(source_root, output, title, args).await?;
        }
        Commands::Requirements {
            source_root,
            entity,
            industry,
            output,
            title,
            args,
        } => {
            cli::requirements::run(source_root, entity, industry, output, title, args).await?;
        }
        Commands::Gaps { output, title } => {
            cli::gaps::run(output, title)?;
        }
        Commands::Inventory { output, title } => {
            cli::inventory::run(output, title)?;
        }
        Commands::ConfigCheck { config } => {
            cli::config_check::run(config)?;
        }
    }

    Ok(())
}
