pub mod config_check;
pub mod gaps;
pub mod inventory;
pub mod requirements;
pub mod summarize;

use anyhow::{bail, Result};
use clap::Args;

use crate::config::{Config, Provider};
use crate::llm::factory;
use crate::pipeline::RemoteAnnotator;

/// Flags shared by the annotation subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Path to config file (defaults to ./legacylens.toml or ~/.config/legacylens/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Override remote model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Override provider: openai-compatible, azure-openai, ollama
    #[arg(long)]
    pub provider: Option<String>,

    /// Override base URL / endpoint for the remote provider
    #[arg(long)]
    pub base_url: Option<String>,

    /// Character budget per file before truncation
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Comma-separated file-extension allow-list (e.g. "java,cs")
    #[arg(long)]
    pub extensions: Option<String>,

    /// Maximum remote attempts per file
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Skip the remote path entirely; every record uses the local fallback
    #[arg(long)]
    pub offline: bool,

    /// Use a mock completion client (no network)
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_provider(s: &str) -> Result<Provider> {
    match s {
        "openai-compatible" => Ok(Provider::OpenaiCompatible),
        "azure-openai" => Ok(Provider::AzureOpenai),
        "ollama" => Ok(Provider::Ollama),
        unknown => bail!(
            "Unknown provider: {} (expected openai-compatible, azure-openai, or ollama)",
            unknown
        ),
    }
}

/// Load config from disk and apply CLI overrides on top.
pub fn resolve_config(args: &PipelineArgs) -> Result<Config> {
    let mut config = Config::load_with_path(args.config.clone())?;

    if let Some(ref provider) = args.provider {
        config.llm.provider = parse_provider(provider)?;
    }
    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }
    if let Some(ref base_url) = args.base_url {
        config.llm.base_url = Some(base_url.clone());
    }
    if let Some(max_chars) = args.max_chars {
        config.scan.max_chars = max_chars;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.scan.max_attempts = max_attempts;
    }
    if let Some(ref extensions) = args.extensions {
        config.scan.extensions = parse_extensions(extensions);
    }

    Ok(config)
}

pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Build the remote annotator. --offline and a missing credential both
/// yield a client-less annotator that answers every artifact locally.
pub fn build_annotator(config: &Config, args: &PipelineArgs) -> Result<RemoteAnnotator> {
    let client = if args.offline {
        None
    } else {
        factory::create_client(config, args.dry_run)?
    };
    Ok(RemoteAnnotator::new(client).with_max_attempts(config.scan.max_attempts))
}
