pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::CfsSessionClient;
use crate::cookie::AuthTokenReader;
use self::config::CliCookieStore;

#[derive(Parser)]
#[command(name = "cfs")]
#[command(about = "CFS CLI - List configuration sessions from the CFS session service")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Service base URL (overrides CFS_API_BASE_URL)")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Configuration session queries")]
    Sessions {
        #[command(subcommand)]
        cmd: commands::sessions::SessionCommands,
    },

    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Show the front-end route table")]
    Routes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Build a session client from the global config, reading tokens from the CLI cookie store.
pub fn build_client(base_url: Option<&str>) -> anyhow::Result<CfsSessionClient> {
    let mut config = crate::config::config().clone();
    if let Some(url) = base_url {
        config.api.base_url = url.to_string();
    }

    tracing::debug!(
        "Using {} (bearer {})",
        config.api.base_url,
        if config.auth.attach_bearer { "on" } else { "off" }
    );

    let client = CfsSessionClient::new(&config)?.with_token_source(AuthTokenReader::new(CliCookieStore));
    Ok(client)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let base_url = cli.base_url.as_deref();

    match cli.command {
        Commands::Sessions { cmd } => commands::sessions::handle(cmd, base_url, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, base_url, output_format).await,
        Commands::Routes => commands::routes::handle(output_format),
    }
}
