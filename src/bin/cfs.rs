use cfs_client::cli::utils::output_error;
use cfs_client::cli::{Cli, OutputFormat};
use cfs_client::FetchError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so CFS_API_BASE_URL and friends can live next to the project
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = cfs_client::cli::run(cli).await {
        let message = match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => format!("{e:?}"),
            _ => format!("{e:#}"),
        };
        let code = e.downcast_ref::<FetchError>().map(FetchError::error_code);

        output_error(&output_format, &message, code)?;
        std::process::exit(1);
    }

    Ok(())
}
