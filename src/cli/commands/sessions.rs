use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::cli::utils::*;
use crate::cli::{build_client, OutputFormat};
use crate::client::ConfigSession;
use crate::error::FetchError;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "List configuration sessions")]
    List,

    #[command(about = "Show a single configuration session")]
    Show {
        #[arg(help = "Session name")]
        name: String,
    },
}

pub async fn handle(
    cmd: SessionCommands,
    base_url: Option<&str>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = build_client(base_url)?;

    match cmd {
        SessionCommands::List => {
            // Ctrl-C abandons the in-flight request instead of killing the process mid-output
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            let watcher = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let result = client.fetch_sessions_with_cancel(&cancel).await;
            watcher.abort();

            let sessions = result.map_err(with_login_hint)?;

            if sessions.is_empty() {
                return output_empty_collection(&output_format, "sessions", "No configuration sessions found");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({"sessions": sessions}))?);
                }
                OutputFormat::Text => print_session_table(&sessions),
            }

            Ok(())
        }
        SessionCommands::Show { name } => {
            let session = client.fetch_session(&name).await.map_err(with_login_hint)?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({"session": session}))?);
                }
                OutputFormat::Text => {
                    // The service may answer with a single object or a one-element list
                    let first = match &session {
                        serde_json::Value::Array(items) => items.first().cloned(),
                        other => Some(other.clone()),
                    }
                    .with_context(|| format!("Session '{}' not found", name))?;

                    println!("Name:          {}", field_text(&first, &["/name"]));
                    println!("Configuration: {}", field_text(&first, &["/configuration/name"]));
                    println!("Status:        {}", field_text(&first, &["/status/session/status"]));
                    println!("Succeeded:     {}", field_text(&first, &["/status/session/succeeded"]));
                    println!("Started:       {}", field_text(&first, &["/status/session/start_time"]));
                    println!("Completed:     {}", field_text(&first, &["/status/session/completion_time"]));
                }
            }

            Ok(())
        }
    }
}

fn print_session_table(sessions: &[ConfigSession]) {
    println!("{:<40} {:<30} {:<10} {:<10} {}", "NAME", "CONFIGURATION", "STATUS", "SUCCEEDED", "STARTED");
    println!("{}", "-".repeat(110));

    for session in sessions {
        let value = session.as_value();
        println!(
            "{:<40} {:<30} {:<10} {:<10} {}",
            session.name().unwrap_or("-"),
            field_text(value, &["/configuration/name"]),
            field_text(value, &["/status/session/status"]),
            field_text(value, &["/status/session/succeeded"]),
            field_text(value, &["/status/session/start_time"]),
        );
    }
}

fn with_login_hint(err: FetchError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow::Error::new(err).context("Not logged in or token rejected (run `cfs auth login`, and set CFS_ATTACH_BEARER=true)")
    } else {
        anyhow::Error::new(err)
    }
}
