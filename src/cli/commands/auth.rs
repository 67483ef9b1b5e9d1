use std::env;
use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::{build_client, OutputFormat};
use crate::cookie::{AuthTokenReader, TokenSource, COOKIE_ENV_VAR};
use crate::token;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the session service and store the token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information from the token")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    base_url: Option<&str>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };

            let client = build_client(base_url)?;
            let token = client.authenticate(&username, &password).await?;
            if token.is_empty() {
                anyhow::bail!("Service returned an empty token for '{}'", username);
            }

            save_cookie_jar(&CookieJar::with_token(token, username.clone()))?;

            if env::var(COOKIE_ENV_VAR).is_ok() {
                tracing::warn!("{} is set and takes precedence over the stored token", COOKIE_ENV_VAR);
            }

            output_success(
                &output_format,
                &format!("Logged in as '{}'", username),
                Some(json!({ "username": username })),
            )
        }
        AuthCommands::Logout => {
            let message = if clear_cookie_jar()? {
                "Logged out"
            } else {
                "No stored login to remove"
            };
            output_success(&output_format, message, None)
        }
        AuthCommands::Status => {
            let jar = load_cookie_jar()?;
            let token = AuthTokenReader::new(CliCookieStore).token();
            let source = if env::var(COOKIE_ENV_VAR).is_ok() {
                Some(COOKIE_ENV_VAR)
            } else if jar.authtoken.is_some() {
                Some("cookie jar")
            } else {
                None
            };
            let attach_bearer = crate::config::config().auth.attach_bearer;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "authenticated": token.is_some(),
                        "source": source,
                        "username": jar.username,
                        "saved_at": jar.saved_at,
                        "attach_bearer": attach_bearer,
                    }))?);
                }
                OutputFormat::Text => {
                    match (&token, source) {
                        (Some(_), Some(source)) => println!("Token present (from {})", source),
                        _ => println!("No auth token"),
                    }
                    if let Some(username) = &jar.username {
                        println!("User: {}", username);
                    }
                    if let Some(saved_at) = jar.saved_at {
                        println!("Saved: {}", saved_at.format("%Y-%m-%d %H:%M"));
                    }
                    println!("Bearer header: {}", if attach_bearer { "attached" } else { "not attached" });
                }
            }

            Ok(())
        }
        AuthCommands::Whoami => {
            let token = match AuthTokenReader::new(CliCookieStore).token() {
                Some(token) => token,
                None => anyhow::bail!("No auth token found (run `cfs auth login`)"),
            };

            let claims = token::claims(&token)?;
            let name = token::display_name(&claims).unwrap_or("unknown");
            let roles = token::realm_roles(&claims);

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "name": name,
                        "roles": roles,
                        "claims": claims,
                    }))?);
                }
                OutputFormat::Text => {
                    println!("Hello {}!", name);
                    if !roles.is_empty() {
                        println!("Roles: {}", roles.join(", "));
                    }
                }
            }

            Ok(())
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
