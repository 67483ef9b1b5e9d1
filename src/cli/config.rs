use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cookie::{CookieStore, AUTH_COOKIE_NAME, COOKIE_ENV_VAR};

const COOKIE_JAR_FILE: &str = "cookies.json";

/// Persisted login state, the CLI's stand-in for a browser cookie store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieJar {
    pub authtoken: Option<String>,
    pub username: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl CookieJar {
    pub fn with_token(token: String, username: String) -> Self {
        Self {
            authtoken: Some(token),
            username: Some(username),
            saved_at: Some(Utc::now()),
        }
    }

    /// Render the jar the way a browser would send it: `authtoken=<token>`.
    pub fn cookie_header(&self) -> String {
        match &self.authtoken {
            Some(token) => format!("{}={}", AUTH_COOKIE_NAME, token),
            None => String::new(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = env::var("CFS_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("cfs").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_cookie_jar() -> anyhow::Result<CookieJar> {
    let jar_file = get_config_dir()?.join(COOKIE_JAR_FILE);

    if !jar_file.exists() {
        return Ok(CookieJar::default());
    }

    let content = fs::read_to_string(jar_file)?;
    let jar: CookieJar = serde_json::from_str(&content)?;
    Ok(jar)
}

pub fn save_cookie_jar(jar: &CookieJar) -> anyhow::Result<()> {
    let jar_file = get_config_dir()?.join(COOKIE_JAR_FILE);

    let content = serde_json::to_string_pretty(jar)?;
    fs::write(jar_file, content)?;
    Ok(())
}

pub fn clear_cookie_jar() -> anyhow::Result<bool> {
    let jar_file = get_config_dir()?.join(COOKIE_JAR_FILE);

    if !jar_file.exists() {
        return Ok(false);
    }

    fs::remove_file(jar_file)?;
    Ok(true)
}

/// Cookie store used by the CLI.
///
/// `CFS_COOKIE` wins when set, so a header copied out of a browser can be used
/// as-is; otherwise the persisted jar is read on every call.
#[derive(Debug, Clone, Default)]
pub struct CliCookieStore;

impl CookieStore for CliCookieStore {
    fn cookie_header(&self) -> String {
        if let Ok(header) = env::var(COOKIE_ENV_VAR) {
            return header;
        }

        match load_cookie_jar() {
            Ok(jar) => jar.cookie_header(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cookie jar: {}", e);
                String::new()
            }
        }
    }
}
