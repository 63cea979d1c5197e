use std::str::FromStr;

use anyhow::{bail, Context};
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: PgConnectOptions,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key→value source.
    ///
    /// `DATABASE_URL` wins when set; otherwise the connection is assembled
    /// from `DB_USERNAME`, `DB_PASSWORD`, `DB_NAME`, `DB_HOST` and `DB_PORT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database = match lookup("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url).context("DATABASE_URL is not a valid connection string")?,
            None => database_from_settings(&lookup)?,
        };

        Ok(Self {
            database,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }
}

// Credentials are passed as fields, never spliced into a URL
fn database_from_settings(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<PgConnectOptions> {
    let (Some(user), Some(password), Some(name)) =
        (lookup("DB_USERNAME"), lookup("DB_PASSWORD"), lookup("DB_NAME"))
    else {
        bail!("DATABASE_URL or DB_USERNAME, DB_PASSWORD and DB_NAME must be set");
    };

    let mut options = PgConnectOptions::new()
        .host(&lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()))
        .username(&user)
        .password(&password)
        .database(&name);
    if let Some(port) = lookup("DB_PORT") {
        options = options.port(port.parse().context("DB_PORT must be a valid number")?);
    }

    Ok(options)
}
