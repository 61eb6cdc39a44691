use crate::services::url_codec::CodecMode;
use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub url_codec: CodecMode,
    pub rng_seed: Option<u64>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "File-hosting naming, addressing and identity service")]
pub struct Args {
    /// Host to bind to (overrides TURTL_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides TURTL_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides TURTL_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Public URL parser (overrides TURTL_URL_CODEC)
    #[arg(long, value_enum)]
    pub url_codec: Option<CodecMode>,

    /// Fixed seed for name and key generation (overrides TURTL_RNG_SEED)
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::merge(args, |key| env::var(key))?, migrate))
    }

    /// Merge CLI args over values read through `var`, falling back to defaults.
    pub fn merge<F>(args: Args, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        // --- Environment fallback ---
        let env_host = var("TURTL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match var("TURTL_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing TURTL_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading TURTL_PORT"),
        };
        let env_db =
            var("TURTL_DATABASE_URL").unwrap_or_else(|_| "sqlite://./data/meta/turtl.db".into());
        let env_codec = match var("TURTL_URL_CODEC") {
            Ok(value) => CodecMode::from_str(&value, true)
                .map_err(|err| anyhow!("parsing TURTL_URL_CODEC value `{}`: {}", value, err))?,
            Err(env::VarError::NotPresent) => CodecMode::default(),
            Err(err) => return Err(err).context("reading TURTL_URL_CODEC"),
        };
        let env_seed = match var("TURTL_RNG_SEED") {
            Ok(value) => Some(
                value
                    .parse::<u64>()
                    .with_context(|| format!("parsing TURTL_RNG_SEED value `{}`", value))?,
            ),
            Err(env::VarError::NotPresent) => None,
            Err(err) => return Err(err).context("reading TURTL_RNG_SEED"),
        };

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            url_codec: args.url_codec.unwrap_or(env_codec),
            rng_seed: args.rng_seed.or(env_seed),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
