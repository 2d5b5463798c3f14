//! Configuration layer: typed settings with layered precedence
//! (file → environment → legacy variable → CLI).

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::cache::ChangeKind;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "cache-bridge";
const ENV_PREFIX: &str = "CACHE_BRIDGE";
pub const LEGACY_HOST_ENV: &str = "CACHE_MANAGER_HOST";

/// Command-line arguments for the cache-bridge binary.
#[derive(Debug, Parser)]
#[command(
    name = "cache-bridge",
    version,
    about = "Notify an external cache manager about content changes"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "CACHE_BRIDGE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Dispatch a content change event read from a JSON document.
    Notify(NotifyArgs),
    /// Query the cache manager for the state of a URL.
    Status(StatusArgs),
    /// Load configuration and report whether invalidation is enabled.
    #[command(name = "check-config")]
    CheckConfig,
}

#[derive(Debug, Args, Clone)]
pub struct NotifyArgs {
    /// Kind of change that happened to the content.
    #[arg(value_enum)]
    pub change: ChangeArg,

    /// Event document to read; `-` reads standard input.
    #[arg(
        long = "event-file",
        value_name = "FILE",
        value_hint = ValueHint::FilePath,
        default_value = "-"
    )]
    pub event_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct StatusArgs {
    /// Public URL to look up.
    #[arg(value_name = "URL")]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChangeArg {
    Create,
    Update,
    Delete,
}

impl From<ChangeArg> for ChangeKind {
    fn from(value: ChangeArg) -> Self {
        match value {
            ChangeArg::Create => ChangeKind::Created,
            ChangeArg::Update => ChangeKind::Updated,
            ChangeArg::Delete => ChangeKind::Deleted,
        }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the cache manager base URL.
    #[arg(long = "cache-manager-host", value_name = "URL", global = true)]
    pub cache_manager_host: Option<String>,

    /// Override the per-request timeout towards the cache manager.
    #[arg(long = "request-timeout-seconds", value_name = "SECONDS", global = true)]
    pub request_timeout_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache_manager: CacheManagerSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CacheManagerSettings {
    pub host: Option<Url>,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence.
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_legacy_host(env::var(LEGACY_HOST_ENV).ok());
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    cache_manager: RawCacheManagerSettings,
}

impl RawSettings {
    /// The legacy variable only fills a host no other layer provided.
    fn apply_legacy_host(&mut self, legacy: Option<String>) {
        let has_host = self
            .cache_manager
            .host
            .as_deref()
            .is_some_and(|host| !host.trim().is_empty());
        if !has_host {
            if let Some(host) = legacy {
                self.cache_manager.host = Some(host);
            }
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(host) = overrides.cache_manager_host.as_ref() {
            self.cache_manager.host = Some(host.clone());
        }
        if let Some(seconds) = overrides.request_timeout_seconds {
            self.cache_manager.request_timeout_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            cache_manager,
        } = raw;

        let logging = build_logging_settings(logging)?;
        let cache_manager = build_cache_manager_settings(cache_manager)?;

        Ok(Self {
            logging,
            cache_manager,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_manager_settings(
    cache_manager: RawCacheManagerSettings,
) -> Result<CacheManagerSettings, LoadError> {
    let host = cache_manager
        .host
        .and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .map(|value| parse_host(&value))
        .transpose()
        .map_err(|reason| LoadError::invalid("cache_manager.host", reason))?;

    let request_timeout = match cache_manager.request_timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "cache_manager.request_timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(CacheManagerSettings {
        host,
        request_timeout,
    })
}

fn parse_host(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|err| format!("invalid URL `{value}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{other}` in `{value}`")),
    }
    if url.host_str().is_none() {
        return Err(format!("URL `{value}` has no host"));
    }
    Ok(url)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheManagerSettings {
    host: Option<String>,
    request_timeout_seconds: Option<u64>,
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[cfg(test)]
mod tests;
