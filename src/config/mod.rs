//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroUsize, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const LOCAL_CONFIG_BASENAME: &str = "blog-admin";
const ENV_PREFIX: &str = "BLOG_ADMIN";
const APP_DIR: &str = "blog-admin";
const SESSION_FILE_NAME: &str = "session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_BLOGS_PAGE_SIZE: usize = 50;
pub const DEFAULT_COMMENTS_PAGE_SIZE: usize = 20;
pub const DEFAULT_CATEGORIES_PAGE_SIZE: usize = 50;

/// Global flags shared by every `blog-admin` command.
#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "BLOG_ADMIN_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Base URL of the blog API, e.g. <https://blog.example.com>.
    #[arg(long = "api-base", env = "BLOG_ADMIN_API_BASE", value_name = "URL", global = true)]
    pub api_base: Option<String>,

    /// Override the per-request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS", global = true)]
    pub timeout_seconds: Option<u64>,

    /// Override where the session credential is persisted.
    #[arg(
        long = "session-file",
        env = "BLOG_ADMIN_SESSION_FILE",
        value_name = "PATH",
        global = true
    )]
    pub session_file: Option<PathBuf>,

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
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub lists: ListSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ListSettings {
    pub blogs_page_size: NonZeroUsize,
    pub comments_page_size: NonZeroUsize,
    pub categories_page_size: NonZeroUsize,
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

/// Settings for commands that never reach the API, such as `logout`.
#[derive(Debug, Clone)]
pub struct LocalSettings {
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(overrides: &GlobalOverrides) -> Result<Settings, LoadError> {
    Settings::from_raw(load_raw(overrides)?)
}

/// Same layering as [`load`], without requiring an API base URL.
pub fn load_local(overrides: &GlobalOverrides) -> Result<LocalSettings, LoadError> {
    let raw = load_raw(overrides)?;
    Ok(LocalSettings {
        session: build_session_settings(raw.session)?,
        logging: build_logging_settings(raw.logging)?,
    })
}

fn load_raw(overrides: &GlobalOverrides) -> Result<RawSettings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Ok(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    session: RawSessionSettings,
    lists: RawListSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(base) = overrides.api_base.as_ref() {
            self.api.base_url = Some(base.clone());
        }
        if let Some(seconds) = overrides.timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(path) = overrides.session_file.as_ref() {
            self.session.path = Some(path.clone());
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
            api,
            session,
            lists,
            logging,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            session: build_session_settings(session)?,
            lists: build_list_settings(lists)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            LoadError::invalid(
                "api.base_url",
                "API base URL is required (use --api-base or BLOG_ADMIN_API_BASE)",
            )
        })?;
    let base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("`{raw_url}`: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            "scheme must be http or https",
        ));
    }

    let timeout_secs = api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ApiSettings {
        base_url,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_session_settings(session: RawSessionSettings) -> Result<SessionSettings, LoadError> {
    let path = session.path.unwrap_or_else(default_session_path);
    if path.as_os_str().is_empty() {
        return Err(LoadError::invalid("session.path", "path must not be empty"));
    }
    Ok(SessionSettings { path })
}

fn build_list_settings(lists: RawListSettings) -> Result<ListSettings, LoadError> {
    Ok(ListSettings {
        blogs_page_size: non_zero_usize(
            lists.blogs_page_size.unwrap_or(DEFAULT_BLOGS_PAGE_SIZE),
            "lists.blogs_page_size",
        )?,
        comments_page_size: non_zero_usize(
            lists.comments_page_size.unwrap_or(DEFAULT_COMMENTS_PAGE_SIZE),
            "lists.comments_page_size",
        )?,
        categories_page_size: non_zero_usize(
            lists
                .categories_page_size
                .unwrap_or(DEFAULT_CATEGORIES_PAGE_SIZE),
            "lists.categories_page_size",
        )?,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawListSettings {
    blogs_page_size: Option<usize>,
    comments_page_size: Option<usize>,
    categories_page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SESSION_FILE_NAME)
}

fn non_zero_usize(value: usize, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    NonZeroUsize::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
