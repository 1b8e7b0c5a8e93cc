use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::confirm::{BrokerConfig, DEFAULT_EXIT_DELAY, DEFAULT_SAFETY_TIMEOUT};
use crate::error::ConsoleError;

const TIMEOUT_ENV: &str = "IMPACT_TUI_CONFIRM_TIMEOUT_SECS";
const LOG_ENV: &str = "IMPACT_TUI_LOG";
const LOG_LEVEL_ENV: &str = "IMPACT_TUI_LOG_LEVEL";
const KEY_DEBUG_ENV: &str = "IMPACT_TUI_KEY_DEBUG";
const MAX_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub records_path: Option<PathBuf>,
    pub safety_timeout: Duration,
    pub log_path: Option<PathBuf>,
    pub log_level: String,
    pub key_debug: bool,
    /// Problems found before logging exists; reported once it does.
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            records_path: None,
            safety_timeout: DEFAULT_SAFETY_TIMEOUT,
            log_path: None,
            log_level: "info".to_string(),
            key_debug: false,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env_and_args() -> Result<Self, ConsoleError> {
        Self::from_sources(env::args().skip(1), |key| env::var(key).ok())
    }

    pub fn from_sources(
        args: impl IntoIterator<Item = impl AsRef<str>>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConsoleError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match parse_timeout_secs(&raw) {
                Some(timeout) => config.safety_timeout = timeout,
                None => config.warnings.push(format!(
                    "{TIMEOUT_ENV}={raw:?} is not a number of seconds in 1..={MAX_TIMEOUT_SECS}; using {}s",
                    DEFAULT_SAFETY_TIMEOUT.as_secs()
                )),
            }
        }
        config.log_path = lookup(LOG_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        config.key_debug = lookup(KEY_DEBUG_ENV)
            .as_deref()
            .and_then(parse_bool_like)
            .unwrap_or(false);

        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .peekable();
        while let Some(arg) = args.next() {
            if let Some(value) = arg.strip_prefix("--records=") {
                config.records_path = Some(PathBuf::from(value));
                continue;
            }
            if let Some(value) = arg.strip_prefix("--confirm-timeout=") {
                config.safety_timeout = cli_timeout(value)?;
                continue;
            }
            match arg.as_str() {
                "--records" => {
                    let value = next_value(&mut args, "--records")?;
                    config.records_path = Some(PathBuf::from(value));
                }
                "--confirm-timeout" => {
                    let value = next_value(&mut args, "--confirm-timeout")?;
                    config.safety_timeout = cli_timeout(&value)?;
                }
                _ => config.warnings.push(format!("ignoring unknown argument {arg:?}")),
            }
        }

        Ok(config)
    }

    pub fn broker_config(&self) -> BrokerConfig {
        BrokerConfig {
            safety_timeout: self.safety_timeout,
            exit_delay: DEFAULT_EXIT_DELAY,
        }
    }
}

fn next_value(
    args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
    flag: &'static str,
) -> Result<String, ConsoleError> {
    match args.peek() {
        Some(next) if !next.starts_with("--") => Ok(args.next().unwrap_or_default()),
        _ => Err(ConsoleError::MissingArgument(flag)),
    }
}

fn cli_timeout(value: &str) -> Result<Duration, ConsoleError> {
    parse_timeout_secs(value).ok_or_else(|| ConsoleError::InvalidArgument {
        flag: "--confirm-timeout",
        value: value.to_string(),
    })
}

fn parse_timeout_secs(value: &str) -> Option<Duration> {
    let secs = value.trim().parse::<u64>().ok()?;
    (1..=MAX_TIMEOUT_SECS)
        .contains(&secs)
        .then(|| Duration::from_secs(secs))
}

fn parse_bool_like(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
