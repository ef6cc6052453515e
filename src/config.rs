use std::env;
use std::time::Duration;

use chrono::NaiveTime;

use crate::bccr;
use crate::error::{Error, Result};
use crate::rates::RateMode;

/// Runtime configuration, read from the environment (a `.env` file is
/// loaded by `main` before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bccr_endpoint: String,
    /// `tcNombre` the web service expects from registered consumers.
    pub requester: String,
    pub currency: String,
    pub http_timeout: Duration,
    pub bind_address: String,
    /// Daily UTC trigger for the inverted-mode job, unset = disabled.
    pub schedule_inverted: Option<NaiveTime>,
    /// Daily UTC trigger for the direct-mode job, unset = disabled.
    pub schedule_direct: Option<NaiveTime>,
    /// Run one update immediately and exit instead of starting the daemon.
    pub run_once: Option<RateMode>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            bccr_endpoint: env::var("BCCR_ENDPOINT")
                .unwrap_or_else(|_| bccr::DEFAULT_ENDPOINT.to_string()),
            requester: require("BCCR_REQUESTER")?,
            currency: env::var("RATE_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
            http_timeout: Duration::from_secs(
                optional("HTTP_TIMEOUT_SECS", parse_secs)?.unwrap_or(30),
            ),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            schedule_inverted: optional("SCHEDULE_INVERTED", parse_schedule)?,
            schedule_direct: optional("SCHEDULE_DIRECT", parse_schedule)?,
            run_once: optional("RUN_ONCE", parse_mode)?,
        })
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key).map_err(|_| Error::Config(format!("{key} is not set")))
}

fn optional<T>(
    key: &str,
    parse: fn(&str) -> std::result::Result<T, String>,
) -> Result<Option<T>> {
    match env::var(key) {
        Ok(value) => parse(&value)
            .map(Some)
            .map_err(|msg| Error::Config(format!("{key}: {msg}"))),
        Err(_) => Ok(None),
    }
}

fn parse_secs(value: &str) -> std::result::Result<u64, String> {
    value
        .parse()
        .map_err(|_| format!("expected seconds, got {value:?}"))
}

fn parse_schedule(value: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| format!("expected HH:MM, got {value:?}"))
}

fn parse_mode(value: &str) -> std::result::Result<RateMode, String> {
    match value {
        "inverted" => Ok(RateMode::Inverted),
        "direct" => Ok(RateMode::Direct),
        other => Err(format!("expected \"inverted\" or \"direct\", got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_daily_schedule() {
        assert_eq!(
            parse_schedule("06:30").unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert!(parse_schedule("6h30").is_err());
        assert!(parse_schedule("25:00").is_err());
    }

    #[test]
    fn parses_the_run_once_mode() {
        assert_eq!(parse_mode("inverted").unwrap(), RateMode::Inverted);
        assert_eq!(parse_mode("direct").unwrap(), RateMode::Direct);
        assert!(parse_mode("both").is_err());
    }

    #[test]
    fn parses_the_timeout() {
        assert_eq!(parse_secs("45").unwrap(), 45);
        assert!(parse_secs("soon").is_err());
    }
}
