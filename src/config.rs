use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// How repeated cycle failures are reported to the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionPolicy {
    /// Only the first failure of a streak is sent, whatever comes after it.
    #[default]
    Streak,
    /// A failure is sent again when its kind differs from the previous one.
    PerKind,
}

impl SuppressionPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "streak" => Some(Self::Streak),
            "per-kind" | "per_kind" => Some(Self::PerKind),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_period: Duration,
    pub http_timeout: Duration,
    pub lookback_secs: i64,
    pub suppression: SuppressionPolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("http_timeout", &self.http_timeout)
            .field("lookback_secs", &self.lookback_secs)
            .field("suppression", &self.suppression)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Required
    /// credentials are checked before anything else is parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        check_tokens(&present)?;

        let required = |name: &'static str| present(name).ok_or(ConfigError::MissingVariable(name));
        let practicum_token = required("PRACTICUM_TOKEN")?;
        let telegram_token = required("TELEGRAM_TOKEN")?;
        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?;

        let endpoint = present("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let telegram_api_url = present("TELEGRAM_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());

        let retry_secs = parse_secs(&present, "RETRY_PERIOD_SECS", DEFAULT_RETRY_PERIOD_SECS)?;
        if retry_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "RETRY_PERIOD_SECS",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        let timeout_secs = parse_secs(&present, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let lookback_secs = parse_secs(&present, "FROM_DATE_LOOKBACK_SECS", 0)?;

        let suppression = match present("SUPPRESSION_POLICY") {
            None => SuppressionPolicy::default(),
            Some(value) => SuppressionPolicy::parse(&value).ok_or_else(|| ConfigError::Invalid {
                name: "SUPPRESSION_POLICY",
                value,
                reason: "expected `streak` or `per-kind`".to_string(),
            })?,
        };

        Ok(Config {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint,
            telegram_api_url,
            retry_period: Duration::from_secs(retry_secs),
            http_timeout: Duration::from_secs(timeout_secs),
            lookback_secs: i64::try_from(lookback_secs).map_err(|err| ConfigError::Invalid {
                name: "FROM_DATE_LOOKBACK_SECS",
                value: lookback_secs.to_string(),
                reason: err.to_string(),
            })?,
            suppression,
        })
    }
}

/// Logs every missing credential, then fails on the first one.
fn check_tokens<F>(present: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&'static str> = REQUIRED_VARS
        .into_iter()
        .filter(|name| present(*name).is_none())
        .collect();

    for name in &missing {
        tracing::error!(
            severity = "critical",
            variable = *name,
            "Missing required environment variable {}",
            name
        );
    }

    match missing.first() {
        Some(name) => Err(ConfigError::MissingVariable(*name)),
        None => {
            tracing::info!("All required environment variables are set");
            Ok(())
        }
    }
}

fn parse_secs<F>(present: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match present(name) {
        None => Ok(default),
        Some(value) => value.trim().parse::<u64>().map_err(|err| ConfigError::Invalid {
            name,
            reason: err.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::test_support::CapturedLogs;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const CREDENTIALS: [(&str, &str); 3] = [
        ("PRACTICUM_TOKEN", "practicum"),
        ("TELEGRAM_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "42"),
    ];

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        assert_eq!(config.practicum_token, "practicum");
        assert_eq!(config.telegram_chat_id, "42");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.retry_period, Duration::from_secs(600));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.lookback_secs, 0);
        assert_eq!(config.suppression, SuppressionPolicy::Streak);
    }

    #[test]
    fn missing_credential_is_named() {
        let err = Config::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "practicum"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable("TELEGRAM_TOKEN"));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "   "),
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable("PRACTICUM_TOKEN"));
    }

    #[test]
    fn each_missing_credential_is_logged_as_critical() {
        let logs = CapturedLogs::default();
        let result = tracing::subscriber::with_default(logs.subscriber(), || {
            Config::from_lookup(lookup(&[("TELEGRAM_TOKEN", "123:abc")]))
        });
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingVariable("PRACTICUM_TOKEN")
        );

        let critical: Vec<String> = logs
            .lines()
            .into_iter()
            .filter(|line| line.contains(r#"severity="critical""#))
            .collect();
        assert_eq!(critical.len(), 2, "got {critical:?}");
        assert!(critical[0].contains(r#"variable="PRACTICUM_TOKEN""#));
        assert!(critical[1].contains(r#"variable="TELEGRAM_CHAT_ID""#));
        assert!(critical.iter().all(|line| line.contains("ERROR")));
    }

    #[test]
    fn first_missing_credential_wins() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable("PRACTICUM_TOKEN"));
    }

    #[test]
    fn optional_settings_are_parsed() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.extend([
            ("RETRY_PERIOD_SECS", "60"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("FROM_DATE_LOOKBACK_SECS", "2678400"),
            ("SUPPRESSION_POLICY", "per-kind"),
            ("TELEGRAM_API_URL", "http://localhost:8081/"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.retry_period, Duration::from_secs(60));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.lookback_secs, 2_678_400);
        assert_eq!(config.suppression, SuppressionPolicy::PerKind);
        assert_eq!(config.telegram_api_url, "http://localhost:8081");
    }

    #[test]
    fn invalid_optional_settings_are_rejected() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("RETRY_PERIOD_SECS", "ten minutes"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "RETRY_PERIOD_SECS", .. }));

        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("RETRY_PERIOD_SECS", "0"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("SUPPRESSION_POLICY", "never"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SUPPRESSION_POLICY", .. }));
    }

    #[test]
    fn debug_output_hides_tokens() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("practicum\""));
        assert!(!debug.contains("123:abc"));
        assert!(debug.contains("<redacted>"));
    }
}
