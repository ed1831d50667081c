use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

use crate::error::ConfigError;

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub smtp_host: String,
    pub email_user: String,
    pub email_pass: String,
    pub email_to: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", "5000")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            smtp_host: try_load("SMTP_HOST", "smtp.gmail.com")?,
            email_user: require("EMAIL_USER")?,
            email_pass: var("EMAIL_PASS").or_else(|_| read_secret("EMAIL_PASS"))?,
            email_to: require("EMAIL_TO")?,
        })
    }
}

fn var(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    var(key).inspect_err(|_| warn!("Environment variable {key} not found"))
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse(key, var(key).ok(), default)
}

fn parse<T: FromStr>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}

fn read_secret(secret_name: &'static str) -> Result<String, ConfigError> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");

            ConfigError::Missing(secret_name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_to_default() {
        let port: u16 = parse("PORT", None, "5000").unwrap();

        assert_eq!(port, 5000);
    }

    #[test]
    fn explicit_port_wins() {
        let port: u16 = parse("PORT", Some("8080".into()), "5000").unwrap();

        assert_eq!(port, 8080);
    }

    #[test]
    fn unparsable_port_is_rejected() {
        let result: Result<u16, _> = parse("PORT", Some("eighty".into()), "5000");

        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }
}
