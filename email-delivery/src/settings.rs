use crate::{DeliveryError, Result};
use secrecy::SecretString;

pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const ENV_FROM: &str = "EMAIL_FROM";
pub const ENV_TO: &str = "EMAIL_TO";
pub const ENV_HOST: &str = "SMTP_HOST";
pub const ENV_PORT: &str = "SMTP_PORT";
pub const ENV_USER: &str = "SMTP_USER";
pub const ENV_PASS: &str = "SMTP_PASS";

/// Everything needed to open an authenticated relay session.
///
/// The password is a `SecretString`, so the derived `Debug` prints it redacted.
#[derive(Debug)]
pub struct SmtpSettings {
    pub from: String,
    /// Raw recipient list, possibly comma separated.
    pub to: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl SmtpSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup, e.g. a map in tests.
    ///
    /// Every setting except the port is required and must be non-blank.
    /// The port falls back to 587 when unset or unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(DeliveryError::MissingSetting(key))
        };

        let from = required(ENV_FROM)?;
        let to = required(ENV_TO)?;
        let host = required(ENV_HOST)?;
        let username = required(ENV_USER)?;
        // Passwords may legitimately carry surrounding spaces, only reject empty ones
        let password = lookup(ENV_PASS)
            .filter(|v| !v.is_empty())
            .ok_or(DeliveryError::MissingSetting(ENV_PASS))?;
        let port = parse_port(lookup(ENV_PORT).as_deref());

        Ok(Self {
            from,
            to,
            host,
            port,
            username,
            password: SecretString::from(password),
        })
    }

    pub fn recipients(&self) -> Vec<String> {
        split_recipients(&self.to)
    }
}

/// Parse a port setting, falling back to the submission port.
pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u16>().ok())
        .filter(|p| *p != 0)
        .unwrap_or(DEFAULT_SMTP_PORT)
}

/// Split a comma separated recipient list, trimming and dropping empties.
pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
