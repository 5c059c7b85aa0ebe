use std::str::FromStr;
use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

/// Lit `key` ; une variable absente ou vide vaut None.
pub(super) fn env_value(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(format!("{key}: {err}"))),
    }
}

pub(super) fn env_from_str<T>(key: &'static str) -> std::result::Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_value(key)?
        .map(|value| {
            value.parse::<T>().map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            })
        })
        .transpose()
}

/// Accepte `1/0`, `true/false`, `yes/no`, `y/n` et `on/off`, sans tenir compte
/// de la casse.
pub(super) fn env_flag(key: &'static str) -> std::result::Result<Option<bool>, ConfigError> {
    let Some(value) = env_value(key)? else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "n" | "off" => Ok(Some(false)),
        other => Err(ConfigError::InvalidField {
            field: key,
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

pub(super) fn env_duration(
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    env_value(key)?
        .map(|value| {
            parse_duration(&value).map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            })
        })
        .transpose()
}
