use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

/// Source des variables de surcharge.
pub(super) trait EnvSource {
    fn var(&self, key: &'static str) -> std::result::Result<Option<String>, ConfigError>;
}

/// L'environnement du processus.
pub(super) struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            }),
        }
    }
}

impl EnvSource for HashMap<&'static str, String> {
    fn var(&self, key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
        Ok(self.get(key).cloned())
    }
}

/// Valeur de `key` rognée, ignorée si vide.
fn present(
    env: &impl EnvSource,
    key: &'static str,
) -> std::result::Result<Option<String>, ConfigError> {
    Ok(env
        .var(key)?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Valeur brute de `key`, les titres et messages gardent leurs espaces.
pub(super) fn env_string(
    env: &impl EnvSource,
    key: &'static str,
) -> std::result::Result<Option<String>, ConfigError> {
    env.var(key)
}

pub(super) fn env_path(
    env: &impl EnvSource,
    key: &'static str,
) -> std::result::Result<Option<PathBuf>, ConfigError> {
    Ok(present(env, key)?.map(PathBuf::from))
}

pub(super) fn env_bool(
    env: &impl EnvSource,
    key: &'static str,
) -> std::result::Result<Option<bool>, ConfigError> {
    let Some(value) = present(env, key)? else {
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
    env: &impl EnvSource,
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    present(env, key)?
        .map(|value| {
            parse_duration(&value).map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            })
        })
        .transpose()
}
