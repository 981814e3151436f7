use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Native(#[from] NativeError),
    #[error(transparent)]
    Icon(#[from] IconError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Failure of a single native shell call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NativeError {
    #[error("{call} failed: {message}")]
    Call {
        call: &'static str,
        message: String,
    },
    #[error("native tray notifications are not supported on this platform")]
    Unsupported,
}

impl NativeError {
    pub fn call(call: &'static str, message: impl ToString) -> Self {
        Self::Call {
            call,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon file {path} is not accessible")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "convert")]
    #[error("failed to convert {path} to an icon")]
    Convert {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Native(#[from] NativeError),
}
