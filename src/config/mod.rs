use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::error::Error as ToastError;
use crate::request::ToastRequest;
use crate::toaster::TraySettings;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "traytoast.toml";

const CLASS_PREFIX_LEN: RangeInclusive<usize> = 1..=200;

#[derive(Debug, Clone)]
pub struct Config {
    pub toast: ToastDefaults,
    pub tray: TraySettings,
}

/// Values used for a toast when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastDefaults {
    pub title: String,
    pub message: String,
    pub icon: Option<PathBuf>,
    /// `None` keeps toasts until dismissed.
    pub duration: Option<Duration>,
    pub background: bool,
}

impl Config {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Sources, lowest precedence first: built-in defaults, the file at
    /// `path` (skipped when absent), `TRAYTOAST__SECTION__KEY` variables,
    /// then the `TOAST_*` shortcuts.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when an environment
    /// override is malformed, or when the resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toast: ToastDefaults::default(),
            tray: TraySettings::default(),
        }
    }
}

impl ToastDefaults {
    /// Request carrying these defaults and no click callback.
    #[must_use]
    pub fn to_request(&self) -> ToastRequest {
        let mut request = ToastRequest::new(self.title.clone(), self.message.clone())
            .duration(self.duration);
        request.icon_path.clone_from(&self.icon);
        request
    }
}

impl Default for ToastDefaults {
    fn default() -> Self {
        let request = ToastRequest::default();
        Self {
            title: request.title,
            message: request.message,
            icon: request.icon_path,
            duration: request.duration,
            background: false,
        }
    }
}
