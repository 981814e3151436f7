use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::icon::IconSettings;
use crate::toaster::TraySettings;

use super::defaults::{
    default_balloon_timeout, default_class_prefix, default_duration, default_message,
    default_title, default_tooltip, default_window_title,
};
use super::env::{EnvSource, ProcessEnv, env_bool, env_duration, env_path, env_string};
use super::{CLASS_PREFIX_LEN, Config, HumantimeDuration, ToastDefaults};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("TRAYTOAST")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toast: RawToast,
    #[serde(default)]
    pub(super) tray: RawTray,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawToast {
    #[serde(default = "default_title")]
    pub(super) title: String,
    #[serde(default = "default_message")]
    pub(super) message: String,
    #[serde(default)]
    pub(super) icon: Option<PathBuf>,
    #[serde(default = "default_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) duration: Duration,
    #[serde(default)]
    pub(super) persist: bool,
    #[serde(default)]
    pub(super) background: bool,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawTray {
    #[serde(default = "default_tooltip")]
    pub(super) tooltip: String,
    #[serde(default = "default_window_title")]
    pub(super) window_title: String,
    #[serde(default = "default_class_prefix")]
    pub(super) class_prefix: String,
    #[serde(default = "default_balloon_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) balloon_timeout: Duration,
    #[serde(default)]
    pub(super) default_icon: Option<PathBuf>,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        self.apply_overrides_from(&ProcessEnv)
    }

    pub(super) fn apply_overrides_from(
        &mut self,
        env: &impl EnvSource,
    ) -> std::result::Result<(), ConfigError> {
        if let Some(title) = env_string(env, "TOAST_TITLE")? {
            self.toast.title = title;
        }
        if let Some(message) = env_string(env, "TOAST_MESSAGE")? {
            self.toast.message = message;
        }
        if let Some(icon) = env_path(env, "TOAST_ICON")? {
            self.toast.icon = Some(icon);
        }
        if let Some(duration) = env_duration(env, "TOAST_DURATION")? {
            self.toast.duration = duration;
        }
        if let Some(persist) = env_bool(env, "TOAST_PERSIST")? {
            self.toast.persist = persist;
        }
        if let Some(background) = env_bool(env, "TOAST_BACKGROUND")? {
            self.toast.background = background;
        }
        if let Some(tooltip) = env_string(env, "TOAST_TOOLTIP")? {
            self.tray.tooltip = tooltip;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let prefix = self.tray.class_prefix.trim();
        if !CLASS_PREFIX_LEN.contains(&prefix.len()) {
            return Err(ConfigError::InvalidField {
                field: "tray.class_prefix",
                message: format!(
                    "expected between {} and {} characters, got {}",
                    CLASS_PREFIX_LEN.start(),
                    CLASS_PREFIX_LEN.end(),
                    prefix.len()
                ),
            }
            .into());
        }
        if let Some(bad) = prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_')))
        {
            return Err(ConfigError::InvalidField {
                field: "tray.class_prefix",
                message: format!("character {bad:?} is not allowed in a window class name"),
            }
            .into());
        }
        if self.tray.tooltip.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "tray.tooltip",
                message: "tooltip cannot be empty".to_string(),
            }
            .into());
        }
        if u32::try_from(self.tray.balloon_timeout.as_millis()).is_err() {
            return Err(ConfigError::InvalidField {
                field: "tray.balloon_timeout",
                message: "balloon timeout must fit in 32-bit milliseconds".to_string(),
            }
            .into());
        }

        Ok(Config {
            toast: ToastDefaults {
                title: self.toast.title,
                message: self.toast.message,
                icon: self.toast.icon,
                duration: (!self.toast.persist).then_some(self.toast.duration),
                background: self.toast.background,
            },
            tray: TraySettings {
                tooltip: self.tray.tooltip,
                window_title: self.tray.window_title,
                class_prefix: prefix.to_string(),
                balloon_timeout: self.tray.balloon_timeout,
                icon: IconSettings {
                    default_icon: self.tray.default_icon,
                },
            },
        })
    }
}

impl Default for RawToast {
    fn default() -> Self {
        Self {
            title: default_title(),
            message: default_message(),
            icon: None,
            duration: default_duration(),
            persist: false,
            background: false,
        }
    }
}

impl Default for RawTray {
    fn default() -> Self {
        Self {
            tooltip: default_tooltip(),
            window_title: default_window_title(),
            class_prefix: default_class_prefix(),
            balloon_timeout: default_balloon_timeout(),
            default_icon: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RawConfig, load};
    use crate::error::{ConfigError, Error};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn raw(json: &str) -> RawConfig {
        match serde_json::from_str(json) {
            Ok(raw) => raw,
            Err(err) => panic!("invalid fixture {json}: {err}"),
        }
    }

    fn invalid_field(json: &str) -> &'static str {
        match raw(json).validate_and_build() {
            Err(Error::Config(ConfigError::InvalidField { field, .. })) => field,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("{json} should not validate"),
        }
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = match raw("{}").validate_and_build() {
            Ok(config) => config,
            Err(err) => panic!("defaults should validate: {err}"),
        };
        assert_eq!(config.toast.title, "Notification");
        assert_eq!(config.toast.duration, Some(Duration::from_secs(5)));
        assert_eq!(config.tray.tooltip, "Tooltip");
        assert_eq!(config.tray.balloon_timeout, Duration::from_millis(200));
    }

    #[test]
    fn persist_drops_the_duration() {
        let config = match raw(r#"{"toast":{"persist":true,"duration":"30s"}}"#).validate_and_build()
        {
            Ok(config) => config,
            Err(err) => panic!("should validate: {err}"),
        };
        assert_eq!(config.toast.duration, None);
    }

    #[test]
    fn class_prefix_must_be_a_plain_identifier() {
        assert_eq!(
            invalid_field(r#"{"tray":{"class_prefix":"my toast"}}"#),
            "tray.class_prefix"
        );
        assert_eq!(
            invalid_field(r#"{"tray":{"class_prefix":"  "}}"#),
            "tray.class_prefix"
        );
    }

    #[test]
    fn tooltip_and_balloon_timeout_are_checked() {
        assert_eq!(invalid_field(r#"{"tray":{"tooltip":""}}"#), "tray.tooltip");
        assert_eq!(
            invalid_field(r#"{"tray":{"balloon_timeout":"60days"}}"#),
            "tray.balloon_timeout"
        );
    }

    #[test]
    fn shortcut_variables_override_the_file() {
        let mut config = raw(r#"{"toast":{"title":"from file","background":false}}"#);
        let env: HashMap<&'static str, String> = [
            ("TOAST_TITLE", "from env".to_string()),
            ("TOAST_BACKGROUND", "1".to_string()),
            ("TOAST_DURATION", "2s".to_string()),
            ("TOAST_ICON", "bell.png".to_string()),
        ]
        .into_iter()
        .collect();
        if let Err(err) = config.apply_overrides_from(&env) {
            panic!("overrides should apply: {err}");
        }
        assert_eq!(config.toast.title, "from env");
        assert!(config.toast.background);
        assert_eq!(config.toast.duration, Duration::from_secs(2));
        assert_eq!(config.toast.icon, Some(PathBuf::from("bell.png")));
    }

    #[test]
    fn toml_file_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "traytoast-config-{}.toml",
            uuid::Uuid::new_v4().simple()
        ));
        let written = std::fs::write(
            &path,
            "[toast]\ntitle = \"Deploy\"\nduration = 12\n\n[tray]\nclass_prefix = \"Deployer\"\n",
        );
        assert!(written.is_ok());

        let loaded = load(&path);
        let _ = std::fs::remove_file(&path);
        let config = match loaded.map_err(Error::from).and_then(RawConfig::validate_and_build) {
            Ok(config) => config,
            Err(err) => panic!("file should load: {err}"),
        };
        assert_eq!(config.toast.title, "Deploy");
        assert_eq!(config.toast.duration, Some(Duration::from_secs(12)));
        assert_eq!(config.tray.class_prefix, "Deployer");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("traytoast-config-does-not-exist.toml");
        assert!(load(path).is_ok());
    }
}
