use std::time::Duration;

use crate::request::{DEFAULT_DURATION, DEFAULT_MESSAGE, DEFAULT_TITLE};
use crate::toaster::TraySettings;

pub(super) fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

pub(super) fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

pub(super) const fn default_duration() -> Duration {
    DEFAULT_DURATION
}

pub(super) fn default_tooltip() -> String {
    TraySettings::default().tooltip
}

pub(super) fn default_window_title() -> String {
    TraySettings::default().window_title
}

pub(super) fn default_class_prefix() -> String {
    TraySettings::default().class_prefix
}

pub(super) fn default_balloon_timeout() -> Duration {
    TraySettings::default().balloon_timeout
}
