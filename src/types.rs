use std::fmt::{self, Display};

use serde::Serialize;

/// Position of a lifecycle run in its state machine.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    ClassRegistered,
    WindowCreated,
    IconAttached,
    InfoPosted,
    EventLoopRunning,
    Dismissed,
    TimedOut,
    TornDown,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ClassRegistered => "class_registered",
            Self::WindowCreated => "window_created",
            Self::IconAttached => "icon_attached",
            Self::InfoPosted => "info_posted",
            Self::EventLoopRunning => "event_loop_running",
            Self::Dismissed => "dismissed",
            Self::TimedOut => "timed_out",
            Self::TornDown => "torn_down",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal delivered by the shell to a toast window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrayEvent {
    /// The user clicked the balloon.
    BalloonClicked,
    /// The balloon faded out or was closed by the user.
    BalloonTimeout,
    /// The window is being destroyed.
    WindowDestroyed,
}

/// How a lifecycle run ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Clicked,
    Expired,
    Destroyed,
    /// The event loop ended without any toast signal.
    Interrupted,
    /// No window could be created, nothing was shown.
    NotDisplayed,
}

impl Outcome {
    pub(crate) const fn from_event(event: TrayEvent) -> Self {
        match event {
            TrayEvent::BalloonClicked => Self::Clicked,
            TrayEvent::BalloonTimeout => Self::Expired,
            TrayEvent::WindowDestroyed => Self::Destroyed,
        }
    }

    /// Stage the run enters once the event loop has returned.
    pub(crate) const fn closing_stage(self) -> Stage {
        match self {
            Self::Clicked | Self::Destroyed => Stage::Dismissed,
            Self::Expired | Self::Interrupted | Self::NotDisplayed => Stage::TimedOut,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clicked => "clicked",
            Self::Expired => "expired",
            Self::Destroyed => "destroyed",
            Self::Interrupted => "interrupted",
            Self::NotDisplayed => "not displayed",
        })
    }
}
