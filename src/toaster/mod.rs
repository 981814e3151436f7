//! Notification lifecycle manager.
//!
//! A [`Toaster`] shows one toast at a time in the background, or any number
//! synchronously. Each toast is a full lifecycle run: window class, hidden
//! window, tray entry, balloon, event loop, teardown.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::icon::{IconSettings, IconSource};
use crate::request::ToastRequest;
use crate::shell::{Shell, platform_shell};
use crate::types::{Outcome, Stage};

mod dispatch;
mod lifecycle;

const WORKER_THREAD_NAME: &str = "traytoast-lifecycle";

/// Native presentation settings shared by every toast of a [`Toaster`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TraySettings {
    pub tooltip: String,
    pub window_title: String,
    /// Window classes are named `{class_prefix}-{uuid}`.
    pub class_prefix: String,
    /// Display hint for the balloon itself, unrelated to the toast duration.
    pub balloon_timeout: Duration,
    pub icon: IconSettings,
}

impl TraySettings {
    #[must_use]
    pub fn balloon_timeout_ms(&self) -> u32 {
        u32::try_from(self.balloon_timeout.as_millis()).unwrap_or(u32::MAX)
    }
}

impl Default for TraySettings {
    fn default() -> Self {
        Self {
            tooltip: "Tooltip".to_string(),
            window_title: "Taskbar".to_string(),
            class_prefix: "TrayToast".to_string(),
            balloon_timeout: Duration::from_millis(200),
            icon: IconSettings::default(),
        }
    }
}

/// Summary of a finished lifecycle run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LifecycleReport {
    pub class_name: String,
    pub outcome: Outcome,
    pub icon: IconSource,
    pub final_stage: Stage,
}

pub struct Toaster {
    shell: Arc<dyn Shell>,
    settings: Arc<TraySettings>,
    worker: Mutex<Option<JoinHandle<LifecycleReport>>>,
}

impl Toaster {
    /// Toaster on this platform's native shell with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(TraySettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: TraySettings) -> Self {
        Self::with_shell(platform_shell(), settings)
    }

    #[must_use]
    pub fn with_shell(shell: Arc<dyn Shell>, settings: TraySettings) -> Self {
        Self {
            shell,
            settings: Arc::new(settings),
            worker: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &TraySettings {
        &self.settings
    }

    /// Shows a toast.
    ///
    /// Synchronous calls block until the toast is torn down and always return
    /// `true`. Background calls return at once: `true` when a worker was
    /// started, `false` when another background toast is still active or the
    /// worker thread could not be spawned.
    pub fn show_toast(&self, request: ToastRequest, run_in_background: bool) -> bool {
        if run_in_background {
            self.spawn(request)
        } else {
            let _ = self.run(request);
            true
        }
    }

    /// Runs a full lifecycle on the calling thread.
    pub fn run(&self, request: ToastRequest) -> LifecycleReport {
        lifecycle::run(Arc::clone(&self.shell), &self.settings, request)
    }

    /// Whether a background toast is still running.
    pub fn is_active(&self) -> bool {
        self.lock_worker()
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Waits for the current background toast, if any, and returns its report.
    ///
    /// Returns `None` when nothing was started since the last join, or when
    /// the worker panicked.
    pub fn join(&self) -> Option<LifecycleReport> {
        let worker = self.lock_worker().take()?;
        match worker.join() {
            Ok(report) => Some(report),
            Err(_) => {
                error!("toast worker panicked");
                None
            }
        }
    }

    fn spawn(&self, request: ToastRequest) -> bool {
        let mut worker = self.lock_worker();
        if worker.as_ref().is_some_and(|active| !active.is_finished()) {
            debug!(title = %request.title, "a toast is already active, request skipped");
            return false;
        }

        let shell = Arc::clone(&self.shell);
        let settings = Arc::clone(&self.settings);
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || lifecycle::run(shell, &settings, request));
        match spawned {
            Ok(handle) => {
                if let Some(previous) = worker.replace(handle) {
                    debug!(
                        finished = previous.is_finished(),
                        "previous toast report discarded"
                    );
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "toast worker not spawned");
                false
            }
        }
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<JoinHandle<LifecycleReport>>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Toaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toaster")
            .field("settings", &self.settings)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
