use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info_span, warn};
use uuid::Uuid;

use super::dispatch::{self, DispatchState, SharedDispatch};
use super::{LifecycleReport, TraySettings};
use crate::icon::{self, IconSource};
use crate::request::ToastRequest;
use crate::shell::{
    Balloon, IconHandle, InstanceId, Shell, TRAY_CALLBACK_MESSAGE, TrayIcon, WindowId, proc_table,
};
use crate::types::{Outcome, Stage};

const TRAY_ICON_ID: u32 = 0;

/// Native resources held by one run. Lives and dies on the run's thread.
#[derive(Debug)]
struct NativeHandle {
    class_name: String,
    class_atom: Option<u16>,
    window: Option<WindowId>,
    instance: InstanceId,
    icon: IconHandle,
    tray_id: u32,
}

struct Lifecycle<'a> {
    shell: Arc<dyn Shell>,
    settings: &'a TraySettings,
    handle: NativeHandle,
    dispatch: SharedDispatch,
    stage: Stage,
    icon_source: IconSource,
    posted_at: Option<Instant>,
}

/// Runs one toast from window-class registration to teardown, on the calling
/// thread. Every step is attempted in order; a failed step is logged and the
/// run carries on degraded.
pub(super) fn run(
    shell: Arc<dyn Shell>,
    settings: &TraySettings,
    request: ToastRequest,
) -> LifecycleReport {
    let ToastRequest {
        title,
        message,
        icon_path,
        duration,
        on_click,
    } = request;

    let mut lifecycle = Lifecycle::new(shell, settings, on_click);
    let span = info_span!("toast", class = %lifecycle.handle.class_name);
    let _entered = span.enter();

    lifecycle.register_class();
    lifecycle.create_window();
    lifecycle.attach_icon(icon_path.as_deref());
    lifecycle.post_info(&title, &message);
    let outcome = lifecycle.run_event_loop();
    lifecycle.teardown(duration, outcome)
}

impl<'a> Lifecycle<'a> {
    fn new(
        shell: Arc<dyn Shell>,
        settings: &'a TraySettings,
        on_click: Option<crate::request::ClickCallback>,
    ) -> Self {
        let class_name = format!("{}-{}", settings.class_prefix, Uuid::new_v4().simple());
        Self {
            shell,
            settings,
            handle: NativeHandle {
                class_name,
                class_atom: None,
                window: None,
                instance: InstanceId::default(),
                icon: IconHandle::NONE,
                tray_id: TRAY_ICON_ID,
            },
            dispatch: DispatchState::shared(on_click, TRAY_ICON_ID),
            stage: Stage::Idle,
            icon_source: IconSource::Missing,
            posted_at: None,
        }
    }

    fn enter(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "lifecycle stage");
        self.stage = next;
    }

    fn register_class(&mut self) {
        self.handle.instance = self.shell.module_instance().unwrap_or_else(|err| {
            warn!(error = %err, "module instance unavailable");
            InstanceId::default()
        });
        match self
            .shell
            .register_class(&self.handle.class_name, self.handle.instance)
        {
            Ok(atom) => self.handle.class_atom = Some(atom),
            Err(err) => error!(error = %err, "window class registration failed"),
        }
        self.enter(Stage::ClassRegistered);
    }

    fn create_window(&mut self) {
        let window_proc = dispatch::window_proc(Arc::clone(&self.shell), Rc::clone(&self.dispatch));
        match self.shell.create_window(
            &self.handle.class_name,
            &self.settings.window_title,
            self.handle.instance,
            window_proc,
        ) {
            Ok(window) => self.handle.window = Some(window),
            Err(err) => warn!(error = %err, "toast window not created"),
        }
        self.enter(Stage::WindowCreated);
    }

    fn attach_icon(&mut self, icon_path: Option<&std::path::Path>) {
        let resolved = icon::resolve(
            self.shell.as_ref(),
            self.handle.instance,
            icon_path,
            &self.settings.icon,
        );
        self.handle.icon = resolved.handle;
        self.icon_source = resolved.source;

        if let Some(tray) = self.tray_icon() {
            match self.shell.add_tray_icon(&tray) {
                Ok(()) => self.dispatch.borrow_mut().mark_tray_attached(),
                Err(err) => warn!(error = %err, "tray icon not added"),
            }
        }
        self.enter(Stage::IconAttached);
    }

    fn post_info(&mut self, title: &str, message: &str) {
        if let Some(tray) = self.tray_icon() {
            let balloon = Balloon {
                title: title.to_string(),
                message: message.to_string(),
                timeout_ms: self.settings.balloon_timeout_ms(),
            };
            if let Err(err) = self.shell.post_balloon(&tray, &balloon) {
                warn!(error = %err, "balloon content not posted");
            }
        }
        self.posted_at = Some(Instant::now());
        self.enter(Stage::InfoPosted);
    }

    fn run_event_loop(&mut self) -> Outcome {
        if self.handle.window.is_none() {
            warn!("no toast window, skipping the event loop");
            return Outcome::NotDisplayed;
        }
        // Without a tray entry no balloon event can ever end the loop.
        if !self.dispatch.borrow().tray_attached() {
            warn!("no tray entry, skipping the event loop");
            return Outcome::NotDisplayed;
        }

        self.enter(Stage::EventLoopRunning);
        self.dispatch.borrow_mut().set_pumping(true);
        self.shell.pump_messages();
        self.dispatch.borrow_mut().set_pumping(false);

        let outcome = self
            .dispatch
            .borrow()
            .first_event()
            .map_or(Outcome::Interrupted, Outcome::from_event);
        self.enter(outcome.closing_stage());
        outcome
    }

    fn teardown(mut self, duration: Option<Duration>, outcome: Outcome) -> LifecycleReport {
        if outcome != Outcome::NotDisplayed {
            if let (Some(duration), Some(posted_at)) = (duration, self.posted_at) {
                let remaining = duration.saturating_sub(posted_at.elapsed());
                if !remaining.is_zero() {
                    debug!(?remaining, "holding the toast for the rest of its duration");
                    std::thread::sleep(remaining);
                }
            }
        }

        if let Some(window) = self.handle.window.take() {
            if let Err(err) = self.shell.destroy_window(window) {
                warn!(error = %err, "toast window not destroyed");
            }
            // No-op when the destroy message already went through the handler.
            dispatch::on_destroy(self.shell.as_ref(), &self.dispatch, window);
            proc_table::uninstall(window);
        }

        let registered = self.handle.class_atom.take().is_some();
        if let Err(err) = self
            .shell
            .unregister_class(&self.handle.class_name, self.handle.instance)
        {
            if registered {
                warn!(error = %err, "window class not unregistered");
            } else {
                debug!(error = %err, "unregistering a class that never registered");
            }
        }

        self.enter(Stage::TornDown);
        debug!(%outcome, icon = ?self.handle.icon, "toast finished");
        LifecycleReport {
            class_name: self.handle.class_name,
            outcome,
            icon: self.icon_source,
            final_stage: self.stage,
        }
    }

    fn tray_icon(&self) -> Option<TrayIcon> {
        let window = self.handle.window?;
        Some(TrayIcon {
            window,
            id: self.handle.tray_id,
            callback_message: TRAY_CALLBACK_MESSAGE,
            icon: self.handle.icon,
            tooltip: self.settings.tooltip.clone(),
        })
    }
}
