use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::request::ClickCallback;
use crate::shell::{Shell, WindowId, WindowProc};
use crate::types::TrayEvent;

/// State shared between a lifecycle and its window procedure.
///
/// Both run on the lifecycle thread; the procedure is only entered from the
/// shell while the lifecycle is inside a shell call.
pub(super) struct DispatchState {
    on_click: Option<ClickCallback>,
    tray_id: u32,
    tray_attached: bool,
    pumping: bool,
    first_event: Option<TrayEvent>,
}

pub(super) type SharedDispatch = Rc<RefCell<DispatchState>>;

impl DispatchState {
    pub(super) fn shared(on_click: Option<ClickCallback>, tray_id: u32) -> SharedDispatch {
        Rc::new(RefCell::new(Self {
            on_click,
            tray_id,
            tray_attached: false,
            pumping: false,
            first_event: None,
        }))
    }

    pub(super) const fn mark_tray_attached(&mut self) {
        self.tray_attached = true;
    }

    pub(super) const fn tray_attached(&self) -> bool {
        self.tray_attached
    }

    pub(super) const fn set_pumping(&mut self, pumping: bool) {
        self.pumping = pumping;
    }

    pub(super) const fn first_event(&self) -> Option<TrayEvent> {
        self.first_event
    }
}

/// Builds the procedure handed to the shell for the toast window.
pub(super) fn window_proc(shell: Arc<dyn Shell>, state: SharedDispatch) -> WindowProc {
    Box::new(move |window, event| {
        debug!(?window, ?event, "toast window event");
        let callback = {
            let mut state = state.borrow_mut();
            if state.first_event.is_none() {
                state.first_event = Some(event);
            }
            match event {
                TrayEvent::BalloonClicked => state.on_click.take(),
                TrayEvent::BalloonTimeout | TrayEvent::WindowDestroyed => None,
            }
        };
        if let Some(callback) = callback {
            run_click_callback(callback);
        }
        on_destroy(shell.as_ref(), &state, window);
    })
}

/// Removes the tray entry and ends the event loop. Idempotent.
pub(super) fn on_destroy(shell: &dyn Shell, state: &SharedDispatch, window: WindowId) {
    let (remove, quit, tray_id) = {
        let mut state = state.borrow_mut();
        let remove = std::mem::take(&mut state.tray_attached);
        let quit = std::mem::take(&mut state.pumping);
        (remove, quit, state.tray_id)
    };
    if remove {
        if let Err(err) = shell.remove_tray_icon(window, tray_id) {
            warn!(error = %err, ?window, "tray icon not removed");
        }
    }
    if quit {
        shell.post_quit();
    }
}

fn run_click_callback(callback: ClickCallback) {
    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        error!("click callback panicked");
    }
}
