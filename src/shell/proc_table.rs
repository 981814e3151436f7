//! Thread-local registry of window procedures.
//!
//! A toast window and its message loop live on one thread, so the closure
//! handling its messages is stored per thread and looked up by window.
//! Shell implementations install the closure when the window is created,
//! route events through [`dispatch`] and drop it with [`uninstall`].

use std::cell::RefCell;
use std::collections::HashMap;

use super::{WindowId, WindowProc};
use crate::types::TrayEvent;

thread_local! {
    static PROCS: RefCell<HashMap<WindowId, WindowProc>> = RefCell::new(HashMap::new());
}

pub fn install(window: WindowId, window_proc: WindowProc) {
    PROCS.with(|procs| {
        procs.borrow_mut().insert(window, window_proc);
    });
}

pub fn uninstall(window: WindowId) -> bool {
    PROCS.with(|procs| procs.borrow_mut().remove(&window).is_some())
}

/// Runs the procedure installed for `window`. Returns `false` when none is.
///
/// The procedure is taken out of the table while it runs, so it may call back
/// into the shell (which may dispatch again) without a double borrow.
pub fn dispatch(window: WindowId, event: TrayEvent) -> bool {
    let Some(mut window_proc) = PROCS.with(|procs| procs.borrow_mut().remove(&window)) else {
        return false;
    };
    window_proc(window, event);
    PROCS.with(|procs| {
        procs.borrow_mut().entry(window).or_insert(window_proc);
    });
    true
}
