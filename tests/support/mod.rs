#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use traytoast::error::NativeError;
use traytoast::shell::{
    Balloon, IconHandle, InstanceId, Shell, TrayIcon, WindowId, WindowProc, proc_table,
};
use traytoast::types::TrayEvent;
use traytoast::{Toaster, TraySettings};

pub const FILE_ICON: IconHandle = IconHandle(100);
pub const SYSTEM_ICON: IconHandle = IconHandle(1);

/// In-memory shell that records every call and plays scripted tray events
/// from its message pump.
#[derive(Default)]
pub struct FakeShell {
    calls: Mutex<Vec<String>>,
    script: Mutex<VecDeque<TrayEvent>>,
    gate: Mutex<Option<Receiver<()>>>,
    window: Mutex<Option<WindowId>>,
    next_window: AtomicIsize,
    quit: AtomicBool,
    fail_register: bool,
    fail_create: bool,
    fail_tray: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeShell {
    pub fn scripted(events: impl IntoIterator<Item = TrayEvent>) -> Self {
        Self {
            script: Mutex::new(events.into_iter().collect()),
            next_window: AtomicIsize::new(1),
            ..Self::default()
        }
    }

    /// Shell whose pump blocks until the returned sender fires or is dropped.
    pub fn gated(events: impl IntoIterator<Item = TrayEvent>) -> (Self, Sender<()>) {
        let (tx, rx) = channel();
        let shell = Self::scripted(events);
        *lock(&shell.gate) = Some(rx);
        (shell, tx)
    }

    pub fn failing_register(mut self) -> Self {
        self.fail_register = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_tray(mut self) -> Self {
        self.fail_tray = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn called(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        lock(&self.calls).push(call.into());
    }
}

impl Shell for FakeShell {
    fn module_instance(&self) -> Result<InstanceId, NativeError> {
        Ok(InstanceId(7))
    }

    fn register_class(&self, _class_name: &str, _instance: InstanceId) -> Result<u16, NativeError> {
        self.record("register_class");
        if self.fail_register {
            return Err(NativeError::call("RegisterClassW", "class already exists"));
        }
        Ok(0xC001)
    }

    fn unregister_class(&self, _class_name: &str, _instance: InstanceId) -> Result<(), NativeError> {
        self.record("unregister_class");
        Ok(())
    }

    fn create_window(
        &self,
        _class_name: &str,
        title: &str,
        _instance: InstanceId,
        window_proc: WindowProc,
    ) -> Result<WindowId, NativeError> {
        self.record(format!("create_window {title}"));
        if self.fail_create {
            return Err(NativeError::call("CreateWindowExW", "no class"));
        }
        let window = WindowId(self.next_window.fetch_add(1, Ordering::SeqCst));
        proc_table::install(window, window_proc);
        *lock(&self.window) = Some(window);
        Ok(window)
    }

    fn destroy_window(&self, window: WindowId) -> Result<(), NativeError> {
        self.record("destroy_window");
        proc_table::dispatch(window, TrayEvent::WindowDestroyed);
        proc_table::uninstall(window);
        Ok(())
    }

    fn load_icon_file(&self, path: &Path, _instance: InstanceId) -> Result<IconHandle, NativeError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(format!("load_icon_file {name}"));
        Ok(FILE_ICON)
    }

    fn load_system_icon(&self) -> Result<IconHandle, NativeError> {
        self.record("load_system_icon");
        Ok(SYSTEM_ICON)
    }

    fn add_tray_icon(&self, icon: &TrayIcon) -> Result<(), NativeError> {
        self.record(format!(
            "add_tray_icon id={} icon={} tip={}",
            icon.id, icon.icon.0, icon.tooltip
        ));
        if self.fail_tray {
            return Err(NativeError::call("Shell_NotifyIconW", "message 0x0 rejected"));
        }
        Ok(())
    }

    fn post_balloon(&self, icon: &TrayIcon, balloon: &Balloon) -> Result<(), NativeError> {
        self.record(format!(
            "post_balloon id={} {:?} {:?} {}ms",
            icon.id, balloon.title, balloon.message, balloon.timeout_ms
        ));
        Ok(())
    }

    fn remove_tray_icon(&self, _window: WindowId, id: u32) -> Result<(), NativeError> {
        self.record(format!("remove_tray_icon id={id}"));
        Ok(())
    }

    fn post_quit(&self) {
        self.record("post_quit");
        self.quit.store(true, Ordering::SeqCst);
    }

    fn pump_messages(&self) {
        self.record("pump_messages");
        let gate = lock(&self.gate).take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        let Some(window) = *lock(&self.window) else {
            return;
        };
        while !self.quit.swap(false, Ordering::SeqCst) {
            let next = lock(&self.script).pop_front();
            let Some(event) = next else {
                break;
            };
            proc_table::dispatch(window, event);
        }
    }
}

pub fn toaster(shell: &Arc<FakeShell>) -> Toaster {
    let shared: Arc<dyn Shell> = Arc::clone(shell) as Arc<dyn Shell>;
    Toaster::with_shell(shared, TraySettings::default())
}
