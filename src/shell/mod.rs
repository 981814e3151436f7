//! Native notification-area calls, behind one trait.
//!
//! The lifecycle only talks to a [`Shell`]. [`Win32Shell`] drives the real
//! Windows APIs; other targets get [`UnsupportedShell`], whose calls all fail
//! so a lifecycle degrades to "nothing shown" instead of aborting.

use std::path::Path;
use std::sync::Arc;

use crate::error::NativeError;
use crate::types::TrayEvent;

pub mod proc_table;
pub mod wide;

mod unsupported;
#[cfg(windows)]
mod win32;

pub use unsupported::UnsupportedShell;
#[cfg(windows)]
pub use win32::Win32Shell;

/// `WM_USER + 20`, the message the tray icon sends back to its window.
pub const TRAY_CALLBACK_MESSAGE: u32 = 0x0400 + 20;

/// Module instance the window class and window belong to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct InstanceId(pub isize);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WindowId(pub isize);

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct IconHandle(pub isize);

impl IconHandle {
    pub const NONE: Self = Self(0);
}

/// Tray entry registered for a toast window.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrayIcon {
    pub window: WindowId,
    pub id: u32,
    pub callback_message: u32,
    pub icon: IconHandle,
    pub tooltip: String,
}

/// Balloon content posted onto an existing tray entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Balloon {
    pub title: String,
    pub message: String,
    /// Display hint handed to the shell, in milliseconds.
    pub timeout_ms: u32,
}

/// Window procedure for one toast window. Runs on the thread pumping that
/// window's messages.
pub type WindowProc = Box<dyn FnMut(WindowId, TrayEvent) + 'static>;

pub trait Shell: Send + Sync {
    fn module_instance(&self) -> Result<InstanceId, NativeError>;

    fn register_class(&self, class_name: &str, instance: InstanceId) -> Result<u16, NativeError>;

    fn unregister_class(&self, class_name: &str, instance: InstanceId) -> Result<(), NativeError>;

    /// Creates the hidden toast window and installs `window_proc` for it.
    fn create_window(
        &self,
        class_name: &str,
        title: &str,
        instance: InstanceId,
        window_proc: WindowProc,
    ) -> Result<WindowId, NativeError>;

    fn destroy_window(&self, window: WindowId) -> Result<(), NativeError>;

    fn load_icon_file(&self, path: &Path, instance: InstanceId)
    -> Result<IconHandle, NativeError>;

    fn load_system_icon(&self) -> Result<IconHandle, NativeError>;

    fn add_tray_icon(&self, icon: &TrayIcon) -> Result<(), NativeError>;

    fn post_balloon(&self, icon: &TrayIcon, balloon: &Balloon) -> Result<(), NativeError>;

    fn remove_tray_icon(&self, window: WindowId, id: u32) -> Result<(), NativeError>;

    /// Asks the current thread's event loop to stop.
    fn post_quit(&self);

    /// Blocks the current thread, dispatching messages until a quit is posted.
    fn pump_messages(&self);
}

/// Shell backing [`crate::Toaster::new`] on this target.
#[must_use]
pub fn platform_shell() -> Arc<dyn Shell> {
    #[cfg(windows)]
    {
        Arc::new(Win32Shell)
    }
    #[cfg(not(windows))]
    {
        Arc::new(UnsupportedShell)
    }
}
