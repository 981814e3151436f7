use std::path::Path;

use tracing::debug;

use super::{Balloon, IconHandle, InstanceId, Shell, TrayIcon, WindowId, WindowProc};
use crate::error::NativeError;

/// Shell for targets without a notification area API.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedShell;

impl Shell for UnsupportedShell {
    fn module_instance(&self) -> Result<InstanceId, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn register_class(&self, _class_name: &str, _instance: InstanceId) -> Result<u16, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn unregister_class(&self, _class_name: &str, _instance: InstanceId) -> Result<(), NativeError> {
        Err(NativeError::Unsupported)
    }

    fn create_window(
        &self,
        _class_name: &str,
        _title: &str,
        _instance: InstanceId,
        _window_proc: WindowProc,
    ) -> Result<WindowId, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn destroy_window(&self, _window: WindowId) -> Result<(), NativeError> {
        Err(NativeError::Unsupported)
    }

    fn load_icon_file(
        &self,
        _path: &Path,
        _instance: InstanceId,
    ) -> Result<IconHandle, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn load_system_icon(&self) -> Result<IconHandle, NativeError> {
        Err(NativeError::Unsupported)
    }

    fn add_tray_icon(&self, _icon: &TrayIcon) -> Result<(), NativeError> {
        Err(NativeError::Unsupported)
    }

    fn post_balloon(&self, _icon: &TrayIcon, _balloon: &Balloon) -> Result<(), NativeError> {
        Err(NativeError::Unsupported)
    }

    fn remove_tray_icon(&self, _window: WindowId, _id: u32) -> Result<(), NativeError> {
        Err(NativeError::Unsupported)
    }

    fn post_quit(&self) {}

    fn pump_messages(&self) {
        debug!("no native event loop on this platform");
    }
}
