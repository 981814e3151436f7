#![allow(unsafe_code)]

use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use tracing::trace;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NIM_MODIFY,
    NOTIFY_ICON_MESSAGE, NOTIFYICONDATAW, NOTIFYICONDATAW_0, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CW_USEDEFAULT, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    HICON, IDI_APPLICATION, IMAGE_ICON, LR_DEFAULTSIZE, LR_LOADFROMFILE, LoadIconW, LoadImageW,
    MSG, PostQuitMessage, RegisterClassW, TranslateMessage, UnregisterClassW, WINDOW_EX_STYLE,
    WM_DESTROY, WM_NCDESTROY, WNDCLASSW, WS_OVERLAPPED, WS_SYSMENU,
};
use windows::core::PCWSTR;

use super::wide::{INFO_CAPACITY, INFO_TITLE_CAPACITY, TOOLTIP_CAPACITY, fill_fixed, to_wide};
use super::{
    Balloon, IconHandle, InstanceId, Shell, TRAY_CALLBACK_MESSAGE, TrayIcon, WindowId, WindowProc,
    proc_table,
};
use crate::error::NativeError;
use crate::types::TrayEvent;

// Notification codes carried in the low word of lParam.
const NIN_BALLOONTIMEOUT: u32 = 0x0404;
const NIN_BALLOONUSERCLICK: u32 = 0x0405;

/// Notification-area shell backed by user32/shell32.
#[derive(Clone, Copy, Debug, Default)]
pub struct Win32Shell;

impl Shell for Win32Shell {
    fn module_instance(&self) -> Result<InstanceId, NativeError> {
        let module = unsafe { GetModuleHandleW(None) }
            .map_err(|err| NativeError::call("GetModuleHandleW", err))?;
        Ok(InstanceId(module.0 as isize))
    }

    fn register_class(&self, class_name: &str, instance: InstanceId) -> Result<u16, NativeError> {
        let name = to_wide(class_name);
        let class = WNDCLASSW {
            lpfnWndProc: Some(toast_window_proc),
            hInstance: hinstance(instance),
            lpszClassName: PCWSTR(name.as_ptr()),
            ..Default::default()
        };
        let atom = unsafe { RegisterClassW(&class) };
        if atom == 0 {
            return Err(NativeError::call(
                "RegisterClassW",
                windows::core::Error::from_win32(),
            ));
        }
        Ok(atom)
    }

    fn unregister_class(&self, class_name: &str, instance: InstanceId) -> Result<(), NativeError> {
        let name = to_wide(class_name);
        unsafe { UnregisterClassW(PCWSTR(name.as_ptr()), hinstance(instance)) }
            .map_err(|err| NativeError::call("UnregisterClassW", err))
    }

    fn create_window(
        &self,
        class_name: &str,
        title: &str,
        instance: InstanceId,
        window_proc: WindowProc,
    ) -> Result<WindowId, NativeError> {
        let class = to_wide(class_name);
        let title = to_wide(title);
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                PCWSTR(class.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPED | WS_SYSMENU,
                0,
                0,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                None,
                None,
                hinstance(instance),
                None,
            )
        }
        .map_err(|err| NativeError::call("CreateWindowExW", err))?;

        let window = window_id(hwnd);
        proc_table::install(window, window_proc);
        let _ = unsafe { UpdateWindow(hwnd) };
        Ok(window)
    }

    fn destroy_window(&self, window: WindowId) -> Result<(), NativeError> {
        unsafe { DestroyWindow(hwnd(window)) }
            .map_err(|err| NativeError::call("DestroyWindow", err))
    }

    fn load_icon_file(
        &self,
        path: &Path,
        instance: InstanceId,
    ) -> Result<IconHandle, NativeError> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        let handle = unsafe {
            LoadImageW(
                hinstance(instance),
                PCWSTR(wide.as_ptr()),
                IMAGE_ICON,
                0,
                0,
                LR_LOADFROMFILE | LR_DEFAULTSIZE,
            )
        }
        .map_err(|err| NativeError::call("LoadImageW", err))?;
        Ok(IconHandle(handle.0 as isize))
    }

    fn load_system_icon(&self) -> Result<IconHandle, NativeError> {
        let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }
            .map_err(|err| NativeError::call("LoadIconW", err))?;
        Ok(IconHandle(icon.0 as isize))
    }

    fn add_tray_icon(&self, icon: &TrayIcon) -> Result<(), NativeError> {
        let mut data = notify_data(icon.window, icon.id);
        data.uFlags = NIF_MESSAGE | NIF_ICON | NIF_TIP;
        data.uCallbackMessage = icon.callback_message;
        data.hIcon = HICON(icon.icon.0 as *mut c_void);
        fill_fixed(&mut data.szTip[..TOOLTIP_CAPACITY], &icon.tooltip);
        notify(NIM_ADD, &data)
    }

    fn post_balloon(&self, icon: &TrayIcon, balloon: &Balloon) -> Result<(), NativeError> {
        let mut data = notify_data(icon.window, icon.id);
        data.uFlags = NIF_INFO;
        data.uCallbackMessage = icon.callback_message;
        data.hIcon = HICON(icon.icon.0 as *mut c_void);
        fill_fixed(&mut data.szInfo[..INFO_CAPACITY], &balloon.message);
        fill_fixed(&mut data.szInfoTitle[..INFO_TITLE_CAPACITY], &balloon.title);
        data.Anonymous = NOTIFYICONDATAW_0 {
            uTimeout: balloon.timeout_ms,
        };
        notify(NIM_MODIFY, &data)
    }

    fn remove_tray_icon(&self, window: WindowId, id: u32) -> Result<(), NativeError> {
        notify(NIM_DELETE, &notify_data(window, id))
    }

    fn post_quit(&self) {
        unsafe { PostQuitMessage(0) };
    }

    fn pump_messages(&self) {
        let mut msg = MSG::default();
        loop {
            let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            match status.0 {
                0 => break,
                -1 => {
                    trace!(
                        error = %windows::core::Error::from_win32(),
                        "GetMessageW failed, leaving event loop"
                    );
                    break;
                }
                _ => unsafe {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                },
            }
        }
    }
}

unsafe extern "system" fn toast_window_proc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let window = window_id(hwnd);
    match message {
        TRAY_CALLBACK_MESSAGE => {
            let event = match low_word(lparam) {
                NIN_BALLOONUSERCLICK => Some(TrayEvent::BalloonClicked),
                NIN_BALLOONTIMEOUT => Some(TrayEvent::BalloonTimeout),
                _ => None,
            };
            if let Some(event) = event {
                proc_table::dispatch(window, event);
                return LRESULT(0);
            }
        }
        WM_DESTROY => {
            proc_table::dispatch(window, TrayEvent::WindowDestroyed);
            return LRESULT(0);
        }
        WM_NCDESTROY => {
            proc_table::uninstall(window);
        }
        _ => {}
    }
    unsafe { DefWindowProcW(hwnd, message, wparam, lparam) }
}

fn notify_data(window: WindowId, id: u32) -> NOTIFYICONDATAW {
    #[allow(clippy::cast_possible_truncation)]
    let size = std::mem::size_of::<NOTIFYICONDATAW>() as u32;
    NOTIFYICONDATAW {
        cbSize: size,
        hWnd: hwnd(window),
        uID: id,
        ..Default::default()
    }
}

fn notify(message: NOTIFY_ICON_MESSAGE, data: &NOTIFYICONDATAW) -> Result<(), NativeError> {
    if unsafe { Shell_NotifyIconW(message, data) }.as_bool() {
        Ok(())
    } else {
        Err(NativeError::call(
            "Shell_NotifyIconW",
            format!("message {:#x} rejected", message.0),
        ))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn low_word(lparam: LPARAM) -> u32 {
    (lparam.0 as u32) & 0xFFFF
}

fn hinstance(instance: InstanceId) -> HINSTANCE {
    HINSTANCE(instance.0 as *mut c_void)
}

fn hwnd(window: WindowId) -> HWND {
    HWND(window.0 as *mut c_void)
}

fn window_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as isize)
}
