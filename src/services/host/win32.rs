use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{FocusedWindow, KeyboardLayout, NativeWindow, OwnerThread, WindowIdentity};
use crate::switcher_error;
use std::ffi::c_void;
use tracing::debug;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::GetKeyboardLayout;
use windows::Win32::UI::WindowsAndMessaging::{
    GetGUIThreadInfo, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
    PostMessageW, GUITHREADINFO, WM_INPUTLANGCHANGEREQUEST,
};

use super::r#trait::{LayoutAccessor, WindowResolver};

const INPUTLANGCHANGE_FORWARD: usize = 0x0002;

/// Рабочий стол Windows через user32
pub struct Win32Desktop {
    untitled_label: String,
}

impl Win32Desktop {
    pub fn new(untitled_label: String) -> Self {
        Self { untitled_label }
    }

    fn to_hwnd(window: NativeWindow) -> HWND {
        HWND(window.0 as isize as *mut c_void)
    }

    fn to_native(hwnd: HWND) -> NativeWindow {
        NativeWindow(hwnd.0 as isize as i64)
    }

    fn window_title(hwnd: HWND) -> String {
        unsafe {
            let length = GetWindowTextLengthW(hwnd);
            if length <= 0 {
                return String::new();
            }
            let mut buffer = vec![0u16; length as usize + 1];
            let copied = GetWindowTextW(hwnd, &mut buffer);
            if copied <= 0 {
                return String::new();
            }
            String::from_utf16_lossy(&buffer[..copied as usize])
        }
    }

    /// Активное окно и окно с фокусом из ответа `GetGUIThreadInfo`.
    ///
    /// Отказ вызова (защищённый рабочий стол: экран блокировки, UAC) и
    /// отсутствие фокуса - штатная ситуация, опрос просто пропускается.
    fn focus_pair(queried: windows::core::Result<()>, info: &GUITHREADINFO) -> Option<(HWND, HWND)> {
        if let Err(e) = queried {
            debug_if_enabled!("GetGUIThreadInfo недоступен: {}", e);
            return None;
        }
        if info.hwndFocus.0.is_null() {
            return None;
        }
        Some((info.hwndActive, info.hwndFocus))
    }
}

impl WindowResolver for Win32Desktop {
    fn resolve(&self) -> Result<Option<FocusedWindow>> {
        let mut info = GUITHREADINFO {
            cbSize: std::mem::size_of::<GUITHREADINFO>() as u32,
            ..Default::default()
        };

        // 0 - поток переднего плана
        let queried = unsafe { GetGUIThreadInfo(0, &mut info) };
        let Some((active, focus)) = Self::focus_pair(queried, &info) else {
            return Ok(None);
        };

        let title = Self::window_title(active);
        let native = Self::to_native(active);
        let identity = WindowIdentity::with_placeholder(&title, native, &self.untitled_label);

        // Раскладка принадлежит потоку окна с фокусом, а не активного окна
        let thread = unsafe { GetWindowThreadProcessId(focus, None) };

        Ok(Some(FocusedWindow::new(identity, native, OwnerThread(thread))))
    }
}

impl LayoutAccessor for Win32Desktop {
    fn current_layout(&self, thread: OwnerThread) -> Result<Option<KeyboardLayout>> {
        if thread.0 == 0 {
            return Ok(None);
        }
        let hkl = unsafe { GetKeyboardLayout(thread.0) };
        Ok(Some(KeyboardLayout::from_raw(hkl.0 as usize as u32)))
    }

    fn post_layout(&self, window: &FocusedWindow, layout: KeyboardLayout) -> Result<()> {
        debug!("WM_INPUTLANGCHANGEREQUEST {} -> {}", window, layout);

        // HKL передаётся как знаковое 32-битное значение, расширенное до размера указателя
        let lparam = LPARAM(layout.raw() as i32 as isize);
        unsafe {
            PostMessageW(
                Self::to_hwnd(window.window),
                WM_INPUTLANGCHANGEREQUEST,
                WPARAM(INPUTLANGCHANGE_FORWARD),
                lparam,
            )
        }
        .map_err(|e| switcher_error!(host_command, "PostMessageW для {}: {}", window, e))
    }
}
