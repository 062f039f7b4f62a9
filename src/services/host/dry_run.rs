use crate::config::{Config, SimulatedWindow};
use crate::error::Result;
use crate::events::{
    FocusedWindow, KeyboardLayout, LanguageId, NativeWindow, OwnerThread, WindowIdentity,
};
use parking_lot::Mutex;
use tracing::{info, warn};

use super::r#trait::{LayoutAccessor, WindowResolver};

/// Эмуляция рабочего стола для dry-run режима.
///
/// Фокус переходит к следующему окну каждые `switch_every_ticks` опросов.
/// У каждого окна своя живая раскладка, начальная берётся из конфигурации.
/// Запросы смены раскладки применяются только к окну с фокусом.
pub struct SimulatedDesktop {
    windows: Vec<SimulatedWindow>,
    switch_every: u32,
    untitled_label: String,
    state: Mutex<DesktopState>,
}

struct DesktopState {
    focused: Option<usize>,
    resolves: u32,
    layouts: Vec<KeyboardLayout>,
}

impl SimulatedDesktop {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.dry_run.windows.clone(),
            config.dry_run.switch_every_ticks,
            config.tracking.untitled_label.clone(),
        )
    }

    pub fn new(windows: Vec<SimulatedWindow>, switch_every: u32, untitled_label: String) -> Self {
        let layouts = windows
            .iter()
            .map(|w| KeyboardLayout::for_language(LanguageId::new(w.language)))
            .collect();
        Self {
            windows,
            switch_every: switch_every.max(1),
            untitled_label,
            state: Mutex::new(DesktopState {
                focused: None,
                resolves: 0,
                layouts,
            }),
        }
    }

    fn focused_window(&self, index: usize) -> FocusedWindow {
        let window = &self.windows[index];
        let native = NativeWindow(window.handle);
        FocusedWindow::new(
            WindowIdentity::with_placeholder(&window.title, native, &self.untitled_label),
            native,
            OwnerThread(index as u32 + 1),
        )
    }
}

impl WindowResolver for SimulatedDesktop {
    fn resolve(&self) -> Result<Option<FocusedWindow>> {
        if self.windows.is_empty() {
            return Ok(None);
        }

        let mut state = self.state.lock();
        if state.resolves % self.switch_every == 0 {
            let next = state.focused.map_or(0, |i| (i + 1) % self.windows.len());
            state.focused = Some(next);
            info!(
                "Dry-run: эмулируем смену окна на: {} (раскладка {})",
                self.focused_window(next),
                state.layouts[next]
            );
        }
        state.resolves = state.resolves.wrapping_add(1);

        Ok(state.focused.map(|i| self.focused_window(i)))
    }
}

impl LayoutAccessor for SimulatedDesktop {
    fn current_layout(&self, thread: OwnerThread) -> Result<Option<KeyboardLayout>> {
        // Поток окна i - это i + 1, 0 не принадлежит ни одному окну
        let Some(index) = (thread.0 as usize).checked_sub(1) else {
            return Ok(None);
        };
        Ok(self.state.lock().layouts.get(index).copied())
    }

    fn post_layout(&self, window: &FocusedWindow, layout: KeyboardLayout) -> Result<()> {
        let mut state = self.state.lock();
        let focused = state
            .focused
            .filter(|&i| self.windows[i].handle == window.window.0);

        if let Some(index) = focused {
            info!("Dry-run: раскладка окна {} -> {}", window, layout);
            state.layouts[index] = layout;
        } else {
            warn!("Dry-run: окно {} без фокуса, запрос {} проигнорирован", window, layout);
        }
        Ok(())
    }
}
