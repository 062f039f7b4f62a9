pub mod layout;
pub mod window;

pub use layout::{KeyboardLayout, LanguageId, LanguageNames};
pub use window::{FocusedWindow, NativeWindow, OwnerThread, WindowIdentity};

/// Результат одного опроса: окно с фокусом и его текущая раскладка
#[derive(Debug, Clone)]
pub struct Observation {
    pub window: FocusedWindow,
    pub layout: KeyboardLayout,
}

impl Observation {
    pub fn new(window: FocusedWindow, layout: KeyboardLayout) -> Self {
        Self { window, layout }
    }

    pub fn identity(&self) -> &WindowIdentity {
        &self.window.identity
    }

    pub fn language(&self) -> LanguageId {
        self.layout.language()
    }
}
