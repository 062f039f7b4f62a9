use std::fmt;

/// Заголовок по умолчанию для окон без текста
pub const UNTITLED_WINDOW: &str = "Untitled Window";

/// Числовой дескриптор окна в оконной системе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindow(pub i64);

/// Поток, которому принадлежит окно с фокусом ввода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerThread(pub u32);

/// Ключ окна: заголовок + дескриптор.
///
/// Два окна с одинаковым заголовком различаются по дескриптору; для живого
/// окна ключ стабилен между опросами.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowIdentity {
    title: String,
    handle: i64,
}

impl WindowIdentity {
    pub fn new(title: &str, window: NativeWindow) -> Self {
        Self {
            title: normalize_title(title, UNTITLED_WINDOW),
            handle: window.0,
        }
    }

    /// Вариант с настраиваемой подписью для безымянных окон
    pub fn with_placeholder(title: &str, window: NativeWindow, placeholder: &str) -> Self {
        Self {
            title: normalize_title(title, placeholder),
            handle: window.0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn handle(&self) -> i64 {
        self.handle
    }
}

impl fmt::Display for WindowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.title, self.handle)
    }
}

fn normalize_title(title: &str, placeholder: &str) -> String {
    let trimmed = title.trim_end_matches('\0');
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Окно с фокусом ввода, как его видит резолвер
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedWindow {
    pub identity: WindowIdentity,
    pub window: NativeWindow,
    pub thread: OwnerThread,
}

impl FocusedWindow {
    pub fn new(identity: WindowIdentity, window: NativeWindow, thread: OwnerThread) -> Self {
        Self {
            identity,
            window,
            thread,
        }
    }

    pub fn title(&self) -> &str {
        self.identity.title()
    }
}

impl fmt::Display for FocusedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (ID: {})", self.identity.title(), self.identity)
    }
}
