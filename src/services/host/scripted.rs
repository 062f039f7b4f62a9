//! Тестовый двойник оконной системы: отдаёт заранее заданную последовательность
//! наблюдений и записывает все запросы смены раскладки.

use crate::error::{Result, SwitcherError};
use crate::events::{FocusedWindow, KeyboardLayout, NativeWindow, OwnerThread, WindowIdentity};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::r#trait::{LayoutAccessor, WindowResolver};

#[derive(Debug, Clone)]
pub enum Step {
    Focus {
        title: String,
        handle: i64,
        layout: KeyboardLayout,
    },
    NoWindow,
    UnresolvableThread(String, i64),
    Fail(String),
    /// Паника внутри опроса: фоновая задача завершается аварийно
    Panic,
}

impl Step {
    pub fn focus(title: &str, handle: i64, layout: KeyboardLayout) -> Self {
        Step::Focus {
            title: title.to_string(),
            handle,
            layout,
        }
    }
}

pub struct ScriptedHost {
    steps: Mutex<VecDeque<Step>>,
    current: Mutex<Option<Step>>,
    requests: Mutex<Vec<(WindowIdentity, KeyboardLayout)>>,
    reject_posts: AtomicBool,
    resolves: AtomicUsize,
}

impl ScriptedHost {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            current: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            reject_posts: AtomicBool::new(false),
            resolves: AtomicUsize::new(0),
        }
    }

    pub fn reject_posts(&self, reject: bool) {
        self.reject_posts.store(reject, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<(WindowIdentity, KeyboardLayout)> {
        self.requests.lock().clone()
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    /// Следующий шаг; по окончании сценария повторяется последний
    fn advance(&self) -> Option<Step> {
        let mut current = self.current.lock();
        if let Some(step) = self.steps.lock().pop_front() {
            *current = Some(step);
        }
        current.clone()
    }

    fn focused(title: &str, handle: i64) -> FocusedWindow {
        FocusedWindow::new(
            WindowIdentity::new(title, NativeWindow(handle)),
            NativeWindow(handle),
            OwnerThread(handle as u32),
        )
    }
}

impl WindowResolver for ScriptedHost {
    fn resolve(&self) -> Result<Option<FocusedWindow>> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        match self.advance() {
            Some(Step::Focus { title, handle, .. }) => Ok(Some(Self::focused(&title, handle))),
            Some(Step::UnresolvableThread(title, handle)) => Ok(Some(Self::focused(&title, handle))),
            Some(Step::Fail(msg)) => Err(SwitcherError::HostQuery(msg)),
            Some(Step::Panic) => panic!("scripted host panicked"),
            Some(Step::NoWindow) | None => Ok(None),
        }
    }
}

impl LayoutAccessor for ScriptedHost {
    fn current_layout(&self, _thread: OwnerThread) -> Result<Option<KeyboardLayout>> {
        match self.current.lock().as_ref() {
            Some(Step::Focus { layout, .. }) => Ok(Some(*layout)),
            _ => Ok(None),
        }
    }

    fn post_layout(&self, window: &FocusedWindow, layout: KeyboardLayout) -> Result<()> {
        if self.reject_posts.load(Ordering::SeqCst) {
            return Err(SwitcherError::HostCommand("post rejected".to_string()));
        }
        self.requests.lock().push((window.identity.clone(), layout));
        Ok(())
    }
}
