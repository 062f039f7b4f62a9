use crate::config::Config;
use crate::error::{Result, SwitcherError};
use crate::events::{FocusedWindow, KeyboardLayout, LanguageId, Observation, OwnerThread};
use crate::switcher_error;
use std::sync::Arc;
use tracing::{info, warn};

use super::dry_run::SimulatedDesktop;

/// Определяет окно, у которого сейчас фокус ввода
pub trait WindowResolver: Send + Sync {
    /// `Ok(None)` - фокуса нет ни у одного окна, это не ошибка
    fn resolve(&self) -> Result<Option<FocusedWindow>>;
}

/// Чтение и смена раскладки для потока, владеющего окном
pub trait LayoutAccessor: Send + Sync {
    /// `Ok(None)` - поток не удалось определить, опрос пропускается
    fn current_layout(&self, thread: OwnerThread) -> Result<Option<KeyboardLayout>>;

    /// Отправить окну запрос на смену раскладки. Оконная система может его проигнорировать.
    fn post_layout(&self, window: &FocusedWindow, layout: KeyboardLayout) -> Result<()>;

    fn current_language(&self, thread: OwnerThread) -> Result<Option<LanguageId>> {
        Ok(self.current_layout(thread)?.map(KeyboardLayout::language))
    }

    /// Запросить язык `language` для окна, сохранив физическую часть текущей раскладки.
    /// Возвращает отправленное составное значение.
    fn request_language(&self, window: &FocusedWindow, language: LanguageId) -> Result<KeyboardLayout> {
        let current = self.current_layout(window.thread)?.ok_or_else(|| {
            switcher_error!(host_query, "поток {:?} окна {} недоступен", window.thread, window)
        })?;
        let requested = current.with_language(language);
        self.post_layout(window, requested)?;
        Ok(requested)
    }
}

/// Пара сервисов оконной системы, с которыми работает движок
#[derive(Clone)]
pub struct Host {
    resolver: Arc<dyn WindowResolver>,
    layouts: Arc<dyn LayoutAccessor>,
    name: &'static str,
}

impl Host {
    pub fn new(
        resolver: Arc<dyn WindowResolver>,
        layouts: Arc<dyn LayoutAccessor>,
        name: &'static str,
    ) -> Self {
        Self {
            resolver,
            layouts,
            name,
        }
    }

    /// Один бэкенд, реализующий оба интерфейса
    pub fn from_backend<B>(backend: Arc<B>, name: &'static str) -> Self
    where
        B: WindowResolver + LayoutAccessor + 'static,
    {
        Self::new(backend.clone(), backend, name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn layouts(&self) -> &dyn LayoutAccessor {
        self.layouts.as_ref()
    }

    /// Снять наблюдение: окно с фокусом + его раскладка.
    /// `Ok(None)`, если окна нет или поток окна не определяется.
    pub fn observe(&self) -> Result<Option<Observation>> {
        let Some(window) = self.resolver.resolve()? else {
            return Ok(None);
        };

        match self.layouts.current_layout(window.thread)? {
            Some(layout) => Ok(Some(Observation::new(window, layout))),
            None => {
                crate::debug_if_enabled!("Поток окна {} не определён, опрос пропущен", window);
                Ok(None)
            }
        }
    }
}

/// Factory function to create the host backend based on config and the dry_run flag
pub fn create_host(config: &Config, dry_run: bool) -> Result<Host> {
    let backend = if dry_run {
        "dry_run"
    } else {
        config.tracking.backend.as_str()
    };

    match backend {
        "dry_run" => Ok(dry_run_host(config)),
        "win32" => win32_host(config),
        "auto" => {
            if cfg!(windows) {
                win32_host(config)
            } else {
                warn!("Win32 недоступен на этой платформе, используется эмуляция рабочего стола");
                Ok(dry_run_host(config))
            }
        }
        other => Err(SwitcherError::ServiceUnavailable(format!(
            "Неизвестный бэкенд оконной системы: {}",
            other
        ))),
    }
}

fn dry_run_host(config: &Config) -> Host {
    info!("Оконная система: эмуляция (dry-run)");
    Host::from_backend(Arc::new(SimulatedDesktop::from_config(config)), "dry_run")
}

#[cfg(windows)]
fn win32_host(config: &Config) -> Result<Host> {
    info!("Оконная система: Win32");
    let desktop = super::win32::Win32Desktop::new(config.tracking.untitled_label.clone());
    Ok(Host::from_backend(Arc::new(desktop), "win32"))
}

#[cfg(not(windows))]
fn win32_host(_config: &Config) -> Result<Host> {
    Err(switcher_error!(
        service_unavailable,
        "бэкенд win32 доступен только в Windows"
    ))
}
