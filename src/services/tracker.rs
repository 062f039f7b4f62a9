use crate::config::Config;
use crate::error::{Result, SwitcherError};
use crate::events::LanguageNames;
use crate::services::host::Host;
use crate::services::preference_store::WindowPreference;
use crate::services::reconciler::{EngineState, Reconciler, Reconciliation};
use crate::{debug_if_enabled, trace_if_enabled};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Цикл отслеживания: раз в интервал снимает наблюдение и согласует его
/// с таблицей предпочтений.
///
/// `start()`/`stop()` синхронные и идемпотентные, их можно вызывать из любого
/// потока. Таблица предпочтений живёт вместе с экземпляром и переживает
/// `stop()`/`start()`.
pub struct Tracker {
    engine: Arc<Engine>,
    interval: Duration,
    runtime: Handle,
    task: Mutex<Option<TrackingTask>>,
}

struct TrackingTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct Engine {
    host: Host,
    names: LanguageNames,
    reconciler: Mutex<Reconciler>,
}

impl Tracker {
    /// Создаёт трекер на текущем Tokio runtime
    pub fn new(host: Host, config: &Config) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            SwitcherError::ServiceUnavailable(format!("Tokio runtime недоступен: {}", e))
        })?;
        Ok(Self::with_runtime(host, config, runtime))
    }

    pub fn with_runtime(host: Host, config: &Config, runtime: Handle) -> Self {
        info!(
            "Инициализация Tracker (бэкенд: {}, интервал: {}мс)",
            host.name(),
            config.tracking.poll_interval_ms
        );

        Self {
            engine: Arc::new(Engine {
                host,
                names: config.language_names(),
                reconciler: Mutex::new(Reconciler::new()),
            }),
            interval: config.poll_interval(),
            runtime,
            task: Mutex::new(None),
        }
    }

    /// Запустить отслеживание. `false`, если оно уже идёт.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            debug_if_enabled!("Отслеживание уже запущено");
            return false;
        }

        let token = CancellationToken::new();
        let handle = self.runtime.spawn(run_loop(
            Arc::clone(&self.engine),
            self.interval,
            token.clone(),
        ));
        *task = Some(TrackingTask { token, handle });

        info!("Автоматическое переключение языка запущено");
        true
    }

    /// Остановить отслеживание. `false`, если оно уже остановлено.
    pub fn stop(&self) -> bool {
        match self.task.lock().take() {
            Some(task) if !task.handle.is_finished() => {
                task.token.cancel();
                info!("Автоматическое переключение языка остановлено");
                true
            }
            _ => {
                debug_if_enabled!("Отслеживание уже остановлено");
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Остановить и дождаться завершения фоновой задачи
    pub async fn shutdown(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.token.cancel();
            if let Err(e) = task.handle.await {
                warn!("Задача отслеживания завершилась с ошибкой: {}", e);
            }
            info!("Отслеживание завершено");
        }
    }

    /// Один проход согласования вне фонового цикла
    pub fn tick(&self) -> Result<Option<Reconciliation>> {
        self.engine.tick()
    }

    pub fn preferences(&self) -> Vec<WindowPreference> {
        self.engine.reconciler.lock().store().iter().cloned().collect()
    }

    pub fn state(&self) -> EngineState {
        self.engine.reconciler.lock().state().clone()
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.token.cancel();
        }
    }
}

async fn run_loop(engine: Arc<Engine>, interval: Duration, token: CancellationToken) {
    info!("Цикл отслеживания запущен");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = sleep(interval) => {}
        }

        match engine.tick() {
            Ok(_) => trace_if_enabled!("Отслеживание активно..."),
            Err(e) if e.is_transient() => warn!("Опрос пропущен: {}", e),
            Err(e) => error!("Ошибка опроса: {}", e),
        }
    }

    info!("Цикл отслеживания остановлен");
}

impl Engine {
    fn tick(&self) -> Result<Option<Reconciliation>> {
        let Some(observation) = self.host.observe()? else {
            return Ok(None);
        };

        let mut reconciler = self.reconciler.lock();
        let decision = reconciler.decide(&observation);
        let window = &observation.window;

        if decision.is_window_change() {
            info!("Смена окна на: {}", window);
        }

        match decision {
            Reconciliation::Restore { stored } => {
                // Ошибка команды прерывает тик до commit: состояние остаётся прежним
                let requested = self.host.layouts().request_language(window, stored)?;
                info!(
                    "Язык в окне \"{}\" изменён на: {} (раскладка {})",
                    window.title(),
                    self.names.name(stored),
                    requested
                );
            }
            Reconciliation::Baseline => {
                info!(
                    "Новое окно: \"{}\", оставляем текущий язык: {}",
                    window.title(),
                    self.names.name(observation.language())
                );
            }
            Reconciliation::LanguageChanged { .. } => {
                info!(
                    "Сохранён новый язык для окна \"{}\": {}",
                    window.title(),
                    self.names.name(observation.language())
                );
            }
            Reconciliation::Returned => {
                debug_if_enabled!("Язык окна {} уже совпадает с запомненным", window);
            }
            Reconciliation::Unchanged => {}
        }

        reconciler.commit(&observation, &decision);
        Ok(Some(decision))
    }
}
