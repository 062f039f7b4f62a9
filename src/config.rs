use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::events::{LanguageId, LanguageNames};
use crate::events::window::UNTITLED_WINDOW;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub languages: Vec<LanguageLabel>,
    pub dry_run: DryRunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingConfig {
    pub poll_interval_ms: u64,
    pub backend: String,
    pub untitled_label: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageLabel {
    pub id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DryRunConfig {
    pub switch_every_ticks: u32,
    #[serde(default)]
    pub windows: Vec<SimulatedWindow>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatedWindow {
    pub title: String,
    pub handle: i64,
    pub language: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
                filter: String::new(),
            },
            tracking: TrackingConfig {
                poll_interval_ms: 500,
                backend: "auto".to_string(),
                untitled_label: UNTITLED_WINDOW.to_string(),
            },
            languages: vec![
                LanguageLabel {
                    id: LanguageId::ENGLISH_US.value(),
                    name: "English".to_string(),
                },
                LanguageLabel {
                    id: LanguageId::HEBREW.value(),
                    name: "Hebrew".to_string(),
                },
            ],
            dry_run: DryRunConfig {
                switch_every_ticks: 4,
                windows: vec![
                    SimulatedWindow {
                        title: "Terminal - dry_run".to_string(),
                        handle: 0x10010,
                        language: LanguageId::ENGLISH_US.value(),
                    },
                    SimulatedWindow {
                        title: "Browser - dry_run".to_string(),
                        handle: 0x20020,
                        language: LanguageId::HEBREW.value(),
                    },
                    SimulatedWindow {
                        title: String::new(),
                        handle: 0x30030,
                        language: LanguageId::ENGLISH_US.value(),
                    },
                ],
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("STICKY_LANG_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек отслеживания
        if self.tracking.poll_interval_ms < 50 {
            anyhow::bail!("poll_interval_ms должно быть минимум 50");
        }

        match self.tracking.backend.as_str() {
            "auto" | "win32" | "dry_run" => {}
            _ => anyhow::bail!("Неверный бэкенд оконной системы: {}", self.tracking.backend),
        }

        if self.tracking.untitled_label.trim().is_empty() {
            anyhow::bail!("untitled_label не может быть пустым");
        }

        // Валидация имён языков
        for (i, label) in self.languages.iter().enumerate() {
            if label.name.trim().is_empty() {
                anyhow::bail!("Пустое имя языка 0x{:04X} в записи #{}", label.id, i + 1);
            }
        }

        // Валидация эмуляции
        if self.dry_run.switch_every_ticks == 0 {
            anyhow::bail!("switch_every_ticks должно быть больше 0");
        }

        let mut handles = std::collections::HashSet::new();
        for window in &self.dry_run.windows {
            if !handles.insert(window.handle) {
                anyhow::bail!("Повторяющийся дескриптор окна в dry_run.windows: {}", window.handle);
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tracking.poll_interval_ms)
    }

    pub fn language_names(&self) -> LanguageNames {
        LanguageNames::new(
            self.languages
                .iter()
                .map(|label| (LanguageId::new(label.id), label.name.clone())),
        )
    }
}
