use crate::events::{LanguageId, WindowIdentity};
use std::collections::HashMap;

/// Запомненный язык окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPreference {
    pub window_id: WindowIdentity,
    /// Только для диагностики
    pub title: String,
    pub language: LanguageId,
}

impl WindowPreference {
    pub fn new(window_id: WindowIdentity, language: LanguageId) -> Self {
        let title = window_id.title().to_string();
        Self {
            window_id,
            title,
            language,
        }
    }
}

/// Таблица предпочтений в памяти: одна запись на окно, без вытеснения
#[derive(Debug, Default)]
pub struct PreferenceStore {
    entries: HashMap<WindowIdentity, WindowPreference>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, window_id: &WindowIdentity) -> Option<&WindowPreference> {
        self.entries.get(window_id)
    }

    /// Вставка или перезапись; возвращает прежнее значение
    pub fn set(&mut self, preference: WindowPreference) -> Option<WindowPreference> {
        self.entries.insert(preference.window_id.clone(), preference)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowPreference> {
        self.entries.values()
    }
}
