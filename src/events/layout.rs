use std::collections::HashMap;
use std::fmt;

/// Идентификатор языка ввода (младшие 16 бит раскладки)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(u16);

impl LanguageId {
    pub const ENGLISH_US: LanguageId = LanguageId(0x0409);
    pub const HEBREW: LanguageId = LanguageId(0x040D);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Составное значение раскладки, как его отдаёт оконная система.
///
/// Младшее слово - язык ввода, старшее - вариант физической раскладки.
/// Восстановление языка меняет только младшее слово.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyboardLayout(u32);

impl KeyboardLayout {
    const LANGUAGE_MASK: u32 = 0x0000_FFFF;
    const PHYSICAL_MASK: u32 = 0xFFFF_0000;

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Раскладка, у которой физическая часть совпадает с языком (типичный случай)
    pub const fn for_language(language: LanguageId) -> Self {
        let lang = language.value() as u32;
        Self((lang << 16) | lang)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn language(self) -> LanguageId {
        LanguageId((self.0 & Self::LANGUAGE_MASK) as u16)
    }

    pub const fn physical_bits(self) -> u32 {
        self.0 & Self::PHYSICAL_MASK
    }

    /// Новый язык в младшем слове, физическая часть текущей раскладки сохраняется
    pub const fn with_language(self, language: LanguageId) -> Self {
        Self((language.value() as u32 & Self::LANGUAGE_MASK) | self.physical_bits())
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Человекочитаемые имена языков для логов
#[derive(Debug, Clone, Default)]
pub struct LanguageNames {
    names: HashMap<LanguageId, String>,
}

impl LanguageNames {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LanguageId, S)>,
        S: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(id, name)| (id, name.into()))
                .collect(),
        }
    }

    pub fn name(&self, language: LanguageId) -> String {
        match self.names.get(&language) {
            Some(name) => name.clone(),
            None => format!("Other ({})", language),
        }
    }
}
