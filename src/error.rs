use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitcherError {
    #[error("Ошибка запроса к оконной системе: {0}")]
    HostQuery(String),

    #[error("Оконная система отклонила команду: {0}")]
    HostCommand(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),
}

impl SwitcherError {
    /// Ошибки оконной системы считаются временными: тик пропускается, цикл продолжается
    pub fn is_transient(&self) -> bool {
        matches!(self, SwitcherError::HostQuery(_) | SwitcherError::HostCommand(_))
    }
}

pub type Result<T> = std::result::Result<T, SwitcherError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! switcher_error {
    (host_query, $($arg:tt)*) => {
        $crate::error::SwitcherError::HostQuery(format!($($arg)*))
    };
    (host_command, $($arg:tt)*) => {
        $crate::error::SwitcherError::HostCommand(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::SwitcherError::ServiceUnavailable(format!($($arg)*))
    };
}
