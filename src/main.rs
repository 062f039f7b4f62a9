use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use sticky_lang::{create_host, Config, Tracker};

#[derive(Parser, Debug)]
#[command(name = "sticky-lang")]
#[command(about = "Запоминает язык ввода для каждого окна и восстанавливает его при возврате фокуса")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "sticky-lang.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция рабочего стола)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Бэкенд оконной системы: auto, win32, dry_run
    #[arg(long)]
    backend: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    if let Some(backend) = args.backend {
        config.tracking.backend = backend;
        config.validate()?;
    }

    // Инициализация системы логирования
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, &config)?;

    info!("Запуск Sticky Lang v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - окна и раскладки эмулируются");
    }

    let host = create_host(&config, args.dry_run)?;
    let tracker = Tracker::new(host, &config)?;
    tracker.start();

    info!("Программа работает в фоне. Нажмите Ctrl+C для выхода.");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    // Ожидаем завершения цикла (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, tracker.shutdown()).await {
        Ok(()) => info!("Отслеживание завершило работу корректно"),
        Err(_) => warn!("Таймаут при завершении отслеживания"),
    }

    info!(
        "Sticky Lang завершил работу, запомнено окон: {}",
        tracker.preferences().len()
    );
    Ok(())
}

fn init_tracing(level: &str, config: &Config) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let directives = if config.logging.filter.is_empty() {
        level.to_string()
    } else {
        format!("{},{}", level, config.logging.filter)
    };

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directives))?;

    let compact = (config.logging.format == "compact")
        .then(|| tracing_subscriber::fmt::layer().compact());
    let full = (config.logging.format == "full").then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(full)
        .init();

    Ok(())
}
