//! Common Table - Demo Entry Point
//!
//! Opens a window with a device table and its edit dialog.

use anyhow::Context as _;
use common_table::app::{application::run_app, dirs};
use common_table::settings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() -> anyhow::Result<WorkerGuard> {
    let directory = dirs::get_or_create_log_dir().context("log directory")?;
    let file_appender = tracing_appender::rolling::daily(&directory, "common-table.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_line_number(true),
        )
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let _guard = init_logging()?;

    tracing::info!("Starting Common Table...");

    let path = dirs::settings_path().context("settings path")?;
    let settings = settings::load(&path).with_context(|| format!("loading {}", path.display()))?;

    run_app(settings);
    Ok(())
}
