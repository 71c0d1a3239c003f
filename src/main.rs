use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::KeyResolver;
use crate::handoff::SystemLauncher;

mod app;
mod catalog;
mod cli;
pub mod commands;
mod config;
mod handoff;
mod storefront;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting digitalhub");

    let args = cli::Args::parse();

    let config = config::load()?;
    let catalog = catalog::resolve(args.catalog.as_deref(), config.catalog.path.as_deref())?;
    let theme_name = args.theme.as_deref().unwrap_or(&config.theme.name);
    let theme = theme::theme_from_name(theme_name);
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings)));

    let mut app = App::new(&catalog, resolver, theme, Box::new(SystemLauncher));
    if let Some(service) = &args.service {
        app.open_service(service)?;
    }
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("digitalhub").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "digitalhub.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
