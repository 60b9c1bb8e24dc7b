use mazetrace::{app, config::Config};
use tracing_appender::non_blocking::WorkerGuard;

/// Install a file subscriber; stdout is owned by the terminal UI.
/// The returned guard must live until exit so buffered lines get flushed.
fn init_logging(config: &Config) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "mazetrace.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(config.log_level)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    let (config, warnings) = Config::from_env();
    let _guard = init_logging(&config);
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!("Starting with {:?}", config);

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout, &config);
    app::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("App exited with error: {}", e);
    }
    result
}
