#[cfg(feature = "log")]
pub use enabled::setup_logger;

#[cfg(not(feature = "log"))]
pub use disabled::setup_logger;

#[cfg(feature = "log")]
mod enabled {
    use std::{fs::File, io};

    use thiserror::Error;
    use tracing::{Level, subscriber::set_global_default};
    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt};

    use crate::config_dir;

    /// The name of the log file inside the config directory.
    const LOG_FILE: &str = "window-snipper.log";

    /// Keeps the non-blocking writers flushing until dropped.
    pub type LoggerGuards = [WorkerGuard; 2];

    #[derive(Debug, Error)]
    pub enum LoggerError {
        #[error("Failed to create the log file:\n{0}")]
        CreateFile(#[from] io::Error),

        #[error("Failed to set the global logger:\n{0}")]
        SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
    }

    pub fn setup_logger(debug: bool) -> Result<LoggerGuards, LoggerError> {
        let level = if debug { Level::DEBUG } else { Level::INFO };
        let filter = tracing_subscriber::filter::Targets::new().with_default(level);

        // stdout logger
        let (std_writer, std_guard) = tracing_appender::non_blocking(io::stdout());
        let std_logger = tracing_subscriber::fmt::layer()
            .with_writer(std_writer)
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE);

        // file logger
        let file = File::create(config_dir().join(LOG_FILE))?;
        let (file_writer, file_guard) = tracing_appender::non_blocking(file);
        let file_logger = tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE);

        // Register loggers
        let collector = tracing_subscriber::registry()
            .with(std_logger)
            .with(file_logger)
            .with(filter);

        set_global_default(collector)?;

        Ok([std_guard, file_guard])
    }
}

#[cfg(not(feature = "log"))]
mod disabled {
    pub type LoggerGuards = ();
    pub type LoggerError = core::convert::Infallible;

    pub fn setup_logger(_debug: bool) -> Result<LoggerGuards, LoggerError> {
        Ok(())
    }
}
