use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` if set, otherwise `default`
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to a file while the TUI owns the terminal.
pub fn configure_file_logging() -> Result<PathBuf> {
    let log_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("career-chat");
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("career-chat.log");
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("Could not install logger: {}", e))?;

    Ok(log_path)
}

/// Log to stderr for the one-shot subcommands.
pub fn configure_stderr_logging() {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
