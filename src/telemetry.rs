use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

static TELEMETRY_INIT: OnceLock<()> = OnceLock::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("wavebend=info"))
        .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into()))
}

/// Log to stderr. Only for binaries that don't own the terminal.
pub fn init_stderr() {
    TELEMETRY_INIT.get_or_init(|| {
        if let Err(err) = fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
        {
            eprintln!("[telemetry] failed to initialise tracing subscriber: {err}");
        }
    });
}

/// Append plain-text logs to `path`. The interactive app uses this since stderr is the screen.
pub fn init_file(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    TELEMETRY_INIT.get_or_init(|| {
        // A subscriber may already be installed by an embedding program; keep theirs.
        let _ = fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
    Ok(())
}
