use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Env var holding the log filter directive, e.g. `project_hub=debug`
pub const LOG_ENV: &str = "PH_LOG";
/// Set to `json` for JSON log lines
pub const LOG_FORMAT_ENV: &str = "PH_LOG_FORMAT";

const DEFAULT_FILTER: &str = "project_hub=info";

/// `<data dir>/project-hub/ph.log`, falling back to the working directory
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("project-hub"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ph.log")
}

/// Route tracing output to a log file; the terminal belongs to the TUI.
///
/// Failing to open the file leaves logging disabled rather than aborting.
pub fn init_tracing(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);
    let writer = Mutex::new(file);

    let result = match format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(writer))
            .try_init(),
        _ => registry
            .with(fmt::layer().compact().with_ansi(false).with_writer(writer))
            .try_init(),
    };
    if result.is_err() {
        // A subscriber is already installed (tests, embedding)
        tracing::debug!("tracing already initialised");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_log_name() {
        let path = default_log_path();
        assert!(path.ends_with("project-hub/ph.log") || path.ends_with("ph.log"));
    }

    #[test]
    fn init_creates_log_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("ph.log");
        init_tracing(&path).unwrap();
        assert!(path.exists());
    }
}
