//! File logging. The terminal belongs to the UI, so records go to a file.

use std::{fs::File, path::PathBuf};

use color_eyre::eyre::WrapErr;
use env_logger::{Builder, Target};
use orrery_config::Config;

/// Where the log file goes: the platform data directory, else the temp dir.
pub fn log_path() -> PathBuf {
    Config::project_dirs()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
        .join("orrery.log")
}

/// Install the global logger. `RUST_LOG` wins over `level`.
pub fn init(level: &str) -> color_eyre::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("failed to install logger")?;
    Ok(path)
}
