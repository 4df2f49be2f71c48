//! Log file setup. The terminal belongs to the UI, so records go to
//! `folio.log` in the data directory.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use color_eyre::eyre::WrapErr;

const LOG_FILE: &str = "folio.log";

/// Start logging to the data directory. `RUST_LOG` overrides the
/// default `warn` filter.
pub fn init() -> color_eyre::Result<PathBuf> {
    let dir = folio_config::data_dir()?;
    fs::create_dir_all(&dir).wrap_err_with(|| format!("creating {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(path)
}
