mod app;
mod contact_form;
mod logging;
mod terminal_host;

use std::io::stdout;

use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};
use folio_config::Config;

use crate::app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_path = logging::init();
    let config = Config::load()?;
    if let Ok(path) = &log_path {
        log::info!("folio started, logging to {}", path.display());
    }

    let terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture, EnableFocusChange)
        .map_err(Into::into)
        .and_then(|()| App::new(config).run(terminal));
    // Best effort: the terminal is being torn down either way.
    let _ = execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();

    if let Err(err) = log_path {
        eprintln!("folio: logging disabled: {err}");
    }
    result
}
