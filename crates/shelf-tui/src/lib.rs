//! Full-screen TUI for shelf.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
pub use runtime::TuiRuntime;
use shelf_core::Config;
use shelf_core::auth::Route;

/// Runs the interactive admin UI, starting at `start_path` (subject to the
/// route guard once the session is known).
pub async fn run_interactive(config: &Config, start_path: &str) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive UI requires a terminal.\n\
             Use `shelf products` for non-interactive listing."
        );
    }

    let mut err = stderr();
    writeln!(err, "shelf - {}", config.base_url())?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(config, Route::parse(start_path))?;
    runtime.run()?;

    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
