//! Binary entry point that glues the SQLite-backed records to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we bring up the database, wire the speech backend,
//! and drive the Ratatui event loop until the user exits.
use airline_desk::announce::CommandAnnouncer;
use airline_desk::{ensure_schema, run_app, App};

/// Initialize persistence, pick a speech backend, and launch the Ratatui event
/// loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// the user removing the writable data directory) to the terminal instead of
/// crashing silently.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let announcer = CommandAnnouncer::system_default();

    let mut app = App::new(conn, Box::new(announcer));
    run_app(&mut app)
}
