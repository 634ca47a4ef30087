use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".airline-desk";
/// SQLite file name stored inside the application data directory. Every
/// screen shares this one file, so accounts created at signup are always
/// visible to the flight and booking panels.
const DB_FILE_NAME: &str = "airline.sqlite";

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection. The connection is acquired once at startup and handed by
/// reference to every repository call, then dropped when the app exits.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    open_database(&db_path)
}

/// Open (or create) the database at an explicit path and make sure all four
/// tables exist. Integration tests point this at a temporary directory so
/// they exercise the same schema the app runs against.
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Idempotent schema setup, also toggling `PRAGMA foreign_keys = ON` so the
/// referential constraints on bookings behave the same during tests and
/// production runs.
fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS flights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_number TEXT NOT NULL,
            origin TEXT NOT NULL,
            destination TEXT NOT NULL,
            departure_time TEXT NOT NULL,
            arrival_time TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create flights table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS passengers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age TEXT NOT NULL,
            gender TEXT NOT NULL,
            passport_number TEXT NOT NULL UNIQUE,
            contact_info TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create passengers table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            passenger_id INTEGER NOT NULL,
            flight_id INTEGER NOT NULL,
            seat_number TEXT NOT NULL,
            FOREIGN KEY(passenger_id) REFERENCES passengers(id),
            FOREIGN KEY(flight_id) REFERENCES flights(id)
        )",
        [],
    )
    .context("failed to create bookings table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            position TEXT NOT NULL,
            password TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create users table")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

/// Fresh in-memory database with the full schema, for unit tests.
#[cfg(test)]
pub(crate) fn memory_database() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    apply_schema(&conn).expect("schema setup");
    conn
}
