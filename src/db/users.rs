use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::DataError;
use crate::models::User;

/// Register a staff account. Emails are unique; signing up twice with the
/// same address is rejected and the caller is pointed at the login flow.
pub fn create_user(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    email: &str,
    position: &str,
    password: &str,
) -> Result<User, DataError> {
    conn.execute(
        "INSERT INTO users (first_name, last_name, email, position, password)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![first_name, last_name, email, position, password],
    )
    .map_err(map_email_conflict)?;

    let id = conn.last_insert_rowid();
    Ok(User {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        position: position.to_string(),
        password: password.to_string(),
    })
}

/// Look up the account matching this first name, position, and password.
/// All three columns are compared exactly as stored; only the role branch
/// after login treats the position case-insensitively.
pub fn find_user_by_credentials(
    conn: &Connection,
    first_name: &str,
    position: &str,
    password: &str,
) -> Result<Option<User>, DataError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, first_name, last_name, email, position, password
             FROM users WHERE first_name = ?1 AND position = ?2 AND password = ?3",
        )
        .map_err(DataError::wrap("failed to prepare credential lookup"))?;

    stmt.query_row(params![first_name, position, password], |row| {
        Ok(User {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            position: row.get(4)?,
            password: row.get(5)?,
        })
    })
    .optional()
    .map_err(DataError::wrap("failed to look up credentials"))
}

fn map_email_conflict(err: rusqlite::Error) -> DataError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        DataError::Duplicate("Email already exists. Try logging in.".to_string())
    } else {
        DataError::wrap("failed to insert user")(err)
    }
}
