use rusqlite::{params, Connection, ErrorCode};

use crate::error::DataError;
use crate::models::Passenger;

/// Retrieve every passenger in insertion order.
pub fn fetch_passengers(conn: &Connection) -> Result<Vec<Passenger>, DataError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, age, gender, passport_number, contact_info
             FROM passengers ORDER BY id",
        )
        .map_err(DataError::wrap("failed to prepare passenger query"))?;

    let passengers = stmt
        .query_map([], |row| {
            Ok(Passenger {
                id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                gender: row.get(3)?,
                passport_number: row.get(4)?,
                contact_info: row.get(5)?,
            })
        })
        .map_err(DataError::wrap("failed to iterate passengers"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DataError::wrap("failed to collect passengers"))?;

    Ok(passengers)
}

/// Insert a new passenger. Passport numbers are unique; a second registration
/// with the same passport is rejected without touching the table.
pub fn create_passenger(
    conn: &Connection,
    name: &str,
    age: &str,
    gender: &str,
    passport_number: &str,
    contact_info: &str,
) -> Result<Passenger, DataError> {
    conn.execute(
        "INSERT INTO passengers (name, age, gender, passport_number, contact_info)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, age, gender, passport_number, contact_info],
    )
    .map_err(map_passport_conflict)?;

    let id = conn.last_insert_rowid();
    Ok(Passenger {
        id,
        name: name.to_string(),
        age: age.to_string(),
        gender: gender.to_string(),
        passport_number: passport_number.to_string(),
        contact_info: contact_info.to_string(),
    })
}

/// Whether a passenger row with this primary key exists.
pub fn passenger_exists(conn: &Connection, id: i64) -> Result<bool, DataError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM passengers WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(DataError::wrap("failed to check passenger existence"))?;
    Ok(count > 0)
}

fn map_passport_conflict(err: rusqlite::Error) -> DataError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        DataError::Duplicate("A passenger with this passport number already exists.".to_string())
    } else {
        DataError::wrap("failed to insert passenger")(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::memory_database;

    #[test]
    fn create_returns_the_hydrated_row() {
        let conn = memory_database();
        let passenger =
            create_passenger(&conn, "Asha Rao", "34", "F", "P1", "asha@example.com").unwrap();
        assert!(passenger.id > 0);
        assert_eq!(passenger.passport_number, "P1");
    }

    #[test]
    fn duplicate_passport_is_rejected_and_leaves_one_row() {
        let conn = memory_database();
        create_passenger(&conn, "Asha Rao", "34", "F", "P1", "asha@example.com").unwrap();

        let err = create_passenger(&conn, "Dev Nair", "29", "M", "P1", "dev@example.com")
            .unwrap_err();
        match err {
            DataError::Duplicate(message) => {
                assert_eq!(
                    message,
                    "A passenger with this passport number already exists."
                );
            }
            other => panic!("expected a duplicate error, got {other:?}"),
        }

        assert_eq!(fetch_passengers(&conn).unwrap().len(), 1);
    }

    #[test]
    fn existence_probe_tracks_primary_keys() {
        let conn = memory_database();
        let passenger =
            create_passenger(&conn, "Asha Rao", "34", "F", "P1", "asha@example.com").unwrap();
        assert!(passenger_exists(&conn, passenger.id).unwrap());
        assert!(!passenger_exists(&conn, passenger.id + 40).unwrap());
    }
}
