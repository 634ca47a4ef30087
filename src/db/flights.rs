use rusqlite::{params, Connection, OptionalExtension};

use crate::error::DataError;
use crate::models::Flight;

/// Retrieve every flight in insertion order. The admin list leans on this as
/// the single source of truth for row ordering.
pub fn fetch_flights(conn: &Connection) -> Result<Vec<Flight>, DataError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, flight_number, origin, destination, departure_time, arrival_time
             FROM flights ORDER BY id",
        )
        .map_err(DataError::wrap("failed to prepare flight query"))?;

    let flights = stmt
        .query_map([], |row| {
            Ok(Flight {
                id: row.get(0)?,
                flight_number: row.get(1)?,
                origin: row.get(2)?,
                destination: row.get(3)?,
                departure_time: row.get(4)?,
                arrival_time: row.get(5)?,
            })
        })
        .map_err(DataError::wrap("failed to iterate flights"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DataError::wrap("failed to collect flights"))?;

    Ok(flights)
}

/// Insert a new flight row, returning the hydrated struct so the caller can
/// push it straight into the in-memory list. `flight_number` carries no
/// uniqueness constraint; repeated numbers simply create more rows.
pub fn create_flight(
    conn: &Connection,
    flight_number: &str,
    origin: &str,
    destination: &str,
    departure_time: &str,
    arrival_time: &str,
) -> Result<Flight, DataError> {
    conn.execute(
        "INSERT INTO flights (flight_number, origin, destination, departure_time, arrival_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![flight_number, origin, destination, departure_time, arrival_time],
    )
    .map_err(DataError::wrap("failed to insert flight"))?;

    let id = conn.last_insert_rowid();
    Ok(Flight {
        id,
        flight_number: flight_number.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_time: departure_time.to_string(),
        arrival_time: arrival_time.to_string(),
    })
}

/// Look up a flight by its number. When several rows share the number, the
/// first one the scan produces is returned; which one that is stays
/// unspecified.
pub fn find_flight_by_number(
    conn: &Connection,
    flight_number: &str,
) -> Result<Option<Flight>, DataError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, flight_number, origin, destination, departure_time, arrival_time
             FROM flights WHERE flight_number = ?1",
        )
        .map_err(DataError::wrap("failed to prepare flight lookup"))?;

    stmt.query_row(params![flight_number], |row| {
        Ok(Flight {
            id: row.get(0)?,
            flight_number: row.get(1)?,
            origin: row.get(2)?,
            destination: row.get(3)?,
            departure_time: row.get(4)?,
            arrival_time: row.get(5)?,
        })
    })
    .optional()
    .map_err(DataError::wrap("failed to look up flight"))
}

/// Whether a flight row with this primary key exists. The booking validator
/// uses this before any write happens.
pub fn flight_exists(conn: &Connection, id: i64) -> Result<bool, DataError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM flights WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(DataError::wrap("failed to check flight existence"))?;
    Ok(count > 0)
}

/// Rewrite the route and times for every flight carrying `flight_number`.
/// Surfaces a not-found error when nothing matched so the UI can report it
/// instead of silently continuing.
pub fn update_flight(
    conn: &Connection,
    flight_number: &str,
    origin: &str,
    destination: &str,
    departure_time: &str,
    arrival_time: &str,
) -> Result<usize, DataError> {
    let updated = conn
        .execute(
            "UPDATE flights
             SET origin = ?1, destination = ?2, departure_time = ?3, arrival_time = ?4
             WHERE flight_number = ?5",
            params![origin, destination, departure_time, arrival_time, flight_number],
        )
        .map_err(DataError::wrap("failed to update flight"))?;

    if updated == 0 {
        Err(DataError::NotFound(
            "No flight found with that flight number.".to_string(),
        ))
    } else {
        Ok(updated)
    }
}

/// Remove every flight carrying `flight_number`. Deleting a number that is
/// not present affects zero rows and reports not-found.
pub fn delete_flight(conn: &Connection, flight_number: &str) -> Result<usize, DataError> {
    let deleted = conn
        .execute(
            "DELETE FROM flights WHERE flight_number = ?1",
            params![flight_number],
        )
        .map_err(DataError::wrap("failed to delete flight"))?;

    if deleted == 0 {
        Err(DataError::NotFound(
            "No flight found with that flight number.".to_string(),
        ))
    } else {
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::memory_database;

    #[test]
    fn add_then_search_returns_the_inserted_values() {
        let conn = memory_database();
        create_flight(&conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();

        let found = find_flight_by_number(&conn, "AI202")
            .unwrap()
            .expect("flight should be found");
        assert_eq!(found.flight_number, "AI202");
        assert_eq!(found.origin, "DEL");
        assert_eq!(found.destination, "BOM");
        assert_eq!(found.departure_time, "10:00");
        assert_eq!(found.arrival_time, "12:00");
    }

    #[test]
    fn search_misses_report_nothing_found() {
        let conn = memory_database();
        assert!(find_flight_by_number(&conn, "ZZ999").unwrap().is_none());
    }

    #[test]
    fn update_of_missing_flight_leaves_table_unchanged() {
        let conn = memory_database();
        create_flight(&conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();

        let err = update_flight(&conn, "QF1", "SYD", "LAX", "09:00", "17:00").unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));

        let flights = fetch_flights(&conn).unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].origin, "DEL");
    }

    #[test]
    fn update_rewrites_the_matched_flight() {
        let conn = memory_database();
        create_flight(&conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();

        let updated = update_flight(&conn, "AI202", "DEL", "GOI", "11:30", "14:00").unwrap();
        assert_eq!(updated, 1);

        let found = find_flight_by_number(&conn, "AI202").unwrap().unwrap();
        assert_eq!(found.destination, "GOI");
        assert_eq!(found.departure_time, "11:30");
    }

    #[test]
    fn delete_of_missing_flight_affects_zero_rows() {
        let conn = memory_database();
        let err = delete_flight(&conn, "AI202").unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
        assert!(fetch_flights(&conn).unwrap().is_empty());
    }

    #[test]
    fn delete_removes_the_flight() {
        let conn = memory_database();
        create_flight(&conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();
        assert_eq!(delete_flight(&conn, "AI202").unwrap(), 1);
        assert!(fetch_flights(&conn).unwrap().is_empty());
    }

    #[test]
    fn existence_probe_tracks_primary_keys() {
        let conn = memory_database();
        let flight = create_flight(&conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();
        assert!(flight_exists(&conn, flight.id).unwrap());
        assert!(!flight_exists(&conn, flight.id + 1).unwrap());
    }
}
