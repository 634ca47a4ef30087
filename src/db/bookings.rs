use rusqlite::{params, Connection};

use crate::error::DataError;
use crate::models::Booking;

/// Retrieve every booking in insertion order.
pub fn fetch_bookings(conn: &Connection) -> Result<Vec<Booking>, DataError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, passenger_id, flight_id, seat_number
             FROM bookings ORDER BY id",
        )
        .map_err(DataError::wrap("failed to prepare booking query"))?;

    let bookings = stmt
        .query_map([], |row| {
            Ok(Booking {
                id: row.get(0)?,
                passenger_id: row.get(1)?,
                flight_id: row.get(2)?,
                seat_number: row.get(3)?,
            })
        })
        .map_err(DataError::wrap("failed to iterate bookings"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DataError::wrap("failed to collect bookings"))?;

    Ok(bookings)
}

/// Whether this passenger already holds a booking on this flight. The
/// validator runs this after both referential checks pass.
pub fn booking_exists(
    conn: &Connection,
    passenger_id: i64,
    flight_id: i64,
) -> Result<bool, DataError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM bookings WHERE passenger_id = ?1 AND flight_id = ?2",
            params![passenger_id, flight_id],
            |row| row.get(0),
        )
        .map_err(DataError::wrap("failed to check for an existing booking"))?;
    Ok(count > 0)
}

/// Insert a booking row. Callers are expected to have validated both IDs
/// already; this function only persists.
pub fn create_booking(
    conn: &Connection,
    passenger_id: i64,
    flight_id: i64,
    seat_number: &str,
) -> Result<Booking, DataError> {
    conn.execute(
        "INSERT INTO bookings (passenger_id, flight_id, seat_number)
         VALUES (?1, ?2, ?3)",
        params![passenger_id, flight_id, seat_number],
    )
    .map_err(DataError::wrap("failed to insert booking"))?;

    let id = conn.last_insert_rowid();
    Ok(Booking {
        id,
        passenger_id,
        flight_id,
        seat_number: seat_number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::memory_database;
    use crate::db::flights::create_flight;
    use crate::db::passengers::create_passenger;

    fn seeded(conn: &Connection) -> (i64, i64) {
        let passenger =
            create_passenger(conn, "Asha Rao", "34", "F", "P1", "asha@example.com").unwrap();
        let flight = create_flight(conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();
        (passenger.id, flight.id)
    }

    #[test]
    fn existence_flips_once_a_booking_lands() {
        let conn = memory_database();
        let (passenger_id, flight_id) = seeded(&conn);

        assert!(!booking_exists(&conn, passenger_id, flight_id).unwrap());
        create_booking(&conn, passenger_id, flight_id, "042-B").unwrap();
        assert!(booking_exists(&conn, passenger_id, flight_id).unwrap());
    }

    #[test]
    fn create_returns_the_hydrated_row() {
        let conn = memory_database();
        let (passenger_id, flight_id) = seeded(&conn);

        let booking = create_booking(&conn, passenger_id, flight_id, "007-A").unwrap();
        assert!(booking.id > 0);
        assert_eq!(booking.seat_number, "007-A");

        let all = fetch_bookings(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].passenger_id, passenger_id);
        assert_eq!(all[0].flight_id, flight_id);
    }
}
