//! Referential checks and the end-to-end booking operation.

use rusqlite::Connection;

use crate::db;
use crate::error::BookingError;
use crate::models::Booking;
use crate::seats::allocate_seat;

/// Run the ordered referential checks for a booking request. The checks
/// short-circuit: a request with both IDs missing reports only the
/// passenger.
pub fn validate_booking(
    conn: &Connection,
    passenger_id: i64,
    flight_id: i64,
) -> Result<(), BookingError> {
    if !db::passenger_exists(conn, passenger_id)? {
        return Err(BookingError::PassengerNotFound);
    }
    if !db::flight_exists(conn, flight_id)? {
        return Err(BookingError::FlightNotFound);
    }
    if db::booking_exists(conn, passenger_id, flight_id)? {
        return Err(BookingError::AlreadyBooked);
    }
    Ok(())
}

/// Validate, draw a seat, and persist the booking. Nothing is written when
/// any check fails.
pub fn book_flight(
    conn: &Connection,
    passenger_id: i64,
    flight_id: i64,
) -> Result<Booking, BookingError> {
    validate_booking(conn, passenger_id, flight_id)?;
    let seat = allocate_seat();
    let booking = db::create_booking(conn, passenger_id, flight_id, &seat)?;
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::memory_database;

    fn seeded(conn: &Connection) -> (i64, i64) {
        let passenger =
            db::create_passenger(conn, "Asha Rao", "34", "F", "P1", "asha@example.com").unwrap();
        let flight = db::create_flight(conn, "AI202", "DEL", "BOM", "10:00", "12:00").unwrap();
        (passenger.id, flight.id)
    }

    #[test]
    fn missing_passenger_is_reported_before_the_flight() {
        let conn = memory_database();
        let err = validate_booking(&conn, 1, 1).unwrap_err();
        assert!(matches!(err, BookingError::PassengerNotFound));
    }

    #[test]
    fn missing_flight_is_reported_once_the_passenger_checks_out() {
        let conn = memory_database();
        let passenger =
            db::create_passenger(&conn, "Asha Rao", "34", "F", "P1", "asha@example.com").unwrap();
        let err = validate_booking(&conn, passenger.id, 99).unwrap_err();
        assert!(matches!(err, BookingError::FlightNotFound));
    }

    #[test]
    fn double_booking_is_rejected() {
        let conn = memory_database();
        let (passenger_id, flight_id) = seeded(&conn);
        book_flight(&conn, passenger_id, flight_id).unwrap();

        let err = book_flight(&conn, passenger_id, flight_id).unwrap_err();
        assert!(matches!(err, BookingError::AlreadyBooked));
        assert_eq!(db::fetch_bookings(&conn).unwrap().len(), 1);
    }

    #[test]
    fn booking_persists_exactly_one_row_with_a_cabin_seat() {
        let conn = memory_database();
        let (passenger_id, flight_id) = seeded(&conn);

        let booking = book_flight(&conn, passenger_id, flight_id).unwrap();
        assert_eq!(booking.passenger_id, passenger_id);
        assert_eq!(booking.flight_id, flight_id);

        let seat = &booking.seat_number;
        assert_eq!(seat.len(), 5);
        assert!(seat[..3].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&seat[3..4], "-");
        assert!(matches!(&seat[4..], "A" | "B" | "C" | "D"));

        assert_eq!(db::fetch_bookings(&conn).unwrap().len(), 1);
    }

    #[test]
    fn rejected_requests_write_nothing() {
        let conn = memory_database();
        let (passenger_id, _) = seeded(&conn);

        let err = book_flight(&conn, passenger_id, 404).unwrap_err();
        assert!(matches!(err, BookingError::FlightNotFound));
        assert!(db::fetch_bookings(&conn).unwrap().is_empty());
    }
}
