//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so the other layers can
//! focus on presentation and persistence logic; anything that needs to know
//! how a row is keyed or displayed reads it from here.

use std::fmt;

#[derive(Debug, Clone)]
/// A scheduled route record. Everything except the generated `id` is stored
/// as free text: times are whatever the operator typed, and `flight_number`
/// is deliberately *not* unique, so several rows may share one.
pub struct Flight {
    /// Primary key from the database. Bookings reference it, and the list
    /// views show it so the operator can read it back when booking.
    pub id: i64,
    /// Airline-style designator such as `AI202`. Also the match key for
    /// update and delete, which touch every row carrying it.
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
}

impl Flight {
    /// One-line route summary used by the admin list and spoken search
    /// results.
    pub fn route(&self) -> String {
        format!("{} to {}", self.origin, self.destination)
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, dep {} arr {})",
            self.flight_number,
            self.route(),
            self.departure_time,
            self.arrival_time
        )
    }
}

#[derive(Debug, Clone)]
/// A traveler record keyed by a unique passport number. Created once and
/// never edited in-app.
pub struct Passenger {
    /// Primary key; the booking form asks the operator for this value.
    pub id: i64,
    pub name: String,
    /// Kept as free text: the entry form only checks presence, not format.
    pub age: String,
    pub gender: String,
    /// Unique across all passengers; a second insert with the same value is
    /// rejected as a duplicate entry.
    pub passport_number: String,
    pub contact_info: String,
}

#[derive(Debug, Clone)]
/// Associates one passenger with one flight, carrying the seat assigned at
/// booking time. A `(passenger_id, flight_id)` pair occurs at most once;
/// seat numbers are not checked for collisions on the same flight.
pub struct Booking {
    pub id: i64,
    pub passenger_id: i64,
    pub flight_id: i64,
    pub seat_number: String,
}

#[derive(Debug, Clone)]
/// A staff account created through the signup form. The password is stored
/// as plaintext, and login matches only `(first_name, position, password)`;
/// `last_name` and `email` exist for the record alone.
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique; a duplicate signup is told to log in instead.
    pub email: String,
    /// Free-text role the user claimed at signup. Interpreted by
    /// [`Role::parse`] after a successful credential match.
    pub position: String,
    pub password: String,
}

/// Which panel a signed-in user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Attendant,
}

impl Role {
    /// Interpret the free-text position field, ignoring case and surrounding
    /// whitespace. Anything other than the two known roles yields `None` and
    /// is reported as an invalid position.
    pub fn parse(position: &str) -> Option<Role> {
        match position.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "flight attendant" => Some(Role::Attendant),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Flight Attendant"), Some(Role::Attendant));
        assert_eq!(Role::parse("  flight attendant  "), Some(Role::Attendant));
    }

    #[test]
    fn role_parse_rejects_unknown_positions() {
        assert_eq!(Role::parse("pilot"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("attendant"), None);
    }

    #[test]
    fn flight_display_reads_like_a_status_line() {
        let flight = Flight {
            id: 1,
            flight_number: "AI202".into(),
            origin: "DEL".into(),
            destination: "BOM".into(),
            departure_time: "10:00".into(),
            arrival_time: "12:00".into(),
        };
        assert_eq!(flight.to_string(), "AI202 (DEL to BOM, dep 10:00 arr 12:00)");
    }
}
