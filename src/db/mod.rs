//! Persistence module split across logical submodules.

mod bookings;
pub(crate) mod connection;
mod flights;
mod passengers;
mod users;

pub use bookings::{booking_exists, create_booking, fetch_bookings};
pub use connection::{ensure_schema, open_database};
pub use flights::{
    create_flight, delete_flight, fetch_flights, find_flight_by_number, flight_exists,
    update_flight,
};
pub use passengers::{create_passenger, fetch_passengers, passenger_exists};
pub use users::{create_user, find_user_by_credentials};
