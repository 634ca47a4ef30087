//! Error types shared across the persistence and booking layers. Form-level
//! presence checks stay close to the forms themselves; everything that can go
//! wrong once a request reaches the database is represented here so the UI can
//! match on the failure instead of parsing message strings.

use thiserror::Error;

/// Failures raised by the record repository.
#[derive(Debug, Error)]
pub enum DataError {
    /// A uniqueness invariant was violated on insert (duplicate passport
    /// number, duplicate signup email). The payload is the message shown to
    /// the operator.
    #[error("{0}")]
    Duplicate(String),

    /// An update or delete matched zero rows.
    #[error("{0}")]
    NotFound(String),

    /// Any other SQLite failure, tagged with the statement that produced it.
    #[error("{context}: {source}")]
    Sqlite {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl DataError {
    /// Wrap a raw SQLite error with a short description of the failing
    /// statement. Used as `map_err(DataError::wrap("..."))` so call sites read
    /// like the rest of the persistence code.
    pub(crate) fn wrap(context: &'static str) -> impl FnOnce(rusqlite::Error) -> DataError {
        move |source| DataError::Sqlite { context, source }
    }
}

/// Failures raised while validating or creating a booking. The first three
/// variants correspond to the ordered referential checks; they short-circuit,
/// so a request with both IDs missing reports only the passenger.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Passenger ID does not exist.")]
    PassengerNotFound,

    #[error("Flight ID does not exist.")]
    FlightNotFound,

    #[error("This passenger is already booked on this flight.")]
    AlreadyBooked,

    #[error(transparent)]
    Data(#[from] DataError),
}
