//! Random seat assignment for new bookings.

use rand::Rng;

const SEAT_ROWS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Draw a seat label such as `042-B`: a zero-padded cabin number from 1 to
/// 150 and one of the four row letters. Nothing tracks occupancy, so two
/// bookings can land on the same seat.
pub fn allocate_seat() -> String {
    let mut rng = rand::thread_rng();
    let number: u16 = rng.gen_range(1..=150);
    let row = SEAT_ROWS[rng.gen_range(0..SEAT_ROWS.len())];
    format!("{number:03}-{row}")
}
