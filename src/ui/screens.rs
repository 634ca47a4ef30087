use std::cmp::min;

use crate::models::{Booking, Flight, Passenger};

/// Backing state for the admin flight list.
pub(crate) struct FlightBoard {
    pub(crate) flights: Vec<Flight>,
    pub(crate) selected: usize,
    pub(crate) scroll: u16,
}

impl FlightBoard {
    pub(crate) fn new(flights: Vec<Flight>) -> Self {
        let mut board = Self {
            flights,
            selected: 0,
            scroll: 0,
        };
        board.ensure_in_bounds();
        board
    }

    pub(crate) fn current_flight(&self) -> Option<&Flight> {
        self.flights.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.flights.is_empty() {
            return;
        }
        let len = self.flights.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
        self.update_scroll();
    }

    pub(crate) fn select_first(&mut self) {
        if !self.flights.is_empty() {
            self.selected = 0;
        }
        self.update_scroll();
    }

    pub(crate) fn select_last(&mut self) {
        if !self.flights.is_empty() {
            self.selected = self.flights.len() - 1;
        }
        self.update_scroll();
    }

    /// Replace the backing rows, optionally focusing the row with the given
    /// primary key.
    pub(crate) fn set_flights(&mut self, flights: Vec<Flight>, focus_id: Option<i64>) {
        self.flights = flights;
        if let Some(id) = focus_id {
            if let Some(idx) = self.flights.iter().position(|flight| flight.id == id) {
                self.selected = idx;
            }
        }
        self.ensure_in_bounds();
        self.update_scroll();
    }

    /// Focus the first row carrying this flight number.
    pub(crate) fn focus_number(&mut self, flight_number: &str) {
        if let Some(idx) = self
            .flights
            .iter()
            .position(|flight| flight.flight_number == flight_number)
        {
            self.selected = idx;
            self.update_scroll();
        }
    }

    pub(crate) fn display_lines(&self) -> Vec<String> {
        self.flights
            .iter()
            .enumerate()
            .map(|(idx, flight)| {
                let pointer = if idx == self.selected { "> " } else { "  " };
                format!("{pointer}{flight}")
            })
            .collect()
    }

    fn ensure_in_bounds(&mut self) {
        if self.flights.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.flights.len() {
            self.selected = self.flights.len() - 1;
        }
    }

    fn update_scroll(&mut self) {
        if self.flights.is_empty() {
            self.scroll = 0;
            return;
        }
        let desired = self.selected.saturating_sub(3) as u16;
        let max_scroll = self.flights.len().saturating_sub(1) as u16;
        self.scroll = min(desired, max_scroll);
    }
}

/// Which list the attendant screen is showing.
#[derive(PartialEq, Eq)]
pub(crate) enum AttendantPane {
    Passengers,
    Bookings,
}

/// Backing state for the flight attendant screen. One pane is visible at a
/// time; Tab flips between the passenger roster and the booking ledger.
pub(crate) struct AttendantScreen {
    pub(crate) passengers: Vec<Passenger>,
    pub(crate) bookings: Vec<Booking>,
    pub(crate) pane: AttendantPane,
    pub(crate) selected: usize,
    pub(crate) scroll: u16,
}

impl AttendantScreen {
    pub(crate) fn new(passengers: Vec<Passenger>, bookings: Vec<Booking>) -> Self {
        Self {
            passengers,
            bookings,
            pane: AttendantPane::Passengers,
            selected: 0,
            scroll: 0,
        }
    }

    pub(crate) fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            AttendantPane::Passengers => AttendantPane::Bookings,
            AttendantPane::Bookings => AttendantPane::Passengers,
        };
        self.selected = 0;
        self.scroll = 0;
    }

    pub(crate) fn current_len(&self) -> usize {
        match self.pane {
            AttendantPane::Passengers => self.passengers.len(),
            AttendantPane::Bookings => self.bookings.len(),
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.current_len();
        if len == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len as isize {
            new = len as isize - 1;
        }
        self.selected = new as usize;
        self.update_scroll();
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
        self.update_scroll();
    }

    pub(crate) fn select_last(&mut self) {
        let len = self.current_len();
        self.selected = len.saturating_sub(1);
        self.update_scroll();
    }

    pub(crate) fn set_passengers(&mut self, passengers: Vec<Passenger>) {
        self.passengers = passengers;
        self.ensure_in_bounds();
    }

    pub(crate) fn set_bookings(&mut self, bookings: Vec<Booking>) {
        self.bookings = bookings;
        self.ensure_in_bounds();
    }

    /// Rows for the visible pane, the selected one marked with a pointer.
    /// Each row reads back the IDs the booking form expects.
    pub(crate) fn display_lines(&self) -> Vec<String> {
        match self.pane {
            AttendantPane::Passengers => self
                .passengers
                .iter()
                .enumerate()
                .map(|(idx, passenger)| {
                    let pointer = if idx == self.selected { "> " } else { "  " };
                    format!(
                        "{pointer}#{} {} (age {}, {}) passport {} contact {}",
                        passenger.id,
                        passenger.name,
                        passenger.age,
                        passenger.gender,
                        passenger.passport_number,
                        passenger.contact_info,
                    )
                })
                .collect(),
            AttendantPane::Bookings => self
                .bookings
                .iter()
                .enumerate()
                .map(|(idx, booking)| {
                    let pointer = if idx == self.selected { "> " } else { "  " };
                    format!(
                        "{pointer}#{} passenger {} on flight {} seat {}",
                        booking.id, booking.passenger_id, booking.flight_id, booking.seat_number,
                    )
                })
                .collect(),
        }
    }

    pub(crate) fn pane_title(&self) -> &'static str {
        match self.pane {
            AttendantPane::Passengers => "Passengers",
            AttendantPane::Bookings => "Bookings",
        }
    }

    fn ensure_in_bounds(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.selected = 0;
            self.scroll = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
            self.update_scroll();
        }
    }

    fn update_scroll(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.scroll = 0;
            return;
        }
        let desired = self.selected.saturating_sub(3) as u16;
        let max_scroll = len.saturating_sub(1) as u16;
        self.scroll = min(desired, max_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(id: i64, number: &str) -> Flight {
        Flight {
            id,
            flight_number: number.to_string(),
            origin: "DEL".to_string(),
            destination: "BOM".to_string(),
            departure_time: "10:00".to_string(),
            arrival_time: "12:00".to_string(),
        }
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut board = FlightBoard::new(vec![flight(1, "AI202"), flight(2, "AI203")]);
        board.move_selection(10);
        assert_eq!(board.selected, 1);
        board.move_selection(-10);
        assert_eq!(board.selected, 0);
    }

    #[test]
    fn reload_can_focus_a_row_by_id() {
        let mut board = FlightBoard::new(vec![flight(1, "AI202")]);
        board.set_flights(
            vec![flight(1, "AI202"), flight(2, "AI203"), flight(3, "AI204")],
            Some(3),
        );
        assert_eq!(board.selected, 2);
    }

    #[test]
    fn shrinking_the_list_clamps_the_selection() {
        let mut board = FlightBoard::new(vec![flight(1, "AI202"), flight(2, "AI203")]);
        board.move_selection(1);
        board.set_flights(vec![flight(1, "AI202")], None);
        assert_eq!(board.selected, 0);
    }

    #[test]
    fn pane_toggle_resets_the_selection() {
        let mut screen = AttendantScreen::new(Vec::new(), Vec::new());
        assert!(screen.pane == AttendantPane::Passengers);
        screen.toggle_pane();
        assert!(screen.pane == AttendantPane::Bookings);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn booking_rows_read_back_the_ids() {
        let mut screen = AttendantScreen::new(
            Vec::new(),
            vec![Booking {
                id: 1,
                passenger_id: 4,
                flight_id: 7,
                seat_number: "042-B".to_string(),
            }],
        );
        screen.toggle_pane();
        let lines = screen.display_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("passenger 4"));
        assert!(lines[0].contains("flight 7"));
        assert!(lines[0].contains("seat 042-B"));
    }
}
