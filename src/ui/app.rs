use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::announce::Announcer;
use crate::booking::book_flight;
use crate::db::{
    create_flight, create_passenger, create_user, delete_flight, fetch_bookings, fetch_flights,
    fetch_passengers, find_flight_by_number, find_user_by_credentials, update_flight,
};
use crate::models::Role;

use super::forms::{
    BookingField, BookingForm, ConfirmFlightDelete, FlightField, FlightForm, FlightSearch,
    LoginField, LoginForm, PassengerField, PassengerForm, SignupField, SignupForm,
};
use super::helpers::{centered_rect, surface_error};
use super::screens::{AttendantPane, AttendantScreen, FlightBoard};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states. Which one is active decides both the
/// rendering path and the keyboard shortcuts, so signed-out users cannot
/// reach the staff panels at all.
enum Screen {
    SignedOut,
    Admin(FlightBoard),
    Attendant(AttendantScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    SigningUp(SignupForm),
    LoggingIn(LoginForm),
    AddingFlight(FlightForm),
    EditingFlight(FlightForm),
    SearchingFlight(FlightSearch),
    ConfirmFlightDelete(ConfirmFlightDelete),
    AddingPassenger(PassengerForm),
    BookingSeat(BookingForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    announcer: Box<dyn Announcer>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, announcer: Box<dyn Announcer>) -> Self {
        Self {
            conn,
            announcer,
            screen: Screen::SignedOut,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::SigningUp(form) => self.handle_signup(code, form)?,
            Mode::LoggingIn(form) => self.handle_login(code, form)?,
            Mode::AddingFlight(form) => self.handle_add_flight(code, form)?,
            Mode::EditingFlight(form) => self.handle_edit_flight(code, form)?,
            Mode::SearchingFlight(search) => self.handle_search_flight(code, search)?,
            Mode::ConfirmFlightDelete(confirm) => {
                self.handle_confirm_flight_delete(code, confirm)?
            }
            Mode::AddingPassenger(form) => self.handle_add_passenger(code, form)?,
            Mode::BookingSeat(form) => self.handle_book_seat(code, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::SignedOut => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => {
                        self.clear_status();
                        return Ok(Mode::SigningUp(SignupForm::default()));
                    }
                    KeyCode::Char('l') | KeyCode::Char('L') => {
                        self.clear_status();
                        return Ok(Mode::LoggingIn(LoginForm::default()));
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Admin(ref mut board) => {
                let mut status_to_set: Option<(String, StatusKind)> = None;
                let mut clear_status = false;
                let mut sign_out = false;
                let mut next_mode: Option<Mode> = None;

                {
                    let board = &mut *board;
                    match code {
                        KeyCode::Char('q') => {
                            *exit = true;
                        }
                        KeyCode::Up => board.move_selection(-1),
                        KeyCode::Down => board.move_selection(1),
                        KeyCode::PageUp => board.move_selection(-5),
                        KeyCode::PageDown => board.move_selection(5),
                        KeyCode::Home => board.select_first(),
                        KeyCode::End => board.select_last(),
                        KeyCode::Char('+') => {
                            clear_status = true;
                            next_mode = Some(Mode::AddingFlight(FlightForm::default()));
                        }
                        KeyCode::Char('e') | KeyCode::Char('E') => {
                            if let Some(flight) = board.current_flight() {
                                clear_status = true;
                                next_mode =
                                    Some(Mode::EditingFlight(FlightForm::from_flight(flight)));
                            } else {
                                status_to_set = Some((
                                    "No flight selected to edit.".to_string(),
                                    StatusKind::Error,
                                ));
                            }
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') => {
                            clear_status = true;
                            next_mode = Some(Mode::SearchingFlight(FlightSearch::default()));
                        }
                        KeyCode::Char('-') => {
                            if let Some(flight) = board.current_flight().cloned() {
                                clear_status = true;
                                next_mode =
                                    Some(Mode::ConfirmFlightDelete(ConfirmFlightDelete::from(
                                        flight,
                                    )));
                            } else {
                                status_to_set = Some((
                                    "No flight selected to remove.".to_string(),
                                    StatusKind::Error,
                                ));
                            }
                        }
                        KeyCode::Char('o') | KeyCode::Char('O') => {
                            sign_out = true;
                        }
                        _ => {}
                    }
                }

                if sign_out {
                    self.sign_out();
                } else if clear_status {
                    self.clear_status();
                } else if let Some((text, kind)) = status_to_set {
                    self.set_status(text, kind);
                }

                if let Some(mode) = next_mode {
                    return Ok(mode);
                }
                Ok(Mode::Normal)
            }
            Screen::Attendant(ref mut screen) => {
                let mut clear_status = false;
                let mut sign_out = false;
                let mut next_mode: Option<Mode> = None;

                {
                    let screen = &mut *screen;
                    match code {
                        KeyCode::Char('q') => {
                            *exit = true;
                        }
                        KeyCode::Tab | KeyCode::BackTab => screen.toggle_pane(),
                        KeyCode::Up => screen.move_selection(-1),
                        KeyCode::Down => screen.move_selection(1),
                        KeyCode::PageUp => screen.move_selection(-5),
                        KeyCode::PageDown => screen.move_selection(5),
                        KeyCode::Home => screen.select_first(),
                        KeyCode::End => screen.select_last(),
                        KeyCode::Char('n') | KeyCode::Char('N') => {
                            clear_status = true;
                            next_mode = Some(Mode::AddingPassenger(PassengerForm::default()));
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            clear_status = true;
                            next_mode = Some(Mode::BookingSeat(BookingForm::default()));
                        }
                        KeyCode::Char('o') | KeyCode::Char('O') => {
                            sign_out = true;
                        }
                        _ => {}
                    }
                }

                if sign_out {
                    self.sign_out();
                } else if clear_status {
                    self.clear_status();
                }

                if let Some(mode) = next_mode {
                    return Ok(mode);
                }
                Ok(Mode::Normal)
            }
        }
    }

    /// Jump from the signup form to the login prompt without registering,
    /// for operators who already hold an account. A no-op anywhere else.
    pub(crate) fn handle_ctrl_l(&mut self) {
        if matches!(self.mode, Mode::SigningUp(_)) {
            self.clear_status();
            self.mode = Mode::LoggingIn(LoginForm::default());
        }
    }

    fn handle_signup(&mut self, code: KeyCode, mut form: SignupForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Sign up cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_signup(&form) {
                // A fresh account goes straight to the login prompt.
                Ok(()) => return Ok(Mode::LoggingIn(LoginForm::default())),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::SigningUp(form))
    }

    fn handle_login(&mut self, code: KeyCode, mut form: LoginForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Login cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.attempt_login(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::LoggingIn(form))
    }

    fn handle_add_flight(&mut self, code: KeyCode, mut form: FlightForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Add flight cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_flight(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingFlight(form))
    }

    fn handle_edit_flight(&mut self, code: KeyCode, mut form: FlightForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Update cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_updated_flight(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::EditingFlight(form))
    }

    fn handle_search_flight(&mut self, code: KeyCode, mut search: FlightSearch) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                let query = search.query.trim().to_string();
                if query.is_empty() {
                    self.set_status(
                        "Please enter a flight number to search.",
                        StatusKind::Error,
                    );
                    return Ok(Mode::SearchingFlight(search));
                }
                match find_flight_by_number(&self.conn, &query)? {
                    Some(flight) => {
                        if let Screen::Admin(ref mut board) = self.screen {
                            board.focus_number(&flight.flight_number);
                        }
                        self.set_status(flight.to_string(), StatusKind::Info);
                        self.announce(format!(
                            "Flight {} from {} to {} departs at {} and arrives at {}.",
                            flight.flight_number,
                            flight.origin,
                            flight.destination,
                            flight.departure_time,
                            flight.arrival_time,
                        ));
                        return Ok(Mode::Normal);
                    }
                    None => {
                        self.set_status(
                            "No flight found with that flight number.",
                            StatusKind::Error,
                        );
                    }
                }
            }
            KeyCode::Backspace => {
                search.query.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    search.query.push(ch);
                }
            }
            _ => {}
        }
        Ok(Mode::SearchingFlight(search))
    }

    fn handle_confirm_flight_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmFlightDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_flight_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmFlightDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmFlightDelete(confirm)),
        }
    }

    fn handle_add_passenger(&mut self, code: KeyCode, mut form: PassengerForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Add passenger cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_passenger(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingPassenger(form))
    }

    fn handle_book_seat(&mut self, code: KeyCode, mut form: BookingForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Booking cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_booking(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::BookingSeat(form))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::SignedOut => self.draw_signed_out(frame, content_area),
            Screen::Admin(board) => self.draw_flight_board(frame, content_area, board),
            Screen::Attendant(screen) => self.draw_attendant(frame, content_area, screen),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::SigningUp(form) => self.draw_signup_form(frame, area, form),
            Mode::LoggingIn(form) => self.draw_login_form(frame, area, form),
            Mode::AddingFlight(form) => self.draw_flight_form(frame, area, "Add Flight", form),
            Mode::EditingFlight(form) => {
                self.draw_flight_form(frame, area, "Update Flight", form)
            }
            Mode::SearchingFlight(search) => self.draw_search_bar(frame, area, search),
            Mode::ConfirmFlightDelete(confirm) => self.draw_confirm_flight(frame, area, confirm),
            Mode::AddingPassenger(form) => self.draw_passenger_form(frame, area, form),
            Mode::BookingSeat(form) => self.draw_booking_form(frame, area, form),
            Mode::Normal => {}
        }
    }

    fn draw_signed_out(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Airline Management System",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Sign up or log in to continue."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Welcome"));
        frame.render_widget(paragraph, area);
    }

    fn draw_flight_board(&self, frame: &mut Frame, area: Rect, board: &FlightBoard) {
        let block = Block::default().borders(Borders::ALL).title("Flights");

        if board.flights.is_empty() {
            let message = Paragraph::new("No flights yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let content = board.display_lines().join("\n");
        let paragraph = Paragraph::new(content)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((board.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_attendant(&self, frame: &mut Frame, area: Rect, screen: &AttendantScreen) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(screen.pane_title());

        let lines = screen.display_lines();
        if lines.is_empty() {
            let message_text = match screen.pane {
                AttendantPane::Passengers => "No passengers yet. Press 'n' to add one.",
                AttendantPane::Bookings => "No bookings yet. Press 'b' to book a seat.",
            };
            let message = Paragraph::new(message_text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let paragraph = Paragraph::new(lines.join("\n"))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((screen.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::SearchingFlight(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmFlightDelete(_)) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[n]", key_style),
                Span::raw(" / "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::SigningUp(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Register   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Ctrl+L]", key_style),
                Span::raw(" Log In Instead   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::Normal) => match &self.screen {
                Screen::SignedOut => Line::from(vec![
                    Span::styled("[s]", key_style),
                    Span::raw(" Sign Up   "),
                    Span::styled("[l]", key_style),
                    Span::raw(" Log In   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
                Screen::Admin(_) => Line::from(vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Select   "),
                    Span::styled("[+]", key_style),
                    Span::raw(" Add   "),
                    Span::styled("[e]", key_style),
                    Span::raw(" Update   "),
                    Span::styled("[s]", key_style),
                    Span::raw(" Search   "),
                    Span::styled("[-]", key_style),
                    Span::raw(" Delete   "),
                    Span::styled("[o]", key_style),
                    Span::raw(" Sign Out   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
                Screen::Attendant(_) => Line::from(vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Select   "),
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Switch List   "),
                    Span::styled("[n]", key_style),
                    Span::raw(" New Passenger   "),
                    Span::styled("[b]", key_style),
                    Span::raw(" Book Seat   "),
                    Span::styled("[o]", key_style),
                    Span::raw(" Sign Out   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
            },
            _ => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
        }
    }

    fn draw_flight_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &FlightForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Flight Number", FlightField::Number),
            form.build_line("Origin", FlightField::Origin),
            form.build_line("Destination", FlightField::Destination),
            form.build_line("Departure Time", FlightField::Departure),
            form.build_line("Arrival Time", FlightField::Arrival),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (row, prefix) = match form.active {
            FlightField::Number => (0, "Flight Number: ".len()),
            FlightField::Origin => (1, "Origin: ".len()),
            FlightField::Destination => (2, "Destination: ".len()),
            FlightField::Departure => (3, "Departure Time: ".len()),
            FlightField::Arrival => (4, "Arrival Time: ".len()),
        };
        let cursor_x = inner.x + prefix as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_passenger_form(&self, frame: &mut Frame, area: Rect, form: &PassengerForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Passenger").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Passenger Name", PassengerField::Name),
            form.build_line("Passenger Age", PassengerField::Age),
            form.build_line("Passenger Gender", PassengerField::Gender),
            form.build_line("Passport Number", PassengerField::Passport),
            form.build_line("Contact Info", PassengerField::Contact),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (row, prefix) = match form.active {
            PassengerField::Name => (0, "Passenger Name: ".len()),
            PassengerField::Age => (1, "Passenger Age: ".len()),
            PassengerField::Gender => (2, "Passenger Gender: ".len()),
            PassengerField::Passport => (3, "Passport Number: ".len()),
            PassengerField::Contact => (4, "Contact Info: ".len()),
        };
        let cursor_x = inner.x + prefix as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_booking_form(&self, frame: &mut Frame, area: Rect, form: &BookingForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book Flight").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Passenger ID", BookingField::PassengerId),
            form.build_line("Flight ID", BookingField::FlightId),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to book • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (row, prefix) = match form.active {
            BookingField::PassengerId => (0, "Passenger ID: ".len()),
            BookingField::FlightId => (1, "Flight ID: ".len()),
        };
        let cursor_x = inner.x + prefix as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_signup_form(&self, frame: &mut Frame, area: Rect, form: &SignupForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Sign Up").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("First Name", SignupField::FirstName),
            form.build_line("Last Name", SignupField::LastName),
            form.build_line("Email", SignupField::Email),
            form.build_line("Position", SignupField::Position),
            form.build_line("Password", SignupField::Password),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to register • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (row, prefix) = match form.active {
            SignupField::FirstName => (0, "First Name: ".len()),
            SignupField::LastName => (1, "Last Name: ".len()),
            SignupField::Email => (2, "Email: ".len()),
            SignupField::Position => (3, "Position: ".len()),
            SignupField::Password => (4, "Password: ".len()),
        };
        let cursor_x = inner.x + prefix as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_login_form(&self, frame: &mut Frame, area: Rect, form: &LoginForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Log In").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("First Name", LoginField::FirstName),
            form.build_line("Position", LoginField::Position),
            form.build_line("Password", LoginField::Password),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to log in • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (row, prefix) = match form.active {
            LoginField::FirstName => (0, "First Name: ".len()),
            LoginField::Position => (1, "Position: ".len()),
            LoginField::Password => (2, "Password: ".len()),
        };
        let cursor_x = inner.x + prefix as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, search: &FlightSearch) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search Flight");
        let paragraph = Paragraph::new(Span::raw(format!("Flight Number: {}", search.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x =
            inner.x + "Flight Number: ".len() as u16 + search.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_flight(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmFlightDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete flight {} ({} to {})?",
                confirm.flight_number, confirm.origin, confirm.destination
            )),
            Line::from("Every flight sharing this number is removed."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn sign_out(&mut self) {
        self.screen = Screen::SignedOut;
        self.set_status("Signed out.", StatusKind::Info);
    }

    /// Voice a phrase for the committed write. Failures surface in the
    /// footer; the write itself stays committed.
    fn announce(&mut self, text: String) {
        if let Err(err) = self.announcer.announce(&text) {
            self.set_status(err.to_string(), StatusKind::Error);
        }
    }

    fn save_signup(&mut self, form: &SignupForm) -> Result<()> {
        let input = form.parse_inputs()?;
        create_user(
            &self.conn,
            &input.first_name,
            &input.last_name,
            &input.email,
            &input.position,
            &input.password,
        )?;
        self.set_status("User registered successfully!", StatusKind::Info);
        Ok(())
    }

    fn attempt_login(&mut self, form: &LoginForm) -> Result<()> {
        let (first_name, position, password) = form.parse_inputs()?;
        let user = match find_user_by_credentials(&self.conn, &first_name, &position, &password)? {
            Some(user) => user,
            None => return Err(anyhow!("Invalid credentials. Please try again.")),
        };

        // The stored position decides the panel; any other value blocks
        // routing even though the credentials matched.
        let role = match Role::parse(&user.position) {
            Some(role) => role,
            None => {
                return Err(anyhow!(
                    "Invalid position. Please choose Admin or Flight Attendant."
                ))
            }
        };

        match role {
            Role::Admin => {
                let flights = fetch_flights(&self.conn)?;
                self.screen = Screen::Admin(FlightBoard::new(flights));
            }
            Role::Attendant => {
                let passengers = fetch_passengers(&self.conn)?;
                let bookings = fetch_bookings(&self.conn)?;
                self.screen = Screen::Attendant(AttendantScreen::new(passengers, bookings));
            }
        }

        self.set_status(
            format!("Welcome {}! Login successful.", user.first_name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_new_flight(&mut self, form: &FlightForm) -> Result<()> {
        let input = form.parse_inputs()?;
        let flight = create_flight(
            &self.conn,
            &input.flight_number,
            &input.origin,
            &input.destination,
            &input.departure_time,
            &input.arrival_time,
        )?;
        self.reload_flights(Some(flight.id))?;
        self.set_status("Flight added successfully!", StatusKind::Info);
        self.announce(format!(
            "Flight {} from {} to {} has been successfully added. Departure at {} and arrival at {}.",
            flight.flight_number,
            flight.origin,
            flight.destination,
            flight.departure_time,
            flight.arrival_time,
        ));
        Ok(())
    }

    fn save_updated_flight(&mut self, form: &FlightForm) -> Result<()> {
        let input = form.parse_inputs()?;
        update_flight(
            &self.conn,
            &input.flight_number,
            &input.origin,
            &input.destination,
            &input.departure_time,
            &input.arrival_time,
        )?;
        self.reload_flights(None)?;
        if let Screen::Admin(ref mut board) = self.screen {
            board.focus_number(&input.flight_number);
        }
        self.set_status(
            format!("Flight {} updated successfully.", input.flight_number),
            StatusKind::Info,
        );
        self.announce(format!(
            "Flight {} has been successfully updated. It will now depart from {} to {} at {} and arrive at {}.",
            input.flight_number,
            input.origin,
            input.destination,
            input.departure_time,
            input.arrival_time,
        ));
        Ok(())
    }

    fn perform_flight_delete(&mut self, confirm: &ConfirmFlightDelete) -> Result<()> {
        delete_flight(&self.conn, &confirm.flight_number)?;
        self.reload_flights(None)?;
        self.set_status(
            format!("Flight {} deleted successfully.", confirm.flight_number),
            StatusKind::Info,
        );
        self.announce(format!(
            "Flight {} has been successfully deleted.",
            confirm.flight_number
        ));
        Ok(())
    }

    fn save_new_passenger(&mut self, form: &PassengerForm) -> Result<()> {
        let input = form.parse_inputs()?;
        let passenger = create_passenger(
            &self.conn,
            &input.name,
            &input.age,
            &input.gender,
            &input.passport_number,
            &input.contact_info,
        )?;
        self.reload_passengers()?;
        self.set_status(
            format!("Passenger {} added successfully.", passenger.name),
            StatusKind::Info,
        );
        self.announce(format!(
            "Passenger {} has been added successfully.",
            passenger.name
        ));
        Ok(())
    }

    fn save_new_booking(&mut self, form: &BookingForm) -> Result<()> {
        let (passenger_id, flight_id) = form.parse_inputs()?;
        let booking = book_flight(&self.conn, passenger_id, flight_id)?;
        self.reload_bookings()?;
        self.set_status(
            format!(
                "Flight booked successfully! Seat number: {}",
                booking.seat_number
            ),
            StatusKind::Info,
        );
        self.announce(format!(
            "Passenger {} booked successfully on flight {}. Seat number {}.",
            booking.passenger_id, booking.flight_id, booking.seat_number
        ));
        Ok(())
    }

    fn reload_flights(&mut self, focus_id: Option<i64>) -> Result<()> {
        let flights = fetch_flights(&self.conn)?;
        if let Screen::Admin(ref mut board) = self.screen {
            board.set_flights(flights, focus_id);
        }
        Ok(())
    }

    fn reload_passengers(&mut self) -> Result<()> {
        let passengers = fetch_passengers(&self.conn)?;
        if let Screen::Attendant(ref mut screen) = self.screen {
            screen.set_passengers(passengers);
        }
        Ok(())
    }

    fn reload_bookings(&mut self) -> Result<()> {
        let bookings = fetch_bookings(&self.conn)?;
        if let Screen::Attendant(ref mut screen) = self.screen {
            screen.set_bookings(bookings);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::{CommandAnnouncer, NullAnnouncer};
    use crate::db::connection::memory_database;

    fn test_app() -> App {
        App::new(memory_database(), Box::new(NullAnnouncer))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn tab(app: &mut App) {
        app.handle_key(KeyCode::Tab).unwrap();
    }

    fn enter(app: &mut App) {
        app.handle_key(KeyCode::Enter).unwrap();
    }

    fn sign_up(app: &mut App, first: &str, position: &str, password: &str) {
        app.handle_key(KeyCode::Char('s')).unwrap();
        type_text(app, first);
        tab(app);
        type_text(app, "Menon");
        tab(app);
        type_text(app, &format!("{first}@air.example"));
        tab(app);
        type_text(app, position);
        tab(app);
        type_text(app, password);
        enter(app);
    }

    fn log_in(app: &mut App, first: &str, position: &str, password: &str) {
        type_text(app, first);
        tab(app);
        type_text(app, position);
        tab(app);
        type_text(app, password);
        enter(app);
    }

    fn status_text(app: &App) -> String {
        app.status
            .as_ref()
            .map(|status| status.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn signup_hands_straight_to_the_login_prompt() {
        let mut app = test_app();
        sign_up(&mut app, "Priya", "Admin", "pw1");
        assert!(matches!(app.mode, Mode::LoggingIn(_)));
        assert_eq!(status_text(&app), "User registered successfully!");
    }

    #[test]
    fn admin_login_lands_on_the_flight_board() {
        let mut app = test_app();
        sign_up(&mut app, "Priya", "Admin", "pw1");
        log_in(&mut app, "Priya", "Admin", "pw1");

        assert!(matches!(app.screen, Screen::Admin(_)));
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), "Welcome Priya! Login successful.");
    }

    #[test]
    fn attendant_login_lands_on_the_attendant_screen() {
        let mut app = test_app();
        sign_up(&mut app, "Asha", "Flight Attendant", "pw2");
        log_in(&mut app, "Asha", "Flight Attendant", "pw2");
        assert!(matches!(app.screen, Screen::Attendant(_)));
    }

    #[test]
    fn bad_credentials_keep_the_operator_signed_out() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('l')).unwrap();
        log_in(&mut app, "Nobody", "Admin", "wrong");

        assert!(matches!(app.screen, Screen::SignedOut));
        assert!(matches!(app.mode, Mode::LoggingIn(_)));
        assert_eq!(status_text(&app), "Invalid credentials. Please try again.");
    }

    #[test]
    fn unknown_positions_block_the_role_routing() {
        let mut app = test_app();
        sign_up(&mut app, "Ravi", "Pilot", "pw3");
        log_in(&mut app, "Ravi", "Pilot", "pw3");

        assert!(matches!(app.screen, Screen::SignedOut));
        assert_eq!(
            status_text(&app),
            "Invalid position. Please choose Admin or Flight Attendant."
        );
    }

    #[test]
    fn duplicate_signup_email_reports_the_login_hint() {
        let mut app = test_app();
        sign_up(&mut app, "Priya", "Admin", "pw1");
        app.handle_key(KeyCode::Esc).unwrap();

        sign_up(&mut app, "Priya", "Flight Attendant", "pw9");
        assert!(matches!(app.mode, Mode::SigningUp(_)));
        assert_eq!(status_text(&app), "Email already exists. Try logging in.");
    }

    fn admin_app() -> App {
        let mut app = test_app();
        sign_up(&mut app, "Priya", "Admin", "pw1");
        log_in(&mut app, "Priya", "Admin", "pw1");
        app
    }

    fn add_flight(app: &mut App, number: &str) {
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(app, number);
        tab(app);
        type_text(app, "DEL");
        tab(app);
        type_text(app, "BOM");
        tab(app);
        type_text(app, "10:00");
        tab(app);
        type_text(app, "12:00");
        enter(app);
    }

    #[test]
    fn adding_a_flight_updates_the_board() {
        let mut app = admin_app();
        add_flight(&mut app, "AI202");

        assert_eq!(status_text(&app), "Flight added successfully!");
        match &app.screen {
            Screen::Admin(board) => {
                assert_eq!(board.flights.len(), 1);
                assert_eq!(board.flights[0].flight_number, "AI202");
            }
            _ => panic!("expected the admin board"),
        }
    }

    #[test]
    fn incomplete_flight_forms_stay_open_with_an_error() {
        let mut app = admin_app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "AI202");
        enter(&mut app);

        assert!(matches!(app.mode, Mode::AddingFlight(_)));
        assert_eq!(status_text(&app), "Please fill in all fields.");
        match &app.screen {
            Screen::Admin(board) => assert!(board.flights.is_empty()),
            _ => panic!("expected the admin board"),
        }
    }

    #[test]
    fn updating_a_missing_flight_reports_not_found() {
        let mut app = admin_app();
        add_flight(&mut app, "AI202");

        app.handle_key(KeyCode::Char('e')).unwrap();
        // Replace the match key with a number no row carries.
        match &app.mode {
            Mode::EditingFlight(_) => {}
            _ => panic!("expected the edit form"),
        }
        for _ in 0..5 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_text(&mut app, "QF1");
        enter(&mut app);

        assert!(matches!(app.mode, Mode::EditingFlight(_)));
        assert_eq!(status_text(&app), "No flight found with that flight number.");
    }

    #[test]
    fn deleting_the_selected_flight_clears_the_board() {
        let mut app = admin_app();
        add_flight(&mut app, "AI202");

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert_eq!(status_text(&app), "Flight AI202 deleted successfully.");
        match &app.screen {
            Screen::Admin(board) => assert!(board.flights.is_empty()),
            _ => panic!("expected the admin board"),
        }
    }

    #[test]
    fn searching_announces_the_match_and_focuses_it() {
        let mut app = admin_app();
        add_flight(&mut app, "AI202");
        add_flight(&mut app, "AI203");

        app.handle_key(KeyCode::Char('s')).unwrap();
        type_text(&mut app, "AI202");
        enter(&mut app);

        assert!(matches!(app.mode, Mode::Normal));
        assert!(status_text(&app).contains("AI202"));
        match &app.screen {
            Screen::Admin(board) => assert_eq!(board.selected, 0),
            _ => panic!("expected the admin board"),
        }
    }

    #[test]
    fn search_misses_keep_the_prompt_open() {
        let mut app = admin_app();
        app.handle_key(KeyCode::Char('s')).unwrap();
        type_text(&mut app, "ZZ999");
        enter(&mut app);

        assert!(matches!(app.mode, Mode::SearchingFlight(_)));
        assert_eq!(status_text(&app), "No flight found with that flight number.");
    }

    fn attendant_app() -> App {
        let mut app = test_app();
        sign_up(&mut app, "Asha", "Flight Attendant", "pw2");
        log_in(&mut app, "Asha", "Flight Attendant", "pw2");
        app
    }

    fn add_passenger(app: &mut App, name: &str, passport: &str) {
        app.handle_key(KeyCode::Char('n')).unwrap();
        type_text(app, name);
        tab(app);
        type_text(app, "34");
        tab(app);
        type_text(app, "F");
        tab(app);
        type_text(app, passport);
        tab(app);
        type_text(app, "contact@example.com");
        enter(app);
    }

    #[test]
    fn registering_a_passenger_updates_the_roster() {
        let mut app = attendant_app();
        add_passenger(&mut app, "Asha Rao", "P1");

        assert_eq!(status_text(&app), "Passenger Asha Rao added successfully.");
        match &app.screen {
            Screen::Attendant(screen) => assert_eq!(screen.passengers.len(), 1),
            _ => panic!("expected the attendant screen"),
        }
    }

    #[test]
    fn duplicate_passports_keep_the_form_open() {
        let mut app = attendant_app();
        add_passenger(&mut app, "Asha Rao", "P1");
        add_passenger(&mut app, "Dev Nair", "P1");

        assert!(matches!(app.mode, Mode::AddingPassenger(_)));
        assert_eq!(
            status_text(&app),
            "A passenger with this passport number already exists."
        );
        match &app.screen {
            Screen::Attendant(screen) => assert_eq!(screen.passengers.len(), 1),
            _ => panic!("expected the attendant screen"),
        }
    }

    #[test]
    fn booking_an_unknown_passenger_reports_the_first_failed_check() {
        let mut app = attendant_app();
        app.handle_key(KeyCode::Char('b')).unwrap();
        type_text(&mut app, "42");
        tab(&mut app);
        type_text(&mut app, "7");
        enter(&mut app);

        assert!(matches!(app.mode, Mode::BookingSeat(_)));
        assert_eq!(status_text(&app), "Passenger ID does not exist.");
    }

    #[test]
    fn signing_out_returns_to_the_welcome_screen() {
        let mut app = admin_app();
        app.handle_key(KeyCode::Char('o')).unwrap();
        assert!(matches!(app.screen, Screen::SignedOut));
        assert_eq!(status_text(&app), "Signed out.");
    }

    #[test]
    fn quitting_from_the_welcome_screen_exits() {
        let mut app = test_app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn the_login_shortcut_skips_registration() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('s')).unwrap();
        type_text(&mut app, "Priya");
        app.handle_ctrl_l();

        assert!(matches!(app.mode, Mode::LoggingIn(_)));

        // No account was written for the abandoned form.
        log_in(&mut app, "Priya", "Admin", "pw1");
        assert_eq!(status_text(&app), "Invalid credentials. Please try again.");
    }

    #[test]
    fn a_failed_announcement_keeps_the_saved_record() {
        let announcer = CommandAnnouncer::new(vec!["false".to_string()], Vec::new());
        let mut app = App::new(memory_database(), Box::new(announcer));
        sign_up(&mut app, "Priya", "Admin", "pw1");
        log_in(&mut app, "Priya", "Admin", "pw1");
        add_flight(&mut app, "AI202");

        match &app.screen {
            Screen::Admin(board) => assert_eq!(board.flights.len(), 1),
            _ => panic!("expected the admin board"),
        }
        assert!(status_text(&app).starts_with("speech synthesis failed"));
    }
}
