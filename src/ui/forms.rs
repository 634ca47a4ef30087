use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Flight;

/// Render one form row, highlighting the focused field and ghosting empty
/// ones. Password fields render as asterisks.
fn field_line(field_name: &str, value: &str, is_active: bool, mask: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Internal representation of the flight form used for both adding and
/// editing. The flight number doubles as the match key when updating.
#[derive(Default, Clone)]
pub(crate) struct FlightForm {
    pub(crate) number: String,
    pub(crate) origin: String,
    pub(crate) destination: String,
    pub(crate) departure: String,
    pub(crate) arrival: String,
    pub(crate) active: FlightField,
    pub(crate) error: Option<String>,
}

/// Fields available within the flight form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum FlightField {
    #[default]
    Number,
    Origin,
    Destination,
    Departure,
    Arrival,
}

/// Validated flight inputs ready for persistence.
#[derive(Debug)]
pub(crate) struct FlightInput {
    pub(crate) flight_number: String,
    pub(crate) origin: String,
    pub(crate) destination: String,
    pub(crate) departure_time: String,
    pub(crate) arrival_time: String,
}

impl FlightForm {
    /// Populate the form from an existing flight when editing.
    pub(crate) fn from_flight(flight: &Flight) -> Self {
        Self {
            number: flight.flight_number.clone(),
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            departure: flight.departure_time.clone(),
            arrival: flight.arrival_time.clone(),
            active: FlightField::Number,
            error: None,
        }
    }

    /// Cycle focus across the five fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            FlightField::Number => FlightField::Origin,
            FlightField::Origin => FlightField::Destination,
            FlightField::Destination => FlightField::Departure,
            FlightField::Departure => FlightField::Arrival,
            FlightField::Arrival => FlightField::Number,
        };
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            FlightField::Number => self.number.push(ch),
            FlightField::Origin => self.origin.push(ch),
            FlightField::Destination => self.destination.push(ch),
            FlightField::Departure => self.departure.push(ch),
            FlightField::Arrival => self.arrival.push(ch),
        }
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            FlightField::Number => {
                self.number.pop();
            }
            FlightField::Origin => {
                self.origin.pop();
            }
            FlightField::Destination => {
                self.destination.pop();
            }
            FlightField::Departure => {
                self.departure.pop();
            }
            FlightField::Arrival => {
                self.arrival.pop();
            }
        }
    }

    /// Validate the inputs and return trimmed values ready for persistence.
    /// Every field must be filled.
    pub(crate) fn parse_inputs(&self) -> Result<FlightInput> {
        let fields = [
            self.number.trim(),
            self.origin.trim(),
            self.destination.trim(),
            self.departure.trim(),
            self.arrival.trim(),
        ];
        if fields.iter().any(|value| value.is_empty()) {
            return Err(anyhow!("Please fill in all fields."));
        }
        Ok(FlightInput {
            flight_number: fields[0].to_string(),
            origin: fields[1].to_string(),
            destination: fields[2].to_string(),
            departure_time: fields[3].to_string(),
            arrival_time: fields[4].to_string(),
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: FlightField) -> Line<'static> {
        let value = self.value(field);
        field_line(field_name, value, self.active == field, false)
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: FlightField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: FlightField) -> &str {
        match field {
            FlightField::Number => &self.number,
            FlightField::Origin => &self.origin,
            FlightField::Destination => &self.destination,
            FlightField::Departure => &self.departure,
            FlightField::Arrival => &self.arrival,
        }
    }
}

/// Inline search for a flight by number. Misses keep the prompt open so the
/// operator can correct the number.
#[derive(Default)]
pub(crate) struct FlightSearch {
    pub(crate) query: String,
}

/// Confirmation state for deleting the selected flight. Deletion matches on
/// the flight number, so every row sharing it goes too.
#[derive(Clone)]
pub(crate) struct ConfirmFlightDelete {
    pub(crate) flight_number: String,
    pub(crate) origin: String,
    pub(crate) destination: String,
}

impl ConfirmFlightDelete {
    pub(crate) fn from(flight: Flight) -> Self {
        Self {
            flight_number: flight.flight_number,
            origin: flight.origin,
            destination: flight.destination,
        }
    }
}

/// Form state for registering a passenger. Age is free text, matching the
/// rest of the record.
#[derive(Default, Clone)]
pub(crate) struct PassengerForm {
    pub(crate) name: String,
    pub(crate) age: String,
    pub(crate) gender: String,
    pub(crate) passport: String,
    pub(crate) contact: String,
    pub(crate) active: PassengerField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum PassengerField {
    #[default]
    Name,
    Age,
    Gender,
    Passport,
    Contact,
}

/// Validated passenger inputs ready for persistence.
pub(crate) struct PassengerInput {
    pub(crate) name: String,
    pub(crate) age: String,
    pub(crate) gender: String,
    pub(crate) passport_number: String,
    pub(crate) contact_info: String,
}

impl PassengerForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            PassengerField::Name => PassengerField::Age,
            PassengerField::Age => PassengerField::Gender,
            PassengerField::Gender => PassengerField::Passport,
            PassengerField::Passport => PassengerField::Contact,
            PassengerField::Contact => PassengerField::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            PassengerField::Name => self.name.push(ch),
            PassengerField::Age => self.age.push(ch),
            PassengerField::Gender => self.gender.push(ch),
            PassengerField::Passport => self.passport.push(ch),
            PassengerField::Contact => self.contact.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            PassengerField::Name => {
                self.name.pop();
            }
            PassengerField::Age => {
                self.age.pop();
            }
            PassengerField::Gender => {
                self.gender.pop();
            }
            PassengerField::Passport => {
                self.passport.pop();
            }
            PassengerField::Contact => {
                self.contact.pop();
            }
        }
    }

    /// Validate the inputs. Every field must be filled; no format checks
    /// beyond that.
    pub(crate) fn parse_inputs(&self) -> Result<PassengerInput> {
        let fields = [
            self.name.trim(),
            self.age.trim(),
            self.gender.trim(),
            self.passport.trim(),
            self.contact.trim(),
        ];
        if fields.iter().any(|value| value.is_empty()) {
            return Err(anyhow!("Please fill in all fields."));
        }
        Ok(PassengerInput {
            name: fields[0].to_string(),
            age: fields[1].to_string(),
            gender: fields[2].to_string(),
            passport_number: fields[3].to_string(),
            contact_info: fields[4].to_string(),
        })
    }

    pub(crate) fn build_line(&self, field_name: &str, field: PassengerField) -> Line<'static> {
        let value = self.value(field);
        field_line(field_name, value, self.active == field, false)
    }

    pub(crate) fn value_len(&self, field: PassengerField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: PassengerField) -> &str {
        match field {
            PassengerField::Name => &self.name,
            PassengerField::Age => &self.age,
            PassengerField::Gender => &self.gender,
            PassengerField::Passport => &self.passport,
            PassengerField::Contact => &self.contact,
        }
    }
}

/// Form state for booking a seat. Both fields accept digits only so the IDs
/// are numeric by construction.
#[derive(Default, Clone)]
pub(crate) struct BookingForm {
    pub(crate) passenger_id: String,
    pub(crate) flight_id: String,
    pub(crate) active: BookingField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BookingField {
    #[default]
    PassengerId,
    FlightId,
}

impl BookingForm {
    /// Swap focus between the two ID fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BookingField::PassengerId => BookingField::FlightId,
            BookingField::FlightId => BookingField::PassengerId,
        };
    }

    /// Append a digit to the active field. Everything else is rejected.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        match self.active {
            BookingField::PassengerId => self.passenger_id.push(ch),
            BookingField::FlightId => self.flight_id.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookingField::PassengerId => {
                self.passenger_id.pop();
            }
            BookingField::FlightId => {
                self.flight_id.pop();
            }
        }
    }

    /// Validate and convert both IDs.
    pub(crate) fn parse_inputs(&self) -> Result<(i64, i64)> {
        let passenger_raw = self.passenger_id.trim();
        let flight_raw = self.flight_id.trim();
        if passenger_raw.is_empty() || flight_raw.is_empty() {
            return Err(anyhow!("Please enter valid numeric IDs."));
        }
        let passenger_id = passenger_raw
            .parse::<i64>()
            .map_err(|_| anyhow!("Please enter valid numeric IDs."))?;
        let flight_id = flight_raw
            .parse::<i64>()
            .map_err(|_| anyhow!("Please enter valid numeric IDs."))?;
        Ok((passenger_id, flight_id))
    }

    pub(crate) fn build_line(&self, field_name: &str, field: BookingField) -> Line<'static> {
        let value = self.value(field);
        field_line(field_name, value, self.active == field, false)
    }

    pub(crate) fn value_len(&self, field: BookingField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: BookingField) -> &str {
        match field {
            BookingField::PassengerId => &self.passenger_id,
            BookingField::FlightId => &self.flight_id,
        }
    }
}

/// Form state for registering a staff account.
#[derive(Default, Clone)]
pub(crate) struct SignupForm {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) position: String,
    pub(crate) password: String,
    pub(crate) active: SignupField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum SignupField {
    #[default]
    FirstName,
    LastName,
    Email,
    Position,
    Password,
}

/// Validated signup inputs. The position is stored as typed; it is only
/// interpreted at login time.
#[derive(Debug)]
pub(crate) struct SignupInput {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) position: String,
    pub(crate) password: String,
}

impl SignupForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            SignupField::FirstName => SignupField::LastName,
            SignupField::LastName => SignupField::Email,
            SignupField::Email => SignupField::Position,
            SignupField::Position => SignupField::Password,
            SignupField::Password => SignupField::FirstName,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SignupField::FirstName => self.first_name.push(ch),
            SignupField::LastName => self.last_name.push(ch),
            SignupField::Email => self.email.push(ch),
            SignupField::Position => self.position.push(ch),
            SignupField::Password => self.password.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            SignupField::FirstName => {
                self.first_name.pop();
            }
            SignupField::LastName => {
                self.last_name.pop();
            }
            SignupField::Email => {
                self.email.pop();
            }
            SignupField::Position => {
                self.position.pop();
            }
            SignupField::Password => {
                self.password.pop();
            }
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<SignupInput> {
        let fields = [
            self.first_name.trim(),
            self.last_name.trim(),
            self.email.trim(),
            self.position.trim(),
            self.password.trim(),
        ];
        if fields.iter().any(|value| value.is_empty()) {
            return Err(anyhow!("Please fill all fields"));
        }
        Ok(SignupInput {
            first_name: fields[0].to_string(),
            last_name: fields[1].to_string(),
            email: fields[2].to_string(),
            position: fields[3].to_string(),
            password: fields[4].to_string(),
        })
    }

    pub(crate) fn build_line(&self, field_name: &str, field: SignupField) -> Line<'static> {
        let value = self.value(field);
        let mask = field == SignupField::Password;
        field_line(field_name, value, self.active == field, mask)
    }

    pub(crate) fn value_len(&self, field: SignupField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: SignupField) -> &str {
        match field {
            SignupField::FirstName => &self.first_name,
            SignupField::LastName => &self.last_name,
            SignupField::Email => &self.email,
            SignupField::Position => &self.position,
            SignupField::Password => &self.password,
        }
    }
}

/// Form state for logging in. Credentials are compared exactly as stored.
#[derive(Default, Clone)]
pub(crate) struct LoginForm {
    pub(crate) first_name: String,
    pub(crate) position: String,
    pub(crate) password: String,
    pub(crate) active: LoginField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum LoginField {
    #[default]
    FirstName,
    Position,
    Password,
}

impl LoginForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            LoginField::FirstName => LoginField::Position,
            LoginField::Position => LoginField::Password,
            LoginField::Password => LoginField::FirstName,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            LoginField::FirstName => self.first_name.push(ch),
            LoginField::Position => self.position.push(ch),
            LoginField::Password => self.password.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            LoginField::FirstName => {
                self.first_name.pop();
            }
            LoginField::Position => {
                self.position.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String)> {
        let first_name = self.first_name.trim();
        let position = self.position.trim();
        let password = self.password.trim();
        if first_name.is_empty() || position.is_empty() || password.is_empty() {
            return Err(anyhow!("Please fill all fields"));
        }
        Ok((
            first_name.to_string(),
            position.to_string(),
            password.to_string(),
        ))
    }

    pub(crate) fn build_line(&self, field_name: &str, field: LoginField) -> Line<'static> {
        let value = self.value(field);
        let mask = field == LoginField::Password;
        field_line(field_name, value, self.active == field, mask)
    }

    pub(crate) fn value_len(&self, field: LoginField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::FirstName => &self.first_name,
            LoginField::Position => &self.position,
            LoginField::Password => &self.password,
        }
    }
}
