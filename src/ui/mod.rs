//! Terminal user interface split across app state, form view models,
//! screen view models, and the raw terminal loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
