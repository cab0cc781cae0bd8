mod app;
mod panels;
mod state;
mod widgets;
mod services;

pub use app::MidiEvoApp;
pub use state::{AppState, UiAction};
