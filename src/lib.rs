pub mod config;
pub mod engines;
pub mod error;
pub mod midi;
pub mod types;
pub mod ui;

pub use error::{MidiEvoError, Result};
