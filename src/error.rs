use thiserror::Error;

/// Problems found while building a [`Template`](crate::engines::generation::Template).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Tick {tick} at note {index} exceeds the supported maximum of {max}")]
    TickOutOfRange { index: usize, tick: u64, max: u64 },

    #[error("Pitch {pitch} at note {index} is outside 0..=127")]
    PitchOutOfRange { index: usize, pitch: u8 },

    #[error("Candidate has {actual} notes but the template has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum MidiError {
    #[error("Failed to parse MIDI data: {0}")]
    Parse(String),

    #[error("MIDI file has {available} track(s), track {requested} requested")]
    MissingTrack { requested: usize, available: usize },

    #[error("Failed to encode MIDI data: {0}")]
    Encode(String),

    #[error("MIDI IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MidiEvoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No template loaded")]
    NoTemplate,

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("MIDI error: {0}")]
    Midi(#[from] MidiError),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, MidiEvoError>;
