use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::MidiEvoError;
use serde::{Deserialize, Serialize};

/// How sequences are read from and written back to Standard MIDI Files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    /// Track evolved from a multi-track file. Track 0 is usually the conductor track.
    pub track_index: usize,
    pub output_velocity: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            track_index: 1,
            output_velocity: 80,
        }
    }
}

impl ConfigSection for MidiConfig {
    fn section_name() -> &'static str {
        "midi"
    }

    fn validate(&self) -> Result<(), MidiEvoError> {
        if self.output_velocity > 127 {
            return Err(MidiEvoError::Configuration(
                "Output velocity must be between 0 and 127".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "MIDI".to_string(),
            fields: vec![
                FieldManifest::new(
                    "track_index",
                    "integer",
                    serde_json::json!(1),
                    "Track of the source file used as the template",
                )
                .bounded(0.0, 255.0),
                FieldManifest::new(
                    "output_velocity",
                    "integer",
                    serde_json::json!(80),
                    "Velocity of exported note events",
                )
                .bounded(0.0, 127.0),
            ],
        }
    }
}
