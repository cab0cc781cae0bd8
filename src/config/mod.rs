pub mod traits;
pub mod evolution;
pub mod midi;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, AdaptiveRateConfig};
pub use midi::MidiConfig;
pub use traits::{ConfigSection, ConfigManifest, FieldManifest};
