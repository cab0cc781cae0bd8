use super::{
    evolution::EvolutionConfig,
    midi::MidiConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::MidiEvoError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment overrides, e.g. `MIDIEVO__EVOLUTION__POPULATION_SIZE=500`.
pub const ENV_PREFIX: &str = "MIDIEVO";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub midi: MidiConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), MidiEvoError> {
        self.evolution.validate()?;
        self.midi.validate()?;
        Ok(())
    }

    /// Field descriptions of every section, in file order.
    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![self.evolution.to_manifest(), self.midi.to_manifest()]
    }

    pub fn manifests_json(&self) -> Result<String, MidiEvoError> {
        Ok(serde_json::to_string_pretty(&self.manifests())?)
    }
}

fn poisoned() -> MidiEvoError {
    MidiEvoError::Configuration("Config lock poisoned".to_string())
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file, then apply `MIDIEVO__*` environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MidiEvoError> {
        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        *self.config.write().map_err(|_| poisoned())? = config;
        Ok(())
    }

    /// Load `path` if it exists, keep defaults otherwise.
    pub fn load_if_present<P: AsRef<Path>>(&self, path: P) -> Result<bool, MidiEvoError> {
        if path.as_ref().exists() {
            self.load_from_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MidiEvoError> {
        let config = self.config.read().map_err(|_| poisoned())?;
        let toml_str = toml::to_string_pretty(&*config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, MidiEvoError> {
        Ok(self.config.read().map_err(|_| poisoned())?.clone())
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), MidiEvoError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().map_err(|_| poisoned())?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}
