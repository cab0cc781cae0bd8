use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::MidiEvoError;
use crate::types::{DiversityStrategy, TimingMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub tournament_rounds: usize,
    pub max_generations: usize,
    pub timing_mode: TimingMode,
    pub diversity_strategy: DiversityStrategy,
    pub initial_mutation_rate: f64,
    pub seed: Option<u64>,
    pub adaptive_rate: AdaptiveRateConfig,
}

/// Constants of the adaptive mutation-rate strategy.
///
/// Thresholds are percentages compared with the population's coefficient
/// of variation times 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveRateConfig {
    pub check_interval: usize,
    pub step: f64,
    pub max_rate: f64,
    pub min_rate: f64,
    pub low_threshold: f64,
    pub high_threshold: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 8000,
            tournament_rounds: 3000,
            max_generations: 2000,
            timing_mode: TimingMode::Inherited,
            diversity_strategy: DiversityStrategy::None,
            initial_mutation_rate: 0.1,
            seed: None,
            adaptive_rate: AdaptiveRateConfig::default(),
        }
    }
}

impl Default for AdaptiveRateConfig {
    fn default() -> Self {
        Self {
            check_interval: 100,
            step: 0.05,
            max_rate: 0.7,
            min_rate: 0.1,
            low_threshold: 2.0,
            high_threshold: 20.0,
        }
    }
}

impl EvolutionConfig {
    /// Offspring produced per generation: one per pair of tournament winners.
    pub fn offspring_count(&self) -> usize {
        self.tournament_rounds / 2
    }
}

impl AdaptiveRateConfig {
    fn validate(&self) -> Result<(), MidiEvoError> {
        if self.check_interval == 0 {
            return Err(MidiEvoError::Configuration(
                "Adaptive check interval must be at least 1".to_string()
            ));
        }
        if self.step <= 0.0 {
            return Err(MidiEvoError::Configuration(
                "Adaptive rate step must be positive".to_string()
            ));
        }
        if self.max_rate > 1.0 || self.min_rate < 0.0 || self.min_rate > self.max_rate {
            return Err(MidiEvoError::Configuration(
                "Adaptive rate bounds must satisfy 0 <= min <= max <= 1".to_string()
            ));
        }
        if self.low_threshold > self.high_threshold {
            return Err(MidiEvoError::Configuration(
                "Adaptive low threshold must not exceed the high threshold".to_string()
            ));
        }
        Ok(())
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), MidiEvoError> {
        if self.population_size == 0 {
            return Err(MidiEvoError::Configuration(
                "Population size must be at least 1".to_string()
            ));
        }
        if self.tournament_rounds == 0 || self.tournament_rounds % 2 != 0 {
            return Err(MidiEvoError::Configuration(format!(
                "Tournament rounds must be a positive even number, got {}",
                self.tournament_rounds
            )));
        }
        if self.offspring_count() > self.population_size {
            return Err(MidiEvoError::Configuration(format!(
                "Tournament rounds ({}) produce more offspring than the population holds ({})",
                self.tournament_rounds, self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(MidiEvoError::Configuration(
                "Max generations must be at least 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_mutation_rate) {
            return Err(MidiEvoError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if self.diversity_strategy == DiversityStrategy::AdaptiveRate {
            self.adaptive_rate.validate()?;
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(8000),
                    "Number of candidate sequences in the population",
                )
                .bounded(1.0, 100_000.0),
                FieldManifest::new(
                    "tournament_rounds",
                    "integer",
                    serde_json::json!(3000),
                    "Tournaments per generation; two winners make one offspring",
                )
                .bounded(2.0, 200_000.0),
                FieldManifest::new(
                    "max_generations",
                    "integer",
                    serde_json::json!(2000),
                    "Generation limit for one run",
                )
                .bounded(1.0, 1_000_000.0),
                FieldManifest::new(
                    "timing_mode",
                    "enum",
                    serde_json::json!("Inherited"),
                    "Inherited copies note timing from the source; Evolved evolves it too",
                ),
                FieldManifest::new(
                    "diversity_strategy",
                    "enum",
                    serde_json::json!("None"),
                    "None, AdaptiveRate or RandomOnStagnation",
                ),
                FieldManifest::new(
                    "initial_mutation_rate",
                    "float",
                    serde_json::json!(0.1),
                    "Per-gene mutation probability at the start of a run",
                )
                .bounded(0.0, 1.0),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::Value::Null,
                    "Fixed random seed for reproducible runs",
                ),
            ],
        }
    }
}
