use crate::config::{ConfigSection, EvolutionConfig};
use crate::ui::state::AppState;

pub struct ConfigBridge;

impl ConfigBridge {
    /// Convert AppState to EvolutionConfig
    pub fn to_evolution_config(state: &AppState) -> EvolutionConfig {
        EvolutionConfig {
            population_size: state.population_size,
            tournament_rounds: state.tournament_rounds,
            max_generations: state.max_generations,
            timing_mode: state.timing_mode,
            diversity_strategy: state.diversity_strategy,
            initial_mutation_rate: state.initial_mutation_rate,
            seed: state.use_seed.then_some(state.seed),
            adaptive_rate: state.adaptive_rate.clone(),
        }
    }

    /// Everything that must hold before Start is enabled.
    pub fn validate(state: &AppState) -> Result<(), String> {
        match &state.sequence {
            None => return Err("No template loaded".to_string()),
            Some(sequence) if sequence.template.is_empty() => {
                return Err(format!("Track {} has no notes", sequence.track_index));
            }
            Some(_) => {}
        }

        Self::to_evolution_config(state)
            .validate()
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::Template;
    use crate::midi::LoadedSequence;
    use crate::types::{Command, NoteEvent};
    use midly::num::u15;
    use midly::Timing;
    use std::sync::Arc;

    fn with_sequence(state: &mut AppState) {
        let genes = vec![NoteEvent::new(Command::NoteOn, 60, 0, 0)];
        state.sequence = Some(LoadedSequence {
            template: Arc::new(Template::new(genes, 0).unwrap()),
            timing: Timing::Metrical(u15::new(96)),
            track_index: 1,
            track_count: 2,
            has_tempo: false,
            mixed_channels: false,
        });
    }

    #[test]
    fn test_seed_only_when_enabled() {
        let mut state = AppState::new();
        state.seed = 42;
        assert_eq!(ConfigBridge::to_evolution_config(&state).seed, None);
        state.use_seed = true;
        assert_eq!(ConfigBridge::to_evolution_config(&state).seed, Some(42));
    }

    #[test]
    fn test_validate_requires_template_and_valid_config() {
        let mut state = AppState::new();
        assert_eq!(
            ConfigBridge::validate(&state),
            Err("No template loaded".to_string())
        );

        with_sequence(&mut state);
        assert!(ConfigBridge::validate(&state).is_ok());

        state.tournament_rounds = 31;
        assert!(ConfigBridge::validate(&state).is_err());
    }
}
