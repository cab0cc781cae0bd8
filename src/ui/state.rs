use crate::config::{AdaptiveRateConfig, AppConfig};
use crate::engines::generation::{EngineState, ProgressSnapshot, RunOutcome};
use crate::midi::LoadedSequence;
use crate::types::{DiversityStrategy, TimingMode};
use std::path::PathBuf;

/// Requests raised by the panels and carried out by the app, which owns the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Stop,
}

/// Central application state for the UI
pub struct AppState {
    // Template
    pub template_path: Option<PathBuf>,
    pub sequence: Option<LoadedSequence>,
    pub track_index: usize,
    pub output_velocity: u8,

    // Evolution Configuration
    pub timing_mode: TimingMode,
    pub diversity_strategy: DiversityStrategy,
    pub population_size: usize,
    pub tournament_rounds: usize,
    pub max_generations: usize,
    pub initial_mutation_rate: f64,
    pub use_seed: bool,
    pub seed: u64,
    pub adaptive_rate: AdaptiveRateConfig,

    // Execution State
    pub is_running: bool,
    pub engine_state: EngineState,
    pub current_generation: usize,
    pub progress_percentage: f32,
    pub best_fitness: Option<u128>,
    pub worst_fitness: Option<u128>,
    pub mutation_rate: f64,
    pub run_size: Option<(usize, usize)>,
    pub rate_changes: Vec<(usize, f64, f64)>,
    pub status_message: String,
    pub validation_error: Option<String>,

    // Results
    pub outcome: Option<RunOutcome>,

    pub pending_action: Option<UiAction>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let evolution = &config.evolution;
        Self {
            template_path: None,
            sequence: None,
            track_index: config.midi.track_index,
            output_velocity: config.midi.output_velocity,

            timing_mode: evolution.timing_mode,
            diversity_strategy: evolution.diversity_strategy,
            population_size: evolution.population_size,
            tournament_rounds: evolution.tournament_rounds,
            max_generations: evolution.max_generations,
            initial_mutation_rate: evolution.initial_mutation_rate,
            use_seed: evolution.seed.is_some(),
            seed: evolution.seed.unwrap_or(0),
            adaptive_rate: evolution.adaptive_rate.clone(),

            is_running: false,
            engine_state: EngineState::Idle,
            current_generation: 0,
            progress_percentage: 0.0,
            best_fitness: None,
            worst_fitness: None,
            mutation_rate: evolution.initial_mutation_rate,
            run_size: None,
            rate_changes: Vec::new(),
            status_message: "Ready".to_string(),
            validation_error: None,

            outcome: None,

            pending_action: None,
        }
    }

    /// Reset progress fields for a fresh run.
    pub fn begin_run(&mut self) {
        self.is_running = true;
        self.engine_state = EngineState::Initializing;
        self.current_generation = 0;
        self.progress_percentage = 0.0;
        self.best_fitness = None;
        self.worst_fitness = None;
        self.mutation_rate = self.initial_mutation_rate;
        self.run_size = None;
        self.rate_changes.clear();
        self.validation_error = None;
        self.outcome = None;
        self.status_message = EngineState::Initializing.to_string();
    }

    pub fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.current_generation = snapshot.generation;
        self.progress_percentage = if snapshot.max_generations == 0 {
            0.0
        } else {
            (snapshot.generation as f32 / snapshot.max_generations as f32).min(1.0)
        };
        self.best_fitness = Some(snapshot.best_fitness);
        self.worst_fitness = Some(snapshot.worst_fitness);
        self.mutation_rate = snapshot.mutation_rate;
        self.engine_state = snapshot.state.clone();
        self.status_message = snapshot.state.to_string();
    }

    /// Copy what the runner has recorded besides snapshots.
    pub fn apply_run_details(
        &mut self,
        run_size: Option<(usize, usize)>,
        rate_changes: &[(usize, f64, f64)],
    ) {
        if run_size.is_some() {
            self.run_size = run_size;
        }
        if rate_changes.len() != self.rate_changes.len() {
            self.rate_changes = rate_changes.to_vec();
        }
    }

    /// The most recent mutation rate change, formatted for the panel.
    pub fn last_rate_change(&self) -> Option<String> {
        self.rate_changes.last().map(|(generation, from, to)| {
            format!("{:.0}% -> {:.0}% at generation {}", from * 100.0, to * 100.0, generation)
        })
    }

    pub fn finish_run(&mut self, outcome: RunOutcome) {
        self.is_running = false;
        self.current_generation = outcome.generations;
        self.best_fitness = outcome.best_fitness();
        self.worst_fitness = outcome.worst_fitness();
        self.mutation_rate = outcome.mutation_rate;
        self.engine_state = outcome.state.clone();
        self.status_message = format!(
            "{} after {} generations",
            outcome.state, outcome.generations
        );
        self.outcome = Some(outcome);
    }

    pub fn fail_run(&mut self, message: String) {
        self.is_running = false;
        self.engine_state = EngineState::Failed(message.clone());
        self.status_message = format!("Error: {}", message);
    }
}
