use crate::config::evolution::EvolutionConfig;
use crate::config::traits::ConfigSection;
use crate::engines::generation::{
    mutation_control::{MutationController, RateChange},
    operators::{mutate, recombine, tournament_selection},
    population::Population,
    template::Template,
};
use crate::error::MidiEvoError;
use crate::types::DiversityStrategy;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Initializing,
    Running,
    Converged,
    Cancelled,
    GenerationLimitReached,
    Failed(String),
}

impl EngineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineState::Converged
                | EngineState::Cancelled
                | EngineState::GenerationLimitReached
                | EngineState::Failed(_)
        )
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "Idle"),
            EngineState::Initializing => write!(f, "Initializing population..."),
            EngineState::Running => write!(f, "Running..."),
            EngineState::Converged => write!(f, "Converged"),
            EngineState::Cancelled => write!(f, "Cancelled"),
            EngineState::GenerationLimitReached => write!(f, "Generation limit reached"),
            EngineState::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

/// Values copied out of the engine at a generation boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub generation: usize,
    pub max_generations: usize,
    pub best_fitness: u128,
    pub worst_fitness: u128,
    pub mutation_rate: f64,
    pub state: EngineState,
}

pub trait ProgressCallback: Send {
    fn on_run_start(&mut self, _template_len: usize, _population_size: usize) {}
    fn on_generation_complete(&mut self, snapshot: &ProgressSnapshot);
    fn on_mutation_rate_changed(&mut self, _generation: usize, _from: f64, _to: f64) {}
}

/// Final ranked population and how the run ended.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: EngineState,
    pub population: Population,
    pub generations: usize,
    pub mutation_rate: f64,
}

impl RunOutcome {
    pub fn best_fitness(&self) -> Option<u128> {
        self.population.best().map(|c| c.fitness())
    }

    pub fn worst_fitness(&self) -> Option<u128> {
        self.population.worst().map(|c| c.fitness())
    }
}

/// Generational genetic algorithm evolving candidates toward a template.
///
/// One generation is: tournament selection, pairwise recombination,
/// mutation of every offspring, then replacement of the current worst.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    template: Arc<Template>,
    population: Option<Population>,
    controller: MutationController,
    generation: usize,
    state: EngineState,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, template: Option<Arc<Template>>) -> Result<Self, MidiEvoError> {
        let template = template.ok_or(MidiEvoError::NoTemplate)?;
        config.validate()?;
        if template.is_empty() {
            return Err(MidiEvoError::Configuration(
                "Template has no note events to evolve".to_string()
            ));
        }

        if config.tournament_rounds > config.population_size {
            warn!(
                "Tournament rounds ({}) exceed population size ({}); selection pressure will be high",
                config.tournament_rounds, config.population_size
            );
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let controller = MutationController::new(config.adaptive_rate.clone(), config.initial_mutation_rate);

        Ok(Self {
            config,
            template,
            population: None,
            controller,
            generation: 0,
            state: EngineState::Idle,
            rng,
        })
    }

    /// Build generation zero. A no-op once a population exists.
    pub fn initialize(&mut self) {
        if self.population.is_some() {
            return;
        }
        self.state = EngineState::Initializing;
        let population = Population::initialize(
            self.config.population_size,
            &self.template,
            self.config.timing_mode,
            &mut self.rng,
        );
        debug!(
            "Initial population: best {}, worst {}",
            population.best().map(|c| c.fitness()).unwrap_or(0),
            population.worst().map(|c| c.fitness()).unwrap_or(0)
        );
        self.population = Some(population);
        self.state = EngineState::Running;
    }

    /// Run exactly one generation, followed by the adaptive-rate check when due.
    ///
    /// On error the engine moves to `Failed` and keeps the last sorted population.
    pub fn step(&mut self) -> Result<Option<RateChange>, MidiEvoError> {
        self.initialize();
        match self.advance() {
            Ok(change) => Ok(change),
            Err(e) => {
                self.state = EngineState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<RateChange>, MidiEvoError> {
        let population = self.population.as_mut().ok_or(MidiEvoError::NoTemplate)?;
        let template = &self.template;
        let timing = self.config.timing_mode;
        let rate = self.controller.rate();

        let mut offspring = {
            let pool = tournament_selection(population, self.config.tournament_rounds, &mut self.rng);
            recombine(&pool, template, timing, self.config.diversity_strategy, &mut self.rng)
        };
        for child in offspring.iter_mut() {
            mutate(child, template, timing, rate, &mut self.rng);
        }
        population.replace_worst(offspring)?;
        self.generation += 1;

        if self.config.diversity_strategy == DiversityStrategy::AdaptiveRate
            && self.controller.is_due(self.generation)
        {
            let change = self.controller.evaluate(&population.fitness_values())?;
            return Ok(Some(change));
        }
        Ok(None)
    }

    /// Drive generations until convergence, cancellation, the generation limit or a failure.
    ///
    /// `stop` is sampled once per generation boundary.
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C, stop: &AtomicBool) -> RunOutcome {
        info!(
            "Starting evolution: {} notes, population {}, {} rounds, {:?} timing, {:?} strategy",
            self.template.len(),
            self.config.population_size,
            self.config.tournament_rounds,
            self.config.timing_mode,
            self.config.diversity_strategy
        );
        self.initialize();
        callback.on_run_start(self.template.len(), self.config.population_size);

        while self.state == EngineState::Running {
            match self.step() {
                Ok(Some(RateChange::Increased { from, to } | RateChange::Decreased { from, to })) => {
                    callback.on_mutation_rate_changed(self.generation, from, to);
                }
                Ok(_) => {}
                Err(e) => warn!("Generation {} failed: {}", self.generation + 1, e),
            }

            if self.state == EngineState::Running {
                let converged =
                    self.population.as_ref().and_then(Population::best).map(|c| c.fitness()) == Some(0);
                if converged {
                    self.state = EngineState::Converged;
                } else if stop.load(Ordering::SeqCst) {
                    self.state = EngineState::Cancelled;
                } else if self.generation >= self.config.max_generations {
                    self.state = EngineState::GenerationLimitReached;
                }
            }

            if let Some(snapshot) = self.snapshot() {
                debug!(
                    "Generation {}: best {}, worst {}",
                    snapshot.generation, snapshot.best_fitness, snapshot.worst_fitness
                );
                callback.on_generation_complete(&snapshot);
            }
        }

        info!("Evolution finished after {} generations: {}", self.generation, self.state);
        self.outcome()
    }

    /// Immutable view of the current progress, once a population exists.
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        let population = self.population.as_ref()?;
        Some(ProgressSnapshot {
            generation: self.generation,
            max_generations: self.config.max_generations,
            best_fitness: population.best().map(|c| c.fitness()).unwrap_or(0),
            worst_fitness: population.worst().map(|c| c.fitness()).unwrap_or(0),
            mutation_rate: self.controller.rate(),
            state: self.state.clone(),
        })
    }

    fn outcome(&mut self) -> RunOutcome {
        let population = self
            .population
            .clone()
            .unwrap_or_else(|| Population::from_members(Vec::new()));
        RunOutcome {
            state: self.state.clone(),
            population,
            generations: self.generation,
            mutation_rate: self.controller.rate(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn mutation_rate(&self) -> f64 {
        self.controller.rate()
    }

    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}
