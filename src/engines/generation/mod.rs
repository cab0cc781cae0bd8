pub mod candidate;
pub mod evolution_engine;
pub mod evolution_runner;
pub mod fitness;
pub mod mutation_control;
pub mod operators;
pub mod population;
pub mod progress;
pub mod template;

pub use candidate::Candidate;
pub use evolution_engine::{
    EngineState, EvolutionEngine, ProgressCallback, ProgressSnapshot, RunOutcome,
};
pub use evolution_runner::EvolutionRunner;
pub use fitness::{candidate_fitness, gene_fitness};
pub use mutation_control::{FitnessStats, MutationController, RateChange};
pub use population::Population;
pub use progress::{ConsoleProgressCallback, IpcProgressCallback, ProgressMessage};
pub use template::Template;
