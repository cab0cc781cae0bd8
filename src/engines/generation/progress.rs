use super::evolution_engine::{ProgressCallback, ProgressSnapshot};
use std::sync::mpsc::Sender;

/// Logs progress through the `log` facade.
pub struct ConsoleProgressCallback {
    /// Log every n-th generation; terminal generations are always logged.
    pub every: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { every: 100 }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_run_start(&mut self, template_len: usize, population_size: usize) {
        log::info!(
            "Evolving {} notes with a population of {}",
            template_len, population_size
        );
    }

    fn on_generation_complete(&mut self, snapshot: &ProgressSnapshot) {
        if snapshot.state.is_terminal() || snapshot.generation % self.every.max(1) == 0 {
            log::info!(
                "Generation {}/{} - best {}, worst {}, mutation {:.0}%",
                snapshot.generation,
                snapshot.max_generations,
                snapshot.best_fitness,
                snapshot.worst_fitness,
                snapshot.mutation_rate * 100.0
            );
        }
    }

    fn on_mutation_rate_changed(&mut self, generation: usize, from: f64, to: f64) {
        log::info!(
            "Generation {}: mutation rate {:.0}% -> {:.0}%",
            generation,
            from * 100.0,
            to * 100.0
        );
    }
}

// For IPC communication with UI
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    RunStarted { template_len: usize, population_size: usize },
    GenerationComplete(ProgressSnapshot),
    MutationRateChanged { generation: usize, from: f64, to: f64 },
}

/// Forwards every event to the UI thread and logs it as well.
pub struct IpcProgressCallback {
    sender: Sender<ProgressMessage>,
    console: ConsoleProgressCallback,
}

impl IpcProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self {
            sender,
            console: ConsoleProgressCallback::default(),
        }
    }
}

impl ProgressCallback for IpcProgressCallback {
    fn on_run_start(&mut self, template_len: usize, population_size: usize) {
        self.console.on_run_start(template_len, population_size);
        let _ = self.sender.send(ProgressMessage::RunStarted {
            template_len,
            population_size,
        });
    }

    fn on_generation_complete(&mut self, snapshot: &ProgressSnapshot) {
        self.console.on_generation_complete(snapshot);
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(snapshot.clone()));
    }

    fn on_mutation_rate_changed(&mut self, generation: usize, from: f64, to: f64) {
        self.console.on_mutation_rate_changed(generation, from, to);
        let _ = self.sender.send(ProgressMessage::MutationRateChanged {
            generation,
            from,
            to,
        });
    }
}
