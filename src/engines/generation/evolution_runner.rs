use crate::config::evolution::EvolutionConfig;
use crate::engines::generation::evolution_engine::{EvolutionEngine, ProgressSnapshot, RunOutcome};
use crate::engines::generation::progress::{IpcProgressCallback, ProgressMessage};
use crate::engines::generation::template::Template;
use crate::error::MidiEvoError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Runs one evolution on a dedicated worker thread.
///
/// The worker owns the population. Callers only see [`ProgressSnapshot`]s,
/// the rate changes it reports and, once the worker ends, the [`RunOutcome`].
pub struct EvolutionRunner {
    handle: Option<JoinHandle<RunOutcome>>,
    progress_rx: Receiver<ProgressMessage>,
    stop_flag: Arc<AtomicBool>,
    run_size: Option<(usize, usize)>,
    rate_changes: Vec<(usize, f64, f64)>,
}

impl EvolutionRunner {
    /// Validate and start evolution in background thread
    pub fn start(
        config: EvolutionConfig,
        template: Option<Arc<Template>>,
    ) -> Result<Self, MidiEvoError> {
        // Build the engine here so configuration errors surface synchronously.
        let mut engine = EvolutionEngine::new(config, template)?;

        let (progress_tx, progress_rx) = channel();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let worker_flag = Arc::clone(&stop_flag);

        let handle = thread::Builder::new()
            .name("evolution".to_owned())
            .spawn(move || {
                let mut callback = IpcProgressCallback::new(progress_tx);
                engine.run(&mut callback, &worker_flag)
            })?;

        Ok(Self {
            handle: Some(handle),
            progress_rx,
            stop_flag,
            run_size: None,
            rate_changes: Vec::new(),
        })
    }

    /// Newest snapshot published since the last poll, if any (non-blocking).
    ///
    /// Run-start and rate-change messages drained on the way are recorded.
    pub fn poll_progress(&mut self) -> Option<ProgressSnapshot> {
        let mut newest = None;
        while let Ok(message) = self.progress_rx.try_recv() {
            match message {
                ProgressMessage::RunStarted {
                    template_len,
                    population_size,
                } => self.run_size = Some((template_len, population_size)),
                ProgressMessage::GenerationComplete(snapshot) => newest = Some(snapshot),
                ProgressMessage::MutationRateChanged { generation, from, to } => {
                    self.rate_changes.push((generation, from, to));
                }
            }
        }
        newest
    }

    /// Template length and population size, once the worker has started.
    pub fn run_size(&self) -> Option<(usize, usize)> {
        self.run_size
    }

    /// `(generation, from, to)` for every rate change polled so far.
    pub fn rate_changes(&self) -> &[(usize, f64, f64)] {
        &self.rate_changes
    }

    /// Check if evolution is complete and get results
    pub fn try_get_results(&mut self) -> Option<Result<RunOutcome, MidiEvoError>> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            Some(Self::join(handle))
        } else {
            // Not finished yet, put handle back
            self.handle = Some(handle);
            None
        }
    }

    /// Block until the worker ends.
    pub fn wait(mut self) -> Result<RunOutcome, MidiEvoError> {
        match self.handle.take() {
            Some(handle) => Self::join(handle),
            None => Err(MidiEvoError::Worker("Results already taken".to_string())),
        }
    }

    fn join(handle: JoinHandle<RunOutcome>) -> Result<RunOutcome, MidiEvoError> {
        handle
            .join()
            .map_err(|_| MidiEvoError::Worker("Evolution thread panicked".to_string()))
    }

    /// Ask the worker to stop at the next generation boundary.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Request stop and wait for the worker, discarding its result.
    pub fn shutdown(mut self) {
        self.request_stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EvolutionRunner {
    fn drop(&mut self) {
        self.request_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdaptiveRateConfig;
    use crate::engines::generation::evolution_engine::EngineState;
    use crate::types::{Command, DiversityStrategy, NoteEvent, TimingMode};

    fn template() -> Arc<Template> {
        Arc::new(
            Template::new(
                (0..8)
                    .map(|i| NoteEvent::new(Command::NoteOn, 40 + i as u8, i * 24, 0))
                    .collect(),
                0,
            )
            .unwrap(),
        )
    }

    fn wide_template() -> Arc<Template> {
        let genes = (0..24u64)
            .flat_map(|i| {
                [
                    NoteEvent::new(Command::NoteOn, 50 + i as u8, i * 3840, 0),
                    NoteEvent::new(Command::NoteOff, 50 + i as u8, i * 3840 + 1920, 0),
                ]
            })
            .collect();
        Arc::new(Template::new(genes, 0).unwrap())
    }

    #[test]
    fn test_configuration_error_is_synchronous() {
        let config = EvolutionConfig {
            tournament_rounds: 5,
            ..Default::default()
        };
        assert!(matches!(
            EvolutionRunner::start(config, Some(template())),
            Err(MidiEvoError::Configuration(_))
        ));
        assert!(matches!(
            EvolutionRunner::start(EvolutionConfig::default(), None),
            Err(MidiEvoError::NoTemplate)
        ));
    }

    #[test]
    fn test_runner_completes_and_reports() {
        let config = EvolutionConfig {
            population_size: 20,
            tournament_rounds: 10,
            max_generations: 5,
            seed: Some(1),
            ..Default::default()
        };
        let mut runner = EvolutionRunner::start(config, Some(template())).unwrap();
        let outcome = loop {
            if let Some(result) = runner.try_get_results() {
                break result.unwrap();
            }
            std::thread::yield_now();
        };
        assert!(outcome.state.is_terminal());
        assert_eq!(outcome.population.len(), 20);

        let snapshot = runner.poll_progress().expect("snapshots were published");
        assert_eq!(snapshot.generation, outcome.generations);
        assert!(!runner.is_running());
    }

    #[test]
    fn test_request_stop_cancels_long_run() {
        let config = EvolutionConfig {
            population_size: 50,
            tournament_rounds: 40,
            max_generations: 1_000_000,
            timing_mode: TimingMode::Evolved,
            seed: Some(2),
            ..Default::default()
        };
        let runner = EvolutionRunner::start(config, Some(wide_template())).unwrap();
        runner.request_stop();
        let outcome = runner.wait().unwrap();
        assert_eq!(outcome.state, EngineState::Cancelled);
        assert!(outcome.generations < 1_000_000);
    }

    #[test]
    fn test_poll_records_run_start_and_rate_changes() {
        let config = EvolutionConfig {
            population_size: 40,
            tournament_rounds: 20,
            max_generations: 12,
            timing_mode: TimingMode::Evolved,
            diversity_strategy: DiversityStrategy::AdaptiveRate,
            seed: Some(4),
            adaptive_rate: AdaptiveRateConfig {
                check_interval: 1,
                // any spread is below the low threshold, so every check raises
                low_threshold: 1_000_000.0,
                high_threshold: 2_000_000.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut runner = EvolutionRunner::start(config, Some(wide_template())).unwrap();
        while runner.is_running() {
            runner.poll_progress();
            std::thread::yield_now();
        }
        runner.poll_progress();

        assert_eq!(runner.run_size(), Some((48, 40)));
        // checks after generations 2..=12 raise 0.1 by 0.05 up to 0.65
        let generations: Vec<usize> = runner.rate_changes().iter().map(|c| c.0).collect();
        assert_eq!(generations, (2..=12).collect::<Vec<_>>());
        assert!(runner.rate_changes().iter().all(|&(_, from, to)| to > from));
        assert_eq!(runner.rate_changes()[0].1, 0.1);
    }
}
