use super::panels::{LeftPanel, MainPanel};
use super::services::ConfigBridge;
use super::state::{AppState, UiAction};
use crate::config::AppConfig;
use crate::engines::generation::EvolutionRunner;
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct MidiEvoApp {
    state: AppState,
    left_panel: LeftPanel,
    main_panel: MainPanel,
    runner: Option<EvolutionRunner>,
}

impl Default for MidiEvoApp {
    fn default() -> Self {
        Self::with_config(&AppConfig::default())
    }
}

impl MidiEvoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self::with_config(&config)
    }

    fn with_config(config: &AppConfig) -> Self {
        Self {
            state: AppState::from_config(config),
            left_panel: LeftPanel::new(),
            main_panel: MainPanel::new(),
            runner: None,
        }
    }

    fn handle_action(&mut self) {
        match self.state.pending_action.take() {
            Some(UiAction::Start) => self.start_run(),
            Some(UiAction::Stop) => {
                if let Some(runner) = &self.runner {
                    runner.request_stop();
                }
            }
            None => {}
        }
    }

    fn start_run(&mut self) {
        // Only one worker may own a population at a time.
        if let Some(previous) = self.runner.take() {
            previous.shutdown();
        }

        let Some(sequence) = &self.state.sequence else {
            self.state.validation_error = Some("No template loaded".to_string());
            return;
        };
        let template = Arc::clone(&sequence.template);
        let config = ConfigBridge::to_evolution_config(&self.state);

        match EvolutionRunner::start(config, Some(template)) {
            Ok(runner) => {
                self.state.begin_run();
                self.runner = Some(runner);
            }
            Err(e) => {
                log::warn!("Could not start evolution: {}", e);
                self.state.validation_error = Some(e.to_string());
            }
        }
    }

    fn poll_runner(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };

        if let Some(snapshot) = runner.poll_progress() {
            self.state.apply_snapshot(&snapshot);
        }
        self.state.apply_run_details(runner.run_size(), runner.rate_changes());

        match runner.try_get_results() {
            Some(result) => {
                // the worker may have published after the poll above
                if let Some(snapshot) = runner.poll_progress() {
                    self.state.apply_snapshot(&snapshot);
                }
                self.state.apply_run_details(runner.run_size(), runner.rate_changes());
                match result {
                    Ok(outcome) => self.state.finish_run(outcome),
                    Err(e) => {
                        log::error!("{}", e);
                        self.state.fail_run(e.to_string());
                    }
                }
                self.runner = None;
            }
            None => {}
        }
    }
}

impl eframe::App for MidiEvoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_runner();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("MIDIEvo - Sequence Evolver");
            });
        });

        // Left Panel - Configuration
        egui::SidePanel::left("left_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.left_panel.show(ui, &mut self.state);
                });
            });

        // Central Panel - Progress and export
        egui::CentralPanel::default().show(ctx, |ui| {
            self.main_panel.show(ui, &mut self.state);
        });

        self.handle_action();
        if self.runner.is_some() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
