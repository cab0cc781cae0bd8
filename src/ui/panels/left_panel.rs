use crate::types::{DiversityStrategy, TimingMode};
use crate::ui::services::ConfigBridge;
use crate::ui::state::{AppState, UiAction};
use crate::ui::widgets::FileSelector;

pub struct LeftPanel;

impl LeftPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Configuration");
        ui.separator();

        ui.collapsing("Template", |ui| {
            FileSelector::show(ui, state);
        });

        ui.separator();

        ui.add_enabled_ui(!state.is_running, |ui| {
            Self::show_timing_mode(ui, state);
            ui.separator();
            Self::show_diversity_strategy(ui, state);
            ui.separator();
            Self::show_evolution_config(ui, state);
        });

        ui.separator();

        Self::show_control_buttons(ui, state);
    }

    fn show_timing_mode(ui: &mut egui::Ui, state: &mut AppState) {
        ui.label("Timing:");
        ui.radio_value(&mut state.timing_mode, TimingMode::Inherited, "Inherit note timing");
        ui.radio_value(&mut state.timing_mode, TimingMode::Evolved, "Evolve note timing");
    }

    fn show_diversity_strategy(ui: &mut egui::Ui, state: &mut AppState) {
        ui.label("Diversity:");
        ui.radio_value(&mut state.diversity_strategy, DiversityStrategy::None, "None");
        ui.radio_value(
            &mut state.diversity_strategy,
            DiversityStrategy::AdaptiveRate,
            "Adaptive mutation rate",
        );
        ui.radio_value(
            &mut state.diversity_strategy,
            DiversityStrategy::RandomOnStagnation,
            "Random offspring on identical parents",
        );
    }

    fn show_evolution_config(ui: &mut egui::Ui, state: &mut AppState) {
        ui.label("Evolution Parameters:");

        ui.horizontal(|ui| {
            ui.label("Population:");
            ui.add(egui::DragValue::new(&mut state.population_size).range(1..=100_000));
        });

        ui.horizontal(|ui| {
            ui.label("Tournament Rounds:");
            ui.add(
                egui::DragValue::new(&mut state.tournament_rounds)
                    .range(2..=200_000)
                    .speed(2.0),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Generations:");
            ui.add(egui::DragValue::new(&mut state.max_generations).range(1..=1_000_000));
        });

        ui.horizontal(|ui| {
            ui.label("Mutation Rate:");
            ui.add(egui::Slider::new(&mut state.initial_mutation_rate, 0.0..=1.0).step_by(0.01));
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut state.use_seed, "Seed:");
            ui.add_enabled(state.use_seed, egui::DragValue::new(&mut state.seed));
        });
    }

    fn show_control_buttons(ui: &mut egui::Ui, state: &mut AppState) {
        ui.vertical_centered(|ui| {
            // Validate before allowing run
            let validation = ConfigBridge::validate(state);
            let can_run = validation.is_ok() && !state.is_running;

            let run_button = ui.add_enabled(can_run, egui::Button::new("▶ Start"));
            if run_button.clicked() {
                state.pending_action = Some(UiAction::Start);
            }

            if let Err(error) = validation {
                ui.colored_label(egui::Color32::RED, error);
            }
            if let Some(error) = &state.validation_error {
                ui.colored_label(egui::Color32::RED, error);
            }

            let stop_button = ui.add_enabled(state.is_running, egui::Button::new("⏹ Stop"));
            if stop_button.clicked() {
                state.status_message = "Stopping...".to_string();
                state.pending_action = Some(UiAction::Stop);
            }
        });
    }
}
