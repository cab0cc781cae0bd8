use crate::engines::generation::Candidate;
use crate::ui::services::SequenceIo;
use crate::ui::state::AppState;

pub struct MainPanel;

impl MainPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Evolution");

        ui.separator();

        ui.label(&state.status_message);
        if let Some((notes, population)) = state.run_size {
            ui.label(format!("{} notes, population {}", notes, population));
        }

        ui.label(format!("Generation {}/{}", state.current_generation, state.max_generations));
        ui.add(egui::ProgressBar::new(state.progress_percentage).show_percentage());

        ui.separator();

        egui::Grid::new("fitness_grid")
            .striped(true)
            .show(ui, |ui| {
                ui.label("Best fitness:");
                ui.label(Self::fitness_text(state.best_fitness));
                ui.end_row();

                ui.label("Worst fitness:");
                ui.label(Self::fitness_text(state.worst_fitness));
                ui.end_row();

                ui.label("Mutation rate:");
                ui.label(format!("{:.0}%", state.mutation_rate * 100.0));
                ui.end_row();

                if let Some(change) = state.last_rate_change() {
                    ui.label("Last rate change:");
                    ui.label(change);
                    ui.end_row();
                }
            });

        ui.separator();

        if state.outcome.is_none() {
            ui.label("Load a template and press Start.");
            return;
        }

        ui.horizontal(|ui| {
            if ui.button("Export best...").clicked() {
                Self::export(state, "best", |outcome| outcome.population.best());
            }
            if ui.button("Export worst...").clicked() {
                Self::export(state, "worst", |outcome| outcome.population.worst());
            }
        });
    }

    fn fitness_text(fitness: Option<u128>) -> String {
        fitness.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string())
    }

    fn export<F>(state: &mut AppState, label: &str, pick: F)
    where
        F: Fn(&crate::engines::generation::RunOutcome) -> Option<&Candidate>,
    {
        let (Some(sequence), Some(outcome)) = (&state.sequence, &state.outcome) else {
            return;
        };
        let Some(candidate) = pick(outcome) else {
            state.status_message = "Population is empty".to_string();
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("MIDI Files", &["mid"])
            .set_file_name(SequenceIo::default_file_name(label))
            .save_file()
        else {
            return;
        };

        state.status_message = match SequenceIo::export(sequence, candidate, state.output_velocity, &path) {
            Ok(()) => format!("Exported {} candidate to {}", label, path.display()),
            Err(e) => {
                log::warn!("{:#}", e);
                format!("Export failed: {:#}", e)
            }
        };
    }
}
