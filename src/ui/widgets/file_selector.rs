use crate::ui::services::SequenceIo;
use crate::ui::state::AppState;
use std::path::PathBuf;

pub struct FileSelector;

impl FileSelector {
    pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            ui.label("Track:");
            let response = ui.add_enabled(
                !state.is_running,
                egui::DragValue::new(&mut state.track_index).range(0..=255),
            );
            if response.changed() {
                if let Some(path) = state.template_path.clone() {
                    Self::load(state, path);
                }
            }
        });

        ui.horizontal(|ui| {
            let button = ui.add_enabled(!state.is_running, egui::Button::new("Select MIDI File..."));
            if button.clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("MIDI Files", &["mid", "midi"])
                    .pick_file()
                {
                    Self::load(state, path);
                }
            }
        });

        // Display current file info
        if let Some(path) = &state.template_path {
            ui.label(format!("File: {}", path.file_name().unwrap_or_default().to_string_lossy()));
        }
        match &state.sequence {
            Some(sequence) => {
                ui.label(format!("Notes: {}", sequence.template.len()));
                ui.label(format!("Channel: {}", sequence.template.channel() + 1));
                if sequence.mixed_channels {
                    ui.colored_label(egui::Color32::YELLOW, "Track mixes channels");
                }
            }
            None => {
                ui.label("No template loaded");
            }
        }
    }

    fn load(state: &mut AppState, path: PathBuf) {
        match SequenceIo::load(&path, state.track_index) {
            Ok(sequence) => {
                state.status_message = format!("Loaded {} notes", sequence.template.len());
                state.sequence = Some(sequence);
                state.outcome = None;
            }
            Err(e) => {
                log::warn!("{:#}", e);
                state.status_message = format!("Error loading template: {:#}", e);
                state.sequence = None;
            }
        }
        state.template_path = Some(path);
    }
}
