use eframe::NativeOptions;
use midievo::config::ConfigManager;
use midievo::ui::MidiEvoApp;

const CONFIG_FILE: &str = "midievo.toml";

fn main() -> eframe::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    match manager.load_if_present(CONFIG_FILE) {
        Ok(true) => log::info!("Loaded configuration from {}", CONFIG_FILE),
        Ok(false) => log::info!("No {} found, using defaults", CONFIG_FILE),
        Err(e) => log::warn!("Ignoring {}: {}", CONFIG_FILE, e),
    }
    let config = manager.get().unwrap_or_default();
    if let Ok(manifest) = config.manifests_json() {
        log::debug!("Configuration fields: {}", manifest);
    }

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([700.0, 450.0])
            .with_title("MIDIEvo - Sequence Evolver"),
        ..Default::default()
    };

    eframe::run_native(
        "MIDIEvo",
        native_options,
        Box::new(move |cc| Ok(Box::new(MidiEvoApp::new(cc, config)))),
    )
}
