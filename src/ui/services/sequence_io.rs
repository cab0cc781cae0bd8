use crate::engines::generation::Candidate;
use crate::midi::{self, LoadedSequence};
use anyhow::{Context, Result};
use std::path::Path;

/// File operations behind the panels, with context attached for the status line.
pub struct SequenceIo;

impl SequenceIo {
    pub fn load(path: &Path, track_index: usize) -> Result<LoadedSequence> {
        let sequence = midi::load_template_file(path, track_index)
            .with_context(|| format!("Failed to load track {} of {}", track_index, path.display()))?;
        log::info!(
            "Loaded {} notes from {} (track {} of {})",
            sequence.template.len(),
            path.display(),
            track_index,
            sequence.track_count
        );
        Ok(sequence)
    }

    pub fn export(
        sequence: &LoadedSequence,
        candidate: &Candidate,
        velocity: u8,
        path: &Path,
    ) -> Result<()> {
        midi::write_candidate(sequence, candidate, velocity, path)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        log::info!("Exported candidate (fitness {}) to {}", candidate.fitness(), path.display());
        Ok(())
    }

    /// Suggested export name, e.g. `best_20240131_154500.mid`.
    pub fn default_file_name(label: &str) -> String {
        format!("{}_{}.mid", label, chrono::Local::now().format("%Y%m%d_%H%M%S"))
    }
}
