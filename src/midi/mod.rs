// Standard MIDI File adapter around the evolution engine.
//
// The loader turns one track of a file into a Template; the writer turns a
// ranked candidate back into a playable single-track file. Both use `midly`.
// The engine itself never calls into this module.

mod aux_event;
mod loader;
mod writer;

pub use aux_event::AuxEvent;
pub use loader::{load_template, load_template_file, LoadedSequence};
pub use writer::{candidate_to_smf, encode_candidate, write_candidate, DEFAULT_VELOCITY};
