use serde::{Deserialize, Serialize};

/// Highest MIDI key number.
pub const MAX_PITCH: u8 = 127;

/// Note command carried by a gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    NoteOff,
    NoteOn,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::NoteOff, Command::NoteOn];

    /// MIDI status nibble used when measuring command distance.
    pub fn code(self) -> u8 {
        match self {
            Command::NoteOff => 0x80,
            Command::NoteOn => 0x90,
        }
    }
}

/// One note event: the atomic unit of a candidate and of the template.
///
/// `fitness` caches the distance to the template gene at the same position.
/// It is only valid after [`gene_fitness`](crate::engines::generation::fitness::gene_fitness)
/// has run against that gene; copying a gene copies the cache with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub command: Command,
    pub pitch: u8,
    pub tick: u64,
    pub channel: u8,
    pub fitness: u64,
}

impl NoteEvent {
    pub fn new(command: Command, pitch: u8, tick: u64, channel: u8) -> Self {
        Self {
            command,
            pitch,
            tick,
            channel,
            fitness: 0,
        }
    }

    /// Compares the musical content only, ignoring channel and the fitness cache.
    pub fn same_note(&self, other: &NoteEvent) -> bool {
        self.command == other.command && self.pitch == other.pitch && self.tick == other.tick
    }
}

/// Whether note timing is copied from the template or evolved with the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingMode {
    /// Ticks are inherited from the template; only command and pitch evolve.
    Inherited,
    /// Command, pitch and tick all evolve.
    Evolved,
}

/// Variation policy applied on top of the plain generational loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiversityStrategy {
    None,
    /// Periodically adjust the mutation rate from population spread.
    AdaptiveRate,
    /// Replace the offspring of identical parents with a random candidate.
    RandomOnStagnation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes_are_midi_status_nibbles() {
        assert_eq!(Command::NoteOff.code(), 0x80);
        assert_eq!(Command::NoteOn.code(), 0x90);
    }

    #[test]
    fn test_same_note_ignores_cache_and_channel() {
        let mut a = NoteEvent::new(Command::NoteOn, 60, 10, 0);
        let b = NoteEvent::new(Command::NoteOn, 60, 10, 3);
        a.fitness = 42;
        assert!(a.same_note(&b));
        assert!(!a.same_note(&NoteEvent::new(Command::NoteOff, 60, 10, 0)));
    }
}
