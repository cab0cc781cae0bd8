use crate::error::TemplateError;
use crate::midi::AuxEvent;
use crate::types::{NoteEvent, MAX_PITCH};

/// The reference sequence every candidate is measured against.
///
/// Built once per run by the sequence loader and never modified afterwards.
/// The engine only reads the note genes, `max_tick` and `channel`; the
/// auxiliary events are carried along so an exporter can rebuild a full track.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    genes: Vec<NoteEvent>,
    max_tick: u64,
    channel: u8,
    auxiliary: Vec<AuxEvent>,
}

impl Template {
    /// Largest tick accepted in a template. Keeps a gene distance inside `u64`
    /// and a candidate sum inside `u128` for any gene count.
    pub const MAX_TICK: u64 = u32::MAX as u64;

    /// Build a template from note genes alone. `max_tick` is the last note tick.
    pub fn new(genes: Vec<NoteEvent>, channel: u8) -> Result<Self, TemplateError> {
        Self::with_auxiliary(genes, 0, channel, Vec::new())
    }

    /// Build a template with passthrough events. `max_tick` is raised to the
    /// latest note tick if the caller's value is smaller.
    pub fn with_auxiliary(
        mut genes: Vec<NoteEvent>,
        max_tick: u64,
        channel: u8,
        auxiliary: Vec<AuxEvent>,
    ) -> Result<Self, TemplateError> {
        if max_tick > Self::MAX_TICK {
            return Err(TemplateError::TickOutOfRange {
                index: genes.len(),
                tick: max_tick,
                max: Self::MAX_TICK,
            });
        }

        let mut last_tick = max_tick;
        for (index, gene) in genes.iter_mut().enumerate() {
            if gene.tick > Self::MAX_TICK {
                return Err(TemplateError::TickOutOfRange {
                    index,
                    tick: gene.tick,
                    max: Self::MAX_TICK,
                });
            }
            if gene.pitch > MAX_PITCH {
                return Err(TemplateError::PitchOutOfRange {
                    index,
                    pitch: gene.pitch,
                });
            }
            gene.fitness = 0;
            last_tick = last_tick.max(gene.tick);
        }

        Ok(Self {
            genes,
            max_tick: last_tick,
            channel,
            auxiliary,
        })
    }

    pub fn genes(&self) -> &[NoteEvent] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn max_tick(&self) -> u64 {
        self.max_tick
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn auxiliary(&self) -> &[AuxEvent] {
        &self.auxiliary
    }
}
