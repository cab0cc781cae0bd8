use super::aux_event::AuxEvent;
use crate::engines::generation::Template;
use crate::error::{MidiError, MidiEvoError};
use crate::types::{Command, NoteEvent};
use log::{debug, warn};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::path::Path;
use std::sync::Arc;

/// A template together with what an exporter needs to rebuild a file.
#[derive(Debug, Clone)]
pub struct LoadedSequence {
    pub template: Arc<Template>,
    pub timing: Timing,
    pub track_index: usize,
    pub track_count: usize,
    pub has_tempo: bool,
    pub mixed_channels: bool,
}

/// Build a template from one track of a Standard MIDI File.
///
/// Every NoteOn/NoteOff becomes a gene, velocity dropped. Everything else
/// except End-Of-Track is kept as an auxiliary event at its absolute tick.
pub fn load_template(bytes: &[u8], track_index: usize) -> Result<LoadedSequence, MidiEvoError> {
    let smf = Smf::parse(bytes).map_err(|e| MidiError::Parse(e.to_string()))?;
    let track_count = smf.tracks.len();
    let track = smf.tracks.get(track_index).ok_or(MidiError::MissingTrack {
        requested: track_index,
        available: track_count,
    })?;

    let mut genes = Vec::new();
    let mut auxiliary = Vec::new();
    let mut tick = 0u64;
    let mut max_tick = 0u64;
    let mut channel: Option<u8> = None;
    let mut mixed_channels = false;
    let mut has_tempo = false;

    for event in track {
        tick += u64::from(event.delta.as_int());

        match event.kind {
            TrackEventKind::Midi { channel: ch, message } => {
                let ch = ch.as_int();
                max_tick = max_tick.max(tick);
                match channel {
                    None => channel = Some(ch),
                    Some(first) if first != ch => mixed_channels = true,
                    Some(_) => {}
                }

                match message {
                    MidiMessage::NoteOn { key, .. } => {
                        genes.push(NoteEvent::new(Command::NoteOn, key.as_int(), tick, ch));
                    }
                    MidiMessage::NoteOff { key, .. } => {
                        genes.push(NoteEvent::new(Command::NoteOff, key.as_int(), tick, ch));
                    }
                    _ => auxiliary.push(AuxEvent::new(tick, event.kind)),
                }
            }
            TrackEventKind::Meta(MetaMessage::EndOfTrack) => {}
            TrackEventKind::Meta(MetaMessage::Tempo(_)) => {
                has_tempo = true;
                auxiliary.push(AuxEvent::new(tick, event.kind));
            }
            other => auxiliary.push(AuxEvent::new(tick, other)),
        }
    }

    if mixed_channels {
        warn!(
            "Track {} uses several channels; exported notes will all use channel {}",
            track_index,
            channel.unwrap_or(0)
        );
    }
    debug!(
        "Track {}: {} note events, {} auxiliary events, last tick {}",
        track_index,
        genes.len(),
        auxiliary.len(),
        max_tick
    );

    let template = Template::with_auxiliary(genes, max_tick, channel.unwrap_or(0), auxiliary)?;

    Ok(LoadedSequence {
        template: Arc::new(template),
        timing: smf.header.timing,
        track_index,
        track_count,
        has_tempo,
        mixed_channels,
    })
}

pub fn load_template_file<P: AsRef<Path>>(path: P, track_index: usize) -> Result<LoadedSequence, MidiEvoError> {
    let bytes = std::fs::read(path.as_ref()).map_err(MidiError::Io)?;
    load_template(&bytes, track_index)
}
