use super::loader::LoadedSequence;
use crate::engines::generation::Candidate;
use crate::error::{MidiError, MidiEvoError};
use crate::types::Command;
use midly::num::{u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, TrackEvent, TrackEventKind};
use std::path::Path;

/// Velocity written for every exported note.
pub const DEFAULT_VELOCITY: u8 = 80;

const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Materialize `candidate` as a single-track file using the source timing.
///
/// Auxiliary events come first at equal ticks. The result borrows
/// auxiliary payloads from `loaded`.
pub fn candidate_to_smf<'a>(
    loaded: &'a LoadedSequence,
    candidate: &Candidate,
    velocity: u8,
) -> Result<Smf<'a>, MidiEvoError> {
    let template = &loaded.template;
    if candidate.len() != template.len() {
        return Err(MidiError::Encode(format!(
            "Candidate has {} notes, template has {}",
            candidate.len(),
            template.len()
        ))
        .into());
    }

    let channel = u4::new(template.channel() & 0x0F);
    let vel = u7::new(velocity.min(127));

    let mut timeline: Vec<(u64, u8, TrackEventKind<'a>)> =
        Vec::with_capacity(template.auxiliary().len() + candidate.len());
    for aux in template.auxiliary() {
        timeline.push((aux.tick, 0, aux.kind()));
    }
    for gene in candidate.genes() {
        let key = u7::new(gene.pitch.min(127));
        let message = match gene.command {
            Command::NoteOn => MidiMessage::NoteOn { key, vel },
            Command::NoteOff => MidiMessage::NoteOff { key, vel },
        };
        timeline.push((gene.tick, 1, TrackEventKind::Midi { channel, message }));
    }
    timeline.sort_by_key(|&(tick, order, _)| (tick, order));

    let mut track = Vec::with_capacity(timeline.len() + 1);
    let mut last_tick = 0u64;
    for (tick, _, kind) in timeline {
        let delta = tick - last_tick;
        if delta > MAX_DELTA {
            return Err(MidiError::Encode(format!(
                "Gap of {} ticks before tick {} does not fit a delta time",
                delta, tick
            ))
            .into());
        }
        track.push(TrackEvent {
            delta: u28::new(delta as u32),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(Format::SingleTrack, loaded.timing));
    smf.tracks.push(track);
    Ok(smf)
}

/// Encode `candidate` to Standard MIDI File bytes.
pub fn encode_candidate(
    loaded: &LoadedSequence,
    candidate: &Candidate,
    velocity: u8,
) -> Result<Vec<u8>, MidiEvoError> {
    let smf = candidate_to_smf(loaded, candidate, velocity)?;
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).map_err(MidiError::Io)?;
    Ok(bytes)
}

/// Encode `candidate` and write it to `path`.
pub fn write_candidate<P: AsRef<Path>>(
    loaded: &LoadedSequence,
    candidate: &Candidate,
    velocity: u8,
    path: P,
) -> Result<(), MidiEvoError> {
    let bytes = encode_candidate(loaded, candidate, velocity)?;
    std::fs::write(path.as_ref(), bytes).map_err(MidiError::Io)?;
    log::info!("Wrote {} notes to {}", candidate.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::Template;
    use crate::midi::AuxEvent;
    use crate::types::NoteEvent;
    use midly::num::{u15, u24};
    use midly::Timing;
    use std::sync::Arc;

    fn loaded() -> LoadedSequence {
        let genes = vec![
            NoteEvent::new(Command::NoteOn, 60, 0, 3),
            NoteEvent::new(Command::NoteOff, 60, 48, 3),
        ];
        let aux = vec![
            AuxEvent::new(0, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(400_000)))),
            AuxEvent::new(48, TrackEventKind::Meta(MetaMessage::Marker(b"end"))),
        ];
        LoadedSequence {
            template: Arc::new(Template::with_auxiliary(genes, 48, 3, aux).unwrap()),
            timing: Timing::Metrical(u15::new(192)),
            track_index: 1,
            track_count: 2,
            has_tempo: true,
            mixed_channels: false,
        }
    }

    #[test]
    fn test_events_sorted_with_auxiliary_first() {
        let loaded = loaded();
        // notes deliberately out of tick order
        let candidate = Candidate::from_genes(
            vec![
                NoteEvent::new(Command::NoteOn, 62, 48, 3),
                NoteEvent::new(Command::NoteOff, 61, 10, 3),
            ],
            &loaded.template,
        )
        .unwrap();
        let smf = candidate_to_smf(&loaded, &candidate, DEFAULT_VELOCITY).unwrap();

        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(192)));
        let track = &smf.tracks[0];
        assert_eq!(track.len(), 5);

        let deltas: Vec<u32> = track.iter().map(|e| e.delta.as_int()).collect();
        assert_eq!(deltas, vec![0, 10, 38, 0, 0]);

        assert!(matches!(track[0].kind, TrackEventKind::Meta(MetaMessage::Tempo(_))));
        assert!(matches!(
            track[1].kind,
            TrackEventKind::Midi { message: MidiMessage::NoteOff { .. }, .. }
        ));
        assert_eq!(track[2].kind, TrackEventKind::Meta(MetaMessage::Marker(b"end")));
        assert!(matches!(
            track[3].kind,
            TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. }
        ));
        assert_eq!(track[4].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn test_notes_use_template_channel_and_velocity() {
        let loaded = loaded();
        let candidate = Candidate::from_genes(loaded.template.genes().to_vec(), &loaded.template).unwrap();
        let smf = candidate_to_smf(&loaded, &candidate, DEFAULT_VELOCITY).unwrap();

        for event in &smf.tracks[0] {
            if let TrackEventKind::Midi { channel, message } = event.kind {
                assert_eq!(channel.as_int(), 3);
                match message {
                    MidiMessage::NoteOn { vel, .. } | MidiMessage::NoteOff { vel, .. } => {
                        assert_eq!(vel.as_int(), 80)
                    }
                    other => panic!("unexpected message {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_exported_bytes_load_back() {
        let loaded = loaded();
        let candidate = Candidate::from_genes(loaded.template.genes().to_vec(), &loaded.template).unwrap();
        let bytes = encode_candidate(&loaded, &candidate, DEFAULT_VELOCITY).unwrap();

        let reloaded = crate::midi::load_template(&bytes, 0).unwrap();
        assert_eq!(reloaded.template.len(), 2);
        assert_eq!(reloaded.template.channel(), 3);
        assert!(reloaded.has_tempo);
    }

    #[test]
    fn test_written_file_loads_back() {
        let loaded = loaded();
        let candidate = Candidate::from_genes(
            vec![
                NoteEvent::new(Command::NoteOn, 67, 0, 3),
                NoteEvent::new(Command::NoteOff, 67, 40, 3),
            ],
            &loaded.template,
        )
        .unwrap();
        let path = std::env::temp_dir().join(format!("midievo_write_{}.mid", std::process::id()));

        write_candidate(&loaded, &candidate, 100, &path).unwrap();
        let reloaded = crate::midi::load_template_file(&path, 0);
        let _ = std::fs::remove_file(&path);

        let reloaded = reloaded.unwrap();
        let notes: Vec<(Command, u8, u64)> = reloaded
            .template
            .genes()
            .iter()
            .map(|g| (g.command, g.pitch, g.tick))
            .collect();
        assert_eq!(notes, vec![(Command::NoteOn, 67, 0), (Command::NoteOff, 67, 40)]);
        assert_eq!(reloaded.template.channel(), 3);
        assert_eq!(reloaded.timing, Timing::Metrical(u15::new(192)));
    }

    #[test]
    fn test_unwritable_path_is_an_io_error() {
        let loaded = loaded();
        let candidate =
            Candidate::from_genes(loaded.template.genes().to_vec(), &loaded.template).unwrap();
        assert!(matches!(
            write_candidate(&loaded, &candidate, DEFAULT_VELOCITY, "/nonexistent/dir/out.mid"),
            Err(MidiEvoError::Midi(MidiError::Io(_)))
        ));
    }

    #[test]
    fn test_oversized_gap_is_an_encode_error() {
        let loaded = loaded();
        let candidate = Candidate::from_genes(
            vec![
                NoteEvent::new(Command::NoteOn, 60, 0, 3),
                NoteEvent::new(Command::NoteOff, 60, MAX_DELTA + 100, 3),
            ],
            &loaded.template,
        )
        .unwrap();
        assert!(matches!(
            candidate_to_smf(&loaded, &candidate, DEFAULT_VELOCITY),
            Err(MidiEvoError::Midi(MidiError::Encode(_)))
        ));
    }
}
