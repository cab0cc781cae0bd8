use midly::{MetaMessage, TrackEventKind};

/// A non-note event of the template track, kept with its absolute tick.
///
/// `midly` events borrow from the parsed file, so any byte payload is copied
/// out and the event shape is stored with an empty slice in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxEvent {
    pub tick: u64,
    shape: TrackEventKind<'static>,
    payload: Vec<u8>,
}

impl AuxEvent {
    pub fn new(tick: u64, kind: TrackEventKind<'_>) -> Self {
        let (shape, payload) = detach(kind);
        Self { tick, shape, payload }
    }

    /// The event as `midly` sees it, borrowing its payload from `self`.
    pub fn kind(&self) -> TrackEventKind<'_> {
        attach(self.shape, &self.payload)
    }
}

fn detach(kind: TrackEventKind<'_>) -> (TrackEventKind<'static>, Vec<u8>) {
    match kind {
        TrackEventKind::Midi { channel, message } => {
            (TrackEventKind::Midi { channel, message }, Vec::new())
        }
        TrackEventKind::SysEx(data) => (TrackEventKind::SysEx(&[]), data.to_vec()),
        TrackEventKind::Escape(data) => (TrackEventKind::Escape(&[]), data.to_vec()),
        TrackEventKind::Meta(meta) => {
            let (shape, payload) = detach_meta(meta);
            (TrackEventKind::Meta(shape), payload)
        }
    }
}

fn detach_meta(meta: MetaMessage<'_>) -> (MetaMessage<'static>, Vec<u8>) {
    use MetaMessage as M;
    match meta {
        M::Text(b) => (M::Text(&[]), b.to_vec()),
        M::Copyright(b) => (M::Copyright(&[]), b.to_vec()),
        M::TrackName(b) => (M::TrackName(&[]), b.to_vec()),
        M::InstrumentName(b) => (M::InstrumentName(&[]), b.to_vec()),
        M::Lyric(b) => (M::Lyric(&[]), b.to_vec()),
        M::Marker(b) => (M::Marker(&[]), b.to_vec()),
        M::CuePoint(b) => (M::CuePoint(&[]), b.to_vec()),
        M::ProgramName(b) => (M::ProgramName(&[]), b.to_vec()),
        M::DeviceName(b) => (M::DeviceName(&[]), b.to_vec()),
        M::SequencerSpecific(b) => (M::SequencerSpecific(&[]), b.to_vec()),
        M::Unknown(kind, b) => (M::Unknown(kind, &[]), b.to_vec()),
        M::TrackNumber(n) => (M::TrackNumber(n), Vec::new()),
        M::MidiChannel(c) => (M::MidiChannel(c), Vec::new()),
        M::MidiPort(p) => (M::MidiPort(p), Vec::new()),
        M::EndOfTrack => (M::EndOfTrack, Vec::new()),
        M::Tempo(t) => (M::Tempo(t), Vec::new()),
        M::SmpteOffset(s) => (M::SmpteOffset(s), Vec::new()),
        M::TimeSignature(a, b, c, d) => (M::TimeSignature(a, b, c, d), Vec::new()),
        M::KeySignature(k, minor) => (M::KeySignature(k, minor), Vec::new()),
    }
}

fn attach<'a>(shape: TrackEventKind<'static>, payload: &'a [u8]) -> TrackEventKind<'a> {
    use MetaMessage as M;
    match shape {
        TrackEventKind::SysEx(_) => TrackEventKind::SysEx(payload),
        TrackEventKind::Escape(_) => TrackEventKind::Escape(payload),
        TrackEventKind::Meta(meta) => TrackEventKind::Meta(match meta {
            M::Text(_) => M::Text(payload),
            M::Copyright(_) => M::Copyright(payload),
            M::TrackName(_) => M::TrackName(payload),
            M::InstrumentName(_) => M::InstrumentName(payload),
            M::Lyric(_) => M::Lyric(payload),
            M::Marker(_) => M::Marker(payload),
            M::CuePoint(_) => M::CuePoint(payload),
            M::ProgramName(_) => M::ProgramName(payload),
            M::DeviceName(_) => M::DeviceName(payload),
            M::SequencerSpecific(_) => M::SequencerSpecific(payload),
            M::Unknown(kind, _) => M::Unknown(kind, payload),
            other => other,
        }),
        other => other,
    }
}
