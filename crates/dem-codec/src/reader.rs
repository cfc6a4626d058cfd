//! Demo playback reader.
//!
//! [`DemoReader`] decodes events from any `Read` source, one at a time,
//! threading the session state from event to event. There is no header;
//! the first event normally establishes the session.

use std::io::Read;

use dem_core::GameData;
use tracing::{debug, trace, warn};

use crate::codec::read_discriminator;
use crate::error::DemoError;
use crate::event::read_event;
use crate::options::CodecOptions;
use crate::state::{CodecContext, StreamState};
use crate::types::{event_name, DemoFile, Event};

/// Reads demo events from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
///
/// # Examples
///
/// ```
/// use dem_codec::{CodecOptions, DemoReader, Event};
/// use dem_core::NoGameData;
///
/// // A skipped gated discriminator, a letterbox event, the end marker
/// // and two trailing bytes.
/// let bytes = [46u8, 23, 0, 0xBE, 0xEF];
/// let mut reader = DemoReader::new(&bytes[..], &NoGameData, CodecOptions::default());
/// assert_eq!(reader.next_event().unwrap(), Some(Event::Letterbox));
/// assert_eq!(reader.next_event().unwrap(), Some(Event::Eof));
/// assert_eq!(reader.next_event().unwrap(), None);
/// assert_eq!(reader.skipped_discriminators(), 1);
/// assert_eq!(reader.trailing_bytes(), [0xBE, 0xEF]);
/// ```
pub struct DemoReader<'g, R: Read> {
    reader: R,
    game_data: &'g dyn GameData,
    options: CodecOptions,
    state: StreamState,
    events_read: u64,
    skipped: u64,
    trailing: Vec<u8>,
    done: bool,
}

impl<'g, R: Read> DemoReader<'g, R> {
    /// Create a reader over `reader` with a fresh session state.
    pub fn new(reader: R, game_data: &'g dyn GameData, options: CodecOptions) -> Self {
        Self {
            reader,
            game_data,
            options,
            state: StreamState::new(),
            events_read: 0,
            skipped: 0,
            trailing: Vec::new(),
            done: false,
        }
    }

    /// Read the next event, or `None` once the input or the end marker
    /// has been reached.
    ///
    /// Discriminators that are unknown or not valid for the session are
    /// consumed and skipped. Running out of input mid-event yields
    /// [`DemoError::Truncated`]; the reader is exhausted afterwards.
    pub fn next_event(&mut self) -> Result<Option<Event>, DemoError> {
        if self.done {
            return Ok(None);
        }
        loop {
            let Some(discriminator) = read_discriminator(&mut self.reader)? else {
                self.done = true;
                return Ok(None);
            };
            let ctx = CodecContext::new(self.state, self.game_data, self.options.layout);
            let event = match read_event(&mut self.reader, discriminator, &ctx) {
                Ok(Some(event)) => event,
                Ok(None) => {
                    self.skipped += 1;
                    debug!(
                        discriminator,
                        event = event_name(discriminator),
                        game_type = %self.state.game_type,
                        "skipping event not valid for this session"
                    );
                    continue;
                }
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            };

            self.state.observe(&event);
            self.events_read += 1;
            trace!(event = event.name(), index = self.events_read - 1, "decoded event");
            match &event {
                Event::StartDemo(start) => debug!(
                    edition = start.edition,
                    game_type = %start.game_type,
                    game_mode = %start.game_mode,
                    "session established"
                ),
                Event::Eof => {
                    self.done = true;
                    self.reader.read_to_end(&mut self.trailing)?;
                    if !self.trailing.is_empty() {
                        debug!(len = self.trailing.len(), "trailing bytes after end marker");
                    }
                }
                _ => {}
            }
            return Ok(Some(event));
        }
    }

    /// Session state as of the last decoded event.
    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Number of events decoded so far.
    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    /// Number of discriminators consumed without producing an event.
    pub fn skipped_discriminators(&self) -> u64 {
        self.skipped
    }

    /// Bytes found after the end marker; empty until it has been read.
    pub fn trailing_bytes(&self) -> &[u8] {
        &self.trailing
    }

    /// Iterate over the remaining events.
    pub fn events(&mut self) -> Events<'_, 'g, R> {
        Events { reader: self }
    }

    /// Read every remaining event. Truncation ends the list; any other
    /// error is returned alongside the events read before it.
    fn drain(&mut self) -> (Vec<Event>, Option<DemoError>) {
        let mut events = Vec::new();
        loop {
            match self.next_event() {
                Ok(Some(event)) => events.push(event),
                Ok(None) => return (events, None),
                Err(DemoError::Truncated { context }) => {
                    warn!(
                        context,
                        events = self.events_read,
                        "demo truncated mid-event, keeping events decoded so far"
                    );
                    return (events, None);
                }
                Err(e) => return (events, Some(e)),
            }
        }
    }

    fn into_file(self, events: Vec<Event>) -> DemoFile {
        DemoFile {
            edition: self.state.edition,
            game_type: self.state.game_type,
            events,
            trailing_bytes: self.trailing,
        }
    }

    /// Read the remaining events into a [`DemoFile`].
    ///
    /// A truncated capture is not an error: the result holds every event
    /// completed before the input ran out. Only I/O failures of the
    /// underlying reader are returned.
    pub fn finish(mut self) -> Result<DemoFile, DemoError> {
        match self.drain() {
            (events, None) => Ok(self.into_file(events)),
            (_, Some(e)) => Err(e),
        }
    }

    /// Like [`finish`](Self::finish), but an I/O failure also just ends
    /// the event list.
    pub(crate) fn finish_lossy(mut self) -> DemoFile {
        let (events, err) = self.drain();
        if let Some(e) = err {
            warn!(error = %e, "demo read failed, keeping events decoded so far");
        }
        self.into_file(events)
    }
}

/// Iterator over the remaining events of a [`DemoReader`].
///
/// Ends after the first error.
pub struct Events<'a, 'g, R: Read> {
    reader: &'a mut DemoReader<'g, R>,
}

impl<R: Read> Iterator for Events<'_, '_, R> {
    type Item = Result<Event, DemoError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_event().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use dem_core::{GameType, NoGameData};
    use std::io;

    fn reader(bytes: &[u8]) -> DemoReader<'static, &[u8]> {
        DemoReader::new(bytes, &NoGameData, CodecOptions::default())
    }

    #[test]
    fn empty_input_is_an_empty_file() {
        let file = reader(&[]).finish().unwrap();
        assert_eq!(file, DemoFile::default());
    }

    #[test]
    fn gated_discriminator_skips_one_byte() {
        // No session: 43 is skipped, 5 is a sound with a 4-byte body.
        let bytes = [EVENT_PLAYER_AFTERBURNER, EVENT_SOUND, 9, 0, 0, 0];
        let mut r = reader(&bytes);
        assert_eq!(r.next_event().unwrap(), Some(Event::Sound { sound: 9 }));
        assert_eq!(r.skipped_discriminators(), 1);
        assert_eq!(r.events_read(), 1);
        assert_eq!(r.state().game_type, GameType::UNSET);
    }

    #[test]
    fn truncation_surfaces_then_ends() {
        let bytes = [EVENT_LETTERBOX, EVENT_SOUND, 9, 0];
        let mut r = reader(&bytes);
        assert_eq!(r.next_event().unwrap(), Some(Event::Letterbox));
        assert!(r.next_event().unwrap_err().is_truncation());
        assert_eq!(r.next_event().unwrap(), None);
    }

    #[test]
    fn finish_recovers_from_truncation() {
        let bytes = [EVENT_LETTERBOX, EVENT_REARVIEW, EVENT_SOUND, 9];
        let file = reader(&bytes).finish().unwrap();
        assert_eq!(file.events, vec![Event::Letterbox, Event::Rearview]);
        assert!(!file.is_terminated());
    }

    #[test]
    fn events_iterator_stops_at_end_marker() {
        let bytes = [EVENT_LETTERBOX, EVENT_EOF, EVENT_LETTERBOX];
        let mut r = reader(&bytes);
        let events: Vec<_> = r.events().collect::<Result<_, _>>().unwrap();
        assert_eq!(events, vec![Event::Letterbox, Event::Eof]);
        assert_eq!(r.trailing_bytes(), [EVENT_LETTERBOX]);
    }

    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn io_errors_propagate_from_finish() {
        let r = DemoReader::new(FailingSource, &NoGameData, CodecOptions::default());
        assert!(matches!(r.finish(), Err(DemoError::Io(_))));
    }
}
