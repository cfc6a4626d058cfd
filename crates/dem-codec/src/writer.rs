//! Demo recording writer.
//!
//! [`DemoWriter`] streams events to any `Write` sink, threading the same
//! session state the reader does so every conditional field is written
//! exactly when a reader will expect it.

use std::io::Write;

use dem_core::GameData;
use tracing::{debug, trace};

use crate::error::DemoError;
use crate::event;
use crate::options::CodecOptions;
use crate::state::{CodecContext, StreamState};
use crate::types::Event;

/// Writes demo events to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// Each event is encoded in full before any of it reaches the sink, so
/// an event rejected for a contract violation leaves the output
/// untouched and the writer usable.
///
/// # Examples
///
/// ```
/// use dem_codec::{CodecOptions, DemoReader, DemoWriter, Event};
/// use dem_core::NoGameData;
///
/// let mut writer = DemoWriter::new(Vec::new(), &NoGameData, CodecOptions::default());
/// writer.write_event(&Event::Sound { sound: 3 }).unwrap();
/// writer.write_event(&Event::Eof).unwrap();
/// assert_eq!(writer.events_written(), 2);
/// let bytes = writer.finish(&[0x7F]).unwrap();
/// assert_eq!(bytes, [5, 3, 0, 0, 0, 0, 0x7F]);
///
/// let mut reader = DemoReader::new(bytes.as_slice(), &NoGameData, CodecOptions::default());
/// assert_eq!(reader.next_event().unwrap(), Some(Event::Sound { sound: 3 }));
/// ```
pub struct DemoWriter<'g, W: Write> {
    writer: W,
    game_data: &'g dyn GameData,
    options: CodecOptions,
    state: StreamState,
    events_written: u64,
    terminated: bool,
    scratch: Vec<u8>,
}

impl<'g, W: Write> DemoWriter<'g, W> {
    /// Create a writer over `writer` with a fresh session state.
    pub fn new(writer: W, game_data: &'g dyn GameData, options: CodecOptions) -> Self {
        Self {
            writer,
            game_data,
            options,
            state: StreamState::new(),
            events_written: 0,
            terminated: false,
            scratch: Vec::new(),
        }
    }

    /// Encode and write one event.
    pub fn write_event(&mut self, ev: &Event) -> Result<(), DemoError> {
        if self.terminated {
            return Err(DemoError::EventAfterEof { event: ev.name() });
        }
        self.scratch.clear();
        let ctx = CodecContext::new(self.state, self.game_data, self.options.layout);
        event::write_event(&mut self.scratch, ev, &ctx)?;
        self.writer.write_all(&self.scratch)?;

        self.state.observe(ev);
        self.events_written += 1;
        trace!(event = ev.name(), len = self.scratch.len(), "encoded event");
        match ev {
            Event::StartDemo(start) => debug!(
                edition = start.edition,
                game_type = %start.game_type,
                game_mode = %start.game_mode,
                "session established"
            ),
            Event::Eof => self.terminated = true,
            _ => {}
        }
        Ok(())
    }

    /// Session state as of the last written event.
    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Number of events written so far.
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// The underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// `true` once the end marker has been written.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), DemoError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Append `trailing` after the end marker, flush, and return the sink.
    ///
    /// Trailing bytes need an end marker in front of them; without one a
    /// reader would parse them as events.
    pub fn finish(mut self, trailing: &[u8]) -> Result<W, DemoError> {
        if !trailing.is_empty() {
            if !self.terminated {
                return Err(DemoError::TrailingWithoutEof {
                    len: trailing.len(),
                });
            }
            self.writer.write_all(trailing)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
