// DaocLog - core/stream.rs
//
// Lazy, forward-only event sequence over a line source.
// Core layer: accepts any BufRead, never opens files itself.

use crate::core::classifier::Classifier;
use crate::core::model::CombatEvent;
use crate::util::error::ParseError;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Counters for a finished (or in-progress) stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Lines pulled from the source.
    pub lines_read: u64,
    /// Lines that produced an event.
    pub events: u64,
    /// Lines that matched no template.
    pub skipped: u64,
}

/// Pulls one line at a time from `reader` and yields at most one event per
/// line, in source order.
///
/// End of input ends the sequence. A read error is yielded once as
/// `Err(ParseError::Io)` and the stream is fused afterwards; events already
/// yielded are unaffected.
///
/// A line that is not valid UTF-8 is skipped without being classified, so
/// corrupted bytes can never leak into an event's fields. It does not end
/// the run.
pub struct EventStream<'c, R> {
    reader: R,
    classifier: &'c Classifier,
    path: PathBuf,
    buf: Vec<u8>,
    summary: StreamSummary,
    done: bool,
}

impl<'c, R: BufRead> EventStream<'c, R> {
    /// `path` labels errors only; it is never opened.
    pub fn new(reader: R, classifier: &'c Classifier, path: &Path) -> Self {
        Self {
            reader,
            classifier,
            path: path.to_path_buf(),
            buf: Vec::new(),
            summary: StreamSummary::default(),
            done: false,
        }
    }

    pub fn summary(&self) -> StreamSummary {
        self.summary
    }
}

impl<R: BufRead> Iterator for EventStream<'_, R> {
    type Item = Result<CombatEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    tracing::debug!(
                        file = %self.path.display(),
                        lines = self.summary.lines_read,
                        events = self.summary.events,
                        skipped = self.summary.skipped,
                        "End of log reached"
                    );
                }
                Ok(_) => {
                    self.summary.lines_read += 1;
                    let line = match std::str::from_utf8(&self.buf) {
                        Ok(line) => line,
                        Err(e) => {
                            tracing::debug!(
                                file = %self.path.display(),
                                line = self.summary.lines_read,
                                valid_up_to = e.valid_up_to(),
                                "Skipping line that is not valid UTF-8"
                            );
                            self.summary.skipped += 1;
                            continue;
                        }
                    };
                    match self.classifier.classify(line) {
                        Some(event) => {
                            self.summary.events += 1;
                            return Some(Ok(event));
                        }
                        None => self.summary.skipped += 1,
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    tracing::warn!(
                        file = %self.path.display(),
                        line = self.summary.lines_read + 1,
                        error = %e,
                        "Read failed; stopping"
                    );
                    return Some(Err(ParseError::Io {
                        file: self.path.clone(),
                        source: e,
                    }));
                }
            }
        }
        None
    }
}

impl<R: BufRead> std::iter::FusedIterator for EventStream<'_, R> {}

/// Classify every line of `reader` eagerly.
///
/// Stops at the first read error; events collected before it are returned
/// alongside the error.
pub fn collect_events<R: BufRead>(
    reader: R,
    classifier: &Classifier,
    path: &Path,
) -> (Vec<CombatEvent>, Option<ParseError>) {
    let mut events = Vec::new();
    for item in EventStream::new(reader, classifier, path) {
        match item {
            Ok(event) => events.push(event),
            Err(e) => return (events, Some(e)),
        }
    }
    (events, None)
}
