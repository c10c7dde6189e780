// DaocLog - app/run.rs
//
// One parse run: open the log, stream events through the classifier,
// render each one to the output as it arrives.

use crate::core::classifier::Classifier;
use crate::core::export::{EventWriter, OutputFormat};
use crate::core::stream::{EventStream, StreamSummary};
use crate::platform::fs;
use crate::util::error::Result;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub stream: StreamSummary,
    pub events_written: usize,
    pub duration: Duration,
}

/// Parse `log_path` and write every recognised event to `out`.
///
/// Events are written as soon as they are classified, so a read failure
/// part-way through leaves the earlier events on the output before the
/// error is returned.
pub fn run<W: Write>(
    log_path: &Path,
    classifier: &Classifier,
    format: OutputFormat,
    out: W,
) -> Result<RunSummary> {
    let started = Instant::now();
    let reader = fs::open_log(log_path)?;

    tracing::info!(
        file = %log_path.display(),
        templates = classifier.templates().len(),
        format = ?format,
        "Parsing started"
    );

    let mut writer = EventWriter::new(out, format)?;
    let mut stream = EventStream::new(reader, classifier, log_path);

    for item in stream.by_ref() {
        match item {
            Ok(event) => writer.write_event(&event)?,
            Err(e) => {
                tracing::debug!(written = writer.written(), "Flushing events read before failure");
                writer.finish()?;
                return Err(e.into());
            }
        }
    }

    let events_written = writer.finish()?;
    let summary = RunSummary {
        stream: stream.summary(),
        events_written,
        duration: started.elapsed(),
    };

    tracing::info!(
        file = %log_path.display(),
        lines = summary.stream.lines_read,
        events = summary.stream.events,
        skipped = summary.stream.skipped,
        elapsed_ms = summary.duration.as_millis() as u64,
        "Parsing complete"
    );

    Ok(summary)
}
