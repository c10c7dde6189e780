// DaocLog - core/export.rs
//
// Rendering of events as text, JSON Lines, or CSV.
// Core layer: writes to any Write trait object, one event at a time.

use crate::core::model::CombatEvent;
use crate::util::error::ExportError;
use serde::Deserialize;
use std::io::Write;

/// How each event is rendered on the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per event.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Comma-separated values with a header row.
    Csv,
}

enum Sink<W: Write> {
    Text(W),
    Json(W),
    Csv(csv::Writer<W>),
}

/// Streams events to a writer in arrival order.
pub struct EventWriter<W: Write> {
    sink: Sink<W>,
    written: usize,
}

const CSV_HEADER: [&str; 6] = ["kind", "timestamp", "source", "target", "amount", "damage_type"];

impl<W: Write> EventWriter<W> {
    /// Create a writer. For CSV the header row is written immediately.
    pub fn new(writer: W, format: OutputFormat) -> Result<Self, ExportError> {
        let sink = match format {
            OutputFormat::Text => Sink::Text(writer),
            OutputFormat::Json => Sink::Json(writer),
            OutputFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                csv_writer
                    .write_record(CSV_HEADER)
                    .map_err(|e| ExportError::Csv { source: e })?;
                Sink::Csv(csv_writer)
            }
        };
        Ok(Self { sink, written: 0 })
    }

    /// Render a single event.
    pub fn write_event(&mut self, event: &CombatEvent) -> Result<(), ExportError> {
        match &mut self.sink {
            Sink::Text(w) => {
                writeln!(w, "{event}").map_err(|e| ExportError::Io { source: e })?;
            }
            Sink::Json(w) => {
                serde_json::to_writer(&mut *w, event).map_err(|e| ExportError::Json { source: e })?;
                w.write_all(b"\n")
                    .map_err(|e| ExportError::Io { source: e })?;
            }
            Sink::Csv(w) => {
                let (amount, damage_type) = match event {
                    CombatEvent::Damage(d) => (d.damage_amount, d.damage_type.as_str()),
                    CombatEvent::Healing(h) => (h.healing_amount, ""),
                };
                let timestamp = event.timestamp().format("%H:%M:%S").to_string();
                let amount = amount.to_string();
                w.write_record([
                    event.kind_label(),
                    timestamp.as_str(),
                    event.source(),
                    event.target(),
                    amount.as_str(),
                    damage_type,
                ])
                .map_err(|e| ExportError::Csv { source: e })?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush any buffered output. Returns the number of events written.
    pub fn finish(mut self) -> Result<usize, ExportError> {
        let result = match &mut self.sink {
            Sink::Text(w) | Sink::Json(w) => w.flush(),
            Sink::Csv(w) => w.flush(),
        };
        result.map_err(|e| ExportError::Io { source: e })?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DamageEvent, HealingEvent};
    use chrono::NaiveTime;

    fn goblin_hit() -> CombatEvent {
        CombatEvent::Damage(DamageEvent {
            timestamp: NaiveTime::from_hms_opt(1, 23, 45).unwrap(),
            source: "You".to_string(),
            target: "a goblin".to_string(),
            damage_amount: 25,
            damage_type: "slash".to_string(),
        })
    }

    fn render(format: OutputFormat, events: &[CombatEvent]) -> String {
        let mut buf = Vec::new();
        let mut writer = EventWriter::new(&mut buf, format).unwrap();
        for event in events {
            writer.write_event(event).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), events.len());
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_output() {
        let output = render(OutputFormat::Text, &[goblin_hit(), goblin_hit()]);
        assert_eq!(
            output,
            "[01:23:45] You hit a goblin for 25 slash damage\n\
             [01:23:45] You hit a goblin for 25 slash damage\n"
        );
    }

    #[test]
    fn test_json_lines_output() {
        let output = render(OutputFormat::Json, &[goblin_hit()]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["kind"], "damage");
        assert_eq!(value["target"], "a goblin");
        assert_eq!(value["damage_amount"], 25);
    }

    #[test]
    fn test_csv_output() {
        let heal = CombatEvent::Healing(HealingEvent {
            timestamp: NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
            source: "You".to_string(),
            target: "Bob".to_string(),
            healing_amount: 12,
        });
        let output = render(OutputFormat::Csv, &[goblin_hit(), heal]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "kind,timestamp,source,target,amount,damage_type");
        assert_eq!(lines[1], "damage,01:23:45,You,a goblin,25,slash");
        assert_eq!(lines[2], "healing,02:00:00,You,Bob,12,");
    }

    #[test]
    fn test_csv_header_written_with_no_events() {
        let output = render(OutputFormat::Csv, &[]);
        assert_eq!(output.trim_end(), "kind,timestamp,source,target,amount,damage_type");
    }
}
