//! Debug observer.

use beacon_core::{EnrichResult, Enricher, Event, Plugin};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// A pass-through enrichment plugin that logs every event it sees.
///
/// Standard mode emits one `info` line with the kind and attributes. Verbose
/// mode also emits the creation timestamp and a table of the attributes.
#[derive(Debug, Clone, Default)]
pub struct DebugPlugin {
    verbose: bool,
}

impl DebugPlugin {
    /// Create a standard-mode observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose observer.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl Plugin for DebugPlugin {
    fn name(&self) -> &str {
        "debug"
    }
}

impl Enricher for DebugPlugin {
    async fn enrich(&self, event: Event) -> EnrichResult {
        if self.verbose {
            tracing::info!(
                kind = %event.kind(),
                at = %timestamp(&event),
                "event\n{}",
                table(&event)
            );
        } else {
            tracing::info!("{}", summary_line(&event));
        }
        Ok(Some(event))
    }
}

/// One-line rendering: `design: {"eventId":"ui:button"}`.
pub fn summary_line(event: &Event) -> String {
    let mut line = format!("{}: {{", event.kind());
    for (i, (name, value)) in event.attributes().iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let _ = write!(line, "{name:?}:{value}");
    }
    line.push('}');
    line
}

/// Creation time as RFC 3339 in UTC with milliseconds.
pub fn timestamp(event: &Event) -> String {
    let at: DateTime<Utc> = event.created_at().into();
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Two-column table of the attributes, names left-aligned.
pub fn table(event: &Event) -> String {
    let rows: Vec<(&str, String)> = event
        .attributes()
        .into_iter()
        .map(|(name, value)| (name, value.to_string()))
        .collect();
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, value) in rows {
        let _ = writeln!(out, "{name:<width$} | {value}");
    }
    out
}
