//! Non-fatal findings raised during a pass.
//!
//! The pass never prints. It hands each finding to a [`DiagnosticSink`];
//! the CLI logs them and can dump them as JSON for manual review.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::types::format_ymd;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// Release month/day went backwards, so the running year advanced.
    NewYear {
        row: usize,
        release: String,
        year: i32,
        month: u32,
        day: u32,
    },
    /// A secondary date resolved further from its release date than the threshold.
    FarFromAnchor {
        row: usize,
        release: String,
        field: &'static str,
        resolved: NaiveDate,
        anchor: NaiveDate,
        distance_days: i64,
    },
    /// Row starts with neither the header marker nor a date.
    UnrecognizedRow { row: usize, first_field: String },
}

impl Diagnostic {
    pub fn row(&self) -> usize {
        match self {
            Self::NewYear { row, .. }
            | Self::FarFromAnchor { row, .. }
            | Self::UnrecognizedRow { row, .. } => *row,
        }
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Logs every diagnostic as it arrives and keeps it for the report.
#[derive(Debug, Default)]
pub struct LoggingSink {
    events: Vec<Diagnostic>,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn warning_count(&self) -> usize {
        self.events
            .iter()
            .filter(|d| !matches!(d, Diagnostic::NewYear { .. }))
            .count()
    }
}

impl DiagnosticSink for LoggingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::NewYear {
                row,
                release,
                year,
                month,
                day,
            } => info!(row, %release, "detect new year {year} {month} {day}"),
            Diagnostic::FarFromAnchor {
                row,
                release,
                field,
                resolved,
                anchor,
                distance_days,
            } => warn!(
                row,
                %release,
                field,
                "date {} - release {} = {distance_days} days",
                format_ymd(*resolved),
                format_ymd(*anchor)
            ),
            Diagnostic::UnrecognizedRow { row, first_field } => {
                warn!(row, %first_field, "row matches neither header nor date")
            }
        }
        self.events.push(diagnostic);
    }
}
