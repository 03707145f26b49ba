//! The fill pass: one left-to-right walk over a loaded table.
//!
//! Each data row gets three trailing columns: release, onset and
//! confirmation dates as `YYYY/MM/DD` (or empty when no date was recorded).
//! New cells are computed for every row before any row is touched, so a
//! fatal error leaves the table as it was loaded.

use crate::anchor::RunningYearState;
use crate::config::{APPENDED_LABELS, Config};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::disambiguate::Disambiguator;
use crate::error::{Error, Result};
use crate::table::{Record, RowKind, classify_row};
use crate::types::{BareDate, format_ymd};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub data_rows: usize,
    pub has_header: bool,
    pub rollovers: usize,
    pub empty_secondary: usize,
}

pub fn augment_records(
    records: &mut [Record],
    config: &Config,
    sink: &mut impl DiagnosticSink,
) -> Result<FillSummary> {
    let layout = config.layout;
    let mut state = RunningYearState::new(config.base_year);
    let disambiguator = Disambiguator::new(config.warn_threshold_days);
    let mut summary = FillSummary::default();

    let has_header = records
        .first()
        .is_some_and(|r| classify_row(r) == RowKind::Header);
    summary.has_header = has_header;
    let skip = usize::from(has_header);

    let mut appended: Vec<[String; 3]> = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate().skip(skip) {
        let row = idx + 1;
        if record.len() < layout.width() {
            return Err(Error::MissingField {
                row,
                needed: layout.width(),
                found: record.len(),
            });
        }

        let release_text = &record[layout.release];
        let release = BareDate::parse(release_text).ok_or_else(|| Error::MalformedReleaseDate {
            row,
            text: release_text.clone(),
        })?;

        let anchor = state
            .resolve_anchor(release)
            .ok_or(Error::InvalidReleaseDate {
                row,
                bare: release,
                year: state.current_year(),
            })?;
        if anchor.rolled_over {
            summary.rollovers += 1;
            sink.emit(Diagnostic::NewYear {
                row,
                release: release_text.clone(),
                year: state.current_year(),
                month: release.month,
                day: release.day,
            });
        }

        let mut cells = [format_ymd(anchor.date), String::new(), String::new()];
        let secondary = [("onset", layout.onset), ("confirmed", layout.confirmed)];
        for (slot, (field, column)) in cells[1..].iter_mut().zip(secondary) {
            let bare = BareDate::parse(&record[column]);
            let resolution = disambiguator
                .resolve(anchor.date, bare)
                .map_err(|e| Error::NoValidCandidate {
                    row,
                    field,
                    bare: bare.unwrap_or_default(),
                    first_year: e.first_year,
                    last_year: e.last_year,
                })?;

            let Some(resolution) = resolution else {
                summary.empty_secondary += 1;
                continue;
            };
            if resolution.low_confidence {
                sink.emit(Diagnostic::FarFromAnchor {
                    row,
                    release: release_text.clone(),
                    field,
                    resolved: resolution.date,
                    anchor: anchor.date,
                    distance_days: resolution.distance_days,
                });
            }
            *slot = format_ymd(resolution.date);
        }

        appended.push(cells);
    }

    if has_header {
        records[0].extend(APPENDED_LABELS.iter().map(|l| l.to_string()));
    }
    for (record, cells) in records[skip..].iter_mut().zip(appended) {
        record.extend(cells);
    }
    summary.data_rows = records.len() - skip;

    Ok(summary)
}
