//! Table text handling on both sides of the pass.
//!
//! Cells arrive from the extraction front end, which strips whitespace and
//! folds full-width characters. The same normalization is applied again
//! before any date is parsed, so hand-edited files behave the same.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub type Record = Vec<String>;

/// First-column marker of the header row.
pub const HEADER_MARKER: &str = "リリース日";

// ── Cell normalization ─────────────────────────────────────────────

/// Remove all whitespace and fold full-width ASCII to half-width.
///
/// "１２月　３日" → "12月3日". Kana and kanji pass through unchanged.
pub fn normalize_cell(cell: &str) -> String {
    cell.chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_full_width)
        .collect()
}

fn fold_full_width(c: char) -> char {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

// ── Row classification ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data,
    /// Neither; flagged for review, not dropped.
    Unrecognized,
}

pub fn classify_row(record: &[String]) -> RowKind {
    let first = record.first().map(|c| normalize_cell(c)).unwrap_or_default();
    if first.starts_with(HEADER_MARKER) {
        RowKind::Header
    } else if crate::types::BareDate::parse(&first).is_some() {
        RowKind::Data
    } else {
        RowKind::Unrecognized
    }
}

// ── Encoded CSV I/O ────────────────────────────────────────────────

pub fn encoding_for(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Load a whole CSV file. Rows may differ in length.
pub fn read_table(path: &Path, encoding: &'static Encoding) -> Result<Vec<Record>> {
    let bytes = fs::read(path)?;
    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(Error::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(row.iter().map(str::to_string).collect());
    }
    Ok(records)
}

/// Serialize and encode every record first, then replace the file in one rename.
pub fn write_table(path: &Path, records: &[Record], encoding: &'static Encoding) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(record)?;
    }
    let buf = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;

    let text = String::from_utf8_lossy(&buf);
    let (bytes, _, unmappable) = encoding.encode(&text);
    if unmappable {
        return Err(Error::Encode {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }
    // Temp file in the target directory, renamed over the target when complete.
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// `data/0104.csv` → `data/0104_c.csv`
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(file_name)
}

/// Whether a file is already an output of this tool.
pub fn is_output_file(path: &Path, suffix: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with(suffix))
}
