//! Error types for the fill pass and its file I/O.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::BareDate;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The release field is mandatory on every data row.
    #[error("row {row}: release date {text:?} is not a \"<M>月<D>日\" date")]
    MalformedReleaseDate { row: usize, text: String },

    /// The release date parsed but is not a calendar date in the running year.
    #[error("row {row}: release date {bare} does not exist in {year}")]
    InvalidReleaseDate { row: usize, bare: BareDate, year: i32 },

    /// None of the three candidate years makes the month/day a real date.
    #[error("row {row}: {field} date {bare} is not valid in any of {first_year}..={last_year}")]
    NoValidCandidate {
        row: usize,
        field: &'static str,
        bare: BareDate,
        first_year: i32,
        last_year: i32,
    },

    #[error("row {row}: expected at least {needed} fields, found {found}")]
    MissingField {
        row: usize,
        needed: usize,
        found: usize,
    },

    #[error("unknown encoding label {0:?}")]
    UnknownEncoding(String),

    #[error("{path}: input is not valid {encoding}")]
    Decode { path: PathBuf, encoding: &'static str },

    #[error("{path}: output contains characters not representable in {encoding}")]
    Encode { path: PathBuf, encoding: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
