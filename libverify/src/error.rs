use std::io;

use libgrid::Dimensions;
use thiserror::Error;

/// Why a single source could not be turned into a grid.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("line {line}: malformed header {text:?}, expected `<rows> <cols>`")]
    MalformedHeader { line: usize, text: String },

    #[error("line {line}: a {rows}x{cols} grid has more cells than can be addressed")]
    GridTooLarge { line: usize, rows: usize, cols: usize },

    #[error("line {line}: malformed coordinate {text:?}, expected `<row> <col>`")]
    MalformedCoordinate { line: usize, text: String },

    #[error("line {line}: cell ({row}, {col}) lies outside the declared {dimensions} grid")]
    OutOfBounds {
        line: usize,
        row: usize,
        col: usize,
        dimensions: Dimensions,
    },

    #[error("line {line}: malformed row, {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("input ended after {rows_read} rows without a generation delimiter")]
    MissingDelimiter { rows_read: usize },

    #[error("couldn't read source: {0}")]
    Io(#[from] io::Error),
}

/// Failures that abort a whole verification run.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("couldn't decode ground-truth grid {name}: {source}")]
    GroundTruth {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("worker pool needs at least one worker")]
    InvalidWorkerCount,

    #[error("couldn't build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
