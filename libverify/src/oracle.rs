use std::fmt;

use libgrid::Grid;
use strum::IntoStaticStr;

use crate::error::DecodeError;

/// Outcome of checking one candidate grid against the ground truth.
#[derive(Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Verdict {
    Equal,
    DimensionMismatch,
    ContentMismatch,

    /// The candidate couldn't be decoded. Other candidates are unaffected.
    Failed(DecodeError),
}

impl Verdict {
    pub fn is_equal(&self) -> bool {
        matches!(self, Verdict::Equal)
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            Verdict::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl From<DecodeError> for Verdict {
    fn from(error: DecodeError) -> Self {
        Verdict::Failed(error)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Equal => f.write_str("equal"),
            Verdict::DimensionMismatch => f.write_str("dimensions differ"),
            Verdict::ContentMismatch => f.write_str("cells differ"),
            Verdict::Failed(error) => write!(f, "failed: {error}"),
        }
    }
}

/// Cell-by-cell equality of two grids already known to share dimensions.
pub fn grids_equal(a: &Grid, b: &Grid) -> bool {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    a.tiles == b.tiles
}

/// Dimension check followed by the cell comparison.
pub fn compare(ground_truth: &Grid, candidate: &Grid) -> Verdict {
    if ground_truth.dimensions() != candidate.dimensions() {
        Verdict::DimensionMismatch
    } else if grids_equal(ground_truth, candidate) {
        Verdict::Equal
    } else {
        Verdict::ContentMismatch
    }
}
