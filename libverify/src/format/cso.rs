use std::{fmt::Write, io::BufRead};

use libgrid::{Dimensions, Grid};

use super::{LineReader, is_delimiter, parse_pair};
use crate::error::DecodeError;

/// A CSO source whose header has been read. The body is decoded by [`CsoReader::into_grid`];
/// dropping the reader instead releases the source without touching the body.
pub struct CsoReader<R> {
    lines: LineReader<R>,
    dimensions: Dimensions,
}

impl<R> CsoReader<R>
where
    R: BufRead,
{
    pub fn open(reader: R) -> Result<Self, DecodeError> {
        let mut lines = LineReader::new(reader);
        let dimensions = lines.read_header()?;

        Ok(Self { lines, dimensions })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Reads coordinates until end of input. Blank lines are skipped, and a delimiter line
    /// ends the dump, as the simulator appends one after every CSO snapshot.
    pub fn into_grid(mut self) -> Result<Grid, DecodeError> {
        let dimensions = self.dimensions;
        let mut grid = Grid::with_dimensions(dimensions);

        while let Some(line) = self.lines.next_line()? {
            if line.text.trim().is_empty() {
                continue;
            }

            if is_delimiter(line.text) {
                break;
            }

            let (row, col) =
                parse_pair(line.text).ok_or_else(|| DecodeError::MalformedCoordinate {
                    line: line.number,
                    text: line.text.to_owned(),
                })?;

            if !dimensions.contains((row, col)) {
                return Err(DecodeError::OutOfBounds {
                    line: line.number,
                    row,
                    col,
                    dimensions,
                });
            }

            grid.set_alive((row, col));
        }

        Ok(grid)
    }
}

pub fn decode<R>(reader: R) -> Result<Grid, DecodeError>
where
    R: BufRead,
{
    CsoReader::open(reader)?.into_grid()
}

pub fn encode(grid: &Grid) -> String {
    let mut encoded = format!("{} {}\n", grid.rows, grid.cols);

    for pos in grid.live_positions() {
        // Writing into a String can't fail.
        let _ = writeln!(encoded, "{} {}", pos.row, pos.col);
    }

    encoded
}
