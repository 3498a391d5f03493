use std::io::BufRead;

use libgrid::{Dimensions, Grid, TileState};

use super::{LineReader, delimiter, is_delimiter};
use crate::error::DecodeError;

pub const ALIVE_GLYPH: char = 'X';
pub const DEAD_GLYPH: char = ' ';

/// How a generation block ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    /// The stream is now positioned right after the delimiter line.
    Delimiter,

    /// The input ran out. No further blocks can be read.
    Eof { rows_read: usize },
}

/// A resumable FM decoder. Opening it consumes the header; each block read leaves the stream
/// positioned at the start of the next block.
pub struct FmStream<R> {
    lines: LineReader<R>,
    dimensions: Dimensions,
}

impl<R> FmStream<R>
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

    /// Decodes the next generation block into `grid`, which is cleared first and must match
    /// the declared dimensions. Short rows are padded with dead cells.
    pub fn read_block_into(&mut self, grid: &mut Grid) -> Result<BlockEnd, DecodeError> {
        let Dimensions { rows, cols } = self.dimensions;
        debug_assert_eq!(grid.dimensions(), self.dimensions);

        grid.clear();
        let mut rows_read = 0;

        while let Some(line) = self.lines.next_line()? {
            if is_delimiter(line.text) {
                return Ok(BlockEnd::Delimiter);
            }

            if rows_read == rows {
                if line.text.trim().is_empty() {
                    continue;
                }

                return Err(DecodeError::MalformedRow {
                    line: line.number,
                    reason: format!("more than {rows} rows in one generation"),
                });
            }

            let width = line.text.chars().count();
            if width > cols {
                return Err(DecodeError::MalformedRow {
                    line: line.number,
                    reason: format!("{width} cells, expected {cols}"),
                });
            }

            if let Some(row) = grid.row_mut(rows_read) {
                for (tile, glyph) in row.iter_mut().zip(line.text.chars()) {
                    *tile = TileState::from(glyph == ALIVE_GLYPH);
                }
            }

            rows_read += 1;
        }

        Ok(BlockEnd::Eof { rows_read })
    }

    /// Decodes the initial generation, which must be closed by a delimiter.
    pub fn read_initial(&mut self) -> Result<Grid, DecodeError> {
        let mut grid = Grid::with_dimensions(self.dimensions);

        match self.read_block_into(&mut grid)? {
            BlockEnd::Delimiter => Ok(grid),
            BlockEnd::Eof { rows_read } => Err(DecodeError::MissingDelimiter { rows_read }),
        }
    }

    /// Decodes the final generation into a buffer that previously held the initial one.
    /// The block may end at end of input or at another delimiter.
    pub fn read_final_into(&mut self, grid: &mut Grid) -> Result<(), DecodeError> {
        self.read_block_into(grid).map(|_| ())
    }

    #[cfg(test)]
    fn into_inner(self) -> R {
        self.lines.into_inner()
    }
}

pub fn decode<R>(reader: R) -> Result<(Grid, Grid), DecodeError>
where
    R: BufRead,
{
    let mut stream = FmStream::open(reader)?;
    let initial = stream.read_initial()?;

    let mut last = Grid::with_dimensions(stream.dimensions());
    stream.read_final_into(&mut last)?;

    Ok((initial, last))
}

/// Encodes two generations of the same size.
pub fn encode(initial: &Grid, last: &Grid) -> String {
    debug_assert_eq!(initial.dimensions(), last.dimensions());

    let mut encoded = format!("{} {}\n", initial.rows, initial.cols);

    push_rows(&mut encoded, initial);
    encoded.push_str(&delimiter());
    encoded.push('\n');
    push_rows(&mut encoded, last);

    encoded
}

fn push_rows(encoded: &mut String, grid: &Grid) {
    for row in 0..grid.rows {
        for tile in grid.row(row).unwrap_or_default() {
            encoded.push(if tile.is_alive() { ALIVE_GLYPH } else { DEAD_GLYPH });
        }
        encoded.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    fn fm(initial: &[&str], last: &[&str], dims: (usize, usize)) -> String {
        let mut text = format!("{} {}\n", dims.0, dims.1);
        for row in initial {
            text.push_str(row);
            text.push('\n');
        }
        text.push_str(&delimiter());
        text.push('\n');
        for row in last {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn decodes_both_generations() {
        let text = fm(&["X.", ".X"], &["XX", ".."], (2, 2));
        let (initial, last) = decode(Cursor::new(text)).unwrap();

        assert!(initial.is_alive((0, 0)) && initial.is_alive((1, 1)));
        assert_eq!(initial.count_alive(), 2);
        assert!(last.is_alive((0, 0)) && last.is_alive((0, 1)));
        assert_eq!(last.count_alive(), 2);
    }

    #[test]
    fn any_non_alive_glyph_is_dead() {
        let text = fm(&["X.o *"], &["     "], (1, 5));
        let (initial, _) = decode(Cursor::new(text)).unwrap();

        assert_eq!(initial.count_alive(), 1);
    }

    #[test]
    fn short_rows_are_padded_dead() {
        let text = fm(&["X", ""], &["", " X"], (2, 3));
        let (initial, last) = decode(Cursor::new(text)).unwrap();

        assert_eq!(initial.live_positions().count(), 1);
        assert!(initial.is_alive((0, 0)));
        assert!(last.is_alive((1, 1)));
        assert_eq!(last.count_alive(), 1);
    }

    #[test]
    fn early_delimiter_leaves_missing_rows_dead() {
        let text = fm(&["X"], &["X", "X", "X"], (3, 1));
        let (initial, last) = decode(Cursor::new(text)).unwrap();

        assert_eq!(initial.count_alive(), 1);
        assert_eq!(last.count_alive(), 3);
    }

    #[test]
    fn wide_rows_are_rejected() {
        let text = fm(&["XXX"], &["X"], (1, 2));

        assert!(matches!(
            decode(Cursor::new(text)),
            Err(DecodeError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn surplus_rows_are_rejected() {
        let text = fm(&["X", "X"], &["X"], (1, 1));

        assert!(matches!(
            decode(Cursor::new(text)),
            Err(DecodeError::MalformedRow { line: 3, .. })
        ));
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let mut text = fm(&["X"], &["X"], (1, 1));
        text.push_str("\n\n\n");

        let (_, last) = decode(Cursor::new(text)).unwrap();
        assert!(last.is_alive((0, 0)));
    }

    #[test]
    fn initial_block_needs_a_delimiter() {
        assert!(matches!(
            decode(Cursor::new("2 2\nXX\nXX\n")),
            Err(DecodeError::MissingDelimiter { rows_read: 2 })
        ));
    }

    #[test]
    fn stream_resumes_right_after_the_delimiter() {
        let mut text = fm(&["X"], &[" "], (1, 1));
        text.push_str(&delimiter());
        text.push_str("\ntrailer\n");

        let mut stream = FmStream::open(Cursor::new(text.into_bytes())).unwrap();
        let mut grid = stream.read_initial().unwrap();
        assert!(grid.is_alive((0, 0)));

        stream.read_final_into(&mut grid).unwrap();
        assert_eq!(grid.count_alive(), 0);

        let mut rest = String::new();
        stream.into_inner().read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "trailer\n");
    }

    #[test]
    fn final_buffer_reuse_clears_stale_cells() {
        let text = fm(&["XX"], &[" X"], (1, 2));
        let mut stream = FmStream::open(Cursor::new(text)).unwrap();

        let mut grid = stream.read_initial().unwrap();
        stream.read_final_into(&mut grid).unwrap();

        assert!(!grid.is_alive((0, 0)));
        assert!(grid.is_alive((0, 1)));
    }

    #[test]
    fn encodes_glyph_rows() {
        let mut initial = Grid::new(2, 2);
        initial.set_alive((0, 0));
        let mut last = Grid::new(2, 2);
        last.set_alive((1, 1));

        let expected = format!("2 2\nX \n  \n{}\n  \n X\n", delimiter());
        assert_eq!(encode(&initial, &last), expected);
    }
}
