use std::io::BufRead;

use itertools::Itertools;
use libgrid::Dimensions;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::DecodeError;

pub mod cso;
pub mod fm;

pub const DELIMITER_LEN: usize = 100;
pub const DELIMITER_GLYPH: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum GridFormat {
    /// Compressed Sparse cOordinate: a header and one `<row> <col>` line per live cell.
    Cso,

    /// Full-Matrix: a header, the initial generation, a delimiter and the final generation.
    Fm,
}

pub fn delimiter() -> String {
    DELIMITER_GLYPH.to_string().repeat(DELIMITER_LEN)
}

pub fn is_delimiter(text: &str) -> bool {
    text.len() == DELIMITER_LEN && text.chars().all(|glyph| glyph == DELIMITER_GLYPH)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Line-at-a-time reader that keeps track of 1-based line numbers for error reporting.
pub(crate) struct LineReader<R> {
    reader: R,
    buf: String,
    line: usize,
}

impl<R> LineReader<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
        }
    }

    pub fn next_line(&mut self) -> Result<Option<Line<'_>>, DecodeError> {
        self.buf.clear();

        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }

        self.line += 1;

        Ok(Some(Line {
            number: self.line,
            text: self.buf.trim_end_matches(['\n', '\r']),
        }))
    }

    #[cfg(test)]
    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn read_header(&mut self) -> Result<Dimensions, DecodeError> {
        let Some(line) = self.next_line()? else {
            return Err(DecodeError::MalformedHeader {
                line: 1,
                text: String::new(),
            });
        };

        let (rows, cols) = parse_pair(line.text).ok_or_else(|| DecodeError::MalformedHeader {
            line: line.number,
            text: line.text.to_owned(),
        })?;

        let dimensions = Dimensions::new(rows, cols);
        if dimensions.cell_count().is_none() {
            return Err(DecodeError::GridTooLarge {
                line: line.number,
                rows,
                cols,
            });
        }

        Ok(dimensions)
    }
}

/// Parses exactly two whitespace separated non-negative integers.
pub(crate) fn parse_pair(text: &str) -> Option<(usize, usize)> {
    text.split_whitespace()
        .map(|token| token.parse::<usize>())
        .collect_tuple()
        .and_then(|(first, second)| Some((first.ok()?, second.ok()?)))
}
