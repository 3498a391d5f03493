//! Canonical in-memory representation of a Game of Life grid snapshot.

pub use board::{Grid, TileState};
pub use pos::{Dimensions, Position};

pub mod board;
pub mod pos;
