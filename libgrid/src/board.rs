use itertools::Itertools;

use super::pos::{Dimensions, Position};

/// A dense, row-major boolean matrix of cell states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<TileState>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let tiles = vec![TileState::default(); rows * cols];
        Self::with_tiles(rows, cols, tiles)
    }

    pub fn with_dimensions(dimensions: Dimensions) -> Self {
        Self::new(dimensions.rows, dimensions.cols)
    }

    /// Builds a grid with up to `alive_cells` live cells at random positions.
    /// Requests larger than the grid saturate to a fully alive grid.
    pub fn new_random(rows: usize, cols: usize, alive_cells: usize) -> Self {
        let mut grid = Self::new(rows, cols);

        let mut available_positions = (0..grid.rows)
            .cartesian_product(0..grid.cols)
            .map(Position::from)
            .collect_vec();

        for _ in 0..alive_cells {
            if available_positions.is_empty() {
                break;
            }

            let chosen_index = rand::random_range(0..available_positions.len());
            let chosen_position = available_positions.swap_remove(chosen_index);

            grid.set_alive(chosen_position);
        }

        grid
    }

    pub fn with_tiles(rows: usize, cols: usize, tiles: Vec<TileState>) -> Self {
        debug_assert_eq!(tiles.len(), rows * cols);

        Self { rows, cols, tiles }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.rows, self.cols)
    }

    pub fn tile<P>(&self, pos: P) -> Option<&TileState>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.tiles.get(index)
    }

    pub fn tile_mut<P>(&mut self, pos: P) -> Option<&mut TileState>
    where
        P: Into<Position>,
    {
        let index = self.pos_to_index(pos)?;
        self.tiles.get_mut(index)
    }

    /// Marks a cell alive, returning `false` if the position is outside the grid.
    pub fn set_alive<P>(&mut self, pos: P) -> bool
    where
        P: Into<Position>,
    {
        match self.tile_mut(pos) {
            Some(tile) => {
                *tile = TileState::Alive;
                true
            }
            None => false,
        }
    }

    pub fn is_alive<P>(&self, pos: P) -> bool
    where
        P: Into<Position>,
    {
        self.tile(pos).is_some_and(|tile| tile.is_alive())
    }

    /// Resets every cell to dead, keeping the allocation.
    pub fn clear(&mut self) {
        self.tiles.fill(TileState::Dead);
    }

    pub fn enumerate_tiles(&self) -> impl Iterator<Item = (Position, &TileState)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (self.index_to_pos(index), tile))
    }

    /// Live cell positions in row-major order.
    pub fn live_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.enumerate_tiles()
            .filter(|(_, tile)| tile.is_alive())
            .map(|(pos, _)| pos)
    }

    pub fn count_alive(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_alive()).count()
    }

    /// Mutable view of one row, for decoders that fill a grid line by line.
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [TileState]> {
        if row >= self.rows {
            return None;
        }

        let start = row * self.cols;
        self.tiles.get_mut(start..start + self.cols)
    }

    pub fn row(&self, row: usize) -> Option<&[TileState]> {
        if row >= self.rows {
            return None;
        }

        let start = row * self.cols;
        self.tiles.get(start..start + self.cols)
    }

    fn pos_to_index<P>(&self, pos: P) -> Option<usize>
    where
        P: Into<Position>,
    {
        let Position { row, col } = pos.into();

        if row >= self.rows {
            return None;
        }

        if col >= self.cols {
            return None;
        }

        Some(col + (row * self.cols))
    }

    fn index_to_pos(&self, index: usize) -> Position {
        let row = index / self.cols;
        let col = index % self.cols;
        Position { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileState {
    Alive,

    #[default]
    Dead,
}

impl TileState {
    pub fn is_alive(self) -> bool {
        self == TileState::Alive
    }
}

impl From<bool> for TileState {
    fn from(alive: bool) -> Self {
        if alive {
            TileState::Alive
        } else {
            TileState::Dead
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(3, 4);

        assert_eq!(grid.tiles.len(), 12);
        assert_eq!(grid.count_alive(), 0);
    }

    #[test]
    fn positions_are_row_major() {
        let mut grid = Grid::new(2, 3);
        assert!(grid.set_alive((1, 2)));

        assert_eq!(grid.tiles[5], TileState::Alive);
        assert_eq!(grid.live_positions().collect_vec(), vec![Position { row: 1, col: 2 }]);
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let mut grid = Grid::new(2, 2);

        assert!(!grid.set_alive((2, 0)));
        assert!(!grid.set_alive((0, 2)));
        assert!(grid.tile((5, 5)).is_none());
        assert_eq!(grid.count_alive(), 0);
    }

    #[test]
    fn random_grid_saturates() {
        let grid = Grid::new_random(3, 3, 100);
        assert_eq!(grid.count_alive(), 9);

        let grid = Grid::new_random(4, 5, 7);
        assert_eq!(grid.count_alive(), 7);
    }

    #[test]
    fn clear_keeps_dimensions() {
        let mut grid = Grid::new_random(4, 4, 8);
        grid.clear();

        assert_eq!(grid.dimensions(), Dimensions::new(4, 4));
        assert_eq!(grid.count_alive(), 0);
    }

    #[test]
    fn rows_slice_the_right_cells() {
        let mut grid = Grid::new(2, 2);
        grid.row_mut(1).unwrap()[0] = TileState::Alive;

        assert_eq!(grid.row(1).unwrap(), &[TileState::Alive, TileState::Dead]);
        assert!(grid.row(2).is_none());
        assert!(grid.is_alive((1, 0)));
    }

    #[test]
    fn zero_sized_grids_have_no_rows() {
        let mut grid = Grid::new(0, 0);

        assert!(grid.row_mut(0).is_none());
        assert_eq!(grid.live_positions().count(), 0);
    }
}
