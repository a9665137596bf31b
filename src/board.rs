use rand::Rng;
use crate::error::BoardError;
use crate::position::Pos;

/// The fewest tile types a board can be played with.
pub const MIN_PALETTE_SIZE: u8 = 2;

/// The kind of a tile, as an index into the game's palette.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TileType(pub u8);

/// Produces the types of new tiles put on the board.
///
/// Every [Rng] is a tile source that picks uniformly from the palette.
/// Implement this directly to script the tiles a board receives.
pub trait TileSource {

    /// Returns a tile type in `[0, palette_size)`.
    ///
    /// # Arguments
    ///
    /// * `palette_size` - number of tile types in the palette, always at least one
    fn random_tile(&mut self, palette_size: u8) -> TileType;

}

impl<R: Rng + ?Sized> TileSource for R {
    fn random_tile(&mut self, palette_size: u8) -> TileType {
        TileType(self.gen_range(0..palette_size))
    }
}

/// A snapshot of one board cell.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    tile: Option<TileType>,
    pending_shift: usize
}

impl Cell {
    const EMPTY: Cell = Cell { tile: None, pending_shift: 0 };

    /// Gets the type of the tile in this cell, or `None` if the cell was cleared.
    pub fn tile(&self) -> Option<TileType> {
        self.tile
    }

    /// Gets the number of rows the tile in this cell will fall once shifts
    /// are applied.
    pub fn pending_shift(&self) -> usize {
        self.pending_shift
    }

    /// Checks if the cell has no tile.
    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

/// A grid of tiles with `BOARD_COLUMNS` columns and `BOARD_ROWS` rows.
///
/// The board only stores tiles and moves them around. It does not look for
/// matches or keep score. Gravity pulls tiles towards the last row.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Board<const BOARD_COLUMNS: usize, const BOARD_ROWS: usize> {
    palette_size: u8,
    cells: [[Cell; BOARD_ROWS]; BOARD_COLUMNS]
}

impl<const W: usize, const H: usize> Board<W, H> {

    /// Creates a board where every cell is empty.
    ///
    /// # Arguments
    ///
    /// * `palette_size` - number of tile types new tiles are drawn from
    ///
    /// # Panics
    ///
    /// Panics if the palette has fewer than two tile types. A single type
    /// would refill every cleared run with the same run again.
    pub fn new(palette_size: u8) -> Board<W, H> {
        if palette_size < MIN_PALETTE_SIZE {
            panic!("Tried to create board with a palette of {palette_size} tile types");
        }

        Board { palette_size, cells: [[Cell::EMPTY; H]; W] }
    }

    /// Creates a board with a random tile in every cell. The board may
    /// already contain matches.
    ///
    /// # Arguments
    ///
    /// * `palette_size` - number of tile types new tiles are drawn from
    /// * `source` - source of the tile types
    ///
    /// # Panics
    ///
    /// Panics if the palette has fewer than two tile types.
    pub fn create<S: TileSource + ?Sized>(palette_size: u8, source: &mut S) -> Board<W, H> {
        let mut board = Board::new(palette_size);
        board.cells.iter_mut().flatten().for_each(
            |cell| cell.tile = Some(source.random_tile(palette_size))
        );
        board
    }

    /// Creates a board from a fixed layout, given row by row from the top.
    ///
    /// # Arguments
    ///
    /// * `palette_size` - number of tile types new tiles are drawn from
    /// * `rows` - tile type of every cell, with `rows[row][column]`
    pub fn from_rows(palette_size: u8, rows: [[u8; W]; H]) -> Result<Board<W, H>, BoardError> {
        if palette_size < MIN_PALETTE_SIZE {
            return Err(BoardError::PaletteTooSmall(palette_size));
        }

        let mut board = Board::new(palette_size);

        for (row, tiles) in rows.iter().enumerate() {
            for (column, &tile) in tiles.iter().enumerate() {
                if tile >= palette_size {
                    return Err(BoardError::TileOutsidePalette { tile, palette_size });
                }

                board.cells[column][row].tile = Some(TileType(tile));
            }
        }

        Ok(board)
    }

    /// Gets the number of tile types on this board.
    pub fn palette_size(&self) -> u8 {
        self.palette_size
    }

    /// Gets a snapshot of the cell at a position.
    ///
    /// # Arguments
    ///
    /// * `pos` - the position of the cell
    pub fn cell(&self, pos: Pos<W, H>) -> Cell {
        self.cells[pos.column()][pos.row()]
    }

    /// Gets the type of the tile at a position, or `None` if the cell is empty.
    ///
    /// # Arguments
    ///
    /// * `pos` - the position of the tile
    pub fn tile(&self, pos: Pos<W, H>) -> Option<TileType> {
        self.cells[pos.column()][pos.row()].tile
    }

    /// Replaces the tile at the given position and returns the previous one.
    ///
    /// # Arguments
    ///
    /// * `pos` - the position of the tile to replace
    /// * `tile` - the tile to put at the given position
    pub fn set_tile(&mut self, pos: Pos<W, H>, tile: TileType) -> Option<TileType> {
        self.cells[pos.column()][pos.row()].tile.replace(tile)
    }

    /// Exchanges the tiles of two cells. The cells do not need to be adjacent,
    /// and the order of the two positions does not matter.
    ///
    /// # Arguments
    ///
    /// * `first` - the first position of a tile to swap
    /// * `second` - the second position of a tile to swap
    pub fn swap(&mut self, first: Pos<W, H>, second: Pos<W, H>) {
        let first_tile = self.tile(first);
        self.cells[first.column()][first.row()].tile = self.tile(second);
        self.cells[second.column()][second.row()].tile = first_tile;
    }

    /// Removes the tiles at the given positions. Clearing an empty cell does nothing.
    ///
    /// # Arguments
    ///
    /// * `positions` - the cells to empty
    pub fn clear(&mut self, positions: impl IntoIterator<Item=Pos<W, H>>) {
        for pos in positions {
            self.cells[pos.column()][pos.row()].tile = None;
        }
    }

    /// Records how far every remaining tile has to fall to close the gaps
    /// left by empty cells below it. No tile moves until
    /// [Board::apply_shift_and_refill] is called, so the fall can be animated
    /// in between.
    pub fn compact(&mut self) {
        for column in self.cells.iter_mut() {
            let mut shift = 0;

            for cell in column.iter_mut().rev() {
                if cell.is_empty() {
                    shift += 1;
                    cell.pending_shift = 0;
                } else {
                    cell.pending_shift = shift;
                }
            }
        }
    }

    /// Moves every tile down by its pending shift and puts new tiles in the
    /// empty cells. Afterwards, the board has no empty cells and no pending shifts.
    ///
    /// Each column is processed from the bottom up. An empty cell gets a new
    /// tile right away, and that tile is carried upwards as the tiles above
    /// it trade places with the cells they fall into.
    ///
    /// # Arguments
    ///
    /// * `source` - source of the new tiles
    pub fn apply_shift_and_refill<S: TileSource + ?Sized>(&mut self, source: &mut S) {
        let palette_size = self.palette_size;

        for column in self.cells.iter_mut() {
            for row in (0..H).rev() {
                let shift = column[row].pending_shift;

                if column[row].is_empty() {
                    column[row].tile = Some(source.random_tile(palette_size));
                } else if shift > 0 {
                    let target = row + shift;
                    let falling = column[row].tile;
                    column[row].tile = column[target].tile;
                    column[target].tile = falling;
                }

                column[row].pending_shift = 0;
            }
        }
    }

    /// Checks whether every cell holds a tile.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Returns an iterator of every position and its cell, column by column.
    pub fn iter(&self) -> impl Iterator<Item=(Pos<W, H>, Cell)> + '_ {
        Pos::all().map(move |pos| (pos, self.cell(pos)))
    }

}
