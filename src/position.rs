use std::fmt::{Display, Formatter};
use enumset::{enum_set, EnumSet, EnumSetType};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PosError {
    #[error("position ({0}, {1}) is outside the board")]
    OutOfBounds(usize, usize)
}

/// A direction that a tile can be swapped towards. North is towards row 0.
#[derive(EnumSetType, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West
}

/// Every direction a tile has a neighbor in, away from the board's edges.
pub const ALL_DIRECTIONS: EnumSet<Direction> = enum_set!(
    Direction::North | Direction::South | Direction::East | Direction::West
);

impl Direction {

    /// Returns the direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East
        }
    }

}

/// A cell on a board with `BOARD_COLUMNS` columns and `BOARD_ROWS` rows.
/// Row 0 is the top of the board.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos<const BOARD_COLUMNS: usize, const BOARD_ROWS: usize> {

    /// The column of the cell
    column: usize,

    /// The row of the cell
    row: usize

}

impl<const W: usize, const H: usize> Pos<W, H> {

    /// Creates a new position from a column and a row.
    ///
    /// # Arguments
    ///
    /// * `column` - the horizontal component of the position
    /// * `row` - the vertical component of the position
    ///
    /// # Panics
    ///
    /// Panics if the given coordinates are outside the board.
    pub fn new(column: usize, row: usize) -> Pos<W, H> {
        if column >= W || row >= H {
            panic!("Tried to create position outside board: ({column}, {row})");
        }

        Pos { column, row }
    }

    /// Attempts to create a new position from a column and a row, returning
    /// an error if the position is outside the board's bounds.
    ///
    /// # Arguments
    ///
    /// * `column` - the horizontal component of the position
    /// * `row` - the vertical component of the position
    pub fn try_new(column: usize, row: usize) -> Result<Pos<W, H>, PosError> {
        if column >= W || row >= H {
            return Err(PosError::OutOfBounds(column, row));
        }

        Ok(Pos { column, row })
    }

    /// Returns the column of the position.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the row of the position.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the neighboring position in the given direction, or `None`
    /// if that neighbor would be outside the board.
    ///
    /// # Arguments
    ///
    /// * `direction` - the side of this position to look at
    pub fn neighbor(&self, direction: Direction) -> Option<Pos<W, H>> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::West => (self.column.checked_sub(1), Some(self.row))
        };

        Pos::try_new(column?, row?).ok()
    }

    /// Returns an iterator of all positions directly adjacent to this one.
    pub fn neighbors(&self) -> impl Iterator<Item=Pos<W, H>> {
        let pos = *self;
        ALL_DIRECTIONS.iter().filter_map(move |direction| pos.neighbor(direction))
    }

    /// Checks if two positions share an edge, i.e. are exactly one column
    /// or one row apart, but not both.
    ///
    /// # Arguments
    ///
    /// * `other` - the position to compare with
    pub fn is_adjacent(&self, other: Pos<W, H>) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }

    /// Returns an iterator over every position on the board, column by column.
    pub fn all() -> impl Iterator<Item=Pos<W, H>> {
        (0..W).flat_map(|column| (0..H).map(move |row| Pos { column, row }))
    }

}

impl<const W: usize, const H: usize> Display for Pos<W, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}
