use crate::board::Board;
use crate::position::Pos;

/// The shortest run of equal tiles that counts as a match.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Points for a match of the shortest length. Each extra tile adds the same again.
pub const POINTS_PER_MATCH_UNIT: u64 = 100;

/// The line a match lies on.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical
}

/// A maximal run of at least three equal tiles in one row or one column.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Match<const BOARD_COLUMNS: usize, const BOARD_ROWS: usize> {
    start: Pos<BOARD_COLUMNS, BOARD_ROWS>,
    length: usize,
    orientation: Orientation
}

impl<const W: usize, const H: usize> Match<W, H> {

    /// Creates a new match.
    ///
    /// # Arguments
    ///
    /// * `start` - the leftmost cell of a horizontal match or the topmost
    ///   cell of a vertical one
    /// * `length` - the number of tiles in the match
    /// * `orientation` - the line the match lies on
    pub(crate) fn new(start: Pos<W, H>, length: usize, orientation: Orientation) -> Match<W, H> {
        Match { start, length, orientation }
    }

    /// Gets the first cell of the match.
    pub fn start(&self) -> Pos<W, H> {
        self.start
    }

    /// Gets the column of the first cell of the match.
    pub fn column(&self) -> usize {
        self.start.column()
    }

    /// Gets the row of the first cell of the match.
    pub fn row(&self) -> usize {
        self.start.row()
    }

    /// Gets the number of tiles in the match.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Gets the line the match lies on.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Gets the points this match is worth: 100 for three tiles, 200 for four, and so on.
    pub fn points(&self) -> u64 {
        POINTS_PER_MATCH_UNIT * (self.length + 1 - MIN_MATCH_LENGTH) as u64
    }

    /// Returns an iterator of all of the board positions covered by this match.
    pub fn positions(&self) -> impl Iterator<Item=Pos<W, H>> {
        let start = self.start;
        let orientation = self.orientation;

        (0..self.length).map(move |offset| match orientation {
            Orientation::Horizontal => Pos::new(start.column() + offset, start.row()),
            Orientation::Vertical => Pos::new(start.column(), start.row() + offset)
        })
    }

    /// Checks if the given position on the board is part of the match.
    ///
    /// # Arguments
    ///
    /// * `pos` - position to check for in this match
    pub fn contains(&self, pos: Pos<W, H>) -> bool {
        let (along, across, first) = match self.orientation {
            Orientation::Horizontal => (pos.column(), pos.row() == self.start.row(), self.start.column()),
            Orientation::Vertical => (pos.row(), pos.column() == self.start.column(), self.start.row())
        };

        across && along >= first && along < first + self.length
    }

}

/// Finds every match on the board. Rows are scanned first, from the top,
/// then columns, from the left. Empty cells never match, not even with
/// each other. The board is not changed.
///
/// # Arguments
///
/// * `board` - the board to scan
pub fn find_matches<const W: usize, const H: usize>(board: &Board<W, H>) -> Vec<Match<W, H>> {
    let mut matches = Vec::new();

    for row in 0..H {
        scan_line(board, W, |column| Pos::new(column, row), Orientation::Horizontal, &mut matches);
    }

    for column in 0..W {
        scan_line(board, H, |row| Pos::new(column, row), Orientation::Vertical, &mut matches);
    }

    matches
}

/// Checks whether the board has at least one match.
///
/// # Arguments
///
/// * `board` - the board to scan
pub fn has_match<const W: usize, const H: usize>(board: &Board<W, H>) -> bool {
    !find_matches(board).is_empty()
}

/// Scans one row or column for runs of equal tiles.
///
/// # Arguments
///
/// * `board` - the board to scan
/// * `length` - the number of cells in the line
/// * `pos_at` - maps an index along the line to a board position
/// * `orientation` - the orientation of the line
/// * `matches` - where found matches are added
fn scan_line<const W: usize, const H: usize>(board: &Board<W, H>, length: usize,
                                             pos_at: impl Fn(usize) -> Pos<W, H>,
                                             orientation: Orientation, matches: &mut Vec<Match<W, H>>) {
    let mut streak = 1;

    for index in 0..length {
        let is_last = index + 1 == length;
        let continues = !is_last && same_tile(board, pos_at(index), pos_at(index + 1));

        if continues {
            streak += 1;
            continue;
        }

        if streak >= MIN_MATCH_LENGTH {
            matches.push(Match::new(pos_at(index + 1 - streak), streak, orientation));
        }

        streak = 1;
    }
}

fn same_tile<const W: usize, const H: usize>(board: &Board<W, H>, first: Pos<W, H>, second: Pos<W, H>) -> bool {
    match (board.tile(first), board.tile(second)) {
        (Some(first_tile), Some(second_tile)) => first_tile == second_tile,
        _ => false
    }
}
