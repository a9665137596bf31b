use enumset::EnumSet;
use crate::board::Board;
use crate::matching::has_match;
use crate::position::{Direction, Pos, ALL_DIRECTIONS};

/// Two adjacent cells whose swap creates at least one match.
///
/// The pair is unordered: the first position always sorts before the second.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Move<const BOARD_COLUMNS: usize, const BOARD_ROWS: usize> {
    first: Pos<BOARD_COLUMNS, BOARD_ROWS>,
    second: Pos<BOARD_COLUMNS, BOARD_ROWS>
}

impl<const W: usize, const H: usize> Move<W, H> {

    /// Creates a new move between two adjacent positions, in either order.
    pub(crate) fn new(first: Pos<W, H>, second: Pos<W, H>) -> Move<W, H> {
        match first <= second {
            true => Move { first, second },
            false => Move { first: second, second: first }
        }
    }

    /// Gets the top or left cell of the move.
    pub fn first(&self) -> Pos<W, H> {
        self.first
    }

    /// Gets the bottom or right cell of the move.
    pub fn second(&self) -> Pos<W, H> {
        self.second
    }

    /// Checks if the move swaps the tile at the given position.
    ///
    /// # Arguments
    ///
    /// * `pos` - position to check for in this move
    pub fn contains(&self, pos: Pos<W, H>) -> bool {
        self.first == pos || self.second == pos
    }

    /// Gets the direction the tile at `pos` travels in this move, or `None`
    /// if the move does not involve `pos`.
    ///
    /// # Arguments
    ///
    /// * `pos` - one of the two cells of the move
    pub fn direction_from(&self, pos: Pos<W, H>) -> Option<Direction> {
        let target = match pos {
            pos if pos == self.first => self.second,
            pos if pos == self.second => self.first,
            _ => return None
        };

        ALL_DIRECTIONS.iter().find(|&direction| pos.neighbor(direction) == Some(target))
    }

}

/// Finds every swap of adjacent cells that would create a match. Horizontal
/// pairs are listed first, row by row, then vertical pairs, column by column.
///
/// Each pair is tried by swapping it, scanning for matches, and swapping it
/// back, so the board is borrowed mutably but ends up exactly as it started.
///
/// # Arguments
///
/// * `board` - the board to search
pub fn find_moves<const W: usize, const H: usize>(board: &mut Board<W, H>) -> Vec<Move<W, H>> {
    let mut moves = Vec::new();

    for row in 0..H {
        for column in 0..W.saturating_sub(1) {
            try_pair(board, Pos::new(column, row), Pos::new(column + 1, row), &mut moves);
        }
    }

    for column in 0..W {
        for row in 0..H.saturating_sub(1) {
            try_pair(board, Pos::new(column, row), Pos::new(column, row + 1), &mut moves);
        }
    }

    moves
}

/// Collects the directions in which the tile at `pos` can be swapped to make a match.
///
/// # Arguments
///
/// * `moves` - the legal moves on the board
/// * `pos` - the tile to look up
pub fn legal_directions<const W: usize, const H: usize>(moves: &[Move<W, H>], pos: Pos<W, H>) -> EnumSet<Direction> {
    moves.iter().filter_map(|candidate| candidate.direction_from(pos)).collect()
}

fn try_pair<const W: usize, const H: usize>(board: &mut Board<W, H>, first: Pos<W, H>, second: Pos<W, H>,
                                            moves: &mut Vec<Move<W, H>>) {
    board.swap(first, second);
    let makes_match = has_match(board);
    board.swap(first, second);

    if makes_match {
        moves.push(Move::new(first, second));
    }
}
