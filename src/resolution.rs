use bitvec::prelude::*;
use tracing::{instrument, trace};
use crate::board::{Board, TileSource};
use crate::matching::{find_matches, Match};
use crate::position::Pos;

/// What a single step of a cascade did to the board.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CascadeEvent {

    /// Matches were found and scored. The board is unchanged, so the matched
    /// tiles can still be highlighted.
    Matched { matches: usize, points: u64 },

    /// Matched tiles were removed and the distance every remaining tile has
    /// to fall was recorded in its cell.
    Cleared { tiles: usize },

    /// Tiles fell into the gaps and new tiles filled the board.
    Refilled,

    /// The board has no matches left.
    Settled

}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Stage {
    Detect,
    Clear,
    Refill,
    Settled
}

/// Resolves the matches on a board one stage at a time, so that each stage
/// can be shown before the next one runs.
///
/// Each pass through a cascade goes matched → cleared → refilled and then
/// looks for matches again, until a pass finds none.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Cascade<const BOARD_COLUMNS: usize, const BOARD_ROWS: usize> {
    stage: Stage,
    active: Vec<Match<BOARD_COLUMNS, BOARD_ROWS>>,
    points: u64,
    passes: usize
}

impl<const W: usize, const H: usize> Cascade<W, H> {

    /// Creates a cascade that starts by looking for matches.
    pub fn new() -> Cascade<W, H> {
        Cascade { stage: Stage::Detect, active: Vec::new(), points: 0, passes: 0 }
    }

    /// Runs the next stage of the cascade on the board. Once the cascade has
    /// settled, every further call returns [CascadeEvent::Settled] and leaves
    /// the board alone.
    ///
    /// # Arguments
    ///
    /// * `board` - the board being resolved
    /// * `source` - source of the tiles that refill the board
    pub fn step<S: TileSource + ?Sized>(&mut self, board: &mut Board<W, H>, source: &mut S) -> CascadeEvent {
        match self.stage {
            Stage::Detect => {
                self.active = find_matches(board);

                if self.active.is_empty() {
                    self.stage = Stage::Settled;
                    trace!(passes = self.passes, points = self.points, "cascade settled");
                    return CascadeEvent::Settled;
                }

                let points: u64 = self.active.iter().map(Match::points).sum();
                self.points += points;
                self.stage = Stage::Clear;

                trace!(matches = self.active.len(), points, "matches scored");
                CascadeEvent::Matched { matches: self.active.len(), points }
            },
            Stage::Clear => {
                let tiles = clear_matches(board, &self.active);
                board.compact();
                self.stage = Stage::Refill;

                trace!(tiles, "matched tiles cleared");
                CascadeEvent::Cleared { tiles }
            },
            Stage::Refill => {
                board.apply_shift_and_refill(source);
                self.active.clear();
                self.passes += 1;
                self.stage = Stage::Detect;

                trace!(pass = self.passes, "board refilled");
                CascadeEvent::Refilled
            },
            Stage::Settled => CascadeEvent::Settled
        }
    }

    /// Gets the matches found by the current pass. Empty unless the last step
    /// found matches or cleared them.
    pub fn active_matches(&self) -> &[Match<W, H>] {
        &self.active[..]
    }

    /// Gets the points scored so far.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Gets the number of completed clear and refill passes.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Checks if the board had no matches left at the last step.
    pub fn is_settled(&self) -> bool {
        self.stage == Stage::Settled
    }

}

impl<const W: usize, const H: usize> Default for Cascade<W, H> {
    fn default() -> Self {
        Cascade::new()
    }
}

/// The result of resolving a board until it has no matches.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Resolution {
    points: u64,
    passes: usize
}

impl Resolution {

    /// Gets the points scored by every match cleared along the way.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Gets the number of clear and refill passes. Zero if the board was already stable,
    /// more than one if new tiles created new matches.
    pub fn passes(&self) -> usize {
        self.passes
    }

}

/// Clears, drops and refills matches until the board has none left. Runs all
/// the stages of a [Cascade] without stopping. A refill can create new matches,
/// so there is no limit on the number of passes.
///
/// # Arguments
///
/// * `board` - the board to resolve
/// * `source` - source of the tiles that refill the board
#[instrument(level = "trace", skip_all)]
pub fn resolve<S: TileSource + ?Sized, const W: usize, const H: usize>(board: &mut Board<W, H>,
                                                                      source: &mut S) -> Resolution {
    let mut cascade = Cascade::new();

    while cascade.step(board, source) != CascadeEvent::Settled {}

    Resolution { points: cascade.points(), passes: cascade.passes() }
}

/// Empties every cell that belongs to at least one match and returns the
/// number of cells emptied. A cell shared by two matches is cleared once.
///
/// # Arguments
///
/// * `board` - the board to clear tiles from
/// * `matches` - the matches to clear
pub fn clear_matches<const W: usize, const H: usize>(board: &mut Board<W, H>, matches: &[Match<W, H>]) -> usize {
    let mut marked = bitvec![0; W * H];

    for pos in matches.iter().flat_map(Match::positions) {
        marked.set(pos.column() * H + pos.row(), true);
    }

    board.clear(marked.iter_ones().map(|index| Pos::new(index / H, index % H)));
    marked.count_ones()
}
