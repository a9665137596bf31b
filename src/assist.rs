use rand::seq::SliceRandom;
use rand::Rng;
use crate::board::Board;
use crate::matching::{find_matches, Match};
use crate::moves::Move;

/// Picks a move for an automated player.
pub trait MovePolicy {

    /// Chooses one of the given legal moves, or `None` to pass.
    ///
    /// # Arguments
    ///
    /// * `board` - the board the moves apply to
    /// * `moves` - every legal move on the board
    fn choose<const W: usize, const H: usize>(&mut self, board: &Board<W, H>,
                                              moves: &[Move<W, H>]) -> Option<Move<W, H>>;

}

/// Plays a uniformly random legal move.
#[derive(Clone, Debug)]
pub struct RandomPolicy<R> {
    rng: R
}

impl<R: Rng> RandomPolicy<R> {

    /// Creates a policy that draws its moves from `rng`.
    pub fn new(rng: R) -> RandomPolicy<R> {
        RandomPolicy { rng }
    }
}

impl<R: Rng> MovePolicy for RandomPolicy<R> {
    fn choose<const W: usize, const H: usize>(&mut self, _: &Board<W, H>,
                                              moves: &[Move<W, H>]) -> Option<Move<W, H>> {
        moves.choose(&mut self.rng).copied()
    }
}

/// Plays the legal move whose first matches are worth the most points. Later
/// cascades are not considered since they depend on tiles not yet drawn. Ties
/// go to the move found first.
#[derive(Copy, Clone, Debug, Default)]
pub struct GreedyPolicy;

impl MovePolicy for GreedyPolicy {
    fn choose<const W: usize, const H: usize>(&mut self, board: &Board<W, H>,
                                              moves: &[Move<W, H>]) -> Option<Move<W, H>> {
        let mut best: Option<(Move<W, H>, u64)> = None;

        for &candidate in moves {
            let points = immediate_points(board, candidate);

            if best.is_none_or(|(_, best_points)| points > best_points) {
                best = Some((candidate, points));
            }
        }

        best.map(|(chosen, _)| chosen)
    }
}

/// Gets the points the matches made directly by a swap are worth, without
/// changing the board.
///
/// # Arguments
///
/// * `board` - the board before the swap
/// * `candidate` - the swap to evaluate
pub fn immediate_points<const W: usize, const H: usize>(board: &Board<W, H>, candidate: Move<W, H>) -> u64 {
    let mut swapped = board.clone();
    swapped.swap(candidate.first(), candidate.second());
    find_matches(&swapped).iter().map(Match::points).sum()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use crate::assist::{immediate_points, GreedyPolicy, MovePolicy, RandomPolicy};
    use crate::board::test_util::board;
    use crate::moves::{find_moves, Move};
    use crate::{Board, Pos};

    #[test]
    fn greedy_prefers_longer_match() {
        let mut board: Board<4, 3> = board(5, ["BCDE", "AABA", "CDAE"]);
        let moves = find_moves(&mut board);

        let chosen = GreedyPolicy.choose(&board, &moves);

        assert_eq!(Some(Move::new(Pos::new(2, 1), Pos::new(2, 2))), chosen);
    }

    #[test]
    fn greedy_tie_keeps_first_move() {
        let mut board: Board<5, 1> = board(3, ["AABAA"]);
        let moves = find_moves(&mut board);
        assert_eq!(2, moves.len());
        assert_eq!(immediate_points(&board, moves[0]), immediate_points(&board, moves[1]));

        assert_eq!(Some(moves[0]), GreedyPolicy.choose(&board, &moves));
    }

    #[test]
    fn greedy_no_moves_passes() {
        let board: Board<3, 1> = board(8, ["ABC"]);
        assert_eq!(None, GreedyPolicy.choose(&board, &[]));
    }

    #[test]
    fn random_picks_legal_move() {
        let mut board: Board<3, 3> = board(3, ["ABA", "BAB", "CAC"]);
        let moves = find_moves(&mut board);
        let mut policy = RandomPolicy::new(ChaCha8Rng::seed_from_u64(4));

        for _ in 0..20 {
            let chosen = policy.choose(&board, &moves).unwrap();
            assert!(moves.contains(&chosen));
        }
    }

    #[test]
    fn random_no_moves_passes() {
        let board: Board<3, 1> = board(8, ["ABC"]);
        let mut policy = RandomPolicy::new(ChaCha8Rng::seed_from_u64(4));
        assert_eq!(None, policy.choose(&board, &[]));
    }

    #[test]
    fn immediate_points_board_unchanged() {
        let board: Board<4, 3> = board(5, ["BCDE", "AABA", "CDAE"]);
        let original = board.clone();

        assert_eq!(100, immediate_points(&board, Move::new(Pos::new(2, 1), Pos::new(3, 1))));
        assert_eq!(original, board);
    }
}
