use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swap_and_match_engine::{
    find_matches, find_moves, resolve, Board, EngineConfig, GameSession, GameState, Orientation,
    RandomPolicy, SwapOutcome, POINTS_PER_MATCH_UNIT,
};

fn seeded_session(seed: u64, palette_size: u8) -> GameSession<ChaCha8Rng, 8, 8> {
    GameSession::from_config(EngineConfig { palette_size, seed: Some(seed), ..EngineConfig::default() })
        .expect("an eight by eight board always has a playable layout")
}

// Tiles 0 to 3 laid out so that no two neighbors are equal, with one run of
// tile 4 placed along a row or a column.
fn board_with_run(length: usize, offset: usize, line: usize, vertical: bool) -> Board<8, 8> {
    let mut rows = [[0u8; 8]; 8];
    for (row, tiles) in rows.iter_mut().enumerate() {
        for (column, tile) in tiles.iter_mut().enumerate() {
            *tile = ((column + 2 * row) % 4) as u8;
        }
    }

    for index in offset..offset + length {
        match vertical {
            true => rows[index][line] = 4,
            false => rows[line][index] = 4,
        }
    }

    Board::from_rows(5, rows).unwrap()
}

proptest! {
    #[test]
    fn find_matches_reports_run_once(
        (length, offset) in (3usize..=8).prop_flat_map(|length| (Just(length), 0..=8 - length)),
        line in 0usize..8,
        vertical in any::<bool>()
    ) {
        let board = board_with_run(length, offset, line, vertical);

        let matches = find_matches(&board);

        prop_assert_eq!(1, matches.len());
        prop_assert_eq!(length, matches[0].length());
        let (orientation, column, row) = match vertical {
            true => (Orientation::Vertical, line, offset),
            false => (Orientation::Horizontal, offset, line),
        };
        prop_assert_eq!(orientation, matches[0].orientation());
        prop_assert_eq!(column, matches[0].column());
        prop_assert_eq!(row, matches[0].row());
    }

    #[test]
    fn find_moves_leaves_board_unchanged(seed in any::<u64>(), palette_size in 3u8..=7) {
        let mut board: Board<8, 8> = Board::create(palette_size, &mut ChaCha8Rng::seed_from_u64(seed));
        let original = board.clone();

        find_moves(&mut board);

        prop_assert_eq!(original, board);
    }

    #[test]
    fn resolve_leaves_full_stable_board(seed in any::<u64>(), palette_size in 3u8..=7) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board: Board<8, 8> = Board::create(palette_size, &mut rng);

        let resolution = resolve(&mut board, &mut rng);

        prop_assert!(board.is_full());
        prop_assert!(find_matches(&board).is_empty());
        prop_assert_eq!(0, resolution.points() % POINTS_PER_MATCH_UNIT);
        prop_assert!(board.iter().all(|(_, cell)| cell.pending_shift() == 0));
    }

    #[test]
    fn new_game_stable_and_playable(seed in any::<u64>(), palette_size in 3u8..=7) {
        let session = seeded_session(seed, palette_size);

        prop_assert_eq!(GameState::Ready, session.state());
        prop_assert_eq!(0, session.score());
        prop_assert!(find_matches(session.board()).is_empty());
        prop_assert!(!session.legal_moves().is_empty());
    }

    #[test]
    fn legal_moves_always_accepted(seed in any::<u64>(), pick in any::<prop::sample::Index>()) {
        let mut session = seeded_session(seed, 6);
        let chosen = *pick.get(session.legal_moves());

        let outcome = session.attempt_swap(chosen.first(), chosen.second()).unwrap();

        prop_assert!(outcome.is_accepted());
        prop_assert!(outcome.points() >= POINTS_PER_MATCH_UNIT);
        prop_assert_eq!(outcome.points(), session.score());
    }

    #[test]
    fn rejected_swap_changes_nothing(seed in any::<u64>(), column in 0usize..7, row in 0usize..8) {
        let mut session = seeded_session(seed, 6);
        let before = session.board().clone();
        let moves_before = session.legal_moves().to_vec();

        let outcome = session.attempt_swap_at(column, row, column + 1, row).unwrap();

        if outcome == SwapOutcome::Rejected {
            prop_assert_eq!(&before, session.board());
            prop_assert_eq!(moves_before, session.legal_moves().to_vec());
            prop_assert_eq!(0, session.score());
            prop_assert_eq!(GameState::Ready, session.state());
        }
    }

    #[test]
    fn score_never_decreases(seed in any::<u64>(), turns in 1usize..30) {
        let mut session = seeded_session(seed, 5);
        let mut policy = RandomPolicy::new(ChaCha8Rng::seed_from_u64(seed ^ 0x5eed));
        let mut last_score = 0;

        for _ in 0..turns {
            if session.is_game_over() {
                break;
            }

            session.play_turn(&mut policy).unwrap();

            prop_assert!(session.score() >= last_score);
            prop_assert!(find_matches(session.board()).is_empty());
            last_score = session.score();
        }
    }
}
