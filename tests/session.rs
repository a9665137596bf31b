use swap_and_match_engine::{
    find_matches, Board, BoardError, EngineConfig, GameSession, GameState, Orientation, Pos, SessionError, SessionEvent,
    SwapOutcome, TileSource, TileType,
};

/// Deals tiles in a fixed order, starting over at the end.
struct Deck {
    tiles: Vec<u8>,
    next: usize,
}

impl Deck {
    fn new(tiles: &[u8]) -> Deck {
        Deck { tiles: tiles.to_vec(), next: 0 }
    }
}

impl TileSource for Deck {
    fn random_tile(&mut self, palette_size: u8) -> TileType {
        let tile = self.tiles[self.next % self.tiles.len()] % palette_size;
        self.next += 1;
        TileType(tile)
    }
}

fn config() -> EngineConfig {
    EngineConfig { palette_size: 7, seed: None, max_generation_attempts: 50 }
}

// A, B, C... in rows 0 to 7, except row 3, which starts with a run of three A tiles.
fn board_with_row_match() -> Board<8, 8> {
    Board::from_rows(7, [
        [0, 1, 2, 3, 4, 5, 6, 0],
        [1, 2, 3, 4, 5, 6, 0, 1],
        [2, 3, 4, 5, 6, 0, 1, 2],
        [0, 0, 0, 1, 2, 3, 4, 5],
        [4, 5, 6, 0, 1, 2, 3, 4],
        [5, 6, 0, 1, 2, 3, 4, 5],
        [6, 0, 1, 2, 3, 4, 5, 6],
        [0, 1, 2, 3, 4, 5, 6, 0],
    ]).unwrap()
}

#[test]
fn row_match_found_at_start_of_row() {
    let matches = find_matches(&board_with_row_match());

    assert_eq!(1, matches.len());
    assert_eq!(0, matches[0].column());
    assert_eq!(3, matches[0].row());
    assert_eq!(3, matches[0].length());
    assert_eq!(Orientation::Horizontal, matches[0].orientation());
    assert_eq!(100, matches[0].points());
}

#[test]
fn swap_making_four_in_a_row_scores_two_hundred() {
    let board = Board::from_rows(5, [
        [1, 2, 3, 4],
        [0, 0, 1, 0],
        [2, 3, 0, 4],
    ]).unwrap();
    let mut session = GameSession::with_board(config_with_palette(5), Deck::new(&[0, 1, 2, 3]), board).unwrap();

    let outcome = session.attempt_swap_at(2, 1, 2, 2).unwrap();

    assert_eq!(200, outcome.points());
    assert_eq!(200, session.score());
}

#[test]
fn non_adjacent_swap_refused_board_unchanged() {
    let mut session: GameSession<_, 8, 8> = GameSession::from_config(EngineConfig {
        seed: Some(31),
        ..config()
    }).unwrap();
    let before = session.board().clone();

    let result = session.attempt_swap_at(0, 0, 5, 5);

    assert!(matches!(result, Err(SessionError::InvalidMove { first: (0, 0), second: (5, 5) })));
    assert_eq!(&before, session.board());
    assert_eq!(GameState::Ready, session.state());
}

#[test]
fn swap_outside_board_out_of_range() {
    let mut session: GameSession<_, 8, 8> = GameSession::from_config(EngineConfig {
        seed: Some(31),
        ..config()
    }).unwrap();

    let result = session.attempt_swap_at(7, 7, 8, 7);

    assert!(matches!(result, Err(SessionError::OutOfRange(_))));
}

#[test]
fn last_move_ends_game_and_blocks_swaps() {
    let board = Board::from_rows(8, [[0, 0, 1, 0]]).unwrap();
    let mut session = GameSession::with_board(config_with_palette(8), Deck::new(&[2, 3, 4]), board).unwrap();

    let outcome = session.attempt_swap(Pos::new(2, 0), Pos::new(3, 0)).unwrap();

    assert!(outcome.is_accepted());
    assert_eq!(GameState::GameOver, session.state());
    assert!(matches!(
        session.attempt_swap(Pos::new(0, 0), Pos::new(1, 0)),
        Err(SessionError::NotReady(GameState::GameOver))
    ));

    session.new_game().unwrap_err();
    assert_eq!(GameState::GameOver, session.state());
}

#[test]
fn stepped_swap_reports_each_stage() {
    let board = Board::from_rows(5, [
        [1, 2, 3, 4],
        [0, 0, 1, 0],
        [2, 3, 0, 4],
    ]).unwrap();
    let mut session = GameSession::with_board(config_with_palette(5), Deck::new(&[0, 1, 2, 3]), board).unwrap();

    assert_eq!(GameState::Resolving, session.begin_swap(Pos::new(2, 1), Pos::new(2, 2)).unwrap());

    let mut events = Vec::new();
    loop {
        let event = session.advance().unwrap();
        events.push(event);

        if let SessionEvent::Settled { .. } = event {
            break;
        }
    }

    assert_eq!(vec![
        SessionEvent::Matched { matches: 1, points: 200 },
        SessionEvent::Cleared { tiles: 4 },
        SessionEvent::Refilled,
        SessionEvent::Settled { game_over: session.is_game_over() },
    ], events);
    assert_eq!(200, session.score());
}

#[test]
fn single_tile_type_board_refused() {
    assert_eq!(Err(BoardError::PaletteTooSmall(1)), Board::<4, 1>::from_rows(1, [[0, 0, 0, 0]]));
}

#[test]
fn board_palette_must_match_config() {
    let board = Board::from_rows(3, [[0, 0, 1, 0]]).unwrap();

    let result = GameSession::with_board(EngineConfig::default(), Deck::new(&[0]), board);

    assert!(matches!(result, Err(SessionError::Config(_))));
}

#[test]
fn same_seed_same_game() {
    let play = || {
        let mut session: GameSession<_, 8, 8> = GameSession::from_config(EngineConfig {
            seed: Some(77),
            ..config()
        }).unwrap();
        let first_move = session.legal_moves()[0];
        let outcome = session.attempt_swap(first_move.first(), first_move.second()).unwrap();
        (session.board().clone(), outcome)
    };

    let (first_board, first_outcome) = play();
    let (second_board, second_outcome) = play();

    assert_eq!(first_board, second_board);
    assert_eq!(first_outcome, second_outcome);
    assert_ne!(SwapOutcome::Rejected, first_outcome);
}

fn config_with_palette(palette_size: u8) -> EngineConfig {
    EngineConfig { palette_size, ..config() }
}
