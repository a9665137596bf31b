use std::fmt::{Display, Formatter};
use enumset::EnumSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};
use crate::assist::MovePolicy;
use crate::board::{Board, Cell, TileSource};
use crate::config::EngineConfig;
use crate::error::{ConfigError, SessionError};
use crate::matching::{has_match, Match};
use crate::moves::{find_moves, legal_directions, Move};
use crate::position::{Direction, Pos};
use crate::resolution::{resolve, Cascade, CascadeEvent, Resolution};

/// The phase a game session is in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {

    /// No board has been generated yet.
    Init,

    /// Waiting for a swap.
    Ready,

    /// A swap made a match and the board is being resolved.
    Resolving,

    /// A swap made no match and is about to be undone.
    Rewinding,

    /// No swap on the board makes a match. Only a new game can follow.
    GameOver

}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::Init => "initializing",
            GameState::Ready => "ready",
            GameState::Resolving => "resolving",
            GameState::Rewinding => "rewinding",
            GameState::GameOver => "game over"
        };
        f.write_str(name)
    }
}

/// What became of a swap that was allowed to happen.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SwapOutcome {

    /// The swap made no match and was undone.
    Rejected,

    /// The swap made at least one match and the board was resolved.
    Resolved(Resolution)

}

impl SwapOutcome {

    /// Checks if the swap stayed on the board.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SwapOutcome::Resolved(_))
    }

    /// Gets the points the swap scored.
    pub fn points(&self) -> u64 {
        match self {
            SwapOutcome::Rejected => 0,
            SwapOutcome::Resolved(resolution) => resolution.points()
        }
    }

}

/// A single stage of a swap played with [GameSession::advance].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SessionEvent {

    /// Matches were found and their points were added to the score.
    Matched { matches: usize, points: u64 },

    /// Matched tiles were removed. Cells hold how far their tiles will fall.
    Cleared { tiles: usize },

    /// Tiles fell and the board was refilled.
    Refilled,

    /// A swap without a match was undone.
    Rewound,

    /// The board has no matches left and the turn is over.
    Settled { game_over: bool }

}

/// A single-player game: a board, a score, and the rules for changing them.
///
/// All changes go through [GameSession::new_game] and either
/// [GameSession::attempt_swap], which plays a whole turn at once, or
/// [GameSession::begin_swap] followed by [GameSession::advance], which plays
/// it one stage at a time. The list of legal moves is recomputed whenever the
/// session becomes ready or the game ends, and is empty while a swap is being
/// played.
#[derive(Clone, Debug)]
pub struct GameSession<R, const BOARD_COLUMNS: usize, const BOARD_ROWS: usize> {
    config: EngineConfig,
    source: R,
    board: Board<BOARD_COLUMNS, BOARD_ROWS>,
    score: u64,
    state: GameState,
    pending_swap: Option<Move<BOARD_COLUMNS, BOARD_ROWS>>,
    cascade: Cascade<BOARD_COLUMNS, BOARD_ROWS>,
    moves: Vec<Move<BOARD_COLUMNS, BOARD_ROWS>>
}

/// A session on the classic eight by eight board with a seeded tile generator.
pub type ClassicSession = GameSession<ChaCha8Rng, 8, 8>;

impl<const W: usize, const H: usize> GameSession<ChaCha8Rng, W, H> {

    /// Creates a session whose tiles come from a ChaCha generator, seeded from
    /// the configuration if it has a seed, and starts the first game.
    ///
    /// # Arguments
    ///
    /// * `config` - settings for the session
    pub fn from_config(config: EngineConfig) -> Result<Self, SessionError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy()
        };

        let mut session = GameSession::new(config, rng)?;
        session.new_game()?;
        Ok(session)
    }

}

impl<R: TileSource, const W: usize, const H: usize> GameSession<R, W, H> {

    /// Creates a session without a board. Call [GameSession::new_game] to start playing.
    ///
    /// # Arguments
    ///
    /// * `config` - settings for the session
    /// * `source` - source of every tile the session puts on the board
    pub fn new(config: EngineConfig, source: R) -> Result<Self, SessionError> {
        config.validate()?;

        Ok(GameSession {
            board: Board::new(config.palette_size),
            config,
            source,
            score: 0,
            state: GameState::Init,
            pending_swap: None,
            cascade: Cascade::new(),
            moves: Vec::new()
        })
    }

    /// Creates a session that plays on the given board as it is, without
    /// resolving any matches already on it. The session is ready, or over if
    /// the board has no legal move.
    ///
    /// # Arguments
    ///
    /// * `config` - settings for the session
    /// * `source` - source of every tile the session puts on the board
    /// * `board` - the board to start from
    ///
    /// # Errors
    ///
    /// Returns [SessionError::Config] if the board's palette is not the one
    /// in the configuration.
    pub fn with_board(config: EngineConfig, source: R, board: Board<W, H>) -> Result<Self, SessionError> {
        if board.palette_size() != config.palette_size {
            return Err(ConfigError::Validation(format!(
                "board has {} tile types but palette_size is {}", board.palette_size(), config.palette_size
            )).into());
        }

        let mut session = GameSession::new(config, source)?;
        session.board = board;
        session.finish_turn();
        Ok(session)
    }

    /// Starts a new game on a fresh board and resets the score.
    ///
    /// Random boards are generated and resolved without scoring until one has
    /// at least one legal move. Fails if none does within the configured number
    /// of attempts, which happens when the board is too small to ever hold a match.
    #[instrument(skip(self), fields(columns = W, rows = H))]
    pub fn new_game(&mut self) -> Result<(), SessionError> {
        let attempts = self.config.max_generation_attempts;

        for attempt in 1..=attempts {
            let mut board = Board::create(self.config.palette_size, &mut self.source);
            resolve(&mut board, &mut self.source);

            let moves = find_moves(&mut board);
            if moves.is_empty() {
                debug!(attempt, "generated board has no legal moves");
                continue;
            }

            debug!(attempt, moves = moves.len(), "new game ready");
            self.board = board;
            self.moves = moves;
            self.score = 0;
            self.pending_swap = None;
            self.cascade = Cascade::new();
            self.state = GameState::Ready;
            return Ok(());
        }

        Err(SessionError::NoPlayableBoard(attempts))
    }

    /// Swaps two adjacent tiles and plays out the whole turn. A swap that makes
    /// no match is undone right away and reported as [SwapOutcome::Rejected].
    ///
    /// # Arguments
    ///
    /// * `first` - the first position of a tile to swap
    /// * `second` - the second position of a tile to swap
    ///
    /// # Errors
    ///
    /// Returns [SessionError::NotReady] unless the session is ready, and
    /// [SessionError::InvalidMove] if the cells are not adjacent. The board
    /// is unchanged in both cases.
    #[instrument(skip(self))]
    pub fn attempt_swap(&mut self, first: Pos<W, H>, second: Pos<W, H>) -> Result<SwapOutcome, SessionError> {
        self.check_swap(first, second)?;
        self.board.swap(first, second);

        if !has_match(&self.board) {
            self.board.swap(first, second);
            self.refresh_moves();
            debug!("swap rejected, no match");
            return Ok(SwapOutcome::Rejected);
        }

        self.state = GameState::Resolving;
        self.pending_swap = Some(Move::new(first, second));

        let resolution = resolve(&mut self.board, &mut self.source);
        self.score += resolution.points();
        self.finish_turn();

        debug!(points = resolution.points(), passes = resolution.passes(), score = self.score,
            state = %self.state, "swap resolved");
        Ok(SwapOutcome::Resolved(resolution))
    }

    /// Same as [GameSession::attempt_swap], with raw coordinates that may lie
    /// outside the board.
    ///
    /// # Errors
    ///
    /// Returns [SessionError::OutOfRange] if either cell is outside the board.
    pub fn attempt_swap_at(&mut self, first_column: usize, first_row: usize,
                           second_column: usize, second_row: usize) -> Result<SwapOutcome, SessionError> {
        let first = Pos::try_new(first_column, first_row)?;
        let second = Pos::try_new(second_column, second_row)?;
        self.attempt_swap(first, second)
    }

    /// Swaps two adjacent tiles and stops, so the turn can be played one stage
    /// at a time with [GameSession::advance]. Returns [GameState::Resolving] if
    /// the swap made a match and [GameState::Rewinding] if it will be undone.
    ///
    /// # Arguments
    ///
    /// * `first` - the first position of a tile to swap
    /// * `second` - the second position of a tile to swap
    #[instrument(skip(self))]
    pub fn begin_swap(&mut self, first: Pos<W, H>, second: Pos<W, H>) -> Result<GameState, SessionError> {
        self.check_swap(first, second)?;
        self.board.swap(first, second);
        self.pending_swap = Some(Move::new(first, second));

        self.state = match has_match(&self.board) {
            true => {
                self.cascade = Cascade::new();
                GameState::Resolving
            },
            false => GameState::Rewinding
        };

        self.moves.clear();
        debug!(state = %self.state, "swap started");
        Ok(self.state)
    }

    /// Plays the next stage of a swap started with [GameSession::begin_swap].
    ///
    /// # Errors
    ///
    /// Returns [SessionError::NotReady] if no swap is in progress.
    pub fn advance(&mut self) -> Result<SessionEvent, SessionError> {
        match self.state {
            GameState::Rewinding => {
                if let Some(pending) = self.pending_swap.take() {
                    self.board.swap(pending.first(), pending.second());
                }

                self.state = GameState::Ready;
                self.refresh_moves();
                debug!("swap rewound, no match");
                Ok(SessionEvent::Rewound)
            },
            GameState::Resolving => {
                let event = match self.cascade.step(&mut self.board, &mut self.source) {
                    CascadeEvent::Matched { matches, points } => {
                        self.score += points;
                        SessionEvent::Matched { matches, points }
                    },
                    CascadeEvent::Cleared { tiles } => SessionEvent::Cleared { tiles },
                    CascadeEvent::Refilled => SessionEvent::Refilled,
                    CascadeEvent::Settled => {
                        self.finish_turn();
                        debug!(points = self.cascade.points(), passes = self.cascade.passes(),
                            score = self.score, state = %self.state, "swap resolved");
                        return Ok(SessionEvent::Settled { game_over: self.is_game_over() });
                    }
                };

                Ok(event)
            },
            state => Err(SessionError::NotReady(state))
        }
    }

    /// Lets a policy pick one of the legal moves and plays it. Returns `None`
    /// if the policy picked nothing.
    ///
    /// # Arguments
    ///
    /// * `policy` - chooses the move to play
    pub fn play_turn<P: MovePolicy>(&mut self, policy: &mut P) -> Result<Option<SwapOutcome>, SessionError> {
        if self.state != GameState::Ready {
            return Err(SessionError::NotReady(self.state));
        }

        match policy.choose(&self.board, &self.moves) {
            Some(chosen) => self.attempt_swap(chosen.first(), chosen.second()).map(Some),
            None => Ok(None)
        }
    }

    /// Gets the current board.
    pub fn board(&self) -> &Board<W, H> {
        &self.board
    }

    /// Gets a snapshot of the cell at a position.
    ///
    /// # Arguments
    ///
    /// * `pos` - the position of the cell
    pub fn cell(&self, pos: Pos<W, H>) -> Cell {
        self.board.cell(pos)
    }

    /// Gets the score of the current game.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Gets the phase the session is in.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Checks if no legal move is left.
    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Gets every swap that makes a match on the current board. Empty while a
    /// swap is being played with [GameSession::begin_swap] and [GameSession::advance],
    /// and once the game is over.
    pub fn legal_moves(&self) -> &[Move<W, H>] {
        &self.moves[..]
    }

    /// Gets the directions in which the tile at `pos` can be swapped to make a match.
    ///
    /// # Arguments
    ///
    /// * `pos` - the tile to look up
    pub fn legal_directions(&self, pos: Pos<W, H>) -> EnumSet<Direction> {
        legal_directions(&self.moves, pos)
    }

    /// Gets the matches being resolved. Empty unless a stepped swap has found
    /// matches that have not been refilled yet.
    pub fn active_matches(&self) -> &[Match<W, H>] {
        match self.state {
            GameState::Resolving => self.cascade.active_matches(),
            _ => &[]
        }
    }

    /// Gets the swap being played, if any.
    pub fn pending_swap(&self) -> Option<Move<W, H>> {
        self.pending_swap
    }

    /// Gets the settings of the session.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn check_swap(&self, first: Pos<W, H>, second: Pos<W, H>) -> Result<(), SessionError> {
        if self.state != GameState::Ready {
            return Err(SessionError::NotReady(self.state));
        }

        if !first.is_adjacent(second) {
            debug!(%first, %second, "swap of non-adjacent cells refused");
            return Err(SessionError::InvalidMove {
                first: (first.column(), first.row()),
                second: (second.column(), second.row())
            });
        }

        Ok(())
    }

    fn finish_turn(&mut self) {
        self.pending_swap = None;
        self.refresh_moves();

        self.state = match self.moves.is_empty() {
            true => GameState::GameOver,
            false => GameState::Ready
        };

        if self.is_game_over() {
            debug!(score = self.score, "no legal moves left, game over");
        }
    }

    fn refresh_moves(&mut self) {
        self.moves = find_moves(&mut self.board);
    }

}
