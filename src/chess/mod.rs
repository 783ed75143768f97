pub mod cli;


use std::fmt::{self, Display};
use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};
use itertools::Itertools;

use crate::game::player::GamePlayer;
use crate::game::{GameState, Player, Reward};

pub const BOARD_SIZE: usize = 8;

/// Rook ladder, White mates in one (Rb8#).
pub const PRESET_EASY_WHITE_WIN: &str = "4k3/R7/1R6/8/8/8/8/4K3 w - - 0 1";

/// One ply: a move in long-algebraic notation, tagged with the side that
/// plays it. Equality and hashing are by the (player, move) pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Action {
    player: Player,
    m: chess::ChessMove,
}

impl Action {
    pub fn new(player: Player, m: chess::ChessMove) -> Self {
        Self { player, m }
    }

    /// Parse a long-algebraic move string, e.g. "e2e4" or "e7e8q".
    pub fn from_lan(player: Player, lan: &str) -> Result<Self> {
        let m = chess::ChessMove::from_str(lan).map_err(|e| anyhow!("invalid move {:?}: {}", lan, e))?;
        Ok(Self::new(player, m))
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn chess_move(&self) -> chess::ChessMove {
        self.m
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.m)
    }
}

fn player_of(color: chess::Color) -> Player {
    match color {
        chess::Color::White => Player::White,
        chess::Color::Black => Player::Black,
    }
}

/// A chess position in the shape the search expects.
///
/// Invariant: `to_move` always agrees with the board's own side-to-move
/// bookkeeping; `take_action` advances both together. The board itself only
/// classifies checkmate and stalemate, so the state additionally tracks the
/// halfmove clock and the positions since the last irreversible move to
/// recognize fifty-move and repetition draws.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChessState {
    board: chess::Board,
    to_move: Player,
    halfmove_clock: u32,
    /* position keys since the last pawn move or capture, current one last */
    history: Vec<u64>,
}

impl ChessState {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_board(chess::Board::default())
    }

    pub fn from_board(board: chess::Board) -> Self {
        Self::with_halfmove_clock(board, 0)
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = chess::Board::from_str(fen)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("rules engine rejected FEN {:?}", fen))?;
        /* the engine validates but does not keep the halfmove counter */
        let halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0);
        Ok(Self::with_halfmove_clock(board, halfmove_clock))
    }

    fn with_halfmove_clock(board: chess::Board, halfmove_clock: u32) -> Self {
        Self {
            to_move: player_of(board.side_to_move()),
            halfmove_clock,
            history: vec![board.get_hash()],
            board,
        }
    }

    pub fn board(&self) -> &chess::Board {
        &self.board
    }

    pub fn is_valid_action(&self, action: Action) -> bool {
        action.player == self.to_move && self.board.legal(action.m)
    }

    /// Draws the board status does not classify: fifty-move rule, threefold
    /// repetition and insufficient mating material.
    fn is_forced_draw(&self) -> bool {
        self.halfmove_clock >= 100
            || self.is_threefold_repetition()
            || self.has_insufficient_material()
    }

    fn is_threefold_repetition(&self) -> bool {
        let current = self.board.get_hash();
        self.history.iter().filter(|&&key| key == current).count() >= 3
    }

    fn has_insufficient_material(&self) -> bool {
        match self.board.combined().popcnt() {
            /* king vs king */
            2 => true,
            /* king and a single minor piece vs king */
            3 => {
                (*self.board.pieces(chess::Piece::Bishop) | *self.board.pieces(chess::Piece::Knight))
                    .popcnt()
                    == 1
            }
            _ => false,
        }
    }
}

impl Default for ChessState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        /* the board displays as its FEN encoding */
        write!(f, "ChessState({}, {} to move)", self.board, self.to_move)
    }
}

impl GameState for ChessState {
    type Action = Action;

    fn current_player(&self) -> Player {
        self.to_move
    }

    fn possible_actions(&self) -> Vec<Action> {
        chess::MoveGen::new_legal(&self.board)
            .map(|m| Action::new(self.to_move, m))
            .collect_vec()
    }

    fn take_action(&self, action: &Action) -> Result<Self> {
        ensure!(
            action.player == self.to_move,
            "action {} belongs to {}, but {} is to move",
            action,
            action.player,
            self.to_move
        );
        ensure!(
            self.board.legal(action.m),
            "illegal move {} for current position",
            action
        );
        /* pawn moves and captures are irreversible, they restart the clock
         * and the repetition history */
        let resets_clock = self.board.piece_on(action.m.get_source()) == Some(chess::Piece::Pawn)
            || self.board.piece_on(action.m.get_dest()).is_some();
        let board = self.board.make_move_new(action.m);
        let halfmove_clock = if resets_clock { 0 } else { self.halfmove_clock + 1 };
        let mut history = if resets_clock { Vec::new() } else { self.history.clone() };
        history.push(board.get_hash());
        Ok(Self {
            board,
            to_move: self.to_move.opposite(),
            halfmove_clock,
            history,
        })
    }

    fn is_terminal(&self) -> bool {
        self.board.status() != chess::BoardStatus::Ongoing || self.is_forced_draw()
    }

    fn reward(&self) -> Option<Reward> {
        match self.board.status() {
            chess::BoardStatus::Checkmate => Some(Reward::Win),
            chess::BoardStatus::Stalemate => Some(Reward::Draw),
            chess::BoardStatus::Ongoing if self.is_forced_draw() => Some(Reward::Draw),
            chess::BoardStatus::Ongoing => None,
        }
    }
}

pub struct ChessGame {
    state: ChessState,
}

impl ChessGame {
    pub fn new() -> Self {
        Self::from_state(ChessState::new())
    }

    pub fn from_state(state: ChessState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ChessState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// The checkmate winner, or `None` on a draw (or an unfinished game).
    pub fn winner(&self) -> Option<Player> {
        match self.state.reward() {
            Some(Reward::Win) => Some(self.state.current_player().opposite()),
            _ => None,
        }
    }

    pub fn play_single_turn(&mut self, player: &mut dyn GamePlayer<ChessState>) -> Result<()> {
        ensure!(!self.state.is_terminal(), "game is already over");
        let action = player
            .next_action(&self.state)
            .context("player produced no action")?;
        self.state = self.state.take_action(&action)?;
        Ok(())
    }

    pub fn play_until_over<'a>(
        &mut self,
        white: &'a mut dyn GamePlayer<ChessState>,
        black: &'a mut dyn GamePlayer<ChessState>,
    ) -> Result<(ChessState, Option<Player>)> {
        while !self.state.is_terminal() {
            let player = match self.state.current_player() {
                Player::White => &mut *white,
                Player::Black => &mut *black,
            };
            self.play_single_turn(player)?;
        }
        Ok((self.state.clone(), self.winner()))
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}
