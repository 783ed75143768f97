pub mod player;

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use anyhow::Result;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opposite(&self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Signed-one convention used at the search boundary: +1 for White,
    /// -1 for Black, 0 for no winner.
    pub fn to_signed_one(player: Option<Player>) -> i32 {
        match player {
            Some(Player::White) => 1,
            Some(Player::Black) => -1,
            None => 0,
        }
    }

}

impl Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

/// Terminal-state sentinel. A state that is neither won nor drawn has no
/// reward at all (`None`), which is deliberately distinct from a zero score.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Reward {
    Win,
    Draw,
}

/// The contract a position must satisfy for the search to explore it.
///
/// States are persistent values: `take_action` returns a fresh state and
/// never mutates the receiver, so a search tree may hold many states that
/// share a common ancestor without any locking.
pub trait GameState: Clone {
    type Action: Clone + Eq + Hash + Debug + Display;

    /// The side to move. No side effects.
    fn current_player(&self) -> Player;

    /// All legal actions for the side to move, each tagged with that side's
    /// identity. Exhaustive and duplicate-free; order is unspecified.
    fn possible_actions(&self) -> Vec<Self::Action>;

    /// A new state with the action applied and the turn flipped. Fails if
    /// the action is not legal in this state; callers normally guarantee
    /// legality by only passing actions drawn from `possible_actions`.
    fn take_action(&self, action: &Self::Action) -> Result<Self>;

    /// Whether the game is over in this state.
    fn is_terminal(&self) -> bool;

    /// `Some(Reward::Win)` if the side that just moved has won,
    /// `Some(Reward::Draw)` on a drawn position, `None` otherwise. May be
    /// called on non-terminal states.
    fn reward(&self) -> Option<Reward>;
}
