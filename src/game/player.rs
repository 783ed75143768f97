use rand::prelude::*;

use crate::game::GameState;

/// A move-selection strategy. The game loop only talks to players through
/// this trait, so a search, a human at a terminal or a scripted stub are
/// interchangeable.
pub trait GamePlayer<S: GameState> {
    fn next_action(&mut self, state: &S) -> Option<S::Action>;
}

pub struct PlayerRand {
    rand: StdRng,
}
impl Default for PlayerRand {
    fn default() -> Self {
        Self::new()
    }
}
impl PlayerRand {
    pub fn new() -> Self {
        Self::from_seed(rand::rng().random())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rand: StdRng::seed_from_u64(seed),
        }
    }
}

impl<S: GameState> GamePlayer<S> for PlayerRand {
    fn next_action(&mut self, state: &S) -> Option<S::Action> {
        let actions = state.possible_actions();
        if actions.is_empty() {
            None
        } else {
            Some(actions[self.rand.random_range(0..actions.len())].clone())
        }
    }
}
