//! Time-budgeted Monte Carlo Tree Search, generic over [`GameState`].

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::prelude::*;
use std::time::{Duration, Instant};

use crate::game::player::GamePlayer;
use crate::game::{GameState, Player, Reward};

#[derive(Clone)]
struct MctsNode<S> {
    state: S,
}

impl<S> MctsNode<S> {
    fn from_state(state: S) -> Self {
        Self { state }
    }
}

#[derive(Clone)]
struct MctsEdge<Action> {
    action: Action,

    /// The initial score of this action, a uniform prior over the parent's
    /// children. In range [0, 1].
    init_score: f32,

    /// This is the variable n from the UCT formula
    simulations_n: u32,

    /// This is the variable w from the UCT formula
    score_w: f32,
}

impl<Action> MctsEdge<Action> {
    fn new(action: Action, init_score: f32) -> Self {
        Self {
            action,
            init_score,
            simulations_n: 0,
            score_w: 0.0,
        }
    }
}

pub struct MctsPlayer<S: GameState> {
    search_tree: DiGraph<MctsNode<S>, MctsEdge<S::Action>>,
    root: Option<NodeIndex>,

    time_limit: Duration,
    explore_factor: f32,
    playout_depth_limit: u32,
    rand: StdRng,
}

impl<S: GameState> MctsPlayer<S> {
    pub fn new(time_limit: Duration) -> Self {
        Self::from_seed(time_limit, rand::rng().random())
    }

    pub fn from_seed(time_limit: Duration, seed: u64) -> Self {
        assert!(!time_limit.is_zero());
        Self {
            search_tree: DiGraph::new(),
            root: None,
            time_limit,
            explore_factor: std::f32::consts::SQRT_2,
            playout_depth_limit: 200,
            rand: StdRng::seed_from_u64(seed),
        }
    }

    /// Run simulations until the time budget elapses (at least one), and
    /// return the most visited action of the root. `None` iff the given
    /// state has no legal action.
    pub fn search(&mut self, state: &S) -> Option<S::Action> {
        if state.is_terminal() {
            return None;
        }

        let search_start = Instant::now();
        self.search_tree.clear();
        self.root = Some(self.search_tree.add_node(MctsNode::from_state(state.clone())));

        let mut simulations = 0u64;
        while simulations == 0 || search_start.elapsed() < self.time_limit {
            self.develop_once();
            simulations += 1;
        }

        let best = self
            .search_tree
            .edges(self.root.unwrap())
            .max_by_key(|edge| edge.weight().simulations_n)?;
        log::debug!(
            "mcts: {} simulations in {:?}, best action {} ({} visits)",
            simulations,
            search_start.elapsed(),
            best.weight().action,
            best.weight().simulations_n
        );
        Some(best.weight().action.clone())
    }

    fn develop_once(&mut self) {
        /* Select a leaf node */
        let path_to_selection = self.select();

        let leaf_id = match path_to_selection.last() {
            None => self.root.unwrap(),
            Some(edge_id) => {
                let (_e_source, e_target) = self.search_tree.edge_endpoints(*edge_id).unwrap();
                e_target
            }
        };
        let leaf_state = self.search_tree[leaf_id].state.clone();

        let score = if leaf_state.is_terminal() {
            signed_value(&leaf_state)
        } else {
            /* Expand the leaf, then estimate its value with a random playout */
            self.create_children(leaf_id, &leaf_state);
            self.playout(&leaf_state)
        };

        /* back propagate the score to the parents */
        self.backpropagate(path_to_selection, score);
    }

    /* Return path to selected leaf node */
    fn select(&self) -> Vec<EdgeIndex> {
        let mut path: Vec<EdgeIndex> = vec![];

        let mut node_id = self.root.unwrap();
        loop {
            let node = &self.search_tree[node_id];

            /* Node is leaf, done */
            if node.state.is_terminal() || self.search_tree.edges(node_id).next().is_none() {
                return path;
            }

            let node_simcount = 1 + self
                .search_tree
                .edges(node_id)
                .map(|edge| edge.weight().simulations_n)
                .sum::<u32>();

            /* Node is not a leaf, choose best child and continue in its sub tree */
            let edge = self
                .search_tree
                .edges(node_id)
                .max_by(|e1, e2| {
                    let val1 = self.calc_selection_heuristic(e1.weight(), node_simcount);
                    let val2 = self.calc_selection_heuristic(e2.weight(), node_simcount);
                    val1.partial_cmp(&val2).unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap();

            path.push(edge.id());
            node_id = edge.target();
        }
    }

    fn calc_selection_heuristic(&self, edge: &MctsEdge<S::Action>, parent_simcount: u32) -> f32 {
        let exploit = if edge.simulations_n == 0 {
            0.0
        } else {
            edge.score_w / edge.simulations_n as f32
        };

        let explore = self.explore_factor
            * edge.init_score
            * ((parent_simcount as f32).sqrt() / (1 + edge.simulations_n) as f32);

        exploit + explore
    }

    fn create_children(&mut self, parent_id: NodeIndex, parent_state: &S) {
        debug_assert!(!parent_state.is_terminal());

        let actions = parent_state.possible_actions();
        if actions.is_empty() {
            return;
        }
        let prior = 1.0 / actions.len() as f32;
        for action in actions {
            let leaf_state = parent_state.take_action(&action).unwrap();
            let leaf_id = self.search_tree.add_node(MctsNode::from_state(leaf_state));
            self.search_tree
                .add_edge(parent_id, leaf_id, MctsEdge::new(action, prior));
        }
    }

    /* Play random moves until a terminal state (or the depth limit, counted
     * as a draw) and return the result from White's perspective */
    fn playout(&mut self, state: &S) -> f32 {
        let mut state = state.clone();
        for _ in 0..self.playout_depth_limit {
            if state.is_terminal() {
                return signed_value(&state);
            }
            let actions = state.possible_actions();
            if actions.is_empty() {
                return 0.0;
            }
            let action = &actions[self.rand.random_range(0..actions.len())];
            state = state.take_action(action).unwrap();
        }
        0.0
    }

    fn backpropagate(&mut self, path: Vec<EdgeIndex>, score: f32) {
        for edge_id in path {
            let (e_source, _e_target) = self.search_tree.edge_endpoints(edge_id).unwrap();
            let player_to_play = self.search_tree[e_source].state.current_player();
            let edge = self.search_tree.edge_weight_mut(edge_id).unwrap();
            edge.simulations_n += 1;
            edge.score_w += match player_to_play {
                Player::White => score,
                Player::Black => -score,
            };
        }
    }
}

impl<S: GameState> GamePlayer<S> for MctsPlayer<S> {
    fn next_action(&mut self, state: &S) -> Option<S::Action> {
        self.search(state)
    }
}

/// Value of a state in [-1, 1] from White's perspective. A won state was won
/// by the side that just moved, i.e. the opposite of the side to move.
fn signed_value<S: GameState>(state: &S) -> f32 {
    match state.reward() {
        Some(Reward::Win) => Player::to_signed_one(Some(state.current_player().opposite())) as f32,
        Some(Reward::Draw) | None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::chess::{ChessState, PRESET_EASY_WHITE_WIN};
    use crate::game::{GameState, Reward};
    use crate::mcts::MctsPlayer;

    #[test]
    fn finds_mate_in_one() {
        let state = ChessState::from_fen(PRESET_EASY_WHITE_WIN).unwrap();
        let mut player = MctsPlayer::from_seed(Duration::from_millis(800), 0x1e8392c5bb47a1d3);

        let action = player.search(&state).unwrap();
        let next = state.take_action(&action).unwrap();
        assert!(next.is_terminal());
        assert_eq!(next.reward(), Some(Reward::Win));
    }

    #[test]
    fn search_returns_legal_action() {
        let state = ChessState::new();
        let mut player = MctsPlayer::from_seed(Duration::from_millis(50), 0xd1d49c4bd8e69c2f);

        let action = player.search(&state).unwrap();
        assert!(state.possible_actions().contains(&action));
    }

    #[test]
    fn search_on_terminal_state_returns_none() {
        // Fool's mate, White to move and mated
        let state =
            ChessState::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let mut player = MctsPlayer::from_seed(Duration::from_millis(50), 0x7a3f0b9d2c6e5a41);

        assert_eq!(player.search(&state), None);
    }
}
