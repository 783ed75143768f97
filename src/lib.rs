//! A command-line chess game against a Monte Carlo Tree Search opponent.
//!
//! Move legality, check/mate detection and FEN parsing are delegated to the
//! `chess` crate. The search in [`mcts`] is game-agnostic and only talks to
//! the position through the [`game::GameState`] contract, which
//! [`crate::chess::ChessState`] implements.

pub mod chess;
pub mod fen;
pub mod game;
pub mod mcts;
