use std::io;

use itertools::Itertools;

use crate::chess::{Action, ChessState, BOARD_SIZE, PRESET_EASY_WHITE_WIN};
use crate::fen::is_valid_fen;
use crate::game::player::GamePlayer;
use crate::game::{GameState, Player};

/// Human player reading long-algebraic moves from stdin.
pub struct ChessPlayerCmd;

impl GamePlayer<ChessState> for ChessPlayerCmd {
    fn next_action(&mut self, state: &ChessState) -> Option<Action> {
        loop {
            println!("Make a move:");
            let line = read_line();

            let action = match Action::from_lan(state.current_player(), line.trim()) {
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
                Ok(action) => action,
            };

            let legal_actions = state.possible_actions();
            if legal_actions.contains(&action) {
                return Some(action);
            }
            println!(
                "Illegal action! (HINT: choose from [{}])",
                legal_actions.iter().join(", ")
            );
        }
    }
}

pub fn read_player_color() -> Player {
    loop {
        println!("Choose player color (b/w):");
        match read_line().trim().to_lowercase().as_str() {
            "b" => return Player::Black,
            "w" => return Player::White,
            _ => println!("Unsupported player color."),
        }
    }
}

pub fn read_initial_state() -> ChessState {
    loop {
        println!(
            "Choose game initial state:\n \
             (1) - easy White win\n \
             (c) - custom state (FEN encoded)\n \
             (ENTER) - new game"
        );
        match read_line().trim().to_lowercase().as_str() {
            "1" => return ChessState::from_fen(PRESET_EASY_WHITE_WIN).expect("preset FEN is valid"),
            "c" => return read_custom_state(),
            "" => return ChessState::new(),
            _ => println!("Unsupported game initial state."),
        }
    }
}

fn read_custom_state() -> ChessState {
    loop {
        println!("Insert legal FEN encoded state:");
        let line = read_line();
        let fen = line.trim();
        if !is_valid_fen(fen) {
            println!("Invalid FEN, try again.");
            continue;
        }
        match ChessState::from_fen(fen) {
            Ok(state) => return state,
            Err(e) => println!("{:#}", e),
        }
    }
}

fn read_line() -> String {
    let mut line = String::new();
    io::stdin().read_line(&mut line).expect("failed to read input");
    line
}

pub fn cli_print_chess_board(state: &ChessState) {
    let board = state.board();
    let square_str = |rank, file| -> String {
        let square =
            chess::Square::make_square(chess::Rank::from_index(rank), chess::File::from_index(file));
        match board.piece_on(square) {
            Some(piece) => piece.to_string(board.color_on(square).unwrap()),
            None => "·".to_string(),
        }
    };

    for rank in (0..BOARD_SIZE).rev() {
        let row_chars: Vec<String> = (0..BOARD_SIZE).map(|file| square_str(rank, file)).collect();
        println!("{} | {}", (rank + 1), row_chars.join(" "));
    }

    let files = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let files_indices: Vec<String> = (0..BOARD_SIZE).map(|file| files[file].to_string()).collect();
    println!("    {}", "-".repeat(BOARD_SIZE * 2 - 1));
    println!("    {}", files_indices.join(" "));
}
