use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use chess_mcts::chess::cli::{
    cli_print_chess_board, read_initial_state, read_player_color, ChessPlayerCmd,
};
use chess_mcts::chess::{ChessGame, ChessState};
use chess_mcts::game::player::GamePlayer;
use chess_mcts::game::GameState;
use chess_mcts::mcts::MctsPlayer;

#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
struct Args {
    /// Wall-clock budget for each AI move, in seconds (at least 1)
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    time_limit: u64,
    /// Seed for the search RNG, random if not given
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .init();

    let args = Args::parse();
    let time_limit = Duration::from_secs(args.time_limit);

    let human_color = read_player_color();
    let mut game = ChessGame::from_state(read_initial_state());

    let mut human = ChessPlayerCmd;
    let mut ai: MctsPlayer<ChessState> = match args.seed {
        Some(seed) => MctsPlayer::from_seed(time_limit, seed),
        None => MctsPlayer::new(time_limit),
    };

    while !game.is_over() {
        let turn = game.state().current_player();
        println!("\nIt's {}'s turn", turn);
        cli_print_chess_board(game.state());

        let player: &mut dyn GamePlayer<ChessState> = if turn == human_color {
            &mut human
        } else {
            println!("Please wait while the AI is thinking...\n");
            &mut ai
        };
        game.play_single_turn(player)?;
    }

    match game.winner() {
        Some(winner) => println!("{} has won by checkmate", winner),
        None => println!("It's a draw"),
    }
    cli_print_chess_board(game.state());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;

    #[test]
    fn zero_time_limit_is_rejected() {
        assert!(Args::try_parse_from(["chess-mcts", "--time-limit", "0"]).is_err());

        let args = Args::try_parse_from(["chess-mcts", "--time-limit", "5"]).unwrap();
        assert_eq!(args.time_limit, 5);
    }
}
