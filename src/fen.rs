//! Standalone FEN string validation, used to gate user-supplied starting
//! positions before handing them to the rules engine.

use once_cell::sync::Lazy;
use regex::Regex;

/// Six-field FEN grammar. The piece placement field is checked structurally
/// in [`is_valid_fen`] on top of this.
static FEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(((?:[rnbqkpRNBQKP1-8~]+/){7})[rnbqkpRNBQKP1-8~]+)\s([bw])\s(-|[KQkq]{1,4})\s(-|[a-h][1-8])\s(\d+)\s(\d+)$",
    )
    .unwrap()
});

/// Check whether the input string is a valid FEN
/// [https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation].
///
/// Returns false (never panics) on any malformation, logging the reason.
pub fn is_valid_fen(fen: &str) -> bool {
    let Some(captures) = FEN_RE.captures(fen) else {
        log::info!(
            "fen doesn't match, follow this example: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        return false;
    };

    let placement = captures.get(1).unwrap().as_str();
    let ranks = placement.split('/').collect::<Vec<_>>();
    if ranks.len() != 8 {
        log::info!("expected 8 rows in position part of fen: {:?}", placement);
        return false;
    }

    for rank in ranks {
        let mut field_sum = 0;
        let (mut previous_was_digit, mut previous_was_piece) = (false, false);

        for c in rank.chars() {
            match c {
                '1'..='8' => {
                    if previous_was_digit {
                        log::info!("two subsequent digits in position part of fen: {:?}", placement);
                        return false;
                    }
                    field_sum += c.to_digit(10).unwrap();
                    previous_was_digit = true;
                    previous_was_piece = false;
                }
                // Crazyhouse promotion marker, legal only directly after a piece
                '~' => {
                    if !previous_was_piece {
                        log::info!("~ not after piece in position part of fen: {:?}", placement);
                        return false;
                    }
                    previous_was_digit = false;
                    previous_was_piece = false;
                }
                'p' | 'n' | 'b' | 'r' | 'q' | 'k' | 'P' | 'N' | 'B' | 'R' | 'Q' | 'K' => {
                    field_sum += 1;
                    previous_was_digit = false;
                    previous_was_piece = true;
                }
                _ => {
                    log::info!("invalid character in position part of fen: {:?}", placement);
                    return false;
                }
            }
        }

        if field_sum != 8 {
            log::info!("expected 8 columns per row in position part of fen: {:?}", placement);
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use crate::fen::is_valid_fen;

    #[test]
    fn starting_position_is_valid() {
        assert!(is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }

    #[test]
    fn arbitrary_positions_are_valid() {
        assert!(is_valid_fen("4k3/R7/1R6/8/8/8/8/4K3 w - - 0 1"));
        assert!(is_valid_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"));
        assert!(is_valid_fen("8/5pB1/1P4P1/1p3q2/BK1pP2P/pQ1pP3/7k/8 w - - 0 1"));
    }

    #[test]
    fn subsequent_digits_are_rejected() {
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/44/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }

    #[test]
    fn wrong_rank_sum_is_rejected() {
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(!is_valid_fen("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }

    #[test]
    fn wrong_rank_count_is_rejected() {
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }

    #[test]
    fn malformed_fields_are_rejected() {
        // side to move
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"));
        // castling rights
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkqX - 0 1"));
        // en passant target
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq a9 0 1"));
        // move counters
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0"));
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"));
        // missing fields
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"));
        assert!(!is_valid_fen(""));
    }

    #[test]
    fn promotion_marker_only_after_piece() {
        assert!(is_valid_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR~ w KQkq - 0 1"));
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/~7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(!is_valid_fen("rnbqkbnr/pppppppp/4~4/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }
}
