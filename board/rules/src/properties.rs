//! Randomized games checking that every rule holds after every move

use quickcheck::quickcheck;

use crate::{
    legality::{revert, simulate},
    Color, GameOutcome, MoveOutcome, PieceKind, Position, Square,
};

/// Play a game in which each byte picks one of the legal moves, calling `check` with the
/// positions before and after every move
///
/// Promotions are resolved right away, also picked by the byte. Stops at the end of the game.
fn play_random(
    choices: &[u8],
    mut check: impl FnMut(&Position, (Square, Square), &Position) -> bool,
) -> bool {
    let mut position = Position::new();
    for &choice in choices {
        let moves = position.all_legal_moves();
        if moves.is_empty() {
            break;
        }
        let (from, to) = moves[choice as usize % moves.len()];
        let before = position.clone();
        let outcome = position.apply_move(from, to);
        if outcome.is_rejected() {
            return false;
        }
        if let MoveOutcome::PromotionPending { square } = outcome {
            if square != to {
                return false;
            }
            let kind = PieceKind::PROMOTIONS[choice as usize % PieceKind::PROMOTIONS.len()];
            if position.resolve_promotion(kind).is_err() {
                return false;
            }
        }
        if !check(&before, (from, to), &position) {
            return false;
        }
    }
    true
}

fn unmoved_count(position: &Position) -> usize {
    position.board().pieces().filter(|piece| !piece.moved).count()
}

quickcheck! {
    fn prop_simulate_revert_is_identity(choices: Vec<u8>) -> bool {
        play_random(&choices, |_, _, after| {
            let mut scratch = after.clone();
            let moves = scratch.all_legal_moves();
            let mut board = after.board().clone();
            moves.into_iter().all(|(from, to)| {
                let undo = simulate(&mut board, from, to, after.en_passant_target());
                revert(&mut board, undo);
                &board == after.board()
            })
        })
    }

    fn prop_mover_never_left_in_check(choices: Vec<u8>) -> bool {
        play_random(&choices, |before, _, after| !after.in_check(before.turn()))
    }

    fn prop_board_stays_consistent(choices: Vec<u8>) -> bool {
        play_random(&choices, |before, (_, to), after| {
            let one_king_each = [Color::White, Color::Black].into_iter().all(|color| {
                after
                    .board()
                    .pieces_of(color)
                    .filter(|piece| piece.kind == PieceKind::King)
                    .count()
                    == 1
            });
            one_king_each
                && after.board().positions_in_sync()
                && after.board().get(to).is_some_and(|piece| piece.moved)
                && unmoved_count(after) <= unmoved_count(before)
                && after.promotion_pending().is_none()
                && after.turn() == before.turn().other()
        })
    }

    fn prop_en_passant_target_lasts_one_move(choices: Vec<u8>) -> bool {
        play_random(&choices, |before, (from, to), after| {
            let double_step = before
                .board()
                .get(from)
                .is_some_and(|piece| piece.kind == PieceKind::Pawn)
                && from.row().abs_diff(to.row()) == 2;
            match after.en_passant_target() {
                Some(target) => {
                    double_step
                        && target == Square::from_row_col((from.row() + to.row()) / 2, from.col())
                        && after.board().is_empty(target)
                }
                None => !double_step,
            }
        })
    }

    fn prop_game_ends_exactly_when_no_moves(choices: Vec<u8>) -> bool {
        play_random(&choices, |before, _, after| {
            let mut after = after.clone();
            let turn = after.turn();
            match after.outcome() {
                Some(GameOutcome::Checkmate { winner }) => {
                    winner == before.turn() && after.is_check() && after.is_checkmate(turn)
                }
                Some(GameOutcome::Stalemate) => !after.is_check() && after.is_stalemate(turn),
                None => !after.is_game_over() && after.has_legal_moves(turn),
            }
        })
    }

    fn prop_sliders_never_jump(choices: Vec<u8>) -> bool {
        play_random(&choices, |before, (from, to), _| {
            let Some(piece) = before.board().get(from) else {
                return false;
            };
            if !piece.kind.is_slider() {
                return true;
            }
            let offset = to.offset_from(from);
            let (rows, cols) = (offset.row().signum(), offset.col().signum());
            let mut square = from.offset(rows, cols);
            while square != to {
                if !before.board().is_empty(square) {
                    return false;
                }
                square = square.offset(rows, cols);
            }
            true
        })
    }

    fn prop_rejected_moves_change_nothing(choices: Vec<u8>, from: u8, to: u8) -> bool {
        let (from, to) = (Square(from & 0x77), Square(to & 0x77));
        let mut position = Position::new();
        play_random(&choices, |_, _, after| {
            position = after.clone();
            true
        });
        if position.all_legal_moves().contains(&(from, to)) {
            return true;
        }
        let before = position.clone();
        position.apply_move(from, to).is_rejected() && position == before
    }
}
