//! Random non-overlapping card placement.

use log::debug;

use super::error::LayoutError;
use crate::core::{GameRng, Rect, Size};

/// Pick a board-relative spot for a `card` that intersects none of `placed`.
///
/// Candidates are drawn uniformly with `x` in `[0, board.w - card.w)` and `y`
/// in `[0, board.h - card.h)`, so cards stay inside the board. Each rejected
/// candidate counts as one attempt; after `max_attempts` the board is
/// considered full.
pub fn random_destination(
    rng: &mut GameRng,
    card: Size,
    board: Size,
    placed: &[Rect],
    max_attempts: u32,
) -> Result<Rect, LayoutError> {
    let max_x = board.w - card.w;
    let max_y = board.h - card.h;
    if card.w <= 0 || card.h <= 0 || max_x <= 0 || max_y <= 0 {
        return Err(LayoutError::BoardTooSmall { board, card });
    }

    for attempt in 1..=max_attempts {
        let candidate = Rect::new(rng.gen_range(0..max_x), rng.gen_range(0..max_y), card.w, card.h);
        if !placed.iter().any(|rect| rect.intersects(&candidate)) {
            if attempt > 1 {
                debug!("[Layout] Placed card {} after {} attempts", placed.len() + 1, attempt);
            }
            return Ok(candidate);
        }
    }
    Err(LayoutError::Exhausted {
        attempts: max_attempts,
        placed: placed.len(),
    })
}

/// Place `count` cards one after the other.
///
/// Either every card gets a spot or nothing is returned.
pub fn layout_cards(
    rng: &mut GameRng,
    card: Size,
    board: Size,
    count: usize,
    max_attempts: u32,
) -> Result<Vec<Rect>, LayoutError> {
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let rect = random_destination(rng, card, board, &placed, max_attempts)?;
        placed.push(rect);
    }
    Ok(placed)
}

/// Share of the board that random placement can reliably cover.
pub const BOARD_FILL: f64 = 0.45;

/// Most pairs whose cards fit on `board` by random placement.
///
/// Sequential random placement jams well before the board is full, so the
/// cards may cover at most [`BOARD_FILL`] of it.
#[must_use]
pub fn pair_capacity(card: Size, board: Size) -> usize {
    if card.w <= 0 || card.h <= 0 || board.w < card.w || board.h < card.h {
        return 0;
    }
    let board_area = f64::from(board.w) * f64::from(board.h);
    let pair_area = 2.0 * f64::from(card.w) * f64::from(card.h);
    (board_area * BOARD_FILL / pair_area) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: Size = Size::new(69, 94);

    #[test]
    fn test_stays_on_board() {
        let mut rng = GameRng::new(42);
        let board = Size::new(1024, 768);
        for _ in 0..100 {
            let rect = random_destination(&mut rng, CARD, board, &[], 10).unwrap();
            assert!(rect.x >= 0 && rect.right() < board.w);
            assert!(rect.y >= 0 && rect.bottom() < board.h);
            assert_eq!(rect.size(), CARD);
        }
    }

    #[test]
    fn test_no_overlap() {
        let mut rng = GameRng::new(7);
        let rects = layout_cards(&mut rng, CARD, Size::new(1024, 768), 40, 10_000).unwrap();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn test_board_too_small() {
        let mut rng = GameRng::new(1);
        let err = random_destination(&mut rng, CARD, Size::new(69, 500), &[], 10).unwrap_err();
        assert!(matches!(err, LayoutError::BoardTooSmall { .. }));
    }

    #[test]
    fn test_exhausted_when_full() {
        let mut rng = GameRng::new(1);
        let board = Size::new(100, 120);
        let err = layout_cards(&mut rng, CARD, board, 2, 500).unwrap_err();
        assert_eq!(err, LayoutError::Exhausted { attempts: 500, placed: 1 });
    }

    #[test]
    fn test_pair_capacity() {
        assert_eq!(pair_capacity(CARD, Size::new(800, 600)), 16);
        assert_eq!(pair_capacity(CARD, Size::new(1024, 720)), 25);
        assert_eq!(pair_capacity(CARD, Size::new(60, 600)), 0);
        assert_eq!(pair_capacity(Size::new(0, 94), Size::new(800, 600)), 0);
    }

    #[test]
    fn test_capacity_can_be_laid_out() {
        let board = Size::new(800, 600);
        let pairs = pair_capacity(CARD, board);
        let rects = layout_cards(&mut GameRng::new(3), CARD, board, pairs * 2, 10_000).unwrap();
        assert_eq!(rects.len(), pairs * 2);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let board = Size::new(800, 600);
        let a = layout_cards(&mut GameRng::new(99), CARD, board, 10, 1000).unwrap();
        let b = layout_cards(&mut GameRng::new(99), CARD, board, 10, 1000).unwrap();
        assert_eq!(a, b);
    }
}
