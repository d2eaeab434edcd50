//! Layout, dealing and configuration integration tests.

use memory_match::cards::{pick_faces, DeckError};
use memory_match::core::{GameRng, MemoryConfig, Rect, Size};
use memory_match::game::{layout_cards, random_destination, LayoutError};
use proptest::prelude::*;
use std::path::Path;

const CARD: Size = Size::new(69, 94);

// =============================================================================
// Layout Tests
// =============================================================================

/// Test that the deal and layout streams of one seed are independent.
#[test]
fn test_context_streams_are_independent() {
    let base = GameRng::new(5);
    let mut deal = base.for_context("deal");
    let mut layout = base.for_context("layout");

    let faces = pick_faces(&mut deal, 10).unwrap();
    let spots = layout_cards(&mut layout, CARD, Size::new(800, 600), 20, 10_000).unwrap();

    let mut deal_again = GameRng::new(5).for_context("deal");
    assert_eq!(pick_faces(&mut deal_again, 10).unwrap(), faces);
    assert_eq!(spots.len(), 20);
}

/// Test that a crowded board reports exhaustion instead of looping.
#[test]
fn test_crowded_board_is_bounded() {
    let mut rng = GameRng::new(11);
    let placed: Vec<Rect> = (0..8)
        .flat_map(|x| (0..6).map(move |y| Rect::new(x * 100, y * 100, 100, 100)))
        .collect();

    let err = random_destination(&mut rng, CARD, Size::new(800, 600), &placed, 1_000).unwrap_err();
    assert_eq!(err, LayoutError::Exhausted { attempts: 1_000, placed: 48 });
}

/// Test that a full deck deals 52 distinct faces and no more.
#[test]
fn test_full_deck() {
    let mut rng = GameRng::new(3);
    let mut faces = pick_faces(&mut rng, 52).unwrap();
    faces.sort_by_key(|f| f.key());
    faces.dedup();
    assert_eq!(faces.len(), 52);

    assert!(matches!(pick_faces(&mut rng, 53), Err(DeckError::TooManyPairs { requested: 53 })));
}

// =============================================================================
// Configuration Tests
// =============================================================================

/// Test that a configuration survives a JSON round trip and still validates.
#[test]
fn test_config_json() {
    let config = MemoryConfig::new()
        .with_pair_range(4, 30)
        .with_initial_pairs(12)
        .with_players(2)
        .with_font("res/font.ttf", 24)
        .with_assets("assets/sheet.bmp", "assets/felt.bmp")
        .with_timer_interval(250)
        .with_seed(9);

    let json = serde_json::to_string_pretty(&config).unwrap();
    let back: MemoryConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
    assert!(back.validate().is_ok());
    assert_eq!(back.record_slots(), 27);
    assert_eq!(back.sprite_sheet, Path::new("assets/sheet.bmp"));
    assert_eq!(back.background, Path::new("assets/felt.bmp"));
    assert_eq!(back.timer_interval_ms, 250);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Placed cards stay on the board and never overlap.
    #[test]
    fn prop_layout_is_disjoint(seed in any::<u64>(), count in 1usize..30) {
        let board = Size::new(1024, 768);
        let mut rng = GameRng::new(seed);
        let spots = layout_cards(&mut rng, CARD, board, count, 100_000).unwrap();

        for (i, a) in spots.iter().enumerate() {
            prop_assert!(a.x >= 0 && a.y >= 0);
            prop_assert!(a.right() < board.w && a.bottom() < board.h);
            for b in &spots[i + 1..] {
                prop_assert!(!a.intersects(b));
            }
        }
    }

    /// Dealt faces are distinct and never the card back.
    #[test]
    fn prop_faces_are_distinct(seed in any::<u64>(), pairs in 1usize..=52) {
        let mut rng = GameRng::new(seed);
        let faces = pick_faces(&mut rng, pairs).unwrap();
        prop_assert_eq!(faces.len(), pairs);

        let mut keys: Vec<u32> = faces.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        prop_assert_eq!(keys.len(), pairs);
        prop_assert!(faces.iter().all(|f| f.rank.is_playable()));
    }
}
