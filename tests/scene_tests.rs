//! Scene graph and pointer router integration tests.
//!
//! These tests drive the graph and routers together through the headless
//! renderer, checking structure, visibility, texture lifetimes and cursor
//! feedback.

use memory_match::cards::{CardFace, CardState, Rank, Suit};
use memory_match::core::{Color, Point, Rect, Size};
use memory_match::input::{ClickOutcome, PointerRouter};
use memory_match::render::{CursorKind, HeadlessRenderer, Renderer};
use memory_match::scene::{NodeId, RemovePolicy, SceneError, SceneGraph};
use proptest::prelude::*;
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (SceneGraph<u32>, HeadlessRenderer) {
    init_logging();
    (SceneGraph::new(Rect::new(0, 0, 1000, 600)), HeadlessRenderer::new(1000, 600))
}

// =============================================================================
// Structure Tests
// =============================================================================

/// Test that a removed and detached subtree can be re-parented intact.
#[test]
fn test_detach_and_reattach_subtree() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let left = graph.create_node("left", Rect::new(0, 0, 500, 600));
    let right = graph.create_node("right", Rect::new(500, 0, 500, 600));
    let group = graph.create_node("group", Rect::new(10, 10, 100, 100));
    let leaf = graph.create_node("leaf", Rect::new(5, 5, 10, 10));
    for (parent, child) in [(root, left), (root, right), (left, group), (group, leaf)] {
        graph.add_child(parent, child).unwrap();
    }

    graph.remove_child_named(&mut renderer, left, "group", RemovePolicy::Detach).unwrap();
    assert!(!graph.is_attached(leaf));
    assert_eq!(graph.global_rect(leaf), Some(Rect::new(15, 15, 10, 10)));

    graph.add_child(right, group).unwrap();
    assert!(graph.is_attached(leaf));
    assert_eq!(graph.global_rect(leaf), Some(Rect::new(515, 15, 10, 10)));
    assert_eq!(graph.find_child(root, "leaf", true), Some(leaf));
}

/// Test that removing a child from the wrong parent is reported and harmless.
#[test]
fn test_remove_from_wrong_parent() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let a = graph.create_node("a", Rect::EMPTY);
    let b = graph.create_node("b", Rect::EMPTY);
    graph.add_child(root, a).unwrap();
    graph.add_child(root, b).unwrap();

    let err = graph.remove_child(&mut renderer, a, b, RemovePolicy::Destroy).unwrap_err();
    assert_eq!(
        err,
        SceneError::ChildNotFound {
            parent: "a".into(),
            child: "b".into()
        }
    );
    assert!(graph.is_attached(b));
}

/// Test that stale ids are rejected instead of silently ignored.
#[test]
fn test_stale_ids() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let gone = graph.create_node("gone", Rect::EMPTY);
    graph.destroy(&mut renderer, gone).unwrap();

    assert_eq!(graph.add_child(root, gone), Err(SceneError::StaleNode(gone)));
    assert_eq!(graph.destroy(&mut renderer, gone), Err(SceneError::StaleNode(gone)));
    assert!(!graph.is_visible(gone));
    assert_eq!(graph.global_rect(gone), None);
}

// =============================================================================
// Texture Ownership Tests
// =============================================================================

/// Test that destroying a board of cards frees every front exactly once and
/// leaves the shared back alive.
#[test]
fn test_card_textures_freed_once() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let sheet = renderer.load_image(Path::new("cards.bmp")).unwrap();
    let back = renderer.crop_texture(sheet, CardFace::back().sprite_cell(Size::new(69, 94))).unwrap();
    graph.textures_mut().share(back);

    let board = graph.create_node("board", Rect::new(0, 0, 800, 600));
    graph.add_child(root, board).unwrap();
    let mut fronts = Vec::new();
    for (i, rank) in [Rank::Ace, Rank::Two, Rank::King].into_iter().enumerate() {
        let face = CardFace::new(Suit::Spades, rank);
        let front = renderer.crop_texture(sheet, face.sprite_cell(Size::new(69, 94))).unwrap();
        fronts.push(front);
        let card = graph.create_card(
            format!("{}_1", face.name()),
            Rect::new(i as i32 * 100, 0, 69, 94),
            CardState::new(face, Some(front), Some(back)),
        );
        graph.add_child(board, card).unwrap();
        graph.flip_card(card).unwrap();
    }

    let freed_before = renderer.freed();
    graph.remove_child(&mut renderer, root, board, RemovePolicy::Destroy).unwrap();

    assert_eq!(renderer.freed() - freed_before, 3);
    assert!(fronts.iter().all(|f| !renderer.is_live(*f)));
    assert!(renderer.is_live(back));
    assert_eq!(renderer.double_frees(), 0);
}

// =============================================================================
// Rendering Tests
// =============================================================================

/// Test that one broken texture does not stop the rest of the frame.
#[test]
fn test_render_continues_after_failure() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let panel = graph.create_node("panel", Rect::new(100, 0, 300, 300));
    graph.add_child(root, panel).unwrap();
    let mut textures = Vec::new();
    for name in ["one", "two", "three"] {
        let text = graph.create_text(&mut renderer, name, 0, 0, name, Color::WHITE, None);
        graph.add_child(panel, text).unwrap();
        textures.push(graph.node(text).unwrap().texture().unwrap());
    }
    renderer.fail_draw(textures[1]);

    let err = graph.render(&mut renderer, root).unwrap_err();
    assert!(matches!(err, SceneError::Render { failures: 1, .. }));
    assert_eq!(renderer.drawn_textures().collect::<Vec<_>>(), vec![textures[0], textures[2]]);
}

// =============================================================================
// Router Tests
// =============================================================================

fn clickable(graph: &mut SceneGraph<u32>, parent: NodeId, name: &str, rect: Rect, message: u32) -> NodeId {
    let id = graph.create_node(name, rect);
    graph.add_child(parent, id).unwrap();
    graph.set_on_click(id, move |_, _| message).unwrap();
    id
}

/// Test two routers over disjoint areas sharing one cursor.
#[test]
fn test_two_routers_share_cursor() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let board = graph.create_node("board", Rect::new(0, 0, 800, 600));
    let menu = graph.create_node("menu", Rect::new(800, 0, 200, 600));
    graph.add_child(root, board).unwrap();
    graph.add_child(root, menu).unwrap();
    let card = clickable(&mut graph, board, "card", Rect::new(100, 100, 69, 94), 1);
    let button = clickable(&mut graph, menu, "button", Rect::new(50, 60, 80, 20), 2);

    let mut cards = PointerRouter::new("cards").with_action_area(Rect::new(0, 0, 800, 600));
    let mut buttons = PointerRouter::new("buttons").with_action_area(Rect::new(800, 0, 200, 600));
    cards.add_subscriber(card);
    buttons.add_subscriber(button);

    let mut tick = |pointer: Point, renderer: &mut HeadlessRenderer| {
        cards.motion(&graph, pointer, renderer);
        buttons.motion(&graph, pointer, renderer);
        (cards.click(&graph), buttons.click(&graph))
    };

    let (on_card, off_menu) = tick(Point::new(120, 120), &mut renderer);
    assert_eq!(on_card, ClickOutcome::Dispatched { node: card, message: 1 });
    assert_eq!(off_menu, ClickOutcome::Inactive);
    assert_eq!(renderer.cursor(), CursorKind::Hand);

    let (off_board, on_button) = tick(Point::new(860, 70), &mut renderer);
    assert_eq!(off_board, ClickOutcome::Inactive);
    assert_eq!(on_button, ClickOutcome::Dispatched { node: button, message: 2 });
    assert_eq!(renderer.cursor(), CursorKind::Hand);

    let (_, missed) = tick(Point::new(900, 500), &mut renderer);
    assert_eq!(missed, ClickOutcome::Missed);
    assert_eq!(renderer.cursor(), CursorKind::Arrow);

    // Straight from a button onto a card: the menu router must not undo the hand.
    tick(Point::new(860, 70), &mut renderer);
    let (on_card, _) = tick(Point::new(120, 120), &mut renderer);
    assert!(on_card.is_dispatched());
    assert_eq!(renderer.cursor(), CursorKind::Hand);

    // From a card onto empty menu space.
    tick(Point::new(900, 500), &mut renderer);
    assert_eq!(renderer.cursor(), CursorKind::Arrow);

    // From a button onto empty board space.
    tick(Point::new(860, 70), &mut renderer);
    tick(Point::new(500, 500), &mut renderer);
    assert_eq!(renderer.cursor(), CursorKind::Arrow);
}

/// Test that hiding a parent makes its subscribed children unreachable.
#[test]
fn test_hidden_parent_blocks_clicks() {
    let (mut graph, mut renderer) = setup();
    let root = graph.root();
    let menu = graph.create_node("menu", Rect::new(800, 0, 200, 600));
    graph.add_child(root, menu).unwrap();
    let button = clickable(&mut graph, menu, "button", Rect::new(0, 0, 100, 100), 9);
    let mut router = PointerRouter::new("buttons");
    router.add_subscriber(button);

    graph.set_visible(menu, false).unwrap();
    assert_eq!(router.motion(&graph, Point::new(850, 50), &mut renderer), None);
    assert_eq!(router.click(&graph), ClickOutcome::Missed);

    graph.set_visible(menu, true).unwrap();
    assert_eq!(router.motion(&graph, Point::new(850, 50), &mut renderer), Some(button));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Effective visibility is the conjunction of the flags up to the root.
    #[test]
    fn prop_visibility_follows_ancestors(
        parents in prop::collection::vec(0usize..100, 1..20),
        flags in prop::collection::vec(any::<bool>(), 20),
    ) {
        let mut graph: SceneGraph<u32> = SceneGraph::new(Rect::new(0, 0, 100, 100));
        let mut ids = vec![graph.root()];
        let mut parent_index = vec![None];
        for (i, p) in parents.iter().enumerate() {
            let parent = p % ids.len();
            let id = graph.create_node(format!("n{}", i), Rect::EMPTY);
            graph.add_child(ids[parent], id).unwrap();
            graph.set_visible(id, flags[i]).unwrap();
            ids.push(id);
            parent_index.push(Some(parent));
        }

        for (i, &id) in ids.iter().enumerate() {
            let mut expected = true;
            let mut cursor = Some(i);
            while let Some(c) = cursor {
                if c > 0 && !flags[c - 1] {
                    expected = false;
                }
                cursor = parent_index[c];
            }
            prop_assert_eq!(graph.is_visible(id), expected);
        }
    }

    /// Arbitrary attach sequences never create cycles or duplicate children.
    #[test]
    fn prop_add_child_keeps_a_forest(ops in prop::collection::vec((0usize..8, 0usize..8), 0..40)) {
        let mut graph: SceneGraph<u32> = SceneGraph::new(Rect::new(0, 0, 100, 100));
        let ids: Vec<NodeId> = (0..8).map(|i| graph.create_node(format!("n{}", i), Rect::EMPTY)).collect();
        for (parent, child) in ops {
            let _ = graph.add_child(ids[parent], ids[child]);
        }

        for &id in &ids {
            if let Some(parent) = graph.node(id).unwrap().parent() {
                let count = graph.children(parent).iter().filter(|c| **c == id).count();
                prop_assert_eq!(count, 1);
            }
            let mut steps = 0;
            let mut cursor = graph.node(id).unwrap().parent();
            while let Some(p) = cursor {
                steps += 1;
                prop_assert!(steps <= ids.len(), "cycle above {:?}", id);
                cursor = graph.node(p).unwrap().parent();
            }
        }
    }
}
