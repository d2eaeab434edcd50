//! Pointer hit-testing and click dispatch.
//!
//! A [`PointerRouter`] holds an ordered list of subscribed nodes. Every
//! motion tick it finds the first subscriber that is clickable and under
//! the pointer, switches the system cursor accordingly, and remembers it as
//! hovered. A click then runs the hovered node's callback.
//!
//! ## Action area
//!
//! A router with a non-empty action area only reacts while the pointer is
//! inside it. Outside, the router is inert: nothing is hovered and clicks
//! report [`ClickOutcome::Inactive`], letting another router take them.
//! An inert router never touches the cursor: the router whose area holds
//! the pointer owns it, so routers with disjoint areas can share one
//! cursor in any order.
//!
//! ## Overlap
//!
//! When subscribers overlap, the one registered first wins, regardless of
//! drawing order.

use log::debug;

use crate::core::{Color, Point, Rect};
use crate::render::{CursorKind, Renderer};
use crate::scene::{NodeId, SceneError, SceneGraph, SceneResult};

/// Result of routing a click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome<M> {
    /// The pointer is outside the router's action area.
    Inactive,
    /// Nothing clickable is hovered.
    Missed,
    /// `node` was clicked; `message` is what its callback returned.
    Dispatched { node: NodeId, message: M },
}

impl<M> ClickOutcome<M> {
    /// Check if the click was consumed by a node.
    #[must_use]
    pub fn is_dispatched(&self) -> bool {
        matches!(self, ClickOutcome::Dispatched { .. })
    }

    /// The callback's message, if the click was dispatched.
    #[must_use]
    pub fn into_message(self) -> Option<M> {
        match self {
            ClickOutcome::Dispatched { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Routes pointer motion and clicks to a set of scene nodes.
///
/// Subscribers are not owned; a destroyed node should be unsubscribed, and
/// stale ids are skipped until then.
#[derive(Clone, Debug)]
pub struct PointerRouter {
    name: String,
    subscribers: Vec<NodeId>,
    hovered: Option<NodeId>,
    action_area: Rect,
    highlight: Option<Color>,
    active: bool,
}

impl PointerRouter {
    /// Create a router that is live everywhere and draws no highlight.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: Vec::new(),
            hovered: None,
            action_area: Rect::EMPTY,
            highlight: None,
            active: true,
        }
    }

    /// Restrict the router to a viewport area.
    #[must_use]
    pub fn with_action_area(mut self, area: Rect) -> Self {
        self.action_area = area;
        self
    }

    /// Outline the hovered node in `color`.
    #[must_use]
    pub fn with_highlight(mut self, color: Color) -> Self {
        self.highlight = Some(color);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn action_area(&self) -> Rect {
        self.action_area
    }

    pub fn set_action_area(&mut self, area: Rect) {
        self.action_area = area;
    }

    #[must_use]
    pub fn highlight_color(&self) -> Option<Color> {
        self.highlight
    }

    /// Whether the last motion tick found the pointer in the action area.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    #[must_use]
    pub fn subscribers(&self) -> &[NodeId] {
        &self.subscribers
    }

    #[must_use]
    pub fn is_subscribed(&self, node: NodeId) -> bool {
        self.subscribers.contains(&node)
    }

    /// Subscribe a node. Returns false if it already was.
    pub fn add_subscriber(&mut self, node: NodeId) -> bool {
        if self.is_subscribed(node) {
            return false;
        }
        self.subscribers.push(node);
        true
    }

    /// Unsubscribe a node, clearing the hover if it pointed there.
    pub fn remove_subscriber(&mut self, node: NodeId) -> SceneResult<()> {
        let index = self
            .subscribers
            .iter()
            .position(|n| *n == node)
            .ok_or(SceneError::NotSubscribed(node))?;
        self.subscribers.remove(index);
        if self.hovered == Some(node) {
            self.hovered = None;
        }
        Ok(())
    }

    /// Drop every subscriber.
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
        self.hovered = None;
    }

    /// Update hover state for a pointer position.
    ///
    /// Sets the `Hand` cursor while something is hovered. Restores the
    /// `Arrow` when the hover is lost or when the pointer enters the action
    /// area over nothing. Returns the hovered node.
    pub fn motion<M, R: Renderer + ?Sized>(
        &mut self,
        graph: &SceneGraph<M>,
        pointer: Point,
        renderer: &mut R,
    ) -> Option<NodeId> {
        if !self.action_area.is_empty() && !self.action_area.contains(pointer) {
            self.active = false;
            self.hovered = None;
            return None;
        }
        let entered = !self.active;
        self.active = true;

        let hit = self.subscribers.iter().copied().find(|&node| {
            graph.is_clickable(node) && graph.global_rect(node).is_some_and(|rect| rect.contains(pointer))
        });
        match hit {
            Some(node) => {
                if self.hovered != Some(node) {
                    debug!("[{}] Hovering '{}'", self.name, graph.name(node));
                }
                renderer.set_cursor(CursorKind::Hand);
            }
            None => {
                if self.hovered.is_some() || entered {
                    renderer.set_cursor(CursorKind::Arrow);
                }
            }
        }
        self.hovered = hit;
        hit
    }

    /// Outline the hovered node, if highlighting is enabled.
    pub fn highlight_hovered<M, R: Renderer + ?Sized>(
        &self,
        graph: &SceneGraph<M>,
        renderer: &mut R,
    ) -> SceneResult<()> {
        match (self.highlight, self.hovered) {
            (Some(color), Some(node)) if graph.contains(node) => graph.highlight(renderer, node, color),
            _ => Ok(()),
        }
    }

    /// Route a click to the hovered node.
    #[must_use]
    pub fn click<M>(&self, graph: &SceneGraph<M>) -> ClickOutcome<M> {
        if !self.active {
            return ClickOutcome::Inactive;
        }
        let Some(node) = self.hovered else {
            return ClickOutcome::Missed;
        };
        match graph.dispatch_click(node) {
            Some(message) => {
                debug!("[{}] Click on '{}'", self.name, graph.name(node));
                ClickOutcome::Dispatched { node, message }
            }
            None => ClickOutcome::Missed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;

    fn button(graph: &mut SceneGraph<&'static str>, name: &'static str, rect: Rect) -> NodeId {
        let root = graph.root();
        let id = graph.create_node(name, rect);
        graph.add_child(root, id).unwrap();
        graph.set_on_click(id, move |_, _| name).unwrap();
        id
    }

    fn setup() -> (SceneGraph<&'static str>, HeadlessRenderer) {
        (SceneGraph::new(Rect::new(0, 0, 800, 600)), HeadlessRenderer::new(800, 600))
    }

    #[test]
    fn test_hover_sets_cursor() {
        let (mut graph, mut renderer) = setup();
        let ok = button(&mut graph, "ok", Rect::new(10, 10, 50, 20));
        let mut router = PointerRouter::new("buttons");
        router.add_subscriber(ok);

        assert_eq!(router.motion(&graph, Point::new(20, 20), &mut renderer), Some(ok));
        assert_eq!(renderer.cursor(), CursorKind::Hand);

        assert_eq!(router.motion(&graph, Point::new(200, 200), &mut renderer), None);
        assert_eq!(renderer.cursor(), CursorKind::Arrow);
        assert_eq!(renderer.cursor_changes(), 2);
    }

    #[test]
    fn test_first_registered_wins() {
        let (mut graph, mut renderer) = setup();
        let under = button(&mut graph, "under", Rect::new(0, 0, 100, 100));
        let over = button(&mut graph, "over", Rect::new(10, 10, 20, 20));
        let mut router = PointerRouter::new("cards");
        router.add_subscriber(under);
        router.add_subscriber(over);

        router.motion(&graph, Point::new(15, 15), &mut renderer);
        assert_eq!(router.hovered(), Some(under));
        assert_eq!(router.click(&graph), ClickOutcome::Dispatched { node: under, message: "under" });
    }

    #[test]
    fn test_unclickable_nodes_are_skipped() {
        let (mut graph, mut renderer) = setup();
        let under = button(&mut graph, "under", Rect::new(0, 0, 100, 100));
        let over = button(&mut graph, "over", Rect::new(10, 10, 20, 20));
        graph.set_clickable(under, false).unwrap();
        let mut router = PointerRouter::new("cards");
        router.add_subscriber(under);
        router.add_subscriber(over);

        assert_eq!(router.motion(&graph, Point::new(15, 15), &mut renderer), Some(over));

        graph.set_visible(over, false).unwrap();
        assert_eq!(router.motion(&graph, Point::new(15, 15), &mut renderer), None);
    }

    #[test]
    fn test_action_area_makes_router_inert() {
        let (mut graph, mut renderer) = setup();
        let card = button(&mut graph, "card", Rect::new(10, 10, 50, 50));
        let mut router = PointerRouter::new("cards").with_action_area(Rect::new(0, 0, 640, 600));
        router.add_subscriber(card);

        router.motion(&graph, Point::new(20, 20), &mut renderer);
        assert!(router.is_active());
        assert_eq!(renderer.cursor(), CursorKind::Hand);

        router.motion(&graph, Point::new(700, 20), &mut renderer);
        assert!(!router.is_active());
        assert_eq!(router.hovered(), None);
        assert_eq!(router.click(&graph), ClickOutcome::Inactive);

        router.motion(&graph, Point::new(300, 300), &mut renderer);
        assert!(router.is_active());
        assert_eq!(renderer.cursor(), CursorKind::Arrow);
    }

    #[test]
    fn test_inert_router_leaves_cursor_alone() {
        let (mut graph, mut renderer) = setup();
        let card = button(&mut graph, "card", Rect::new(10, 10, 50, 50));
        let mut router = PointerRouter::new("cards").with_action_area(Rect::new(0, 0, 100, 100));
        router.add_subscriber(card);

        router.motion(&graph, Point::new(20, 20), &mut renderer);
        assert_eq!(renderer.cursor(), CursorKind::Hand);
        let changes = renderer.cursor_changes();

        router.motion(&graph, Point::new(500, 500), &mut renderer);
        assert_eq!(renderer.cursor(), CursorKind::Hand);
        assert_eq!(renderer.cursor_changes(), changes);
    }

    #[test]
    fn test_action_area_can_move() {
        let (mut graph, mut renderer) = setup();
        let card = button(&mut graph, "card", Rect::new(210, 10, 50, 50));
        let mut router = PointerRouter::new("cards").with_action_area(Rect::new(0, 0, 100, 100));
        router.add_subscriber(card);

        assert_eq!(router.motion(&graph, Point::new(220, 20), &mut renderer), None);
        assert!(!router.is_active());

        router.set_action_area(Rect::new(200, 0, 100, 100));
        assert_eq!(router.action_area(), Rect::new(200, 0, 100, 100));
        assert_eq!(router.motion(&graph, Point::new(220, 20), &mut renderer), Some(card));
        assert!(router.click(&graph).is_dispatched());
    }

    #[test]
    fn test_click_without_hover_misses() {
        let (mut graph, mut renderer) = setup();
        let ok = button(&mut graph, "ok", Rect::new(10, 10, 50, 20));
        let mut router = PointerRouter::new("buttons");
        router.add_subscriber(ok);

        router.motion(&graph, Point::new(500, 500), &mut renderer);
        assert_eq!(router.click(&graph), ClickOutcome::Missed);
    }

    #[test]
    fn test_click_on_destroyed_node_misses() {
        let (mut graph, mut renderer) = setup();
        let ok = button(&mut graph, "ok", Rect::new(10, 10, 50, 20));
        let mut router = PointerRouter::new("buttons");
        router.add_subscriber(ok);
        router.motion(&graph, Point::new(20, 20), &mut renderer);

        graph.destroy(&mut renderer, ok).unwrap();
        assert_eq!(router.click(&graph), ClickOutcome::Missed);
    }

    #[test]
    fn test_subscription_management() {
        let (mut graph, _) = setup();
        let ok = button(&mut graph, "ok", Rect::new(10, 10, 50, 20));
        let mut router = PointerRouter::new("buttons");

        assert!(router.add_subscriber(ok));
        assert!(!router.add_subscriber(ok));
        assert_eq!(router.subscribers().len(), 1);

        router.remove_subscriber(ok).unwrap();
        assert_eq!(router.remove_subscriber(ok), Err(SceneError::NotSubscribed(ok)));
    }

    #[test]
    fn test_highlight_hovered() {
        let (mut graph, mut renderer) = setup();
        let ok = button(&mut graph, "ok", Rect::new(10, 10, 50, 20));
        let mut router = PointerRouter::new("buttons").with_highlight(Color::WHITE);
        router.add_subscriber(ok);
        assert_eq!(router.highlight_color(), Some(Color::WHITE));
        assert_eq!(PointerRouter::new("plain").highlight_color(), None);

        router.highlight_hovered(&graph, &mut renderer).unwrap();
        assert_eq!(renderer.drawn_rectangles().count(), 0);

        router.motion(&graph, Point::new(20, 20), &mut renderer);
        router.highlight_hovered(&graph, &mut renderer).unwrap();
        assert_eq!(
            renderer.drawn_rectangles().collect::<Vec<_>>(),
            vec![(Rect::new(10, 10, 50, 20), Color::WHITE)]
        );
    }
}
