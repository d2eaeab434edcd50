//! Scene nodes.

use slotmap::new_key_type;
use smallvec::SmallVec;
use std::rc::Rc;

use super::payload::{NodeKind, ScoreTrack, TextContent};
use crate::cards::CardState;
use crate::core::Rect;
use crate::render::TextureId;

new_key_type! {
    /// Stable handle of a node in a [`SceneGraph`](super::SceneGraph).
    pub struct NodeId;
}

/// Click handler stored on a node.
///
/// Called with the node's id and the node itself; its return value is
/// handed back to whoever routed the click. Handlers are reference counted
/// so many nodes can share one (every card uses the board's handler).
pub type ClickCallback<M> = Rc<dyn Fn(NodeId, &SceneNode<M>) -> M>;

/// Click capability of a node.
pub struct Clickable<M> {
    clickable: bool,
    callback: Option<ClickCallback<M>>,
}

impl<M> Clickable<M> {
    /// No callback, not clickable.
    #[must_use]
    pub fn none() -> Self {
        Self {
            clickable: false,
            callback: None,
        }
    }

    /// Clickable only when both the flag is set and a callback exists.
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.clickable && self.callback.is_some()
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub(crate) fn set_clickable(&mut self, clickable: bool) {
        self.clickable = clickable;
    }

    pub(crate) fn set_callback(&mut self, callback: Option<ClickCallback<M>>) {
        self.callback = callback;
    }

    pub(crate) fn callback(&self) -> Option<&ClickCallback<M>> {
        self.callback.as_ref()
    }
}

impl<M> Default for Clickable<M> {
    fn default() -> Self {
        Self::none()
    }
}

/// One node of the scene tree.
///
/// Geometry is parent-relative. Nodes are created, linked and destroyed
/// through their [`SceneGraph`](super::SceneGraph); this type only exposes
/// read access.
pub struct SceneNode<M> {
    pub(crate) name: String,
    pub(crate) rect: Rect,
    pub(crate) texture: Option<TextureId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) visible: bool,
    pub(crate) click: Clickable<M>,
    pub(crate) kind: NodeKind,
}

impl<M> SceneNode<M> {
    pub(crate) fn new(name: impl Into<String>, rect: Rect, texture: Option<TextureId>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            rect,
            texture,
            parent: None,
            children: SmallVec::new(),
            visible: true,
            click: Clickable::none(),
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent-relative rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.rect.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.rect.y
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.rect.w
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.rect.h
    }

    /// Texture currently displayed.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node's own visibility flag, ignoring ancestors.
    ///
    /// Use [`SceneGraph::is_visible`](super::SceneGraph::is_visible) for the
    /// effective value.
    #[must_use]
    pub fn visible_flag(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn click(&self) -> &Clickable<M> {
        &self.click
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn card(&self) -> Option<&CardState> {
        match &self.kind {
            NodeKind::Card(card) => Some(card),
            _ => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> Option<&ScoreTrack> {
        match &self.kind {
            NodeKind::Score(track) => Some(track),
            _ => None,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&TextContent> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl<M> std::fmt::Debug for SceneNode<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("texture", &self.texture)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("visible", &self.visible)
            .field("clickable", &self.click.is_clickable())
            .field("kind", &self.kind)
            .finish()
    }
}
