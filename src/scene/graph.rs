//! The scene tree.
//!
//! Nodes live in a [`SlotMap`] arena owned by [`SceneGraph`]; links between
//! them are [`NodeId`] handles. The graph owns the tree structure, node
//! lifetime and the [`TextureRegistry`] that decides which textures a node
//! frees when it is destroyed.
//!
//! ## Structure rules
//!
//! - Every node has at most one parent and appears at most once in that
//!   parent's child list.
//! - A node is never its own ancestor; `add_child` rejects cycles.
//! - The root has no parent and cannot be attached or destroyed.
//! - Destroying a node destroys its whole subtree and frees the textures the
//!   subtree exclusively owns. Shared textures (the card back, the sprite
//!   sheet) are left to their registrant.
//!
//! ## Coordinates
//!
//! Node rectangles are relative to the parent. [`SceneGraph::global_rect`]
//! sums the offsets of every ancestor.

use log::{debug, error, warn};
use slotmap::SlotMap;
use std::rc::Rc;

use super::error::{SceneError, SceneResult};
use super::node::{ClickCallback, NodeId, SceneNode};
use super::payload::{NodeKind, ScoreTrack, TextContent};
use crate::cards::CardState;
use crate::core::{Color, Rect};
use crate::render::{FontId, Ownership, Renderer, TextureId, TextureRegistry};

/// What `remove_child` does with the removed subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovePolicy {
    /// Destroy the subtree and free its exclusive textures.
    Destroy,
    /// Unlink the subtree and keep it alive, detached.
    Detach,
}

/// Retained-mode scene tree of nodes carrying click messages of type `M`.
pub struct SceneGraph<M> {
    nodes: SlotMap<NodeId, SceneNode<M>>,
    root: NodeId,
    textures: TextureRegistry,
}

impl<M> SceneGraph<M> {
    /// Create a graph whose root covers `viewport`.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root", viewport, None, NodeKind::Plain));
        Self {
            nodes,
            root,
            textures: TextureRegistry::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, the root is never destroyed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode<M>> {
        self.nodes.get(id)
    }

    /// Name of a node, or `"?"` for a stale id.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.nodes.get(id).map_or("?", |n| n.name.as_str())
    }

    /// Child ids of a node, empty for a stale id.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    #[must_use]
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureRegistry {
        &mut self.textures
    }

    fn get(&self, id: NodeId) -> SceneResult<&SceneNode<M>> {
        self.nodes.get(id).ok_or(SceneError::StaleNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode<M>> {
        self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    fn insert(&mut self, node: SceneNode<M>) -> NodeId {
        if let Some(texture) = node.texture {
            if !self.textures.contains(texture) {
                self.textures.adopt(texture);
            }
        }
        self.nodes.insert(node)
    }

    /// Create a detached node with no texture.
    pub fn create_node(&mut self, name: impl Into<String>, rect: Rect) -> NodeId {
        self.insert(SceneNode::new(name, rect, None, NodeKind::Plain))
    }

    /// Create a detached node displaying `texture`.
    ///
    /// A texture not yet in the registry becomes exclusively owned by the
    /// node; a registered one keeps its ownership.
    pub fn create_image(&mut self, name: impl Into<String>, rect: Rect, texture: TextureId) -> NodeId {
        self.insert(SceneNode::new(name, rect, Some(texture), NodeKind::Plain))
    }

    /// Create a detached card node showing its current side.
    ///
    /// An unregistered front becomes exclusive to the card. The back is
    /// expected to be registered as shared by the caller.
    pub fn create_card(&mut self, name: impl Into<String>, rect: Rect, card: CardState) -> NodeId {
        if let Some(front) = card.front() {
            if !self.textures.contains(front) {
                self.textures.adopt(front);
            }
        }
        let displayed = card.displayed();
        self.insert(SceneNode::new(name, rect, displayed, NodeKind::Card(card)))
    }

    /// Create a detached text node at (`x`, `y`), sized to its rendered text.
    ///
    /// A text that fails to render leaves a node without texture; the failure
    /// is logged and the node is still returned.
    pub fn create_text<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        name: impl Into<String>,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        font: Option<FontId>,
    ) -> NodeId {
        let content = TextContent::new(text, color, font);
        let id = self.insert(SceneNode::new(name, Rect::new(x, y, 0, 0), None, NodeKind::Text(content)));
        if let Err(e) = self.apply_label(renderer, id, text, color, font) {
            error!("[Scene] Text node '{}' has no texture: {}", self.name(id), e);
        }
        id
    }

    /// Create a detached score node at (`x`, `y`) for `player_name`, score 0.
    pub fn create_score<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        name: impl Into<String>,
        x: i32,
        y: i32,
        track: ScoreTrack,
    ) -> NodeId {
        let id = self.insert(SceneNode::new(name, Rect::new(x, y, 0, 0), None, NodeKind::Score(track)));
        self.refresh_score_label(renderer, id);
        id
    }

    // =========================================================================
    // Structure
    // =========================================================================

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Attach `child` under `parent`.
    ///
    /// Attaching a node that already is a child of `parent` does nothing.
    /// A node with another parent is moved.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.get(parent)?;
        let current = self.get(child)?.parent;
        if child == self.root {
            return Err(SceneError::RootNode("attached"));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle {
                parent: self.name(parent).to_string(),
                child: self.name(child).to_string(),
            });
        }
        if current == Some(parent) {
            return Ok(());
        }
        if let Some(old) = current {
            if let Some(old_parent) = self.nodes.get_mut(old) {
                old_parent.children.retain(|c| *c != child);
            }
            debug!("[Scene] Moving '{}' to '{}'", self.name(child), self.name(parent));
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// Fails with [`SceneError::ChildNotFound`] if `child` is not a direct
    /// child of `parent`.
    pub fn remove_child<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        parent: NodeId,
        child: NodeId,
        policy: RemovePolicy,
    ) -> SceneResult<()> {
        let parent_node = self.get(parent)?;
        if !parent_node.children.contains(&child) {
            return Err(SceneError::ChildNotFound {
                parent: parent_node.name.clone(),
                child: self.name(child).to_string(),
            });
        }
        match policy {
            RemovePolicy::Destroy => {
                self.destroy(renderer, child)?;
            }
            RemovePolicy::Detach => self.detach(child),
        }
        Ok(())
    }

    /// Remove the first direct child of `parent` called `name`.
    pub fn remove_child_named<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        parent: NodeId,
        name: &str,
        policy: RemovePolicy,
    ) -> SceneResult<NodeId> {
        let child = self.find_child(parent, name, false).ok_or_else(|| SceneError::ChildNotFound {
            parent: self.name(parent).to_string(),
            child: name.to_string(),
        })?;
        self.remove_child(renderer, parent, child, policy)?;
        Ok(child)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Find a child of `parent` by name.
    ///
    /// Direct children are searched first, in order. With `recursive`, each
    /// child's subtree is then searched depth-first. An empty name never
    /// matches.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, name: &str, recursive: bool) -> Option<NodeId> {
        if name.is_empty() {
            warn!("[Scene] find_child called with an empty name");
            return None;
        }
        let node = self.nodes.get(parent)?;
        if let Some(&found) = node.children.iter().find(|&&c| self.name(c) == name) {
            return Some(found);
        }
        if recursive {
            return node.children.iter().find_map(|&c| self.find_child(c, name, true));
        }
        None
    }

    /// Check if `id` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor(self.root, id)
    }

    /// Destroy a node and its subtree.
    ///
    /// The node is unlinked from its parent first. Every exclusively owned
    /// texture in the subtree is freed. Returns the number of nodes removed.
    pub fn destroy<R: Renderer + ?Sized>(&mut self, renderer: &mut R, id: NodeId) -> SceneResult<usize> {
        self.get(id)?;
        if id == self.root {
            return Err(SceneError::RootNode("destroyed"));
        }
        self.detach(id);

        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.children.iter().copied());
            self.release_owned(renderer, &node);
            removed += 1;
        }
        debug!("[Scene] Destroyed {} node(s)", removed);
        Ok(removed)
    }

    fn release_owned<R: Renderer + ?Sized>(&mut self, renderer: &mut R, node: &SceneNode<M>) {
        let mut owned = node.texture.into_iter().collect::<Vec<_>>();
        if let NodeKind::Card(card) = &node.kind {
            owned.extend(card.front());
            owned.extend(card.back());
        }
        owned.sort_unstable();
        owned.dedup();
        for texture in owned {
            if self.textures.ownership(texture) == Some(Ownership::Exclusive) {
                self.textures.release(renderer, texture);
            }
        }
    }

    /// Destroy every node below the root and free every registered texture.
    pub fn clear<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let children: Vec<NodeId> = self.children(self.root).to_vec();
        for child in children {
            let _ = self.destroy(renderer, child);
        }
        // Detached nodes still alive are owned by nobody else.
        let root = self.root;
        self.nodes.retain(|id, _| id == root);
        let freed = self.textures.release_all(renderer);
        debug!("[Scene] Cleared graph, {} texture(s) freed", freed);
    }

    // =========================================================================
    // Geometry and visibility
    // =========================================================================

    /// Replace a node's parent-relative rectangle.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> SceneResult<()> {
        self.get_mut(id)?.rect = rect;
        Ok(())
    }

    /// Move a node, keeping its size.
    pub fn set_position(&mut self, id: NodeId, x: i32, y: i32) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        node.rect.x = x;
        node.rect.y = y;
        Ok(())
    }

    /// Resize a node, keeping its position.
    pub fn set_size(&mut self, id: NodeId, w: i32, h: i32) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        node.rect.w = w;
        node.rect.h = h;
        Ok(())
    }

    /// Rectangle in viewport coordinates: the node's rectangle offset by
    /// every ancestor's position.
    #[must_use]
    pub fn global_rect(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let mut rect = node.rect;
        let mut cursor = node.parent;
        while let Some(parent) = cursor {
            let parent = self.nodes.get(parent)?;
            rect = rect.offset(parent.rect.x, parent.rect.y);
            cursor = parent.parent;
        }
        Some(rect)
    }

    fn parent_rect(&self, id: NodeId) -> SceneResult<Option<Rect>> {
        let node = self.get(id)?;
        let Some(parent) = node.parent else {
            return Ok(None);
        };
        let rect = self.get(parent)?.rect;
        if rect.is_empty() {
            warn!("[Scene] Cannot center '{}', parent '{}' has no size", node.name, self.name(parent));
            return Ok(None);
        }
        Ok(Some(rect))
    }

    /// Center a node horizontally within its parent. No-op when detached.
    pub fn center_x(&mut self, id: NodeId) -> SceneResult<()> {
        if let Some(parent) = self.parent_rect(id)? {
            let node = self.get_mut(id)?;
            node.rect.x = (parent.w - node.rect.w) / 2;
        }
        Ok(())
    }

    /// Center a node vertically within its parent. No-op when detached.
    pub fn center_y(&mut self, id: NodeId) -> SceneResult<()> {
        if let Some(parent) = self.parent_rect(id)? {
            let node = self.get_mut(id)?;
            node.rect.y = (parent.h - node.rect.h) / 2;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> SceneResult<()> {
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    /// Effective visibility: the node and all its ancestors are visible and
    /// the chain ends at the root.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            if current == self.root {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    /// Install a click handler. The node becomes clickable.
    pub fn set_on_click<F>(&mut self, id: NodeId, callback: F) -> SceneResult<()>
    where
        F: Fn(NodeId, &SceneNode<M>) -> M + 'static,
        M: 'static,
    {
        self.set_shared_on_click(id, Rc::new(callback))
    }

    /// Install a handler shared with other nodes. The node becomes clickable.
    pub fn set_shared_on_click(&mut self, id: NodeId, callback: ClickCallback<M>) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        node.click.set_callback(Some(callback));
        node.click.set_clickable(true);
        Ok(())
    }

    /// Remove the click handler. The node stops being clickable.
    pub fn clear_on_click(&mut self, id: NodeId) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        node.click.set_callback(None);
        node.click.set_clickable(false);
        Ok(())
    }

    /// Toggle the clickable flag without touching the handler.
    pub fn set_clickable(&mut self, id: NodeId, clickable: bool) -> SceneResult<()> {
        self.get_mut(id)?.click.set_clickable(clickable);
        Ok(())
    }

    /// A node is clickable when its flag is set, it has a handler and it is
    /// effectively visible.
    #[must_use]
    pub fn is_clickable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.click.is_clickable()) && self.is_visible(id)
    }

    /// Run the node's click handler if the node is clickable.
    #[must_use]
    pub fn dispatch_click(&self, id: NodeId) -> Option<M> {
        if !self.is_clickable(id) {
            return None;
        }
        let node = self.nodes.get(id)?;
        let callback = node.click.callback()?;
        Some(callback(id, node))
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw `id` and its visible descendants, parents before children and
    /// children in insertion order.
    ///
    /// Drawing is best effort: a failed draw is logged, the rest of the tree
    /// is still drawn, and the failures are reported as one
    /// [`SceneError::Render`]. An invisible node draws nothing and succeeds.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, id: NodeId) -> SceneResult<()> {
        let node = self.get(id)?;
        let failures = self.render_node(renderer, id);
        if failures > 0 {
            return Err(SceneError::Render {
                node: node.name.clone(),
                failures,
            });
        }
        Ok(())
    }

    fn render_node<R: Renderer + ?Sized>(&self, renderer: &mut R, id: NodeId) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 1;
        };
        if !node.visible {
            return 0;
        }
        let mut failures = 0;
        if let Some(texture) = node.texture {
            // An empty rectangle means "fill the whole target".
            let dst = if node.rect.is_empty() { None } else { self.global_rect(id) };
            if let Err(e) = renderer.render_texture(texture, dst, None) {
                error!("[Scene] Failed to draw '{}': {}", node.name, e);
                failures += 1;
            }
        }
        for &child in &node.children {
            failures += self.render_node(renderer, child);
        }
        failures
    }

    /// Outline the node's global rectangle in `color`.
    pub fn highlight<R: Renderer + ?Sized>(&self, renderer: &mut R, id: NodeId, color: Color) -> SceneResult<()> {
        let rect = self.global_rect(id).ok_or(SceneError::StaleNode(id))?;
        renderer.render_rectangle(rect, color)?;
        Ok(())
    }

    // =========================================================================
    // Payloads
    // =========================================================================

    fn wrong_kind(node: &SceneNode<M>, expected: &'static str) -> SceneError {
        SceneError::WrongKind {
            name: node.name.clone(),
            expected,
            actual: node.kind.describe(),
        }
    }

    /// Card state of a card node.
    #[must_use]
    pub fn card(&self, id: NodeId) -> Option<&CardState> {
        self.nodes.get(id).and_then(SceneNode::card)
    }

    /// Turn a card over. Returns whether it is now face up.
    pub fn flip_card(&mut self, id: NodeId) -> SceneResult<bool> {
        let node = self.get_mut(id)?;
        let NodeKind::Card(card) = &mut node.kind else {
            return Err(Self::wrong_kind(node, "a card"));
        };
        node.texture = card.flip();
        Ok(card.is_revealed())
    }

    /// Show a card face up or face down.
    pub fn set_card_revealed(&mut self, id: NodeId, revealed: bool) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        let NodeKind::Card(card) = &mut node.kind else {
            return Err(Self::wrong_kind(node, "a card"));
        };
        node.texture = card.set_revealed(revealed);
        Ok(())
    }

    /// Replace the text of a text node.
    ///
    /// The node is resized to the new texture and the old texture freed. On
    /// failure the node keeps its previous text and texture.
    pub fn set_text<R: Renderer + ?Sized>(&mut self, renderer: &mut R, id: NodeId, text: &str) -> SceneResult<()> {
        let node = self.get(id)?;
        let NodeKind::Text(content) = &node.kind else {
            return Err(Self::wrong_kind(node, "text"));
        };
        let (color, font) = (content.color, content.font);
        self.apply_label(renderer, id, text, color, font)?;
        if let Some(NodeKind::Text(content)) = self.nodes.get_mut(id).map(|n| &mut n.kind) {
            content.text = text.to_string();
        }
        Ok(())
    }

    fn apply_label<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        id: NodeId,
        label: &str,
        color: Color,
        font: Option<FontId>,
    ) -> SceneResult<()> {
        if label.is_empty() {
            return Err(SceneError::EmptyText(self.name(id).to_string()));
        }
        let texture = renderer.load_text(label, color, font)?;
        let (w, h) = match renderer.texture_size(texture) {
            Ok(size) => size,
            Err(e) => {
                renderer.destroy_texture(texture);
                return Err(e.into());
            }
        };
        self.textures.adopt(texture);

        let node = self.get_mut(id)?;
        let old = node.texture.replace(texture);
        node.rect.w = w;
        node.rect.h = h;
        if let Some(old) = old {
            if self.textures.ownership(old) == Some(Ownership::Exclusive) {
                self.textures.release(renderer, old);
            }
        }
        Ok(())
    }

    /// Score track of a score node.
    #[must_use]
    pub fn score(&self, id: NodeId) -> Option<&ScoreTrack> {
        self.nodes.get(id).and_then(SceneNode::score)
    }

    fn track_mut(&mut self, id: NodeId) -> SceneResult<&mut ScoreTrack> {
        let node = self.get_mut(id)?;
        match &mut node.kind {
            NodeKind::Score(track) => Ok(track),
            other => Err(SceneError::WrongKind {
                name: node.name.clone(),
                expected: "a score",
                actual: other.describe(),
            }),
        }
    }

    fn refresh_score_label<R: Renderer + ?Sized>(&mut self, renderer: &mut R, id: NodeId) {
        let Some(track) = self.score(id) else {
            return;
        };
        let (label, color, font) = (track.label(), track.color(), track.font());
        if let Err(e) = self.apply_label(renderer, id, &label, color, font) {
            error!("[Scene] Score '{}' not redrawn: {}", label, e);
        }
    }

    /// Set a player's score and redraw its label.
    ///
    /// The score changes even if the label cannot be redrawn.
    pub fn set_score<R: Renderer + ?Sized>(&mut self, renderer: &mut R, id: NodeId, score: u32) -> SceneResult<()> {
        self.track_mut(id)?.set_score(score);
        self.refresh_score_label(renderer, id);
        Ok(())
    }

    /// Add one point. Returns the new score.
    pub fn inc_score<R: Renderer + ?Sized>(&mut self, renderer: &mut R, id: NodeId) -> SceneResult<u32> {
        let track = self.track_mut(id)?;
        let score = track.score().saturating_add(1);
        track.set_score(score);
        self.refresh_score_label(renderer, id);
        Ok(score)
    }

    /// Mark whose turn it is.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> SceneResult<()> {
        self.track_mut(id)?.set_active(active);
        Ok(())
    }
}

impl<M> std::fmt::Debug for SceneGraph<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("textures", &self.textures.len())
            .finish()
    }
}
