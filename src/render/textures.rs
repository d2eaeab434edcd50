//! Texture ownership tracking.
//!
//! Every texture the game creates is registered here as either
//! **exclusive** (owned by exactly one scene node, freed when that node is
//! destroyed) or **shared** (referenced by many nodes, such as the card
//! back, and freed only by whoever registered it).
//!
//! Releasing through the registry is the only path that calls
//! [`Renderer::destroy_texture`], which makes a double free impossible:
//! a texture leaves the registry the moment it is freed.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use super::renderer::{Renderer, TextureId};

/// How a registered texture is owned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// Owned by a single node.
    Exclusive,
    /// Owned by the registrant, borrowed by nodes.
    Shared,
}

/// Registry of live textures and their ownership.
#[derive(Clone, Debug, Default)]
pub struct TextureRegistry {
    entries: FxHashMap<TextureId, Ownership>,
}

impl TextureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture as exclusively owned.
    ///
    /// Returns false if it was already registered; the existing ownership is
    /// kept.
    pub fn adopt(&mut self, texture: TextureId) -> bool {
        self.register(texture, Ownership::Exclusive)
    }

    /// Register a texture as shared.
    ///
    /// Returns false if it was already registered; the existing ownership is
    /// kept.
    pub fn share(&mut self, texture: TextureId) -> bool {
        self.register(texture, Ownership::Shared)
    }

    fn register(&mut self, texture: TextureId, ownership: Ownership) -> bool {
        if let Some(existing) = self.entries.get(&texture) {
            warn!("[Textures] {} already registered as {:?}", texture, existing);
            return false;
        }
        self.entries.insert(texture, ownership);
        true
    }

    /// Ownership of a texture, if registered.
    #[must_use]
    pub fn ownership(&self, texture: TextureId) -> Option<Ownership> {
        self.entries.get(&texture).copied()
    }

    /// Check if a texture is registered as shared.
    #[must_use]
    pub fn is_shared(&self, texture: TextureId) -> bool {
        self.ownership(texture) == Some(Ownership::Shared)
    }

    /// Check if a texture is registered at all.
    #[must_use]
    pub fn contains(&self, texture: TextureId) -> bool {
        self.entries.contains_key(&texture)
    }

    /// Number of live textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Free an exclusively owned texture.
    ///
    /// Shared and unknown textures are left alone and `false` is returned.
    pub fn release<R: Renderer + ?Sized>(&mut self, renderer: &mut R, texture: TextureId) -> bool {
        match self.ownership(texture) {
            Some(Ownership::Exclusive) => {
                self.entries.remove(&texture);
                renderer.destroy_texture(texture);
                debug!("[Textures] Released {}", texture);
                true
            }
            Some(Ownership::Shared) => {
                warn!("[Textures] Refusing to release shared {} through a node", texture);
                false
            }
            None => {
                warn!("[Textures] Cannot release {}, not registered", texture);
                false
            }
        }
    }

    /// Free a shared texture. Only its registrant should call this.
    pub fn release_shared<R: Renderer + ?Sized>(&mut self, renderer: &mut R, texture: TextureId) -> bool {
        if self.is_shared(texture) {
            self.entries.remove(&texture);
            renderer.destroy_texture(texture);
            debug!("[Textures] Released shared {}", texture);
            true
        } else {
            warn!("[Textures] Cannot release {} as shared", texture);
            false
        }
    }

    /// Free every remaining texture. Used at shutdown.
    pub fn release_all<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> usize {
        let count = self.entries.len();
        for (texture, _) in self.entries.drain() {
            renderer.destroy_texture(texture);
        }
        count
    }
}
