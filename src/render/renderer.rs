//! The renderer capability consumed by the scene graph.
//!
//! The game never talks to a windowing or GPU library directly. Everything
//! it needs (loading images and text, drawing textures and outlines, the
//! pointer cursor, viewport size) goes through [`Renderer`]. Textures and
//! fonts are opaque handles handed out by the backend.

use std::path::Path;

use super::error::RenderResult;
use crate::core::{Color, Rect};

/// Opaque handle to a texture living in the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

impl std::fmt::Display for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Texture({})", self.0)
    }
}

/// Opaque handle to a loaded font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// System pointer shapes the game switches between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorKind {
    /// Normal pointer.
    #[default]
    Arrow,
    /// Pointer over something clickable.
    Hand,
}

/// Drawing backend.
///
/// All fallible calls return [`RenderResult`]; none of them should abort the
/// process. Textures returned by `load_*`, `crop_texture` and
/// `create_blank_render_target` belong to the caller until passed to
/// [`destroy_texture`](Renderer::destroy_texture).
pub trait Renderer {
    /// Load an image file into a texture.
    fn load_image(&mut self, path: &Path) -> RenderResult<TextureId>;

    /// Load a font at the given point size.
    fn load_font(&mut self, path: &Path, size: u16) -> RenderResult<FontId>;

    /// Set the font used when `load_text` gets no explicit font.
    fn set_default_font(&mut self, font: FontId);

    /// Render `text` into a new texture. `None` uses the default font.
    fn load_text(&mut self, text: &str, color: Color, font: Option<FontId>) -> RenderResult<TextureId>;

    /// Draw `src` (or the whole texture) into `dst` (or the whole viewport).
    fn render_texture(&mut self, texture: TextureId, dst: Option<Rect>, src: Option<Rect>) -> RenderResult<()>;

    /// Draw an unfilled rectangle outline.
    fn render_rectangle(&mut self, rect: Rect, color: Color) -> RenderResult<()>;

    /// Copy `area` of `src` into a new texture of the same size as `area`.
    fn crop_texture(&mut self, src: TextureId, area: Rect) -> RenderResult<TextureId>;

    /// Create an empty texture that can be drawn into.
    fn create_blank_render_target(&mut self, w: i32, h: i32) -> RenderResult<TextureId>;

    /// Pixel size of a texture as `(w, h)`.
    fn texture_size(&self, texture: TextureId) -> RenderResult<(i32, i32)>;

    /// Free a texture. Unknown handles are ignored by the backend.
    fn destroy_texture(&mut self, texture: TextureId);

    /// Switch the system pointer shape.
    fn set_cursor(&mut self, cursor: CursorKind);

    /// Viewport width in pixels.
    fn width(&self) -> i32;

    /// Viewport height in pixels.
    fn height(&self) -> i32;

    /// Clear the back buffer.
    fn clear(&mut self) -> RenderResult<()>;

    /// Show the back buffer.
    fn present(&mut self);

    /// The whole viewport as a rectangle at the origin.
    fn viewport(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}
