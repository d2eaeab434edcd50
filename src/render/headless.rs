//! In-memory renderer.
//!
//! `HeadlessRenderer` implements [`Renderer`] without a window. It hands out
//! texture handles, remembers their sizes, records every draw call of the
//! current frame and counts texture frees, which makes it the backend of
//! choice for tests and for running the game logic offscreen.
//!
//! ```
//! use memory_match::render::{HeadlessRenderer, Renderer};
//! use std::path::Path;
//!
//! let mut renderer = HeadlessRenderer::new(1280, 720);
//! let tex = renderer.load_image(Path::new("res/cards.bmp")).unwrap();
//!
//! renderer.render_texture(tex, None, None).unwrap();
//! assert_eq!(renderer.draws().len(), 1);
//!
//! renderer.destroy_texture(tex);
//! assert_eq!(renderer.live_textures(), 0);
//! ```

use log::error;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

use super::error::{RenderError, RenderResult};
use super::renderer::{CursorKind, FontId, Renderer, TextureId};
use crate::core::{Color, Rect, Size};

/// Width of one glyph in generated text textures.
pub const GLYPH_WIDTH: i32 = 10;

/// Height of generated text textures.
pub const GLYPH_HEIGHT: i32 = 20;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Texture {
        texture: TextureId,
        dst: Option<Rect>,
        src: Option<Rect>,
    },
    Rectangle {
        rect: Rect,
        color: Color,
    },
}

/// Windowless [`Renderer`] that records what it is asked to do.
#[derive(Debug)]
pub struct HeadlessRenderer {
    width: i32,
    height: i32,
    image_size: Size,
    next_id: u32,
    textures: FxHashMap<TextureId, Size>,
    fonts: FxHashSet<FontId>,
    default_font: Option<FontId>,
    failing_paths: FxHashSet<PathBuf>,
    failing_draws: FxHashSet<TextureId>,
    draws: Vec<DrawCall>,
    cursor: CursorKind,
    cursor_changes: usize,
    frames: usize,
    freed: usize,
    double_frees: usize,
}

impl HeadlessRenderer {
    /// Create a renderer with a `width` x `height` viewport and a built-in
    /// default font.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let builtin = FontId(0);
        let mut fonts = FxHashSet::default();
        fonts.insert(builtin);
        Self {
            width,
            height,
            // 14 cells of 69x94 per row, one row per suit
            image_size: Size::new(14 * 69, 4 * 94),
            next_id: 1,
            textures: FxHashMap::default(),
            fonts,
            default_font: Some(builtin),
            failing_paths: FxHashSet::default(),
            failing_draws: FxHashSet::default(),
            draws: Vec::new(),
            cursor: CursorKind::Arrow,
            cursor_changes: 0,
            frames: 0,
            freed: 0,
            double_frees: 0,
        }
    }

    /// Drop the built-in default font, so text needs an explicit font.
    #[must_use]
    pub fn without_default_font(mut self) -> Self {
        self.default_font = None;
        self
    }

    /// Size given to every loaded image.
    #[must_use]
    pub fn with_image_size(mut self, size: Size) -> Self {
        self.image_size = size;
        self
    }

    /// Make `load_image` fail for this path.
    pub fn fail_path(&mut self, path: impl Into<PathBuf>) {
        self.failing_paths.insert(path.into());
    }

    /// Make `render_texture` fail for this texture.
    pub fn fail_draw(&mut self, texture: TextureId) {
        self.failing_draws.insert(texture);
    }

    /// Draw calls since the last `clear`.
    #[must_use]
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Textures drawn since the last `clear`, in order.
    pub fn drawn_textures(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.draws.iter().filter_map(|d| match d {
            DrawCall::Texture { texture, .. } => Some(*texture),
            DrawCall::Rectangle { .. } => None,
        })
    }

    /// Outlines drawn since the last `clear`.
    pub fn drawn_rectangles(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.draws.iter().filter_map(|d| match d {
            DrawCall::Rectangle { rect, color } => Some((*rect, *color)),
            DrawCall::Texture { .. } => None,
        })
    }

    /// Current pointer shape.
    #[must_use]
    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    /// How many times the pointer shape actually changed.
    #[must_use]
    pub fn cursor_changes(&self) -> usize {
        self.cursor_changes
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Check if a texture is alive.
    #[must_use]
    pub fn is_live(&self, texture: TextureId) -> bool {
        self.textures.contains_key(&texture)
    }

    /// Number of textures alive.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Number of successful frees.
    #[must_use]
    pub fn freed(&self) -> usize {
        self.freed
    }

    /// Number of frees of a texture that was not alive.
    #[must_use]
    pub fn double_frees(&self) -> usize {
        self.double_frees
    }

    fn alloc(&mut self, size: Size) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, size);
        id
    }
}

impl Renderer for HeadlessRenderer {
    fn load_image(&mut self, path: &Path) -> RenderResult<TextureId> {
        if self.failing_paths.contains(path) {
            return Err(RenderError::ImageLoad {
                path: path.display().to_string(),
                reason: "file not found".to_string(),
            });
        }
        Ok(self.alloc(self.image_size))
    }

    fn load_font(&mut self, path: &Path, _size: u16) -> RenderResult<FontId> {
        if self.failing_paths.contains(path) {
            return Err(RenderError::FontLoad {
                path: path.display().to_string(),
                reason: "file not found".to_string(),
            });
        }
        let id = FontId(self.next_id);
        self.next_id += 1;
        self.fonts.insert(id);
        Ok(id)
    }

    fn set_default_font(&mut self, font: FontId) {
        self.default_font = Some(font);
    }

    fn load_text(&mut self, text: &str, _color: Color, font: Option<FontId>) -> RenderResult<TextureId> {
        let font = font.or(self.default_font).ok_or(RenderError::NoFont)?;
        if !self.fonts.contains(&font) {
            return Err(RenderError::UnknownFont(font));
        }
        if text.is_empty() {
            return Err(RenderError::TextLoad(text.to_string()));
        }
        let w = GLYPH_WIDTH * text.chars().count() as i32;
        Ok(self.alloc(Size::new(w, GLYPH_HEIGHT)))
    }

    fn render_texture(&mut self, texture: TextureId, dst: Option<Rect>, src: Option<Rect>) -> RenderResult<()> {
        if !self.textures.contains_key(&texture) {
            return Err(RenderError::UnknownTexture(texture));
        }
        if self.failing_draws.contains(&texture) {
            return Err(RenderError::Draw(format!("cannot copy {}", texture)));
        }
        self.draws.push(DrawCall::Texture { texture, dst, src });
        Ok(())
    }

    fn render_rectangle(&mut self, rect: Rect, color: Color) -> RenderResult<()> {
        self.draws.push(DrawCall::Rectangle { rect, color });
        Ok(())
    }

    fn crop_texture(&mut self, src: TextureId, area: Rect) -> RenderResult<TextureId> {
        let size = *self.textures.get(&src).ok_or(RenderError::UnknownTexture(src))?;
        let bounds = Rect::new(0, 0, size.w, size.h);
        if area.is_empty() || area.x < 0 || area.y < 0 || area.right() > bounds.right() || area.bottom() > bounds.bottom() {
            return Err(RenderError::Draw(format!("crop area {} outside {}", area, bounds)));
        }
        self.create_blank_render_target(area.w, area.h)
    }

    fn create_blank_render_target(&mut self, w: i32, h: i32) -> RenderResult<TextureId> {
        if w <= 0 || h <= 0 {
            return Err(RenderError::RenderTarget { w, h });
        }
        Ok(self.alloc(Size::new(w, h)))
    }

    fn texture_size(&self, texture: TextureId) -> RenderResult<(i32, i32)> {
        self.textures
            .get(&texture)
            .map(|s| (s.w, s.h))
            .ok_or(RenderError::UnknownTexture(texture))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_some() {
            self.freed += 1;
        } else {
            error!("[HeadlessRenderer] {} freed twice or never created", texture);
            self.double_frees += 1;
        }
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.cursor_changes += 1;
        }
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.draws.clear();
        Ok(())
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}
