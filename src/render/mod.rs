//! Rendering capability, texture ownership and an in-memory backend.
//!
//! ## Key Types
//!
//! - `Renderer`: the drawing backend trait the game consumes
//! - `TextureId` / `FontId`: opaque backend handles
//! - `TextureRegistry`: exclusive vs shared texture ownership
//! - `HeadlessRenderer`: windowless backend that records calls

pub mod error;
pub mod headless;
pub mod renderer;
pub mod textures;

pub use error::{RenderError, RenderResult};
pub use headless::{DrawCall, HeadlessRenderer, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use renderer::{CursorKind, FontId, Renderer, TextureId};
pub use textures::{Ownership, TextureRegistry};
