//! Rendering error types.

use thiserror::Error;

use super::renderer::{FontId, TextureId};

/// Failures reported by a [`Renderer`](super::Renderer) backend.
///
/// These are resource errors: callers log them and keep running with a
/// degraded picture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: String, reason: String },

    #[error("failed to load font {path}: {reason}")]
    FontLoad { path: String, reason: String },

    #[error("failed to render text '{0}'")]
    TextLoad(String),

    #[error("no font available for text rendering")]
    NoFont,

    #[error("unknown texture {0}")]
    UnknownTexture(TextureId),

    #[error("unknown font {0:?}")]
    UnknownFont(FontId),

    #[error("draw call failed: {0}")]
    Draw(String),

    #[error("cannot create {w}x{h} render target")]
    RenderTarget { w: i32, h: i32 },
}

/// Result type for renderer calls.
pub type RenderResult<T> = Result<T, RenderError>;
