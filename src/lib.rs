//! # memory-match
//!
//! A memory-matching card game built on a small retained-mode scene graph.
//!
//! ## Design Principles
//!
//! 1. **Backend-Agnostic**: Drawing goes through the `Renderer` trait. The
//!    crate ships a `HeadlessRenderer` that records calls, which is what the
//!    tests run against.
//!
//! 2. **Host-Driven**: The caller owns the event pump and the clock. It feeds
//!    `InputEvent`s and calls `frame(now)`; nothing here blocks or sleeps.
//!
//! 3. **Explicit Ownership**: Nodes live in an arena and are linked by
//!    `NodeId`. Textures are registered as exclusive (freed with their node)
//!    or shared (freed by whoever registered them).
//!
//! ## Architecture
//!
//! - **Scene graph**: parent-relative geometry, inherited visibility,
//!   best-effort rendering, tagged payloads for text, cards and scores.
//!
//! - **Pointer routers**: hit-test clickable nodes in registration order,
//!   drive the cursor shape and dispatch clicks as messages.
//!
//! - **Orchestrator**: a five-state machine dealing a random non-overlapping
//!   layout and settling turns for one or two players.
//!
//! ## Modules
//!
//! - `core`: Geometry, RNG, configuration
//! - `render`: Renderer trait, texture ownership, headless backend
//! - `scene`: Scene graph and node payloads
//! - `input`: Input events and pointer routing
//! - `cards`: Card identity, state and dealing
//! - `game`: State machine, layout, menus, timer, records

pub mod cards;
pub mod core;
pub mod game;
pub mod input;
pub mod render;
pub mod scene;

// Re-export commonly used types
pub use crate::core::{Color, ConfigError, GameRng, MemoryConfig, Point, Rect, Size, MAX_PAIRS, MIN_PAIRS};

pub use crate::render::{CursorKind, FontId, HeadlessRenderer, RenderError, RenderResult, Renderer, TextureId};

pub use crate::scene::{NodeId, NodeKind, RemovePolicy, SceneError, SceneGraph, SceneNode, ScoreTrack};

pub use crate::input::{ClickOutcome, InputEvent, Key, PointerRouter};

pub use crate::cards::{CardFace, CardState, Rank, Suit};

pub use crate::game::{
    ButtonAction, GameError, GameMessage, GameResult, HighScores, LayoutError, MatchState, MemoryGame, MenuError,
    RecordError,
};
