//! Retained-mode scene graph.
//!
//! ## Key Types
//!
//! - `SceneGraph`: arena of nodes, tree links, texture ownership
//! - `SceneNode`: name, parent-relative rectangle, texture, visibility
//! - `NodeKind`: payload tag (plain, text, card, score)
//! - `ClickCallback`: handler producing a message for the click router

pub mod error;
pub mod graph;
pub mod node;
pub mod payload;

pub use error::{SceneError, SceneResult};
pub use graph::{RemovePolicy, SceneGraph};
pub use node::{ClickCallback, Clickable, NodeId, SceneNode};
pub use payload::{NodeKind, ScoreTrack, TextContent};
