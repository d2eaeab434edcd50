//! Scene graph error types.

use thiserror::Error;

use super::node::NodeId;
use crate::render::RenderError;

/// Errors from scene graph and pointer router operations.
///
/// Lookups that miss (`ChildNotFound`, `NotSubscribed`, `StaleNode`) are
/// recoverable: the caller decides whether they matter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist")]
    StaleNode(NodeId),

    #[error("'{child}' is not a child of '{parent}'")]
    ChildNotFound { parent: String, child: String },

    #[error("cannot attach '{child}' under '{parent}': it would become its own ancestor")]
    Cycle { parent: String, child: String },

    #[error("the root node cannot be {0}")]
    RootNode(&'static str),

    #[error("node name is empty")]
    EmptyName,

    #[error("node '{name}' holds {actual}, expected {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("text for node '{0}' is empty")]
    EmptyText(String),

    #[error("{failures} draw call(s) failed while rendering '{node}'")]
    Render { node: String, failures: usize },

    #[error("node {0:?} is not subscribed")]
    NotSubscribed(NodeId),

    #[error(transparent)]
    Resource(#[from] RenderError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
