//! Game-level error types.

use thiserror::Error;

use super::state::MatchState;
use crate::cards::DeckError;
use crate::core::{ConfigError, Size};
use crate::render::RenderError;
use crate::scene::{NodeId, SceneError};

/// Invalid menu definitions. Nothing is added to the scene when these occur.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MenuError {
    #[error("menu name is empty")]
    EmptyName,

    #[error("menu '{menu}' has a button without a name")]
    EmptyButtonName { menu: String },

    #[error("menu '{menu}' has two buttons named '{button}'")]
    DuplicateButton { menu: String, button: String },

    #[error("button '{button}' has vertical factor {factor}, expected 0..=1")]
    YFactor { button: String, factor: f32 },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Card placement failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("a {card:?} card does not fit on a {board:?} board")]
    BoardTooSmall { board: Size, card: Size },

    #[error("no free spot after {attempts} attempts with {placed} card(s) placed")]
    Exhausted { attempts: u32, placed: usize },
}

/// Record file failures.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("record file encoding: {0}")]
    Codec(#[from] bincode::Error),

    #[error("no record slot for {pairs} pairs")]
    NoSlot { pairs: u8 },
}

/// Everything the orchestrator can report.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("cannot do that in state {actual}, expected {expected}")]
    WrongState { expected: MatchState, actual: MatchState },

    #[error("node {0:?} is not a card of the current game")]
    NotACard(NodeId),

    #[error("card {0:?} is already face up")]
    AlreadyRevealed(NodeId),

    /// Broken internal state. The game stops when it sees one.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl GameError {
    #[must_use]
    pub fn is_invariant(&self) -> bool {
        matches!(self, GameError::Invariant(_))
    }
}

pub type GameResult<T> = Result<T, GameError>;
