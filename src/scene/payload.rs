//! Specialised node payloads.
//!
//! Instead of subclassing nodes, every [`SceneNode`](super::SceneNode)
//! carries a [`NodeKind`] tag. Operations that only make sense for one kind
//! (flipping a card, changing a text, bumping a score) check the tag and
//! fail with [`SceneError::WrongKind`](super::SceneError::WrongKind)
//! otherwise.

use crate::cards::CardState;
use crate::core::Color;
use crate::render::FontId;

/// Text shown by a text node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextContent {
    pub text: String,
    pub color: Color,
    pub font: Option<FontId>,
}

impl TextContent {
    #[must_use]
    pub fn new(text: impl Into<String>, color: Color, font: Option<FontId>) -> Self {
        Self {
            text: text.into(),
            color,
            font,
        }
    }
}

/// A player's score line, rendered as `"<name> : <score>"`.
///
/// `active` marks whose turn it is. The game keeps exactly one player
/// active; the track itself does not enforce that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreTrack {
    player_name: String,
    score: u32,
    active: bool,
    color: Color,
    font: Option<FontId>,
}

impl ScoreTrack {
    #[must_use]
    pub fn new(player_name: impl Into<String>, color: Color, font: Option<FontId>) -> Self {
        Self {
            player_name: player_name.into(),
            score: 0,
            active: false,
            color,
            font,
        }
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    /// Text displayed for this track.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} : {}", self.player_name, self.score)
    }

    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// What a node is, beyond geometry and texture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeKind {
    /// Structural or image node.
    #[default]
    Plain,
    /// Text field.
    Text(TextContent),
    /// Playing card.
    Card(CardState),
    /// Player score line.
    Score(ScoreTrack),
}

impl NodeKind {
    /// Short description for error messages.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Plain => "nothing",
            NodeKind::Text(_) => "text",
            NodeKind::Card(_) => "a card",
            NodeKind::Score(_) => "a score",
        }
    }
}
