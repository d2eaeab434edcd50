//! Match states and the messages that drive them.

use serde::{Deserialize, Serialize};

use super::menu::ButtonAction;
use crate::scene::NodeId;

/// Where a match stands.
///
/// ```text
/// Menu ──start──▶ NoReveal ──card──▶ OneRevealed ──card──▶ PairFound
///   ▲                ▲                                       │  or
///   │                └──────────── board click ──────────────┤
///   └──── new_game (from anywhere)                TwoRevealedMismatch
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MatchState {
    /// Main menu shown, no cards dealt.
    #[default]
    Menu = 0,
    /// Waiting for a first card.
    NoReveal = 1,
    /// One card face up, waiting for the second.
    OneRevealed = 2,
    /// Two different cards face up, waiting for a board click.
    TwoRevealedMismatch = 3,
    /// A pair face up, waiting for a board click.
    PairFound = 4,
}

impl MatchState {
    /// True once cards are dealt.
    #[must_use]
    pub fn in_play(self) -> bool {
        self != MatchState::Menu
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchState::Menu => "menu",
            MatchState::NoReveal => "no card revealed",
            MatchState::OneRevealed => "one card revealed",
            MatchState::TwoRevealedMismatch => "mismatch shown",
            MatchState::PairFound => "pair shown",
        };
        write!(f, "{}", name)
    }
}

/// Message produced by a node's click handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMessage {
    /// A card was clicked.
    Card(NodeId),
    /// The board was clicked to dismiss a revealed pair.
    Board,
    /// A menu button was clicked.
    Button(ButtonAction),
}
