//! Game configuration.
//!
//! `MemoryConfig` gathers every tunable of a session: the pair-count range,
//! window split between board and side menu, card sprite size, asset paths,
//! the record file location and the layout retry budget.
//!
//! Build it with the `with_*` methods and check it with
//! [`MemoryConfig::validate`] before handing it to the game.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use super::geometry::Size;

/// Smallest pair count the record file can hold.
pub const MIN_PAIRS: u8 = 2;

/// Largest pair count: one pair per playable face of a 52-card deck.
pub const MAX_PAIRS: u8 = 52;

/// Configuration problems detected by [`MemoryConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("pair range {min}..={max} must lie within {MIN_PAIRS}..={MAX_PAIRS} and not be inverted")]
    PairRange { min: u8, max: u8 },

    #[error("initial pair count {pairs} is outside {min}..={max}")]
    InitialPairs { pairs: u8, min: u8, max: u8 },

    #[error("player count must be 1 or 2, got {0}")]
    PlayerCount(u8),

    #[error("board width ratio must be in (0, 1), got {0}")]
    BoardRatio(f32),

    #[error("card size {w}x{h} must be positive")]
    CardSize { w: i32, h: i32 },

    #[error("placement attempts must be at least 1")]
    PlacementAttempts,
}

/// Font used for every text node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub path: PathBuf,
    pub size: u16,
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Lowest selectable pair count.
    pub min_pairs: u8,

    /// Highest selectable pair count.
    pub max_pairs: u8,

    /// Pair count shown when the main menu first opens.
    pub initial_pairs: u8,

    /// Number of players (1 or 2).
    pub players: u8,

    /// Fraction of the window width given to the board; the rest is menu.
    pub board_width_ratio: f32,

    /// Size of one card cell in the sprite sheet, and of a card on screen.
    pub card_size: Size,

    /// Sprite sheet: 4 rows (suits) of 14 cells (13 ranks + back).
    pub sprite_sheet: PathBuf,

    /// Board background image.
    pub background: PathBuf,

    /// Font for menus and scores. `None` uses the renderer's default.
    pub font: Option<FontConfig>,

    /// Best-time record file.
    pub save_path: PathBuf,

    /// Minimum time between two timer text refreshes.
    pub timer_interval_ms: u32,

    /// Rejected samples allowed per card before layout gives up.
    pub max_placement_attempts: u32,

    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            min_pairs: MIN_PAIRS,
            max_pairs: MAX_PAIRS,
            initial_pairs: 20,
            players: 1,
            board_width_ratio: 0.8,
            card_size: Size::new(69, 94),
            sprite_sheet: PathBuf::from("res/cards.bmp"),
            background: PathBuf::from("res/background.bmp"),
            font: None,
            save_path: PathBuf::from("high_scores"),
            timer_interval_ms: 1000,
            max_placement_attempts: 10_000,
            seed: None,
        }
    }
}

impl MemoryConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selectable pair range.
    #[must_use]
    pub fn with_pair_range(mut self, min: u8, max: u8) -> Self {
        self.min_pairs = min;
        self.max_pairs = max;
        self
    }

    /// Set the pair count shown at startup.
    #[must_use]
    pub fn with_initial_pairs(mut self, pairs: u8) -> Self {
        self.initial_pairs = pairs;
        self
    }

    /// Set the number of players.
    #[must_use]
    pub fn with_players(mut self, players: u8) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub fn with_board_width_ratio(mut self, ratio: f32) -> Self {
        self.board_width_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_card_size(mut self, size: Size) -> Self {
        self.card_size = size;
        self
    }

    #[must_use]
    pub fn with_assets(mut self, sprite_sheet: impl Into<PathBuf>, background: impl Into<PathBuf>) -> Self {
        self.sprite_sheet = sprite_sheet.into();
        self.background = background.into();
        self
    }

    #[must_use]
    pub fn with_font(mut self, path: impl Into<PathBuf>, size: u16) -> Self {
        self.font = Some(FontConfig { path: path.into(), size });
        self
    }

    #[must_use]
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    #[must_use]
    pub fn with_timer_interval(mut self, ms: u32) -> Self {
        self.timer_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn with_max_placement_attempts(mut self, attempts: u32) -> Self {
        self.max_placement_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of entries in the record file.
    #[must_use]
    pub fn record_slots(&self) -> usize {
        usize::from(self.max_pairs.saturating_sub(self.min_pairs)) + 1
    }

    /// Check every field for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pairs < MIN_PAIRS || self.max_pairs > MAX_PAIRS || self.min_pairs > self.max_pairs {
            return Err(ConfigError::PairRange {
                min: self.min_pairs,
                max: self.max_pairs,
            });
        }
        if !(self.min_pairs..=self.max_pairs).contains(&self.initial_pairs) {
            return Err(ConfigError::InitialPairs {
                pairs: self.initial_pairs,
                min: self.min_pairs,
                max: self.max_pairs,
            });
        }
        if !(1..=2).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if !(self.board_width_ratio > 0.0 && self.board_width_ratio < 1.0) {
            return Err(ConfigError::BoardRatio(self.board_width_ratio));
        }
        if self.card_size.w <= 0 || self.card_size.h <= 0 {
            return Err(ConfigError::CardSize {
                w: self.card_size.w,
                h: self.card_size.h,
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::PlacementAttempts);
        }
        Ok(())
    }
}
