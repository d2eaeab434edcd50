//! The memory game: state machine, layout, menus, clock and records.
//!
//! ## Key Types
//!
//! - `MemoryGame`: orchestrator owning renderer, scene and routers
//! - `MatchState` / `GameMessage`: states and click messages
//! - `random_destination`: non-overlapping card placement
//! - `HighScores`: best times per pair count, persisted with bincode
//! - `build_menu`: validated side-panel menus

pub mod error;
pub mod layout;
pub mod memory;
pub mod menu;
pub mod records;
pub mod state;
pub mod timer;

pub use error::{GameError, GameResult, LayoutError, MenuError, RecordError};
pub use layout::{layout_cards, pair_capacity, random_destination, BOARD_FILL};
pub use memory::MemoryGame;
pub use menu::{build_menu, ButtonAction, Menu, MenuButton};
pub use records::HighScores;
pub use state::{GameMessage, MatchState};
pub use timer::{format_clock, MatchTimer};
