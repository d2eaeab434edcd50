//! Core types shared by every layer: geometry, RNG and configuration.

pub mod config;
pub mod geometry;
pub mod rng;

pub use config::{ConfigError, FontConfig, MemoryConfig, MAX_PAIRS, MIN_PAIRS};
pub use geometry::{Color, Point, Rect, Size};
pub use rng::GameRng;
