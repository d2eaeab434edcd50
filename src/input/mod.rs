//! Pointer and keyboard input.
//!
//! ## Key Types
//!
//! - `InputEvent` / `Key`: what the host event pump feeds in
//! - `PointerRouter`: hit-testing, hover cursor, click dispatch
//! - `ClickOutcome`: what a routed click did

pub mod event;
pub mod router;

pub use event::{InputEvent, Key};
pub use router::{ClickOutcome, PointerRouter};
