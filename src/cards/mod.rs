//! Playing cards: identity, face-up state and dealing.
//!
//! ## Key Types
//!
//! - `Suit` / `Rank`: sprite-sheet row and column
//! - `CardFace`: identity with its match `key`
//! - `CardState`: card payload of a scene node (revealed flag, textures)
//! - `pick_faces`: deal distinct identities

pub mod card;
pub mod deck;

pub use card::{CardFace, CardState, Rank, Suit};
pub use deck::{pick_faces, random_face, DeckError, DISTINCT_FACES};
