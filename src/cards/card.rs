//! Card identity and face-up/face-down state.
//!
//! ## Identity
//!
//! A card face is a `(Suit, Rank)` pair. Its **key** is `rank * 10 + suit`:
//! two cards with the same face share a key, which is all the game compares
//! when checking for a pair.
//!
//! ## Textures
//!
//! A card node shows either its own front texture (owned by the node) or the
//! single card-back texture shared by every card. [`CardState::flip`] only
//! swaps which one is displayed; it never allocates or frees anything.

use serde::{Deserialize, Serialize};

use crate::core::{Rect, Size};
use crate::render::TextureId;

/// Card suit. The discriminant is the sprite-sheet row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs = 0,
    Spades = 1,
    Hearts = 2,
    Diamonds = 3,
}

impl Suit {
    /// All suits in sprite-sheet order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];

    /// Suit for a sprite-sheet row.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in node names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
        }
    }
}

/// Card rank. The discriminant is the sprite-sheet column.
///
/// `Special` is the column holding the card back; it is never dealt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Special,
}

impl Rank {
    /// Ranks that can be dealt, in sprite-sheet order.
    pub const PLAYABLE: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Rank for a sprite-sheet column, including `Special`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            13 => Some(Rank::Special),
            _ => Self::PLAYABLE.get(index).copied(),
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_playable(self) -> bool {
        !matches!(self, Rank::Special)
    }

    /// Lowercase name used in node names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rank::Ace => "ace",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::Special => "back",
        }
    }
}

/// A card face: suit and rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardFace {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardFace {
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// The face whose sprite cell holds the card back.
    #[must_use]
    pub const fn back() -> Self {
        Self::new(Suit::Clubs, Rank::Special)
    }

    /// Match identity, shared by identical faces.
    ///
    /// ```
    /// use memory_match::cards::{CardFace, Rank, Suit};
    ///
    /// assert_eq!(CardFace::new(Suit::Hearts, Rank::Queen).key(), 112);
    /// assert_eq!(CardFace::new(Suit::Clubs, Rank::Ace).key(), 0);
    /// ```
    #[must_use]
    pub const fn key(self) -> u32 {
        self.rank as u32 * 10 + self.suit as u32
    }

    /// Base node name, e.g. `card_hearts_queen`.
    #[must_use]
    pub fn name(self) -> String {
        format!("card_{}_{}", self.suit.name(), self.rank.name())
    }

    /// Cell of this face in a sprite sheet of `card_size` cells.
    #[must_use]
    pub const fn sprite_cell(self, card_size: Size) -> Rect {
        Rect::new(
            card_size.w * self.rank as i32,
            card_size.h * self.suit as i32,
            card_size.w,
            card_size.h,
        )
    }
}

impl std::fmt::Display for CardFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.rank.name(), self.suit.name())
    }
}

/// Card payload of a scene node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardState {
    face: CardFace,
    revealed: bool,
    front: Option<TextureId>,
    back: Option<TextureId>,
}

impl CardState {
    /// Create a face-down card.
    ///
    /// `front` is owned by the card's node; `back` is shared. Either may be
    /// missing when its texture failed to load.
    #[must_use]
    pub fn new(face: CardFace, front: Option<TextureId>, back: Option<TextureId>) -> Self {
        Self {
            face,
            revealed: false,
            front,
            back,
        }
    }

    #[must_use]
    pub fn face(&self) -> CardFace {
        self.face
    }

    /// Match identity.
    #[must_use]
    pub fn key(&self) -> u32 {
        self.face.key()
    }

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.face.suit
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.face.rank
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The card's own front texture.
    #[must_use]
    pub fn front(&self) -> Option<TextureId> {
        self.front
    }

    /// The shared back texture.
    #[must_use]
    pub fn back(&self) -> Option<TextureId> {
        self.back
    }

    /// Texture that should currently be displayed.
    #[must_use]
    pub fn displayed(&self) -> Option<TextureId> {
        if self.revealed {
            self.front
        } else {
            self.back
        }
    }

    /// Set the revealed state; returns the texture to display.
    pub fn set_revealed(&mut self, revealed: bool) -> Option<TextureId> {
        self.revealed = revealed;
        self.displayed()
    }

    /// Turn the card over; returns the texture to display.
    pub fn flip(&mut self) -> Option<TextureId> {
        self.set_revealed(!self.revealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        for suit in Suit::ALL {
            for rank in Rank::PLAYABLE {
                let key = CardFace::new(suit, rank).key();
                assert_eq!(key % 10, suit as u32);
                assert_eq!(key / 10, rank as u32);
            }
        }
    }

    #[test]
    fn test_keys_are_unique_per_face() {
        let mut keys: Vec<_> = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::PLAYABLE.iter().map(move |&r| CardFace::new(s, r).key()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 52);
    }

    #[test]
    fn test_names() {
        let face = CardFace::new(Suit::Spades, Rank::Ten);
        assert_eq!(face.name(), "card_spades_10");
        assert_eq!(format!("{}", face), "10 of spades");
        assert_eq!(CardFace::back().name(), "card_clubs_back");
    }

    #[test]
    fn test_index_round_trip() {
        assert_eq!(Suit::from_index(2), Some(Suit::Hearts));
        assert_eq!(Suit::from_index(4), None);
        assert_eq!(Rank::from_index(0), Some(Rank::Ace));
        assert_eq!(Rank::from_index(13), Some(Rank::Special));
        assert_eq!(Rank::from_index(14), None);
        assert!(!Rank::Special.is_playable());
    }

    #[test]
    fn test_sprite_cell() {
        let size = Size::new(69, 94);
        assert_eq!(CardFace::new(Suit::Clubs, Rank::Ace).sprite_cell(size), Rect::new(0, 0, 69, 94));
        assert_eq!(
            CardFace::new(Suit::Diamonds, Rank::King).sprite_cell(size),
            Rect::new(69 * 12, 94 * 3, 69, 94)
        );
        assert_eq!(CardFace::back().sprite_cell(size), Rect::new(69 * 13, 0, 69, 94));
    }

    #[test]
    fn test_flip_swaps_texture() {
        let front = TextureId(1);
        let back = TextureId(2);
        let mut card = CardState::new(CardFace::new(Suit::Hearts, Rank::Two), Some(front), Some(back));

        assert!(!card.is_revealed());
        assert_eq!(card.displayed(), Some(back));

        assert_eq!(card.flip(), Some(front));
        assert!(card.is_revealed());

        assert_eq!(card.flip(), Some(back));
        assert!(!card.is_revealed());
        assert_eq!(card.front(), Some(front));
    }
}
