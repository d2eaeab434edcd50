//! Dealing distinct card faces.

use log::debug;
use thiserror::Error;

use super::card::{CardFace, Rank, Suit};
use crate::core::GameRng;

/// Number of distinct playable faces.
pub const DISTINCT_FACES: usize = Suit::ALL.len() * Rank::PLAYABLE.len();

/// Dealing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("cannot deal {requested} distinct faces, only {DISTINCT_FACES} exist")]
    TooManyPairs { requested: usize },
}

/// Draw one uniformly random playable face.
pub fn random_face(rng: &mut GameRng) -> CardFace {
    let suit = Suit::ALL[rng.gen_range_usize(0..Suit::ALL.len())];
    let rank = Rank::PLAYABLE[rng.gen_range_usize(0..Rank::PLAYABLE.len())];
    CardFace::new(suit, rank)
}

/// Pick `pairs` faces with pairwise distinct keys.
///
/// Each draw is rejected and redrawn while its key is already taken, so
/// the result holds exactly `pairs` different identities in draw order.
pub fn pick_faces(rng: &mut GameRng, pairs: usize) -> Result<Vec<CardFace>, DeckError> {
    if pairs > DISTINCT_FACES {
        return Err(DeckError::TooManyPairs { requested: pairs });
    }

    let mut picked: Vec<CardFace> = Vec::with_capacity(pairs);
    while picked.len() < pairs {
        let face = random_face(rng);
        if picked.iter().any(|p| p.key() == face.key()) {
            continue;
        }
        debug!("[Deck] Picked {}", face);
        picked.push(face);
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_distinct() {
        let mut rng = GameRng::new(42);
        let faces = pick_faces(&mut rng, 20).unwrap();

        assert_eq!(faces.len(), 20);
        let mut keys: Vec<_> = faces.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 20);
        assert!(faces.iter().all(|f| f.rank.is_playable()));
    }

    #[test]
    fn test_pick_whole_deck() {
        let mut rng = GameRng::new(7);
        let faces = pick_faces(&mut rng, DISTINCT_FACES).unwrap();
        assert_eq!(faces.len(), 52);
    }

    #[test]
    fn test_pick_too_many() {
        let mut rng = GameRng::new(7);
        assert_eq!(
            pick_faces(&mut rng, 53),
            Err(DeckError::TooManyPairs { requested: 53 })
        );
    }

    #[test]
    fn test_pick_is_deterministic() {
        let a = pick_faces(&mut GameRng::new(3), 10).unwrap();
        let b = pick_faces(&mut GameRng::new(3), 10).unwrap();
        assert_eq!(a, b);
    }
}
