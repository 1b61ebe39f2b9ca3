use super::card::{all_cards, Card};
use base64ct::{self, Base64, Encoding};
use rand::prelude::*;
use rand_chacha::ChaChaRng;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub const DECK_LEN: usize = 52;
const SEED_LEN: usize = 32;
const ENCODED_SEED_LEN: usize = 4 * ((SEED_LEN + 3 - 1) / 3); // 4 * ceil(SEED_LEN / 3)

#[derive(PartialEq, Debug)]
pub enum DeckError {
    OutOfCards,
    SeedDecodeError(base64ct::Error),
}

impl Error for DeckError {}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::OutOfCards => write!(f, "No more cards in deck"),
            DeckError::SeedDecodeError(e) => write!(f, "{}", e),
        }
    }
}

impl From<base64ct::Error> for DeckError {
    fn from(e: base64ct::Error) -> Self {
        Self::SeedDecodeError(e)
    }
}

#[derive(Debug, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new(&DeckSeed::default())
    }
}

impl Deck {
    /// Generate a new single deck of cards, shuffled deterministically from
    /// the given seed. The same seed always produces the same order.
    pub fn new(seed: &DeckSeed) -> Self {
        let mut rng = ChaChaRng::from_seed(seed.0);
        let mut cards = all_cards().to_vec();
        cards.shuffle(&mut rng);
        Deck { cards }
    }

    /// Draw the topmost card and return it, or return an error if there are no
    /// more cards.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::OutOfCards)
    }

    pub fn burn(&mut self) {
        self.cards.pop();
    }

    /// Deal two heads-up pockets, one card at a time, alternating.
    pub fn deal_pockets(&mut self) -> Result<([Card; 2], [Card; 2]), DeckError> {
        let a1 = self.draw()?;
        let b1 = self.draw()?;
        let a2 = self.draw()?;
        let b2 = self.draw()?;
        Ok(([a1, a2], [b1, b2]))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The subset of a fresh 52-card deck not present in `known`. Simulation
    /// draws from this pool so the live dealing order is never disturbed.
    pub fn remaining_after_excluding(known: &[Card]) -> Vec<Card> {
        all_cards()
            .into_iter()
            .filter(|c| !known.contains(c))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckSeed([u8; SEED_LEN]);

impl DeckSeed {
    pub fn new(b: [u8; SEED_LEN]) -> Self {
        Self(b)
    }

    /// Derive a seed from an already-seeded generator, so one match-level seed
    /// reproduces every hand's deck.
    pub fn from_rng(rng: &mut impl RngCore) -> Self {
        let mut b = [0u8; SEED_LEN];
        rng.fill_bytes(&mut b);
        Self(b)
    }
}

impl Default for DeckSeed {
    fn default() -> Self {
        Self::from_rng(&mut thread_rng())
    }
}

impl fmt::Display for DeckSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b = [0u8; ENCODED_SEED_LEN];
        Base64::encode(&self.0, &mut b).unwrap();
        write!(f, "{}", String::from_utf8_lossy(&b))
    }
}

impl FromStr for DeckSeed {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut b: [u8; SEED_LEN] = [0; SEED_LEN];
        Base64::decode(s, &mut b)?;
        Ok(DeckSeed(b))
    }
}
