pub mod bet;
pub mod cards;
pub mod equity;
pub mod log;
pub mod policy;
pub mod report;
pub mod state;

pub use cards::{card, deck, hand};

/// Chip amounts. One big blind is 100 of these.
pub type Currency = i32;
pub type SeqNum = usize;

#[derive(Debug, derive_more::Display)]
pub enum GameError {
    NotYourTurn,
    InvalidAction(String),
    Deck(deck::DeckError),
    Equity(equity::EquityError),
    HandInProgress,
    HandNotOver,
    MatchOver,
}

impl std::error::Error for GameError {}

impl From<deck::DeckError> for GameError {
    fn from(e: deck::DeckError) -> Self {
        GameError::Deck(e)
    }
}

impl From<equity::EquityError> for GameError {
    fn from(e: equity::EquityError) -> Self {
        GameError::Equity(e)
    }
}
