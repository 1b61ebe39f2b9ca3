//! Monte Carlo equity estimation against an unseen (or known) opponent hand.
//!
//! Each trial draws the opponent's pocket and the rest of the board uniformly
//! without replacement from the unseen pool, then scores the completed board
//! with the hand evaluator. No convergence guarantee beyond the law of large
//! numbers; callers pick the sample count they can afford.

use crate::card::Card;
use crate::deck::Deck;
use crate::hand::compare_with_board;
use rand::prelude::*;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

const BOARD_SIZE: usize = 5;
const POCKET_SIZE: usize = 2;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct EquityCounts {
    pub win: u64,
    pub tie: u64,
    pub lose: u64,
}

impl EquityCounts {
    pub fn total(&self) -> u64 {
        self.win + self.tie + self.lose
    }

    /// Win probability plus half the tie probability, in [0,1].
    pub fn equity(&self) -> f64 {
        let t = self.total() as f64;
        if t == 0.0 {
            return 0.0;
        }
        (self.win as f64 + 0.5 * self.tie as f64) / t
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum EquityError {
    /// Too few unseen cards left to deal an opponent hand and finish the
    /// board. Unreachable from normal play; guards degenerate inputs.
    DegeneratePool { available: usize, needed: usize },
}

impl Error for EquityError {}

impl fmt::Display for EquityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquityError::DegeneratePool { available, needed } => write!(
                f,
                "Equity pool is degenerate: need {} unseen cards, have {}",
                needed, available
            ),
        }
    }
}

fn tally(counts: &mut EquityCounts, ord: Ordering) {
    match ord {
        Ordering::Greater => counts.win += 1,
        Ordering::Equal => counts.tie += 1,
        Ordering::Less => counts.lose += 1,
    }
}

/// Estimate hero's equity versus a uniformly random opponent pocket, with the
/// board completed at random. `board` holds 0, 3, 4, or 5 known cards.
pub fn equity_vs_random(
    hero: [Card; POCKET_SIZE],
    board: &[Card],
    samples: u32,
    rng: &mut impl Rng,
) -> Result<EquityCounts, EquityError> {
    let mut known: Vec<Card> = hero.to_vec();
    known.extend_from_slice(board);
    let mut pool = Deck::remaining_after_excluding(&known);
    let needed = POCKET_SIZE + BOARD_SIZE.saturating_sub(board.len());
    if pool.len() < needed {
        return Err(EquityError::DegeneratePool {
            available: pool.len(),
            needed,
        });
    }

    let mut counts = EquityCounts::default();
    let mut completed: Vec<Card> = Vec::with_capacity(BOARD_SIZE);
    for _ in 0..samples {
        // A fresh partial Fisher-Yates per trial; the pool itself is only
        // permuted, so trials stay independent and uniform.
        let (drawn, _) = pool.partial_shuffle(rng, needed);
        let villain = [drawn[0], drawn[1]];
        completed.clear();
        completed.extend_from_slice(board);
        completed.extend_from_slice(&drawn[POCKET_SIZE..]);
        tally(&mut counts, compare_with_board(hero, villain, &completed));
    }
    Ok(counts)
}

/// Same sampling loop, but the opponent's pocket is known; only the board
/// runout varies. Used at showdown review and in statistical tests.
pub fn equity_vs_hand(
    hero: [Card; POCKET_SIZE],
    villain: [Card; POCKET_SIZE],
    board: &[Card],
    samples: u32,
    rng: &mut impl Rng,
) -> Result<EquityCounts, EquityError> {
    let mut known: Vec<Card> = hero.to_vec();
    known.extend_from_slice(&villain);
    known.extend_from_slice(board);
    let mut pool = Deck::remaining_after_excluding(&known);
    let needed = BOARD_SIZE.saturating_sub(board.len());
    if pool.len() < needed {
        return Err(EquityError::DegeneratePool {
            available: pool.len(),
            needed,
        });
    }

    let mut counts = EquityCounts::default();
    let mut completed: Vec<Card> = Vec::with_capacity(BOARD_SIZE);
    for _ in 0..samples {
        let (drawn, _) = pool.partial_shuffle(rng, needed);
        completed.clear();
        completed.extend_from_slice(board);
        completed.extend_from_slice(drawn);
        tally(&mut counts, compare_with_board(hero, villain, &completed));
    }
    Ok(counts)
}
