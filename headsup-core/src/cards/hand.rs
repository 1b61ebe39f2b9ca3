use super::card::{Card, Rank, ALL_RANKS};
use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HandClass {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandClass {
    pub fn describe(self) -> &'static str {
        match self {
            Self::HighCard => "high card",
            Self::Pair => "a pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "a straight",
            Self::Flush => "a flush",
            Self::FullHouse => "a full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "a straight flush",
        }
    }
}

impl std::fmt::Display for HandClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A fully-ranked 5-card hand: class first, then kicker values high to low.
/// Field order matters: the derived Ord is class, then the tie-break values
/// compared lexicographically. Unused tail slots stay zero.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HandRank {
    pub class: HandClass,
    pub tiebreak: [u8; 5],
}

impl HandRank {
    fn new(class: HandClass, vals: &[u8]) -> Self {
        let mut tiebreak = [0u8; 5];
        tiebreak[..vals.len()].copy_from_slice(vals);
        HandRank { class, tiebreak }
    }
}

impl std::fmt::Display for HandRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class)
    }
}

/// If the five distinct ranks (descending) form a straight, the straight's
/// high card value. The wheel counts as a five-high straight.
fn straight_high(distinct_desc: &[Rank]) -> Option<u8> {
    if distinct_desc.len() != 5 {
        return None;
    }
    let v: Vec<u8> = distinct_desc.iter().map(|r| r.value()).collect();
    if v[0] - v[4] == 4 {
        return Some(v[0]);
    }
    if v == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

/// Rank exactly five cards.
pub fn rank_five(cards: [Card; 5]) -> HandRank {
    let mut counts: EnumMap<Rank, u8> = EnumMap::default();
    for c in &cards {
        counts[c.rank] += 1;
    }
    // distinct ranks, highest first
    let distinct: Vec<Rank> = ALL_RANKS
        .iter()
        .rev()
        .copied()
        .filter(|r| counts[*r] > 0)
        .collect();
    let flush = cards.iter().map(|c| c.suit).all_equal();
    let straight = straight_high(&distinct);
    // (count, rank) groups, biggest group first, ties broken by rank
    let mut groups: Vec<(u8, Rank)> = distinct.iter().map(|&r| (counts[r], r)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    if flush {
        if let Some(hi) = straight {
            return HandRank::new(HandClass::StraightFlush, &[hi]);
        }
    }
    if groups[0].0 == 4 {
        return HandRank::new(
            HandClass::FourOfAKind,
            &[groups[0].1.value(), groups[1].1.value()],
        );
    }
    if groups[0].0 == 3 && groups[1].0 == 2 {
        return HandRank::new(
            HandClass::FullHouse,
            &[groups[0].1.value(), groups[1].1.value()],
        );
    }
    if flush {
        let vals: Vec<u8> = distinct.iter().map(|r| r.value()).collect();
        return HandRank::new(HandClass::Flush, &vals);
    }
    if let Some(hi) = straight {
        return HandRank::new(HandClass::Straight, &[hi]);
    }
    if groups[0].0 == 3 {
        return HandRank::new(
            HandClass::ThreeOfAKind,
            &[
                groups[0].1.value(),
                groups[1].1.value(),
                groups[2].1.value(),
            ],
        );
    }
    if groups[0].0 == 2 && groups[1].0 == 2 {
        return HandRank::new(
            HandClass::TwoPair,
            &[
                groups[0].1.value(),
                groups[1].1.value(),
                groups[2].1.value(),
            ],
        );
    }
    if groups[0].0 == 2 {
        return HandRank::new(
            HandClass::Pair,
            &[
                groups[0].1.value(),
                groups[1].1.value(),
                groups[2].1.value(),
                groups[3].1.value(),
            ],
        );
    }
    let vals: Vec<u8> = distinct.iter().map(|r| r.value()).collect();
    HandRank::new(HandClass::HighCard, &vals)
}

/// Best rank achievable from 5 to 7 cards, by brute-force enumeration of all
/// 5-card subsets. C(7,5) is 21 hands; cheap and exact.
pub fn best_rank(cards: &[Card]) -> HandRank {
    assert!(
        (5..=7).contains(&cards.len()),
        "hand evaluation needs 5 to 7 cards, got {}",
        cards.len()
    );
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|combo| {
            let mut five = [combo[0]; 5];
            five.copy_from_slice(&combo);
            rank_five(five)
        })
        .max()
        .expect("at least one 5-card subset")
}

/// Showdown comparison of two pockets over a shared board. Antisymmetric and
/// transitive; also used to score equity simulation trials.
pub fn compare_with_board(a: [Card; 2], b: [Card; 2], board: &[Card]) -> Ordering {
    let mut ha: Vec<Card> = a.to_vec();
    ha.extend_from_slice(board);
    let mut hb: Vec<Card> = b.to_vec();
    hb.extend_from_slice(board);
    best_rank(&ha).cmp(&best_rank(&hb))
}

/// What a pocket currently amounts to: made-hand class once there is a board,
/// pair-or-high-card before the flop. Used when grading played hands.
pub fn pocket_class(pocket: [Card; 2], board: &[Card]) -> HandClass {
    if board.len() >= 3 {
        let mut cards = pocket.to_vec();
        cards.extend_from_slice(board);
        best_rank(&cards).class
    } else if pocket[0].rank == pocket[1].rank {
        HandClass::Pair
    } else {
        HandClass::HighCard
    }
}
