use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const SPADE: char = 's';
pub const HEART: char = 'h';
pub const DIAMOND: char = 'd';
pub const CLUB: char = 'c';
pub const ALL_SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
pub const ALL_RANKS: [Rank; 13] = [
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
    Rank::Ace,
];

#[derive(
    Hash, Enum, Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Serialize, Deserialize,
)]
pub enum Rank {
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
    Ace,
}

impl Rank {
    /// Numeric value, 2 through 14. Aces are always high here; the straight
    /// detection in the evaluator special-cases the wheel.
    pub fn value(&self) -> u8 {
        use Rank::*;
        match *self {
            Two => 2,
            Three => 3,
            Four => 4,
            Five => 5,
            Six => 6,
            Seven => 7,
            Eight => 8,
            Nine => 9,
            Ten => 10,
            Jack => 11,
            Queen => 12,
            King => 13,
            Ace => 14,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Two => write!(f, "2"),
            Self::Three => write!(f, "3"),
            Self::Four => write!(f, "4"),
            Self::Five => write!(f, "5"),
            Self::Six => write!(f, "6"),
            Self::Seven => write!(f, "7"),
            Self::Eight => write!(f, "8"),
            Self::Nine => write!(f, "9"),
            Self::Ten => write!(f, "T"),
            Self::Jack => write!(f, "J"),
            Self::Queen => write!(f, "Q"),
            Self::King => write!(f, "K"),
            Self::Ace => write!(f, "A"),
        }
    }
}

#[derive(Hash, Enum, Clone, Copy, Debug, PartialEq, Eq, Ord, Serialize, Deserialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            CLUB => Self::Club,
            DIAMOND => Self::Diamond,
            HEART => Self::Heart,
            SPADE => Self::Spade,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Club => write!(f, "{}", CLUB),
            Self::Diamond => write!(f, "{}", DIAMOND),
            Self::Heart => write!(f, "{}", HEART),
            Self::Spade => write!(f, "{}", SPADE),
        }
    }
}

/// All suits are equal
impl PartialOrd for Suit {
    fn partial_cmp(&self, _: &Self) -> Option<std::cmp::Ordering> {
        Some(std::cmp::Ordering::Equal)
    }
}

#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut i = s.chars();
        let r = i.next().ok_or_else(|| String::from("Empty card string"))?;
        let su = i.next().ok_or_else(|| format!("Missing suit in {:?}", s))?;
        if i.next().is_some() {
            return Err(format!("Trailing characters in {:?}", s));
        }
        let rank = Rank::from_char(r).ok_or_else(|| format!("Bad rank char {:?}", r))?;
        let suit = Suit::from_char(su).ok_or_else(|| format!("Bad suit char {:?}", su))?;
        Ok(Card { rank, suit })
    }
}

/// We only consider Card Rank when determining order
impl std::cmp::PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.rank.partial_cmp(&other.rank)
    }
}

/// We only consider Card Rank when determining order
impl std::cmp::Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }
}

/// Returns an UNSHUFFLED array of cards
pub fn all_cards() -> [Card; 52] {
    use itertools::Itertools;
    let mut cards: [Card; 52] = [Card::new(Rank::Ace, Suit::Club); 52];
    let c_iter = ALL_SUITS
        .iter()
        .cartesian_product(ALL_RANKS.iter())
        .map(|x| Card::new(*x.1, *x.0));
    for (i, c) in c_iter.enumerate() {
        cards[i] = c;
    }
    cards
}

/// Parse a run of two-character cards, e.g. "AhKs7d". Handy for fixtures and
/// the terminal driver.
pub fn cards_from_str(s: &str) -> Result<Vec<Card>, String> {
    if s.len() % 2 != 0 {
        return Err(format!("Need an even number of chars, got {:?}", s));
    }
    let chars: Vec<char> = s.chars().collect();
    chars.chunks(2).map(|c| {
        let mut buf = String::new();
        buf.push(c[0]);
        buf.push(c[1]);
        buf.parse()
    }).collect()
}
