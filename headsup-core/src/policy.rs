//! Scripted opponent profiles. Each archetype is a pure threshold table over
//! hand strength, equity, and pot odds, plus a dash of randomness. The state
//! machine applies whatever comes back exactly as it would a human action.

use crate::bet::Action;
use crate::card::Card;
use crate::equity::{equity_vs_random, EquityError};
use crate::state::Street;
use crate::Currency;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Samples per decision. Enough to separate a fold from a call; nowhere near
/// solver territory, and that's fine.
pub(crate) const POLICY_SAMPLES: u32 = 150;

const PUSH_FOLD_STACK_BB: Currency = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    AggressiveCaller,
    SmallBallTechnician,
    TankAnalyzer,
    ValueHunter,
    ShortStackGladiator,
}

pub const ALL_ARCHETYPES: [Archetype; 5] = [
    Archetype::AggressiveCaller,
    Archetype::SmallBallTechnician,
    Archetype::TankAnalyzer,
    Archetype::ValueHunter,
    Archetype::ShortStackGladiator,
];

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AggressiveCaller => write!(f, "Aggressive Caller"),
            Self::SmallBallTechnician => write!(f, "Small-ball Technician"),
            Self::TankAnalyzer => write!(f, "Tank Analyzer"),
            Self::ValueHunter => write!(f, "Value Hunter"),
            Self::ShortStackGladiator => write!(f, "Short-Stack Gladiator"),
        }
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "caller" | "aggressive-caller" => Self::AggressiveCaller,
            "smallball" | "small-ball" => Self::SmallBallTechnician,
            "tank" | "tank-analyzer" => Self::TankAnalyzer,
            "hunter" | "value-hunter" => Self::ValueHunter,
            "gladiator" | "short-stack" => Self::ShortStackGladiator,
            _ => {
                return Err(format!(
                    "Unknown archetype {:?}. Try caller, smallball, tank, hunter, or gladiator",
                    s
                ))
            }
        })
    }
}

/// Everything a profile is allowed to look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct PolicyView<'a> {
    pub street: Street,
    pub pocket: [Card; 2],
    pub board: &'a [Card],
    pub to_call: Currency,
    pub pot: Currency,
    pub stack: Currency,
    pub hero_stack: Currency,
    pub big_blind: Currency,
}

/// Chart-style preflop score in [0,1]. Pairs scale with rank; unpaired hands
/// score on high card with bonuses for suitedness and connectedness.
pub fn starting_hand_strength(pocket: [Card; 2]) -> f64 {
    let hi = pocket[0].rank.value().max(pocket[1].rank.value()) as f64;
    let lo = pocket[0].rank.value().min(pocket[1].rank.value()) as f64;
    if pocket[0].rank == pocket[1].rank {
        return 0.2 + 0.8 * hi / 14.0;
    }
    let mut s = 0.5 * hi / 14.0 + 0.1 * lo / 14.0;
    if pocket[0].suit == pocket[1].suit {
        s += 0.1;
    }
    let gap = hi - lo;
    if gap == 1.0 {
        s += 0.1;
    } else if gap == 2.0 {
        s += 0.05;
    }
    s.min(1.0)
}

/// Cost to call as a share of the pot after calling; zero when checking is
/// free.
pub(crate) fn pot_odds(to_call: Currency, pot: Currency) -> f64 {
    if to_call > 0 {
        to_call as f64 / (pot + to_call) as f64
    } else {
        0.0
    }
}

struct OpenTable {
    strength_min: f64,
    frequency: f64,
    raise_bb_lo: Currency,
    raise_bb_hi: Currency,
}

impl Archetype {
    fn open_table(self) -> OpenTable {
        match self {
            Self::AggressiveCaller => OpenTable {
                strength_min: 0.4,
                frequency: 0.7,
                raise_bb_lo: 2,
                raise_bb_hi: 3,
            },
            Self::SmallBallTechnician => OpenTable {
                strength_min: 0.5,
                frequency: 0.5,
                raise_bb_lo: 2,
                raise_bb_hi: 2,
            },
            Self::TankAnalyzer => OpenTable {
                strength_min: 0.6,
                frequency: 0.6,
                raise_bb_lo: 3,
                raise_bb_hi: 3,
            },
            Self::ValueHunter => OpenTable {
                strength_min: 0.55,
                frequency: 0.7,
                raise_bb_lo: 3,
                raise_bb_hi: 3,
            },
            Self::ShortStackGladiator => OpenTable {
                strength_min: 0.55,
                frequency: 0.6,
                raise_bb_lo: 3,
                raise_bb_hi: 3,
            },
        }
    }

    /// Choose one action. Pure aside from consuming randomness from `rng`;
    /// reproducible under a seeded generator.
    pub fn decide(self, view: &PolicyView<'_>, rng: &mut impl Rng) -> Result<Action, EquityError> {
        let strength = starting_hand_strength(view.pocket);
        let equity =
            equity_vs_random(view.pocket, view.board, POLICY_SAMPLES, rng)?.equity();
        let odds = pot_odds(view.to_call, view.pot);
        let bb = view.big_blind;

        // Push-fold mode preempts everything else for the Gladiator.
        if self == Self::ShortStackGladiator && view.stack < PUSH_FOLD_STACK_BB * bb {
            return Ok(if view.to_call > 0 {
                if equity > odds + 0.1 {
                    Action::AllIn
                } else {
                    Action::Fold
                }
            } else if equity > 0.48 {
                Action::AllIn
            } else {
                Action::CheckCall
            });
        }

        let action = match view.street {
            Street::PreFlop => {
                if view.to_call > 0 {
                    if strength > odds + 0.1 {
                        // The caller sometimes puts the pressure right back
                        if self == Self::AggressiveCaller && rng.gen::<f64>() < 0.2 {
                            Action::Raise(self.sized_raise(rng, bb))
                        } else {
                            Action::CheckCall
                        }
                    } else {
                        Action::Fold
                    }
                } else {
                    let t = self.open_table();
                    if strength >= t.strength_min && rng.gen::<f64>() < t.frequency {
                        Action::Raise(self.sized_raise(rng, bb))
                    } else {
                        Action::CheckCall
                    }
                }
            }
            _ => {
                if view.to_call > 0 {
                    if self == Self::AggressiveCaller && equity > 0.25 && rng.gen::<f64>() < 0.3 {
                        // Bluff-raise with a live draw
                        Action::Raise(self.sized_raise(rng, bb))
                    } else if equity > odds + 0.05 {
                        Action::CheckCall
                    } else {
                        Action::Fold
                    }
                } else if equity > 0.6 {
                    Action::Raise(rng.gen_range(1..=2) * bb)
                } else if equity > 0.3 && rng.gen::<f64>() < 0.4 {
                    Action::Raise(rng.gen_range(1..=2) * bb)
                } else {
                    Action::CheckCall
                }
            }
        };
        Ok(action)
    }

    fn sized_raise(self, rng: &mut impl Rng, bb: Currency) -> Currency {
        let t = self.open_table();
        rng.gen_range(t.raise_bb_lo..=t.raise_bb_hi) * bb
    }
}
