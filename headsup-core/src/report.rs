//! Post-hand grading. Each decision the human made is re-scored by the
//! equity estimator against the board they could see at the time, then turned
//! into two lines of advice: one about the price (equity versus pot odds) and
//! one about how the line reads to an observer.

use crate::bet::Action;
use crate::equity::{equity_vs_random, EquityError};
use crate::hand::{pocket_class, HandClass};
use crate::log::ActionRecord;
use crate::policy::pot_odds;
use crate::state::Street;
use crate::Currency;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Samples per graded decision. The report runs once per hand, so this stays
/// modest.
pub(crate) const REPORT_SAMPLES: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub street: Street,
    pub action: Action,
    pub chips: Currency,
    /// Estimated equity at the moment of the decision.
    pub equity: f64,
    pub pot_odds: f64,
    pub ev_advice: String,
    pub disguise_advice: String,
}

/// The margin a call has to clear over pot odds before we call it good.
/// Preflop estimates are noisier, so the bar is higher there.
fn call_margin(street: Street) -> f64 {
    match street {
        Street::PreFlop => 0.1,
        _ => 0.05,
    }
}

fn percent(x: f64) -> f64 {
    (x * 100.0).round()
}

fn ev_advice(r: &ActionRecord, equity: f64, odds: f64) -> String {
    let margin = call_margin(r.street);
    match r.action {
        Action::Fold => {
            if r.to_call == 0 {
                String::from("Folding when checking was free surrenders the pot for nothing.")
            } else if equity > odds + margin {
                format!(
                    "Too tight: roughly {}% equity against {}% pot odds justified continuing.",
                    percent(equity),
                    percent(odds)
                )
            } else {
                format!(
                    "Good fold: roughly {}% equity did not cover {}% pot odds.",
                    percent(equity),
                    percent(odds)
                )
            }
        }
        Action::CheckCall if r.to_call > 0 => {
            if equity > odds + margin {
                format!(
                    "Good call: roughly {}% equity comfortably beats {}% pot odds.",
                    percent(equity),
                    percent(odds)
                )
            } else if equity < odds {
                format!(
                    "Paying too much: roughly {}% equity against {}% pot odds favors a fold.",
                    percent(equity),
                    percent(odds)
                )
            } else {
                format!(
                    "Thin call: roughly {}% equity barely covers {}% pot odds.",
                    percent(equity),
                    percent(odds)
                )
            }
        }
        Action::CheckCall => {
            if equity > 0.6 {
                format!(
                    "Missed value: roughly {}% equity wanted a bet here.",
                    percent(equity)
                )
            } else {
                String::from("Checking is fine; nothing about this spot demands a bet.")
            }
        }
        Action::Raise(_) | Action::AllIn => {
            if equity > 0.6 {
                format!(
                    "Good value raise: roughly {}% equity wants chips in the middle.",
                    percent(equity)
                )
            } else if equity > 0.3 {
                format!(
                    "Semi-bluff: roughly {}% equity backs up the aggression if called.",
                    percent(equity)
                )
            } else {
                format!(
                    "Pure bluff: roughly {}% equity means this only works when they fold.",
                    percent(equity)
                )
            }
        }
    }
}

fn disguise_advice(r: &ActionRecord) -> String {
    if matches!(r.action, Action::Fold) {
        return String::from("A fold shows nothing; no deception concerns.");
    }
    let class = pocket_class(r.pocket, &r.board);
    let strong = class >= HandClass::TwoPair;
    match (r.action.is_aggressive(), strong) {
        (true, false) => format!(
            "You represented more than {}; the story only holds if you can keep telling it.",
            class
        ),
        (false, true) => format!(
            "Slow-playing {} disguises your strength but gives free cards to worse hands.",
            class
        ),
        (true, true) => format!(
            "Betting {} is the straightforward line; strong hands want a growing pot.",
            class
        ),
        (false, false) => format!(
            "Playing {} passively keeps the pot small, which suits the hand.",
            class
        ),
    }
}

pub(crate) fn build(
    records: &[ActionRecord],
    rng: &mut impl Rng,
) -> Result<Vec<ReportRow>, EquityError> {
    let mut rows = Vec::with_capacity(records.len());
    for r in records {
        let equity = equity_vs_random(r.pocket, &r.board, REPORT_SAMPLES, rng)?.equity();
        let odds = pot_odds(r.to_call, r.pot_before);
        rows.push(ReportRow {
            street: r.street,
            action: r.action,
            chips: r.chips,
            equity,
            pot_odds: odds,
            ev_advice: ev_advice(r, equity, odds),
            disguise_advice: disguise_advice(r),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::cards_from_str;
    use crate::state::Seat;
    use rand_chacha::ChaChaRng;
    use rand::SeedableRng;

    fn pocket(s: &str) -> [crate::card::Card; 2] {
        let v = cards_from_str(s).unwrap();
        [v[0], v[1]]
    }

    fn record(
        street: Street,
        action: Action,
        pocket_s: &str,
        board_s: &str,
        to_call: Currency,
        pot_before: Currency,
    ) -> ActionRecord {
        ActionRecord {
            street,
            seat: Seat::Player,
            action,
            chips: 0,
            to_call,
            pot_before,
            pot_after: pot_before,
            board: cards_from_str(board_s).unwrap(),
            pocket: pocket(pocket_s),
        }
    }

    #[test]
    fn folding_aces_is_flagged_as_tight() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        let r = record(Street::PreFlop, Action::Fold, "AhAs", "", 100, 150);
        let rows = build(&[r], &mut rng).unwrap();
        assert!(rows[0].ev_advice.contains("Too tight"), "{}", rows[0].ev_advice);
    }

    #[test]
    fn folding_trash_to_a_big_bet_is_praised() {
        let mut rng = ChaChaRng::seed_from_u64(2);
        // 72o facing a huge bet: terrible price
        let r = record(Street::PreFlop, Action::Fold, "7h2s", "", 2_000, 300);
        let rows = build(&[r], &mut rng).unwrap();
        assert!(rows[0].ev_advice.contains("Good fold"), "{}", rows[0].ev_advice);
    }

    #[test]
    fn checking_a_monster_misses_value() {
        let mut rng = ChaChaRng::seed_from_u64(3);
        // Top set on a dry flop, checked with no bet owed
        let r = record(Street::Flop, Action::CheckCall, "AhAs", "Ad7c2h", 0, 400);
        let rows = build(&[r], &mut rng).unwrap();
        assert!(rows[0].ev_advice.contains("Missed value"), "{}", rows[0].ev_advice);
    }

    #[test]
    fn bluff_with_air_is_called_out() {
        let mut rng = ChaChaRng::seed_from_u64(4);
        // Bottom-of-the-deck high card raising into a scary board
        let r = record(Street::River, Action::Raise(300), "3h2s", "AdKcQh9d8c", 0, 600);
        let rows = build(&[r], &mut rng).unwrap();
        assert!(rows[0].ev_advice.contains("bluff"), "{}", rows[0].ev_advice);
        assert!(
            rows[0].disguise_advice.contains("represented more"),
            "{}",
            rows[0].disguise_advice
        );
    }

    #[test]
    fn slow_play_is_noted() {
        let mut rng = ChaChaRng::seed_from_u64(5);
        // Flopped trips, just calling a small bet
        let r = record(Street::Flop, Action::CheckCall, "AhAs", "Ad7c2h", 100, 600);
        let rows = build(&[r], &mut rng).unwrap();
        assert!(
            rows[0].disguise_advice.contains("Slow-playing"),
            "{}",
            rows[0].disguise_advice
        );
    }

    #[test]
    fn rows_carry_the_decision_context() {
        let mut rng = ChaChaRng::seed_from_u64(6);
        let r = record(Street::Turn, Action::CheckCall, "KhKs", "2c7d9hJs", 200, 800);
        let rows = build(&[r], &mut rng).unwrap();
        assert_eq!(rows[0].street, Street::Turn);
        assert_eq!(rows[0].action, Action::CheckCall);
        assert!((rows[0].pot_odds - 0.2).abs() < 1e-9);
        assert!(rows[0].equity > 0.0 && rows[0].equity < 1.0);
    }
}
