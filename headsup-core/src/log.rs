use crate::bet::Action;
use crate::card::Card;
use crate::hand::HandRank;
use crate::state::{Seat, Street};
use crate::{Currency, SeqNum};
use serde::{Deserialize, Serialize};

/// One recorded decision, with everything needed to replay and grade it
/// later: the equity inputs (pocket, board) and the price being offered
/// (amount owed, pot before the chips went in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub street: Street,
    pub seat: Seat,
    pub action: Action,
    /// Chips actually moved into the pot by this action, after stack capping.
    pub chips: Currency,
    /// What the actor owed to match at decision time.
    pub to_call: Currency,
    pub pot_before: Currency,
    pub pot_after: Currency,
    pub board: Vec<Card>,
    pub pocket: [Card; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogItem {
    HandStart {
        hand_num: u32,
        button: Seat,
    },
    Blind {
        seat: Seat,
        amount: Currency,
        big: bool,
    },
    Action(ActionRecord),
    Flop(Card, Card, Card),
    TurnCard(Card),
    RiverCard(Card),
    /// Terminal result. `winner` is None on a split pot. Hand ranks are None
    /// when the pot was awarded on a fold.
    Showdown {
        winner: Option<Seat>,
        pot: Currency,
        player_rank: Option<HandRank>,
        opponent_rank: Option<HandRank>,
    },
}

impl std::fmt::Display for LogItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogItem::HandStart { hand_num, button } => {
                write!(f, "Hand {} begins; button is {}", hand_num, button)
            }
            LogItem::Blind { seat, amount, big } => {
                let which = if *big { "big" } else { "small" };
                write!(f, "{} posts {} blind of {}", seat, which, amount)
            }
            LogItem::Action(r) => write!(
                f,
                "[{}] {} does {} for {} (pot {})",
                r.street, r.seat, r.action, r.chips, r.pot_after
            ),
            LogItem::Flop(c1, c2, c3) => write!(f, "Flop: {} {} {}", c1, c2, c3),
            LogItem::TurnCard(c) => write!(f, "Turn: {}", c),
            LogItem::RiverCard(c) => write!(f, "River: {}", c),
            LogItem::Showdown { winner, pot, .. } => match winner {
                Some(seat) => write!(f, "{} wins pot of {}", seat, pot),
                None => write!(f, "Pot of {} is split", pot),
            },
        }
    }
}

/// Ordered, sequence-numbered record of the current hand, with earlier hands
/// kept in an archive. `rotate` is called when a new hand starts.
#[derive(Debug, PartialEq, Eq, Default, Clone, Serialize, Deserialize)]
pub struct Log {
    active: Vec<(SeqNum, LogItem)>,
    archive: Vec<(SeqNum, LogItem)>,
    last_seq_num: SeqNum,
}

impl Log {
    pub fn push(&mut self, item: LogItem) {
        let seq = self.last_seq_num + 1;
        self.active.push((seq, item));
        self.last_seq_num = seq;
    }

    pub fn rotate(&mut self) {
        self.archive.append(&mut self.active);
    }

    /// Items for the hand in progress (or just finished).
    pub fn hand_items(&self) -> impl Iterator<Item = &LogItem> {
        self.active.iter().map(|(_, item)| item)
    }

    pub fn items_since(&self, oldest_seq: SeqNum) -> impl Iterator<Item = (SeqNum, LogItem)> + '_ {
        let iter1 = self
            .archive
            .iter()
            .skip_while(move |(seq, _item)| *seq <= oldest_seq)
            .cloned();
        let iter2 = self
            .active
            .iter()
            .skip_while(move |(seq, _item)| *seq <= oldest_seq)
            .cloned();
        iter1.chain(iter2)
    }
}
