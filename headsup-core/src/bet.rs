use crate::Currency;
use serde::{Deserialize, Serialize};

/// What an actor can do on their turn. `CheckCall` is a check when nothing is
/// owed and a call (capped at the stack) otherwise. `Raise` carries the amount
/// on top of whatever is owed to match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Fold,
    CheckCall,
    Raise(Currency),
    AllIn,
}

impl Action {
    pub const fn is_aggressive(&self) -> bool {
        matches!(self, Action::Raise(_) | Action::AllIn)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "Fold"),
            Action::CheckCall => write!(f, "Check/Call"),
            Action::Raise(v) => write!(f, "Raise(+{})", v),
            Action::AllIn => write!(f, "AllIn"),
        }
    }
}
