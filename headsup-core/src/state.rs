//! The betting state machine. One `GameState` is a whole heads-up match: the
//! stacks and button persist across hands, everything else is reset by
//! `start_hand`. All mutation goes through `start_hand`, `submit_action`, and
//! `opponent_act`; the host reads `public_view` and `hand_report`.

use crate::bet::Action;
use crate::card::Card;
use crate::deck::{Deck, DeckSeed};
use crate::hand::{best_rank, HandRank};
use crate::log::{ActionRecord, Log, LogItem};
use crate::policy::{Archetype, PolicyView};
use crate::report::{self, ReportRow};
use crate::{Currency, GameError};
use enum_map::{Enum, EnumMap};
use rand::prelude::*;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const COMMUNITY_SIZE: usize = 5;
pub const BIG_BLIND: Currency = 100;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Enum, derive_more::Display, Serialize, Deserialize,
)]
pub enum Seat {
    Player,
    Opponent,
}

impl Seat {
    pub const fn other(self) -> Seat {
        match self {
            Seat::Player => Seat::Opponent,
            Seat::Opponent => Seat::Player,
        }
    }
}

#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Hash, derive_more::Display, Serialize, Deserialize,
)]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

/// States a hand can be in. `Showdown` is transient: it is entered when the
/// hand resolves (by fold or river settlement) and immediately gives way to
/// `EndOfHand` once the pot is awarded.
#[derive(Debug, PartialEq, Eq, Clone, Copy, derive_more::Display, Serialize, Deserialize)]
pub enum State {
    NotStarted,
    Street(Street),
    Showdown,
    EndOfHand,
}

/// Starting-stack presets. `Big` favors the player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
pub enum StackScenario {
    Equal,
    Short,
    Big,
}

impl StackScenario {
    fn stacks(self, bb: Currency) -> (Currency, Currency) {
        match self {
            Self::Equal => (100 * bb, 100 * bb),
            Self::Short => (20 * bb, 20 * bb),
            Self::Big => (150 * bb, 50 * bb),
        }
    }
}

impl FromStr for StackScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "equal" => Self::Equal,
            "short" => Self::Short,
            "big" => Self::Big,
            _ => return Err(format!("Unknown scenario {:?}. Try equal, short, or big", s)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub stack: Currency,
    pub pocket: Option<[Card; 2]>,
    /// Chips committed this betting round. Reset at each street.
    pub street_bet: Currency,
    pub folded: bool,
    pub all_in: bool,
}

impl Player {
    fn new(stack: Currency) -> Self {
        Self {
            stack,
            pocket: None,
            street_bet: 0,
            folded: false,
            all_in: false,
        }
    }

    fn reset_for_hand(&mut self) {
        self.pocket = None;
        self.street_bet = 0;
        self.folded = false;
        self.all_in = false;
    }

    const fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Move up to `amount` from stack to this street's bet; an emptied stack
    /// marks the player all in. Returns the chips actually moved.
    fn commit(&mut self, amount: Currency) -> Currency {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.street_bet += moved;
        if self.stack == 0 {
            self.all_in = true;
        }
        moved
    }
}

/// Snapshot for the host. The opponent's pocket is withheld until it is
/// legitimately visible (a fold or a showdown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicView {
    pub state: State,
    pub pot: Currency,
    pub board: Vec<Card>,
    pub player_stack: Currency,
    pub opponent_stack: Currency,
    pub player_pocket: Option<[Card; 2]>,
    pub turn: Seat,
    pub button: Seat,
    pub hand_num: u32,
    pub opponent_cards_visible: bool,
    pub opponent_pocket: Option<[Card; 2]>,
    pub match_over: bool,
}

#[derive(Debug)]
pub struct GameState {
    __state_dont_change_directly: State,
    players: EnumMap<Seat, Player>,
    button: Seat,
    turn: Seat,
    board: [Option<Card>; COMMUNITY_SIZE],
    pot: Currency,
    big_blind: Currency,
    deck: Deck,
    archetype: Archetype,
    hand_num: u32,
    /// Who has spoken this street. A street only closes once the bets are
    /// level and everyone still able to act has had their say.
    acted: EnumMap<Seat, bool>,
    logs: Log,
    rng: ChaChaRng,
    /// Sum of both starting stacks; the pot and stacks must always add back
    /// up to this.
    chip_total: Currency,
}

impl GameState {
    pub fn new(scenario: StackScenario, archetype: Archetype) -> Self {
        Self::with_rng(scenario, archetype, ChaChaRng::from_entropy())
    }

    /// Deterministic match: the seed drives every deck, every opponent
    /// decision, and every equity estimate.
    pub fn seeded(scenario: StackScenario, archetype: Archetype, seed: u64) -> Self {
        Self::with_rng(scenario, archetype, ChaChaRng::seed_from_u64(seed))
    }

    fn with_rng(scenario: StackScenario, archetype: Archetype, rng: ChaChaRng) -> Self {
        let (player_stack, opponent_stack) = scenario.stacks(BIG_BLIND);
        Self {
            __state_dont_change_directly: State::NotStarted,
            players: EnumMap::from_array([Player::new(player_stack), Player::new(opponent_stack)]),
            // First start_hand swaps this, putting the player on the button.
            button: Seat::Opponent,
            turn: Seat::Player,
            board: [None; COMMUNITY_SIZE],
            pot: 0,
            big_blind: BIG_BLIND,
            deck: Deck::default(),
            archetype,
            hand_num: 0,
            acted: EnumMap::default(),
            logs: Log::default(),
            rng,
            chip_total: player_stack + opponent_stack,
        }
    }

    fn change_state(&mut self, new: State) {
        ::log::debug!(
            "state {} -> {}",
            self.__state_dont_change_directly,
            new
        );
        // this is the only place the state should ever be changed directly
        self.__state_dont_change_directly = new;
    }

    pub const fn state(&self) -> State {
        self.__state_dont_change_directly
    }

    pub const fn pot(&self) -> Currency {
        self.pot
    }

    pub const fn turn(&self) -> Seat {
        self.turn
    }

    pub const fn button(&self) -> Seat {
        self.button
    }

    pub const fn big_blind(&self) -> Currency {
        self.big_blind
    }

    pub const fn hand_num(&self) -> u32 {
        self.hand_num
    }

    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat]
    }

    pub fn board_cards(&self) -> Vec<Card> {
        self.board.iter().flatten().copied().collect()
    }

    /// The match is decided once a hand ends with a busted stack.
    pub fn match_over(&self) -> bool {
        matches!(self.state(), State::NotStarted | State::EndOfHand)
            && self.players.values().any(|p| p.stack == 0)
    }

    pub fn match_winner(&self) -> Option<Seat> {
        if !self.match_over() {
            return None;
        }
        self.players
            .iter()
            .find(|(_, p)| p.stack == self.chip_total)
            .map(|(s, _)| s)
    }

    fn assert_chip_conservation(&self) {
        debug_assert_eq!(
            self.pot + self.players.values().map(|p| p.stack).sum::<Currency>(),
            self.chip_total,
            "chips were created or destroyed"
        );
    }

    /// Begin the next hand: swap the button, reset per-hand state, deal, and
    /// post blinds. The button posts the small blind and acts last; the big
    /// blind seat opens the action on every street.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        match self.state() {
            State::NotStarted | State::EndOfHand => {}
            _ => return Err(GameError::HandInProgress),
        }
        if self.match_over() {
            return Err(GameError::MatchOver);
        }
        self.hand_num += 1;
        self.button = self.button.other();
        self.logs.rotate();
        for p in self.players.values_mut() {
            p.reset_for_hand();
        }
        self.board = [None; COMMUNITY_SIZE];
        self.pot = 0;
        self.acted = EnumMap::default();
        let seed = DeckSeed::from_rng(&mut self.rng);
        self.deck = Deck::new(&seed);
        self.logs.push(LogItem::HandStart {
            hand_num: self.hand_num,
            button: self.button,
        });

        let (a, b) = self.deck.deal_pockets()?;
        self.players[self.button].pocket = Some(a);
        self.players[self.button.other()].pocket = Some(b);

        let sb_seat = self.button;
        let bb_seat = self.button.other();
        let sb_paid = self.players[sb_seat].commit(self.big_blind / 2);
        self.pot += sb_paid;
        self.logs.push(LogItem::Blind {
            seat: sb_seat,
            amount: sb_paid,
            big: false,
        });
        let bb_paid = self.players[bb_seat].commit(self.big_blind);
        self.pot += bb_paid;
        self.logs.push(LogItem::Blind {
            seat: bb_seat,
            amount: bb_paid,
            big: true,
        });
        self.change_state(State::Street(Street::PreFlop));
        self.assert_chip_conservation();

        // A short stack can be all in off the blinds alone, in which case
        // some or all of the preflop decisions vanish.
        if self.players[bb_seat].can_act() && self.players[sb_seat].can_act() {
            self.turn = bb_seat;
        } else if self.players[sb_seat].can_act()
            && self.players[sb_seat].street_bet < self.players[bb_seat].street_bet
        {
            // Big blind is all in; the button still owes a decision.
            self.turn = sb_seat;
        } else {
            // Nobody can act. Refund any uncalled blind and run the hand out.
            return self.settle_street(Street::PreFlop);
        }
        Ok(())
    }

    /// Apply one action for the seat whose turn it is. Everything the host or
    /// the opponent policy does to a hand funnels through here.
    pub fn submit_action(&mut self, seat: Seat, action: Action) -> Result<(), GameError> {
        let street = match self.state() {
            State::Street(s) => s,
            _ => return Err(GameError::NotYourTurn),
        };
        if seat != self.turn {
            return Err(GameError::NotYourTurn);
        }
        if let Action::Raise(x) = action {
            if x < 0 {
                return Err(GameError::InvalidAction(format!(
                    "raise amount {} is negative",
                    x
                )));
            }
        }

        let owed =
            (self.players[seat.other()].street_bet - self.players[seat].street_bet).max(0);
        let pot_before = self.pot;

        if matches!(action, Action::Fold) {
            self.players[seat].folded = true;
            self.log_action(street, seat, action, 0, owed, pot_before);
            self.change_state(State::Showdown);
            return self.resolve_showdown();
        }

        let stake = match action {
            Action::CheckCall => owed,
            Action::AllIn => self.players[seat].stack,
            Action::Raise(x) => owed + x,
            Action::Fold => unreachable!(),
        };
        let moved = self.players[seat].commit(stake);
        self.pot += moved;
        self.acted[seat] = true;
        self.log_action(street, seat, action, moved, owed, pot_before);
        self.assert_chip_conservation();
        self.continue_or_settle(street)
    }

    /// Compute and apply the scripted opponent's action. This is the single
    /// suspension point the host drives; any thinking delay is presentation.
    pub fn opponent_act(&mut self) -> Result<Action, GameError> {
        let street = match self.state() {
            State::Street(s) => s,
            _ => return Err(GameError::NotYourTurn),
        };
        if self.turn != Seat::Opponent {
            return Err(GameError::NotYourTurn);
        }
        let me = self.players[Seat::Opponent];
        let hero = self.players[Seat::Player];
        let pocket = me.pocket.expect("pockets are dealt before any turn");
        let board = self.board_cards();
        let view = PolicyView {
            street,
            pocket,
            board: &board,
            to_call: (hero.street_bet - me.street_bet).max(0),
            pot: self.pot,
            stack: me.stack,
            hero_stack: hero.stack,
            big_blind: self.big_blind,
        };
        let action = self.archetype.decide(&view, &mut self.rng)?;
        self.submit_action(Seat::Opponent, action)?;
        Ok(action)
    }

    fn log_action(
        &mut self,
        street: Street,
        seat: Seat,
        action: Action,
        chips: Currency,
        to_call: Currency,
        pot_before: Currency,
    ) {
        let record = ActionRecord {
            street,
            seat,
            action,
            chips,
            to_call,
            pot_before,
            pot_after: self.pot,
            board: self.board_cards(),
            pocket: self.players[seat].pocket.expect("pockets are dealt before any turn"),
        };
        self.logs.push(LogItem::Action(record));
    }

    /// After a non-fold action: either pass the turn, or close the street.
    fn continue_or_settle(&mut self, street: Street) -> Result<(), GameError> {
        let lo_seat = if self.players[Seat::Player].street_bet
            <= self.players[Seat::Opponent].street_bet
        {
            Seat::Player
        } else {
            Seat::Opponent
        };
        let hi_seat = lo_seat.other();
        let lo = self.players[lo_seat];
        let hi = self.players[hi_seat];

        if lo.street_bet < hi.street_bet {
            if lo.can_act() {
                self.turn = lo_seat;
                return Ok(());
            }
            // All in for less; the excess is dealt with at settlement.
            return self.settle_street(street);
        }
        // Bets are level. An all-in player can never reopen the action.
        if lo.all_in || hi.all_in {
            return self.settle_street(street);
        }
        if self.acted[Seat::Player] && self.acted[Seat::Opponent] {
            return self.settle_street(street);
        }
        self.turn = if !self.acted[Seat::Player] {
            Seat::Player
        } else {
            Seat::Opponent
        };
        Ok(())
    }

    /// Close the current street: refund any uncalled excess, zero the street
    /// bets, then deal forward. With an all-in player the remaining streets
    /// run out with no further decisions.
    fn settle_street(&mut self, street: Street) -> Result<(), GameError> {
        let pb = self.players[Seat::Player].street_bet;
        let ob = self.players[Seat::Opponent].street_bet;
        if pb != ob {
            let hi_seat = if pb > ob { Seat::Player } else { Seat::Opponent };
            let excess = (pb - ob).abs();
            let hi = &mut self.players[hi_seat];
            hi.street_bet -= excess;
            hi.stack += excess;
            if hi.stack > 0 {
                hi.all_in = false;
            }
            self.pot -= excess;
            ::log::debug!("returned uncalled {} to {}", excess, hi_seat);
            self.assert_chip_conservation();
        }
        for p in self.players.values_mut() {
            p.street_bet = 0;
        }
        self.acted = EnumMap::default();

        let runout = self.players.values().any(|p| p.all_in);
        let mut street = street;
        loop {
            if matches!(street, Street::River) {
                self.change_state(State::Showdown);
                return self.resolve_showdown();
            }
            street = self.deal_next_street(street)?;
            if !runout {
                self.turn = self.button.other();
                return Ok(());
            }
        }
    }

    fn deal_next_street(&mut self, street: Street) -> Result<Street, GameError> {
        let next = match street {
            Street::PreFlop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River => unreachable!("the river settles into showdown"),
        };
        self.deck.burn();
        match next {
            Street::Flop => {
                let c1 = self.deck.draw()?;
                let c2 = self.deck.draw()?;
                let c3 = self.deck.draw()?;
                self.board[0] = Some(c1);
                self.board[1] = Some(c2);
                self.board[2] = Some(c3);
                self.logs.push(LogItem::Flop(c1, c2, c3));
            }
            Street::Turn => {
                let c = self.deck.draw()?;
                self.board[3] = Some(c);
                self.logs.push(LogItem::TurnCard(c));
            }
            Street::River => {
                let c = self.deck.draw()?;
                self.board[4] = Some(c);
                self.logs.push(LogItem::RiverCard(c));
            }
            Street::PreFlop => unreachable!(),
        }
        self.change_state(State::Street(next));
        Ok(next)
    }

    /// Award the pot. On a fold the live player takes it without showing
    /// down; otherwise hands are compared over the full board. A tie splits
    /// the pot, odd chip to the out-of-position seat.
    fn resolve_showdown(&mut self) -> Result<(), GameError> {
        let pot = std::mem::take(&mut self.pot);
        let folded: Vec<Seat> = self
            .players
            .iter()
            .filter(|(_, p)| p.folded)
            .map(|(s, _)| s)
            .collect();
        if let Some(&quitter) = folded.first() {
            let winner = quitter.other();
            self.players[winner].stack += pot;
            self.logs.push(LogItem::Showdown {
                winner: Some(winner),
                pot,
                player_rank: None,
                opponent_rank: None,
            });
            ::log::debug!("{} folded; {} takes {}", quitter, winner, pot);
        } else {
            let board = self.board_cards();
            debug_assert_eq!(board.len(), COMMUNITY_SIZE);
            let rank_of = |pocket: [Card; 2]| -> HandRank {
                let mut cards = pocket.to_vec();
                cards.extend_from_slice(&board);
                best_rank(&cards)
            };
            let pr = rank_of(self.players[Seat::Player].pocket.expect("showdown needs pockets"));
            let or = rank_of(
                self.players[Seat::Opponent]
                    .pocket
                    .expect("showdown needs pockets"),
            );
            let winner = match pr.cmp(&or) {
                std::cmp::Ordering::Greater => Some(Seat::Player),
                std::cmp::Ordering::Less => Some(Seat::Opponent),
                std::cmp::Ordering::Equal => None,
            };
            match winner {
                Some(seat) => self.players[seat].stack += pot,
                None => {
                    // Split. The odd chip, if any, goes to the seat out of
                    // position (the big blind).
                    let half = pot / 2;
                    self.players[self.button].stack += half;
                    self.players[self.button.other()].stack += pot - half;
                }
            }
            self.logs.push(LogItem::Showdown {
                winner,
                pot,
                player_rank: Some(pr),
                opponent_rank: Some(or),
            });
            ::log::debug!("showdown for {}: {:?}", pot, winner);
        }
        for p in self.players.values_mut() {
            p.street_bet = 0;
        }
        self.change_state(State::EndOfHand);
        self.assert_chip_conservation();
        Ok(())
    }

    pub fn public_view(&self) -> PublicView {
        let opponent = self.players[Seat::Opponent];
        let visible =
            opponent.folded || matches!(self.state(), State::Showdown | State::EndOfHand);
        PublicView {
            state: self.state(),
            pot: self.pot,
            board: self.board_cards(),
            player_stack: self.players[Seat::Player].stack,
            opponent_stack: opponent.stack,
            player_pocket: self.players[Seat::Player].pocket,
            turn: self.turn,
            button: self.button,
            hand_num: self.hand_num,
            opponent_cards_visible: visible,
            opponent_pocket: if visible { opponent.pocket } else { None },
            match_over: self.match_over(),
        }
    }

    /// Grade the finished hand: every decision the human made, re-scored by
    /// the equity estimator against the board they saw at the time.
    pub fn hand_report(&mut self) -> Result<Vec<ReportRow>, GameError> {
        if !matches!(self.state(), State::EndOfHand) {
            return Err(GameError::HandNotOver);
        }
        let records: Vec<ActionRecord> = self
            .logs
            .hand_items()
            .filter_map(|item| match item {
                LogItem::Action(r) if r.seat == Seat::Player => Some(r.clone()),
                _ => None,
            })
            .collect();
        report::build(&records, &mut self.rng).map_err(Into::into)
    }

    /// The full record of the current hand, for hosts that render history.
    pub fn hand_log(&self) -> impl Iterator<Item = &LogItem> {
        self.logs.hand_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(scenario: StackScenario, seed: u64) -> GameState {
        GameState::seeded(scenario, Archetype::SmallBallTechnician, seed)
    }

    fn stacks(gs: &GameState) -> (Currency, Currency) {
        (
            gs.player(Seat::Player).stack,
            gs.player(Seat::Opponent).stack,
        )
    }

    #[test]
    fn blinds_posted_on_start() {
        let mut gs = game(StackScenario::Equal, 1);
        gs.start_hand().unwrap();
        // First hand: player has the button, posts the small blind
        assert_eq!(gs.button(), Seat::Player);
        assert_eq!(stacks(&gs), (9_950, 9_900));
        assert_eq!(gs.pot(), 150);
        assert_eq!(gs.state(), State::Street(Street::PreFlop));
        // Big blind opens the action
        assert_eq!(gs.turn(), Seat::Opponent);
    }

    #[test]
    fn button_alternates_between_hands() {
        let mut gs = game(StackScenario::Equal, 2);
        gs.start_hand().unwrap();
        assert_eq!(gs.button(), Seat::Player);
        // Opponent checks the option, player folds the button
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::Fold).unwrap();
        gs.start_hand().unwrap();
        assert_eq!(gs.button(), Seat::Opponent);
    }

    #[test]
    fn fold_preflop_awards_blinds() {
        let mut gs = game(StackScenario::Equal, 3);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::Fold).unwrap();
        assert_eq!(gs.state(), State::EndOfHand);
        // Button folded their small blind; the opponent nets it
        assert_eq!(stacks(&gs), (9_950, 10_050));
        assert_eq!(gs.pot(), 0);
    }

    #[test]
    fn out_of_turn_is_rejected() {
        let mut gs = game(StackScenario::Equal, 4);
        gs.start_hand().unwrap();
        let err = gs.submit_action(Seat::Player, Action::CheckCall).unwrap_err();
        assert!(matches!(err, GameError::NotYourTurn));
        // And nothing is accepted once the hand is over
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::Fold).unwrap();
        let err = gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap_err();
        assert!(matches!(err, GameError::NotYourTurn));
    }

    #[test]
    fn negative_raise_is_rejected() {
        let mut gs = game(StackScenario::Equal, 5);
        gs.start_hand().unwrap();
        let err = gs
            .submit_action(Seat::Opponent, Action::Raise(-5))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidAction(_)));
    }

    #[test]
    fn first_flop_actor_is_out_of_position() {
        let mut gs = game(StackScenario::Equal, 6);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        // Button completes the small blind; bets level, street closes
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        assert_eq!(gs.state(), State::Street(Street::Flop));
        assert_eq!(gs.turn(), gs.button().other());
        assert_eq!(gs.board_cards().len(), 3);
    }

    #[test]
    fn check_does_not_end_street_until_both_speak() {
        let mut gs = game(StackScenario::Equal, 7);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        // On the flop both bets are level at zero; one check must not advance
        assert_eq!(gs.state(), State::Street(Street::Flop));
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        assert_eq!(gs.state(), State::Street(Street::Flop));
        assert_eq!(gs.turn(), Seat::Player);
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        assert_eq!(gs.state(), State::Street(Street::Turn));
    }

    #[test]
    fn chip_conservation_through_a_full_hand() {
        let mut gs = game(StackScenario::Equal, 8);
        let total = gs.chip_total;
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        // Flop: check, bet, call
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::Raise(200)).unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        // Turn: check it through
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        // River: check it through to showdown
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        assert_eq!(gs.state(), State::EndOfHand);
        assert_eq!(gs.pot(), 0);
        let (p, o) = stacks(&gs);
        assert_eq!(p + o, total);
    }

    #[test]
    fn raise_stakes_call_plus_amount() {
        let mut gs = game(StackScenario::Equal, 9);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        // Button owes 50 and raises 300 on top
        gs.submit_action(Seat::Player, Action::Raise(300)).unwrap();
        assert_eq!(gs.player(Seat::Player).street_bet, 400);
        assert_eq!(gs.pot(), 500);
        assert_eq!(gs.turn(), Seat::Opponent);
        // Opponent calls the difference; preflop ends
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        assert_eq!(gs.state(), State::Street(Street::Flop));
        assert_eq!(gs.pot(), 800);
    }

    #[test]
    fn all_in_call_runs_out_the_board() {
        let mut gs = game(StackScenario::Equal, 10);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::AllIn).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        // Equal stacks: full call, straight to showdown with a full board
        assert_eq!(gs.state(), State::EndOfHand);
        assert_eq!(gs.pot(), 0);
        let (p, o) = stacks(&gs);
        assert_eq!(p + o, 20_000);
        assert!(p == 0 || o == 0 || p == o, "stacks were {}/{}", p, o);
    }

    #[test]
    fn uncalled_excess_is_refunded() {
        let mut gs = game(StackScenario::Big, 11);
        // Player 15_000, opponent 5_000; player has the button first hand
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::AllIn).unwrap();
        gs.submit_action(Seat::Player, Action::AllIn).unwrap();
        assert_eq!(gs.state(), State::EndOfHand);
        let (p, o) = stacks(&gs);
        assert_eq!(p + o, 20_000);
        // The player can only lose what the opponent could cover
        assert!(p >= 10_000, "player stack {} lost more than covered", p);
        assert!(o == 0 || o == 10_000 || o == 5_000, "opponent stack {}", o);
    }

    #[test]
    fn match_ends_when_a_stack_busts() {
        let mut gs = game(StackScenario::Equal, 12);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::AllIn).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        let (p, o) = stacks(&gs);
        if p == 0 || o == 0 {
            assert!(gs.match_over());
            assert!(gs.match_winner().is_some());
            assert!(matches!(gs.start_hand().unwrap_err(), GameError::MatchOver));
        } else {
            // Split pot; keep playing
            assert!(!gs.match_over());
        }
    }

    #[test]
    fn tie_splits_pot_evenly() {
        let mut gs = game(StackScenario::Equal, 13);
        gs.start_hand().unwrap();
        // Rig a board both pockets play entirely
        let board = crate::card::cards_from_str("AhKdQcJsTh").unwrap();
        for (i, c) in board.into_iter().enumerate() {
            gs.board[i] = Some(c);
        }
        let p2 = crate::card::cards_from_str("2c3c").unwrap();
        let p4 = crate::card::cards_from_str("4d5d").unwrap();
        gs.players[Seat::Player].pocket = Some([p2[0], p2[1]]);
        gs.players[Seat::Opponent].pocket = Some([p4[0], p4[1]]);
        gs.pot = 400;
        gs.players[Seat::Player].stack = 9_800;
        gs.players[Seat::Opponent].stack = 9_800;
        gs.players[Seat::Player].street_bet = 0;
        gs.players[Seat::Opponent].street_bet = 0;
        gs.change_state(State::Showdown);
        gs.resolve_showdown().unwrap();
        assert_eq!(stacks(&gs), (10_000, 10_000));
    }

    #[test]
    fn odd_tied_pot_favors_out_of_position() {
        let mut gs = game(StackScenario::Equal, 14);
        gs.start_hand().unwrap();
        let board = crate::card::cards_from_str("AhKdQcJsTh").unwrap();
        for (i, c) in board.into_iter().enumerate() {
            gs.board[i] = Some(c);
        }
        let p2 = crate::card::cards_from_str("2c3c").unwrap();
        let p4 = crate::card::cards_from_str("4d5d").unwrap();
        gs.players[Seat::Player].pocket = Some([p2[0], p2[1]]);
        gs.players[Seat::Opponent].pocket = Some([p4[0], p4[1]]);
        gs.pot = 401;
        gs.players[Seat::Player].stack = 9_800;
        gs.players[Seat::Opponent].stack = 9_799;
        gs.players[Seat::Player].street_bet = 0;
        gs.players[Seat::Opponent].street_bet = 0;
        gs.change_state(State::Showdown);
        gs.resolve_showdown().unwrap();
        // Button (player, hand 1) takes the floor half; the big blind the rest
        assert_eq!(stacks(&gs), (10_000, 10_000));
    }

    #[test]
    fn opponent_turn_is_playable_by_policy() {
        let mut gs = game(StackScenario::Equal, 15);
        gs.start_hand().unwrap();
        // The opponent opens every hand in this engine
        let action = gs.opponent_act().unwrap();
        assert!(matches!(
            action,
            Action::CheckCall | Action::Raise(_) | Action::AllIn | Action::Fold
        ));
        let (p, o) = stacks(&gs);
        assert_eq!(p + o + gs.pot(), 20_000);
    }

    #[test]
    fn opponent_cards_hidden_until_showdown() {
        let mut gs = game(StackScenario::Equal, 16);
        gs.start_hand().unwrap();
        let view = gs.public_view();
        assert!(!view.opponent_cards_visible);
        assert!(view.opponent_pocket.is_none());
        assert!(view.player_pocket.is_some());
        // Play to showdown
        gs.submit_action(Seat::Opponent, Action::AllIn).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        let view = gs.public_view();
        assert!(view.opponent_cards_visible);
        assert!(view.opponent_pocket.is_some());
    }

    #[test]
    fn report_covers_player_decisions() {
        let mut gs = game(StackScenario::Equal, 17);
        gs.start_hand().unwrap();
        assert!(matches!(gs.hand_report().unwrap_err(), GameError::HandNotOver));
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::Raise(200)).unwrap();
        gs.submit_action(Seat::Opponent, Action::Fold).unwrap();
        let report = gs.hand_report().unwrap();
        // Two player decisions: the preflop call and the flop bet
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].street, Street::PreFlop);
        assert_eq!(report[1].street, Street::Flop);
        assert_eq!(report[1].action, Action::Raise(200));
    }

    #[test]
    fn hand_log_records_the_whole_hand() {
        let mut gs = game(StackScenario::Equal, 20);
        gs.start_hand().unwrap();
        gs.submit_action(Seat::Opponent, Action::CheckCall).unwrap();
        gs.submit_action(Seat::Player, Action::Fold).unwrap();
        let items: Vec<&LogItem> = gs.hand_log().collect();
        // Hand start, two blinds, two actions, the terminal result
        assert_eq!(items.len(), 6);
        assert!(matches!(items[0], LogItem::HandStart { hand_num: 1, .. }));
        assert!(matches!(items[1], LogItem::Blind { big: false, .. }));
        assert!(matches!(items[2], LogItem::Blind { big: true, .. }));
        assert!(matches!(
            items[5],
            LogItem::Showdown {
                winner: Some(Seat::Opponent),
                ..
            }
        ));
        // Starting the next hand rotates the finished one out
        gs.start_hand().unwrap();
        assert!(gs
            .hand_log()
            .all(|i| !matches!(i, LogItem::Showdown { .. })));
    }

    #[test]
    fn public_view_serializes() {
        let mut gs = game(StackScenario::Short, 18);
        gs.start_hand().unwrap();
        let view = gs.public_view();
        let s = serde_json::to_string(&view).unwrap();
        let back: PublicView = serde_json::from_str(&s).unwrap();
        assert_eq!(view, back);
    }

    #[test]
    fn seeded_matches_are_reproducible() {
        let mut a = game(StackScenario::Equal, 19);
        let mut b = game(StackScenario::Equal, 19);
        a.start_hand().unwrap();
        b.start_hand().unwrap();
        assert_eq!(
            a.player(Seat::Player).pocket,
            b.player(Seat::Player).pocket
        );
        assert_eq!(a.opponent_act().unwrap(), b.opponent_act().unwrap());
    }
}
