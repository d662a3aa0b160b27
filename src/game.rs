//! Players, hand state and the per-street betting state machine.
//!
//! Seats are zero-based indices into the player slice. A [`BettingRound`]
//! borrows the players and the [`HandState`] for one street: it derives legal
//! actions, validates a proposed action into a [`Commit`] without touching any
//! state, and only then applies it.

use crate::cards::Card;
use crate::config::TableConfig;
use crate::hand::{Board, HandError};
use log::{info, trace};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerStatus {
    Active,
    Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Community cards on the table once this street is dealt.
    pub const fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    pub const fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Action without its amount. This is what opponent profiling records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all-in",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A seat's move. `Raise(n)` lifts the street's bet level by `n` chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise(u64),
    AllIn,
}

impl Action {
    pub fn kind(self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::Raise(_) => ActionKind::Raise,
            Action::AllIn => ActionKind::AllIn,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise(amount) => write!(f, "raise {amount}"),
            other => f.write_str(other.kind().label()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("the betting round is already complete")]
    RoundComplete,
    #[error("seat {got} acted out of turn, seat {expected} is to act")]
    OutOfTurn { expected: usize, got: usize },
    #[error("{action} is not legal when owing {owed}")]
    NotLegal { action: ActionKind, owed: u64 },
    #[error("raise too small: min {min}, got {got}")]
    RaiseBelowMinimum { min: u64, got: u64 },
    #[error("raise too large: max {max}, got {got}")]
    RaiseExceedsStack { max: u64, got: u64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreetError {
    #[error("no street follows the river")]
    NoNextStreet,
    #[error("the {street} needs {expected} new cards, got {got}")]
    CardCount { street: Street, expected: usize, got: usize },
    #[error("card {0} is already known")]
    KnownCard(Card),
    #[error(transparent)]
    Hand(#[from] HandError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: usize,
    pub(crate) status: PlayerStatus,
    pub(crate) chips: u64,
    pub(crate) last_bet: u64,
    pub(crate) contributed: u64,
    pub(crate) last_action: Option<Action>,
}

impl Player {
    pub fn new(id: usize, chips: u64) -> Self {
        Self {
            id,
            status: PlayerStatus::Active,
            chips,
            last_bet: 0,
            contributed: 0,
            last_action: None,
        }
    }

    /// One-based seat number for display.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn chips(&self) -> u64 {
        self.chips
    }

    /// Chips committed on the current street
    pub fn last_bet(&self) -> u64 {
        self.last_bet
    }

    /// Chips committed this hand
    pub fn contributed(&self) -> u64 {
        self.contributed
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn is_folded(&self) -> bool {
        matches!(self.status, PlayerStatus::Folded)
    }

    /// Still in the hand but without chips to act with.
    pub fn is_all_in(&self) -> bool {
        !self.is_folded() && self.chips == 0
    }

    pub fn can_act(&self) -> bool {
        !self.is_folded() && self.chips > 0
    }

    /// Move up to `amount` chips from the stack into this street's commitment.
    pub(crate) fn commit(&mut self, amount: u64) -> u64 {
        let v = amount.min(self.chips);
        self.chips -= v;
        self.last_bet += v;
        self.contributed += v;
        v
    }

    pub(crate) fn reset_for_hand(&mut self) {
        self.status = PlayerStatus::Active;
        self.last_bet = 0;
        self.contributed = 0;
        self.last_action = None;
    }
}

/// Dealer and blind seats for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positions {
    pub dealer: usize,
    pub small_blind: usize,
    pub big_blind: usize,
}

impl Positions {
    /// Blinds sit to the dealer's left. Heads-up the dealer posts the small blind.
    pub fn for_dealer(dealer: usize, num_players: usize) -> Self {
        let n = num_players.max(1);
        let dealer = dealer % n;
        if n == 2 {
            Self { dealer, small_blind: dealer, big_blind: (dealer + 1) % n }
        } else {
            Self { dealer, small_blind: (dealer + 1) % n, big_blind: (dealer + 2) % n }
        }
    }
}

/// Pot, bet level, street, board and the cards known to the hero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandState {
    pub(crate) pot: u64,
    pub(crate) current_bet: u64,
    pub(crate) street: Street,
    pub(crate) positions: Positions,
    pub(crate) board: Board,
    pub(crate) known: Vec<Card>,
    pub(crate) raised: bool,
}

impl HandState {
    pub fn new(positions: Positions) -> Self {
        Self {
            pot: 0,
            current_bet: 0,
            street: Street::Preflop,
            positions,
            board: Board::empty(),
            known: Vec::new(),
            raised: false,
        }
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    /// Highest street commitment any player has made.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn positions(&self) -> Positions {
        self.positions
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Hole and board cards the hero has seen, without duplicates.
    pub fn known_cards(&self) -> &[Card] {
        &self.known
    }

    /// Whether the bet level was lifted by a player action this street.
    pub fn raised(&self) -> bool {
        self.raised
    }

    /// Add cards the hero can see (their own hole cards).
    pub fn add_known(&mut self, cards: &[Card]) -> Result<(), StreetError> {
        for (i, c) in cards.iter().enumerate() {
            if self.known.contains(c) || cards[..i].contains(c) {
                return Err(StreetError::KnownCard(*c));
            }
        }
        self.known.extend_from_slice(cards);
        Ok(())
    }

    /// Post both blinds as street commitments, each capped at the poster's stack.
    pub fn post_blinds(&mut self, players: &mut [Player], small: u64, big: u64) -> (u64, u64) {
        let Positions { small_blind, big_blind, .. } = self.positions;
        let sb_paid = players.get_mut(small_blind).map_or(0, |p| p.commit(small));
        let bb_paid = players.get_mut(big_blind).map_or(0, |p| p.commit(big));
        self.pot += sb_paid + bb_paid;
        self.current_bet = sb_paid.max(bb_paid);
        trace!("blinds posted: seat {small_blind} {sb_paid}, seat {big_blind} {bb_paid}");
        (sb_paid, bb_paid)
    }

    /// Deal the next street's community cards and clear street commitments.
    pub fn advance_street(
        &mut self,
        players: &mut [Player],
        cards: &[Card],
    ) -> Result<Street, StreetError> {
        let next = self.street.next().ok_or(StreetError::NoNextStreet)?;
        let expected = next.board_len() - self.board.len();
        if cards.len() != expected {
            return Err(StreetError::CardCount { street: next, expected, got: cards.len() });
        }
        if let Some(c) = cards.iter().find(|c| self.known.contains(c)) {
            return Err(StreetError::KnownCard(*c));
        }
        self.board.try_extend(cards)?;
        self.known.extend_from_slice(cards);
        self.street = next;
        self.current_bet = 0;
        self.raised = false;
        for p in players.iter_mut() {
            p.last_bet = 0;
        }
        info!("{next}: board {:?}, pot {}", self.board.as_slice(), self.pot);
        Ok(next)
    }
}

/// Where the round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    AwaitingAction(usize),
    Complete,
}

/// A validated action: what it will cost and whether it folds the seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub seat: usize,
    pub action: Action,
    pub chips: u64,
    pub folds: bool,
}

/// Outcome of a betting round driven to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundSummary {
    pub street: Street,
    pub pot: u64,
    pub current_bet: u64,
    /// Applied actions in order.
    pub actions: Vec<(usize, Action)>,
    /// Proposals that failed validation and were asked again.
    pub rejections: usize,
    /// The last seat standing when everyone else folded.
    pub uncontested: Option<usize>,
}

/// One street of betting over borrowed players and hand state.
#[derive(Debug)]
pub struct BettingRound<'a> {
    players: &'a mut [Player],
    hand: &'a mut HandState,
    small_blind: u64,
    big_blind: u64,
    minimum_bet: u64,
    acted: Vec<bool>,
    cursor: usize,
}

impl<'a> BettingRound<'a> {
    /// Start the round on the hand's current street.
    ///
    /// Preflop action opens left of the big blind, later streets left of the dealer.
    pub fn new(players: &'a mut [Player], hand: &'a mut HandState, rules: &TableConfig) -> Self {
        let n = players.len().max(1);
        let anchor = match hand.street {
            Street::Preflop => hand.positions.big_blind,
            _ => hand.positions.dealer,
        };
        let acted = vec![false; players.len()];
        Self {
            players,
            hand,
            small_blind: rules.small_blind,
            big_blind: rules.big_blind,
            minimum_bet: rules.minimum_bet,
            acted,
            cursor: (anchor + 1) % n,
        }
    }

    pub fn players(&self) -> &[Player] {
        self.players
    }

    pub fn hand(&self) -> &HandState {
        self.hand
    }

    pub fn minimum_bet(&self) -> u64 {
        self.minimum_bet
    }

    /// Chips `seat` must add to match the bet level.
    pub fn owed(&self, seat: usize) -> u64 {
        self.players.get(seat).map_or(0, |p| self.hand.current_bet.saturating_sub(p.last_bet))
    }

    fn needs_action(&self, seat: usize) -> bool {
        let p = &self.players[seat];
        p.can_act() && (!self.acted[seat] || p.last_bet < self.hand.current_bet)
    }

    fn is_complete(&self) -> bool {
        let live = self.players.iter().filter(|p| !p.is_folded()).count();
        if live <= 1 {
            return true;
        }
        let able: Vec<usize> =
            (0..self.players.len()).filter(|&i| self.players[i].can_act()).collect();
        if let [only] = able.as_slice() {
            if self.owed(*only) == 0 {
                return true;
            }
        }
        able.iter().all(|&i| !self.needs_action(i))
    }

    pub fn status(&self) -> RoundStatus {
        if self.is_complete() {
            return RoundStatus::Complete;
        }
        let n = self.players.len();
        (0..n)
            .map(|i| (self.cursor + i) % n)
            .find(|&i| self.needs_action(i))
            .map_or(RoundStatus::Complete, RoundStatus::AwaitingAction)
    }

    /// The only player left when everyone else folded.
    pub fn uncontested(&self) -> Option<usize> {
        let mut live = (0..self.players.len()).filter(|&i| !self.players[i].is_folded());
        match (live.next(), live.next()) {
            (Some(seat), None) => Some(seat),
            _ => None,
        }
    }

    /// Blinds may check preflop while nobody has raised and they already match.
    fn blind_may_check(&self, seat: usize) -> bool {
        if self.hand.street != Street::Preflop || self.hand.raised {
            return false;
        }
        let pos = self.hand.positions;
        (seat == pos.big_blind && self.hand.current_bet == self.big_blind)
            || (seat == pos.small_blind && self.hand.current_bet == self.small_blind)
    }

    /// Actions `seat` may take right now. Empty for folded and all-in players.
    pub fn legal_actions(&self, seat: usize) -> Vec<ActionKind> {
        let Some(p) = self.players.get(seat) else {
            return Vec::new();
        };
        if !p.can_act() {
            return Vec::new();
        }
        let owed = self.owed(seat);
        let mut legal = vec![ActionKind::Fold];
        if owed == 0 || self.blind_may_check(seat) {
            legal.push(ActionKind::Check);
        }
        if p.chips >= owed {
            legal.push(ActionKind::Call);
        }
        if p.chips > owed {
            legal.push(ActionKind::Raise);
        }
        if p.chips < owed {
            legal.push(ActionKind::AllIn);
        }
        legal
    }

    /// Check `action` for `seat` and work out its cost. Nothing is mutated.
    pub fn validate(&self, seat: usize, action: Action) -> Result<Commit, ActionError> {
        match self.status() {
            RoundStatus::Complete => return Err(ActionError::RoundComplete),
            RoundStatus::AwaitingAction(expected) if expected != seat => {
                return Err(ActionError::OutOfTurn { expected, got: seat });
            }
            RoundStatus::AwaitingAction(_) => {}
        }
        let owed = self.owed(seat);
        if !self.legal_actions(seat).contains(&action.kind()) {
            return Err(ActionError::NotLegal { action: action.kind(), owed });
        }
        let p = &self.players[seat];
        let chips = match action {
            Action::Fold | Action::Check => 0,
            Action::Call => {
                let owed = if seat == self.hand.positions.small_blind
                    && self.hand.street == Street::Preflop
                    && !self.hand.raised
                {
                    owed.min(self.big_blind.saturating_sub(p.last_bet))
                } else {
                    owed
                };
                owed.min(p.chips)
            }
            Action::Raise(amount) => {
                if amount < self.minimum_bet {
                    return Err(ActionError::RaiseBelowMinimum {
                        min: self.minimum_bet,
                        got: amount,
                    });
                }
                let too_big = ActionError::RaiseExceedsStack {
                    max: p.chips.saturating_sub(owed),
                    got: amount,
                };
                let Some(level) = self.hand.current_bet.checked_add(amount) else {
                    return Err(too_big);
                };
                let increment = level.saturating_sub(p.last_bet);
                if increment > p.chips {
                    return Err(too_big);
                }
                increment
            }
            Action::AllIn => p.chips,
        };
        Ok(Commit { seat, action, chips, folds: matches!(action, Action::Fold) })
    }

    /// Validate and apply `action` for `seat`. On error nothing changes.
    pub fn apply(&mut self, seat: usize, action: Action) -> Result<RoundStatus, ActionError> {
        let commit = self.validate(seat, action)?;
        let level = self.hand.current_bet;
        let p = &mut self.players[seat];
        let paid = p.commit(commit.chips);
        if commit.folds {
            p.status = PlayerStatus::Folded;
        }
        p.last_action = Some(action);
        let committed = p.last_bet;
        self.hand.pot += paid;
        self.acted[seat] = true;
        if committed > level {
            self.hand.current_bet = committed;
            self.hand.raised = true;
            for (i, acted) in self.acted.iter_mut().enumerate() {
                if i != seat {
                    *acted = false;
                }
            }
        }
        trace!(
            "seat {seat} {action}: paid {paid}, pot {}, bet level {}",
            self.hand.pot,
            self.hand.current_bet
        );
        self.cursor = (seat + 1) % self.players.len();
        Ok(self.status())
    }
}
