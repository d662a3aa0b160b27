//! A cash table: stacks and opponent history that persist across hands,
//! dealer rotation, blind posting, street advance and pot award.

use crate::cards::Card;
use crate::config::{ConfigError, TableConfig};
use crate::engine::Hero;
use crate::game::{HandState, Player, PlayerStatus, Positions, Street, StreetError};
use crate::hand::HoleCards;
use crate::opponent::OpponentHistory;
use log::info;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error("no hand in progress")]
    NoHand,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("seat {0} is not at this table")]
    Seat(usize),
    #[error("seat {0} folded and cannot win the pot")]
    FoldedWinner(usize),
    #[error("seat {0} is listed as a winner more than once")]
    DuplicateWinner(usize),
    #[error("at least one winner is required")]
    NoWinners,
    #[error(transparent)]
    Street(#[from] StreetError),
}

#[derive(Debug, Clone)]
pub struct Table {
    config: TableConfig,
    players: Vec<Player>,
    dealer: usize,
    hand: Option<HandState>,
    hero: Option<Hero>,
    history: OpponentHistory,
    hands_played: u64,
}

impl Table {
    /// Seat `config.num_players` players with the starting stack.
    ///
    /// ```
    /// use holdem_advisor::config::TableConfig;
    /// use holdem_advisor::table::Table;
    ///
    /// let table = Table::new(TableConfig::default(), 0).unwrap();
    /// assert_eq!(table.players().len(), 3);
    /// assert!(Table::new(TableConfig::default(), 3).is_err());
    /// ```
    pub fn new(config: TableConfig, dealer: usize) -> Result<Self, ConfigError> {
        config.validate()?;
        if dealer >= config.num_players {
            return Err(ConfigError::DealerSeat { dealer, players: config.num_players });
        }
        let players =
            (0..config.num_players).map(|i| Player::new(i + 1, config.starting_stack)).collect();
        Ok(Self {
            config,
            players,
            dealer,
            hand: None,
            hero: None,
            history: OpponentHistory::new(),
            hands_played: 0,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    pub fn hero(&self) -> Option<&Hero> {
        self.hero.as_ref()
    }

    pub fn history(&self) -> &OpponentHistory {
        &self.history
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Open a hand: reset commitments, post blinds, record the hero's cards.
    ///
    /// Players without chips sit the hand out as folded.
    pub fn start_hand(
        &mut self,
        hero: Option<(usize, HoleCards)>,
    ) -> Result<&HandState, TableError> {
        if self.hand.is_some() {
            return Err(TableError::HandInProgress);
        }
        if let Some((seat, _)) = hero {
            if seat >= self.players.len() {
                return Err(TableError::Seat(seat));
            }
        }
        for p in &mut self.players {
            p.reset_for_hand();
            if p.chips == 0 {
                p.status = PlayerStatus::Folded;
            }
        }
        let positions = Positions::for_dealer(self.dealer, self.players.len());
        let mut hand = HandState::new(positions);
        if let Some((_, hole)) = hero {
            hand.add_known(&hole.as_array())?;
        }
        hand.post_blinds(&mut self.players, self.config.small_blind, self.config.big_blind);
        info!(
            "hand {} starts: dealer seat {}, blinds {}/{}, pot {}",
            self.hands_played + 1,
            positions.dealer,
            self.config.small_blind,
            self.config.big_blind,
            hand.pot()
        );
        self.hero = hero.map(|(seat, hole)| Hero { seat, hole });
        Ok(self.hand.insert(hand))
    }

    /// Deal the next street's cards onto the board.
    pub fn advance_street(&mut self, cards: &[Card]) -> Result<Street, TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHand)?;
        Ok(hand.advance_street(&mut self.players, cards)?)
    }

    /// Everything a betting round needs, borrowed at once.
    pub fn round_parts(
        &mut self,
    ) -> Result<(&mut [Player], &mut HandState, &mut OpponentHistory, Option<&Hero>), TableError> {
        let hand = self.hand.as_mut().ok_or(TableError::NoHand)?;
        Ok((self.players.as_mut_slice(), hand, &mut self.history, self.hero.as_ref()))
    }

    /// Split the pot evenly between `winners`, the remainder going to the first
    /// listed, then move the button one seat. Returns each winner's share.
    pub fn finish_hand(&mut self, winners: &[usize]) -> Result<Vec<(usize, u64)>, TableError> {
        let hand = self.hand.as_ref().ok_or(TableError::NoHand)?;
        if winners.is_empty() {
            return Err(TableError::NoWinners);
        }
        for (i, &w) in winners.iter().enumerate() {
            let p = self.players.get(w).ok_or(TableError::Seat(w))?;
            if p.is_folded() {
                return Err(TableError::FoldedWinner(w));
            }
            if winners[..i].contains(&w) {
                return Err(TableError::DuplicateWinner(w));
            }
        }
        let pot = hand.pot();
        let share = pot / winners.len() as u64;
        let remainder = pot % winners.len() as u64;
        let payouts: Vec<(usize, u64)> = winners
            .iter()
            .enumerate()
            .map(|(i, &w)| (w, if i == 0 { share + remainder } else { share }))
            .collect();
        for &(w, amount) in &payouts {
            self.players[w].chips += amount;
        }
        info!("hand {} pot {pot} awarded: {payouts:?}", self.hands_played + 1);
        self.hand = None;
        self.hero = None;
        self.hands_played += 1;
        self.dealer = (self.dealer + 1) % self.players.len();
        Ok(payouts)
    }
}
