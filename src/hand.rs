use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::str::FromStr;

/// Maximum number of community cards.
pub const BOARD_SIZE: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate cards on board")]
    DuplicateBoardCards,
    #[error("hole cards overlap with board")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private hole cards.
///
/// ```
/// use holdem_advisor::hand::HoleCards;
///
/// let hole: HoleCards = "As Ks".parse().unwrap();
/// assert!(hole.is_suited());
/// assert!(!hole.is_pair());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn is_suited(&self) -> bool {
        self.0.suit() == self.1.suit()
    }

    pub fn is_pair(&self) -> bool {
        self.0.rank() == self.1.rank()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0 == card || self.1 == card
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards. Grows 0 -> 3 -> 4 -> 5 over a hand and never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > BOARD_SIZE {
            return Err(HandError::TooManyBoardCards(cards.len()));
        }
        let set: HashSet<Card> = cards.iter().copied().collect();
        if set.len() != cards.len() {
            return Err(HandError::DuplicateBoardCards);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Cards still to come before the river.
    pub fn missing(&self) -> usize {
        BOARD_SIZE.saturating_sub(self.cards.len())
    }

    /// Append cards, keeping the board valid.
    pub fn try_extend(&mut self, cards: &[Card]) -> Result<(), HandError> {
        let total = self.cards.len() + cards.len();
        if total > BOARD_SIZE {
            return Err(HandError::TooManyBoardCards(total));
        }
        let mut seen: HashSet<Card> = self.cards.iter().copied().collect();
        if cards.iter().any(|c| !seen.insert(*c)) {
            return Err(HandError::DuplicateBoardCards);
        }
        self.cards.extend_from_slice(cards);
        Ok(())
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

/// Check that hole cards and board form a consistent Hold'em state.
pub fn validate_holdem(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    if board.len() > BOARD_SIZE {
        return Err(HandError::TooManyBoardCards(board.len()));
    }
    if board.contains(hole.first()) || board.contains(hole.second()) {
        return Err(HandError::Overlap);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn hole_cards_must_be_distinct() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        assert!(matches!(HoleCards::try_new(a, a), Err(HandError::DuplicateHoleCards)));
        assert!(matches!("As".parse::<HoleCards>(), Err(HandError::HoleCount(1))));
    }

    #[test]
    fn pair_and_suited_flags() {
        let aa: HoleCards = "As Ah".parse().unwrap();
        assert!(aa.is_pair());
        assert!(!aa.is_suited());
        assert!(aa.contains(Card::new(Rank::Ace, Suit::Hearts)));
    }

    #[test]
    fn board_grows_and_rejects_bad_extensions() {
        let mut b = Board::empty();
        assert_eq!(b.missing(), 5);
        b.try_extend(&parse_cards("2c 3c 4c").unwrap()).unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(b.missing(), 2);
        let dup = b.try_extend(&parse_cards("2c").unwrap()).unwrap_err();
        assert_eq!(dup, HandError::DuplicateBoardCards);
        assert_eq!(b.len(), 3);
        let over = b.try_extend(&parse_cards("5c 6c 7c").unwrap()).unwrap_err();
        assert_eq!(over, HandError::TooManyBoardCards(6));
    }

    #[test]
    fn validate_holdem_catches_overlap() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board: Board = "As 2c 3c".parse().unwrap();
        assert!(matches!(validate_holdem(&hole, &board), Err(HandError::Overlap)));
        let board: Board = "2c, 3c 4c".parse().unwrap();
        assert!(validate_holdem(&hole, &board).is_ok());
    }
}
