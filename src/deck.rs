use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("card {0} appears more than once in the known cards")]
    DuplicateKnownCard(Card),
    #[error("cannot deal {requested} cards, only {remaining} remain")]
    InsufficientCards { requested: usize, remaining: usize },
}

/// A working deck. Cards leave the deck when dealt and never come back.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The full 52-card universe in a fixed order (suit-major, ranks ascending).
    ///
    /// ```
    /// use holdem_advisor::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// The 52-card universe minus `known`, in standard order.
    pub fn excluding(known: &[Card]) -> Result<Self, DeckError> {
        let mut seen: HashSet<Card> = HashSet::with_capacity(known.len());
        for &c in known {
            if !seen.insert(c) {
                return Err(DeckError::DuplicateKnownCard(c));
            }
        }
        let mut deck = Self::standard();
        deck.cards.retain(|c| !seen.contains(c));
        Ok(deck)
    }

    /// A uniformly shuffled deck of every card not in `known`.
    ///
    /// ```
    /// use holdem_advisor::cards::parse_cards;
    /// use holdem_advisor::deck::Deck;
    ///
    /// let known = parse_cards("As Kh").unwrap();
    /// let deck = Deck::shuffle_excluding(&known, &mut rand::rng()).unwrap();
    /// assert_eq!(deck.len(), 50);
    /// assert!(!deck.contains(known[0]));
    /// ```
    pub fn shuffle_excluding<R: Rng + ?Sized>(
        known: &[Card],
        rng: &mut R,
    ) -> Result<Self, DeckError> {
        let mut deck = Self::excluding(known)?;
        deck.shuffle_with(rng);
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Shuffle using the provided RNG implementing Rng.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw one card from the top (end) of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remove and return the last `n` cards, top card first.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.cards.len();
        if n > remaining {
            return Err(DeckError::InsufficientCards { requested: n, remaining });
        }
        Ok(self.cards.drain(remaining - n..).rev().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn standard_deck_is_52_distinct_cards() {
        let d = Deck::standard();
        assert_eq!(d.len(), DECK_SIZE);
        let set: HashSet<Card> = d.as_slice().iter().copied().collect();
        assert_eq!(set.len(), DECK_SIZE);
        assert_eq!(d.as_slice()[0].to_string(), "2c");
        assert_eq!(d.as_slice()[51].to_string(), "As");
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::standard();
        let mut d2 = Deck::standard();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
    }

    #[test]
    fn excluding_rejects_duplicate_known_cards() {
        let known = parse_cards("As Kd As").unwrap();
        let err = Deck::excluding(&known).unwrap_err();
        assert_eq!(err, DeckError::DuplicateKnownCard(known[0]));
    }

    #[test]
    fn deal_pops_from_the_end() {
        let mut d = Deck::standard();
        let dealt = d.deal(2).unwrap();
        assert_eq!(dealt[0].to_string(), "As");
        assert_eq!(dealt[1].to_string(), "Ks");
        assert_eq!(d.len(), 50);
        assert_eq!(d.draw().map(|c| c.to_string()), Some("Qs".to_string()));
    }

    #[test]
    fn deal_more_than_remaining_fails_without_dealing() {
        let known: Vec<Card> = Deck::standard().as_slice()[..49].to_vec();
        let mut d = Deck::excluding(&known).unwrap();
        assert_eq!(d.len(), 3);
        let err = d.deal(4).unwrap_err();
        assert_eq!(err, DeckError::InsufficientCards { requested: 4, remaining: 3 });
        assert_eq!(d.len(), 3);
        assert_eq!(d.deal(3).unwrap().len(), 3);
        assert!(d.is_empty());
    }
}
