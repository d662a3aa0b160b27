//! Five-card hand ranking.
//!
//! The engine only needs a total order over five-card hands where a lower
//! rank is stronger. [`HandRanker`] is that seam. [`StandardRanker`] ships
//! the usual 7462 equivalence classes: 1 is a royal flush and 7462 is
//! 7-5-4-3-2 offsuit.

use crate::cards::{Card, Rank, Suit};
use core::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Category of a standard 7462-class rank.
    pub const fn from_rank(rank: HandRank) -> Category {
        match rank.value() {
            0..=10 => Category::StraightFlush,
            11..=166 => Category::FourOfAKind,
            167..=322 => Category::FullHouse,
            323..=1599 => Category::Flush,
            1600..=1609 => Category::Straight,
            1610..=2467 => Category::ThreeOfAKind,
            2468..=3325 => Category::TwoPair,
            3326..=6185 => Category::Pair,
            _ => Category::HighCard,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Packed comparable value of a five-card hand. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u32);

impl HandValue {
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Category in the top bits, then five 4-bit rank tiebreakers (most
    /// significant first). Unused tiebreakers are zero.
    fn from_parts(category: Category, tiebreak: &[u8; 5]) -> Self {
        let mut v = (category as u32) << 20;
        for (i, r) in tiebreak.iter().enumerate() {
            v |= (*r as u32) << (16 - 4 * i as u32);
        }
        HandValue(v)
    }
}

/// Evaluation of exactly five cards. Ordering follows `value`.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Evaluation {
    pub category: Category,
    value: HandValue,
}

impl Evaluation {
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

/// Evaluate exactly five cards; detects category and encodes tiebreakers.
/// Does not allocate.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    let mut counts = [0u8; 15];
    for c in cards {
        counts[c.rank().value() as usize] += 1;
    }
    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());

    // (count, rank) pairs, sorted by count desc then rank desc
    let mut groups = [(0u8, 0u8); 5];
    let mut n = 0;
    for v in (2..=14u8).rev() {
        let c = counts[v as usize];
        if c > 0 {
            groups[n] = (c, v);
            n += 1;
        }
    }
    groups[..n].sort_by(|a, b| b.cmp(a));

    let straight_top = if n == 5 {
        let (top, second, low) = (groups[0].1, groups[1].1, groups[4].1);
        if top - low == 4 {
            Some(top)
        } else if top == Rank::Ace.value() && second == Rank::Five.value() {
            Some(Rank::Five.value())
        } else {
            None
        }
    } else {
        None
    };

    let mut tiebreak = [0u8; 5];
    for (slot, g) in tiebreak.iter_mut().zip(groups[..n].iter()) {
        *slot = g.1;
    }

    let category = match (straight_top, is_flush, groups[0].0, groups[1].0) {
        (Some(_), true, _, _) => Category::StraightFlush,
        (_, _, 4, _) => Category::FourOfAKind,
        (_, _, 3, 2) => Category::FullHouse,
        (_, true, _, _) => Category::Flush,
        (Some(_), false, _, _) => Category::Straight,
        (_, _, 3, _) => Category::ThreeOfAKind,
        (_, _, 2, 2) => Category::TwoPair,
        (_, _, 2, _) => Category::Pair,
        _ => Category::HighCard,
    };
    if let (Some(top), Category::StraightFlush | Category::Straight) = (straight_top, category) {
        tiebreak = [top, 0, 0, 0, 0];
    }
    Evaluation { category, value: HandValue::from_parts(category, &tiebreak) }
}

/// Position of a five-card hand in the strength order. 1 is the best hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(u16);

impl HandRank {
    pub const BEST: HandRank = HandRank(1);
    /// Worst rank of the standard evaluator.
    pub const WORST: HandRank = HandRank(7462);

    pub const fn new(value: u16) -> Self {
        HandRank(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub const fn category(self) -> Category {
        Category::from_rank(self)
    }

    /// Human-readable name, singling out the royal flush.
    pub const fn label(self) -> &'static str {
        if self.0 == 1 {
            "Royal Flush"
        } else {
            self.category().label()
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// A total order over five-card hands where a lower rank is stronger.
///
/// Implementations must be pure: the same five cards always map to the same
/// rank, independent of card order.
pub trait HandRanker: Sync {
    fn rank(&self, cards: &[Card; 5]) -> HandRank;

    /// The weakest rank this ranker can return.
    fn worst_rank(&self) -> HandRank {
        HandRank::WORST
    }
}

/// The standard 7462-class ranking built on [`evaluate_five`].
///
/// ```
/// use holdem_advisor::cards::parse_cards;
/// use holdem_advisor::evaluator::{HandRank, HandRanker, StandardRanker};
///
/// let royal: [_; 5] = parse_cards("As Ks Qs Js Ts").unwrap().try_into().unwrap();
/// assert_eq!(StandardRanker.rank(&royal), HandRank::BEST);
/// let worst: [_; 5] = parse_cards("7c 5d 4h 3s 2c").unwrap().try_into().unwrap();
/// assert_eq!(StandardRanker.rank(&worst), HandRank::WORST);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRanker;

impl HandRanker for StandardRanker {
    fn rank(&self, cards: &[Card; 5]) -> HandRank {
        let value = evaluate_five(cards).value();
        let table = rank_table();
        // table is sorted strongest first
        let (Ok(i) | Err(i)) = table.binary_search_by(|probe| value.cmp(probe));
        HandRank(i.min(table.len() - 1) as u16 + 1)
    }
}

fn rank_table() -> &'static [HandValue] {
    static TABLE: OnceLock<Vec<HandValue>> = OnceLock::new();
    TABLE.get_or_init(build_rank_table)
}

/// One representative per equivalence class: every rank multiset of size
/// five (no rank more than four times) dealt off-suit, plus every set of five
/// distinct ranks dealt suited.
fn build_rank_table() -> Vec<HandValue> {
    let mut values = Vec::with_capacity(HandRank::WORST.value() as usize);
    let mut idx = [0usize; 5];
    loop {
        let ranks = idx.map(|i| Rank::ALL[i]);
        let distinct = idx.windows(2).all(|w| w[0] != w[1]);
        let five_of_a_kind = idx[0] == idx[4];
        if !five_of_a_kind {
            let mut cards = [Card::new(Rank::Two, Suit::Clubs); 5];
            let mut occurrence = 0;
            for pos in 0..5 {
                if pos > 0 && idx[pos] == idx[pos - 1] {
                    occurrence += 1;
                } else {
                    occurrence = 0;
                }
                let suit = if distinct { Suit::ALL[pos % 4] } else { Suit::ALL[occurrence] };
                cards[pos] = Card::new(ranks[pos], suit);
            }
            values.push(evaluate_five(&cards).value());
            if distinct {
                let suited = ranks.map(|r| Card::new(r, Suit::Clubs));
                values.push(evaluate_five(&suited).value());
            }
        }
        if !next_multiset(&mut idx, Rank::ALL.len()) {
            break;
        }
    }
    values.sort_unstable_by(|a, b| b.cmp(a));
    values.dedup();
    debug_assert_eq!(values.len(), HandRank::WORST.value() as usize);
    values
}

/// Advance a non-decreasing index tuple over `0..n`; false when exhausted.
fn next_multiset(idx: &mut [usize; 5], n: usize) -> bool {
    let mut i = idx.len();
    while i > 0 {
        i -= 1;
        if idx[i] + 1 < n {
            let v = idx[i] + 1;
            for slot in idx[i..].iter_mut() {
                *slot = v;
            }
            return true;
        }
    }
    false
}
