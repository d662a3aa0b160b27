//! Normalized hand strength on top of a [`HandRanker`].

use crate::cards::Card;
use crate::evaluator::{HandRank, HandRanker};

/// Cards needed before a hand has a rank.
pub const MIN_CARDS: usize = 5;

/// Best (lowest) rank over every five-card subset of `hole` + `board`.
///
/// `None` when fewer than five cards are available.
pub fn best_rank<H: HandRanker + ?Sized>(
    ranker: &H,
    hole: &[Card],
    board: &[Card],
) -> Option<HandRank> {
    let mut cards = Vec::with_capacity(hole.len() + board.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(board);
    best_rank_of(ranker, &cards)
}

fn best_rank_of<H: HandRanker + ?Sized>(ranker: &H, cards: &[Card]) -> Option<HandRank> {
    let n = cards.len();
    if n < MIN_CARDS {
        return None;
    }
    let mut best: Option<HandRank> = None;
    let mut idx = [0, 1, 2, 3, 4];
    loop {
        let five = idx.map(|i| cards[i]);
        let rank = ranker.rank(&five);
        if best.map_or(true, |b| rank < b) {
            best = Some(rank);
        }
        if !next_combination(&mut idx, n) {
            break;
        }
    }
    best
}

/// Advance `idx` to the next 5-subset of `0..n` in lexicographic order.
fn next_combination(idx: &mut [usize; 5], n: usize) -> bool {
    let k = idx.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if idx[i] < n - k + i {
            idx[i] += 1;
            for j in i + 1..k {
                idx[j] = idx[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Map a rank onto [0, 1] where 1 is strongest: `1 - rank / worst`.
pub fn normalize<H: HandRanker + ?Sized>(ranker: &H, rank: HandRank) -> f64 {
    let worst = f64::from(ranker.worst_rank().value());
    (1.0 - f64::from(rank.value()) / worst).clamp(0.0, 1.0)
}

/// Normalized strength of the best five-card hand from `hole` + `board`.
///
/// Returns `None` ("insufficient information") with fewer than five cards.
///
/// ```
/// use holdem_advisor::cards::parse_cards;
/// use holdem_advisor::evaluator::StandardRanker;
/// use holdem_advisor::strength::strength;
///
/// let hole = parse_cards("As Ks").unwrap();
/// assert_eq!(strength(&StandardRanker, &hole, &parse_cards("Qs Js").unwrap()), None);
/// let s = strength(&StandardRanker, &hole, &parse_cards("Qs Js Ts 2c").unwrap()).unwrap();
/// assert_eq!(s, 1.0 - 1.0 / 7462.0);
/// ```
pub fn strength<H: HandRanker + ?Sized>(ranker: &H, hole: &[Card], board: &[Card]) -> Option<f64> {
    best_rank(ranker, hole, board).map(|rank| normalize(ranker, rank))
}

/// Category name of the best hand, e.g. "Full House" or "Royal Flush".
pub fn category_label<H: HandRanker + ?Sized>(
    ranker: &H,
    hole: &[Card],
    board: &[Card],
) -> Option<&'static str> {
    best_rank(ranker, hole, board).map(HandRank::label)
}
