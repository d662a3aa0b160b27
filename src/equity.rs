//! Monte Carlo win-probability estimation.
//!
//! Iterations run in batches. Each batch owns a ChaCha stream derived from
//! the caller's seed and the batch index, so a fixed seed reproduces the same
//! estimate whether batches run on one thread or many.
//!
//! A trial counts as a win only when the hero's strength is strictly above
//! every opponent's. Ties are not wins and no split-pot credit is given.

use crate::cards::{Card, Suit};
use crate::deck::{Deck, DeckError, DECK_SIZE};
use crate::evaluator::HandRanker;
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use crate::strength::strength;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

/// Trials per batch (and per RNG stream).
const BATCH_SIZE: u32 = 1000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EquityError {
    #[error("invalid hand: {0}")]
    Hand(#[from] HandError),
    #[error("deck exhausted: {0}")]
    Deck(#[from] DeckError),
    #[error(
        "need {needed} cards to finish the board and deal {opponents} opponents, \
         only {available} remain"
    )]
    NotEnoughCards { needed: usize, available: usize, opponents: usize },
}

/// Win count over evaluated trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquityEstimate {
    pub wins: u64,
    pub trials: u64,
}

impl EquityEstimate {
    /// `wins / trials`, or zero when nothing was evaluated.
    pub fn probability(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }

    pub fn merge(self, other: EquityEstimate) -> EquityEstimate {
        EquityEstimate { wins: self.wins + other.wins, trials: self.trials + other.trials }
    }
}

/// Estimate the chance that `hole` beats `num_opponents` random hands.
///
/// `known` lists every other card that cannot be dealt; it may repeat the
/// hole and board cards. Missing board cards are dealt fresh each trial.
///
/// ```
/// use holdem_advisor::equity::estimate_win_probability;
/// use holdem_advisor::evaluator::StandardRanker;
/// use holdem_advisor::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As Ah".parse().unwrap();
/// let board: Board = "Ad Ac Kd".parse().unwrap();
/// let est = estimate_win_probability(&StandardRanker, &hole, &board, &[], 1, 500, 7).unwrap();
/// assert_eq!(est.trials, 500);
/// assert!(est.probability() > 0.95);
/// ```
pub fn estimate_win_probability<H: HandRanker + ?Sized>(
    ranker: &H,
    hole: &HoleCards,
    board: &Board,
    known: &[Card],
    num_opponents: usize,
    iterations: u32,
    seed: u64,
) -> Result<EquityEstimate, EquityError> {
    validate_holdem(hole, board)?;
    let excluded: Vec<Card> = known
        .iter()
        .copied()
        .chain(hole.as_array())
        .chain(board.as_slice().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let needed = board.missing() + 2 * num_opponents;
    let available = DECK_SIZE - excluded.len();
    if needed > available {
        return Err(EquityError::NotEnoughCards { needed, available, opponents: num_opponents });
    }

    let batches = iterations.div_ceil(BATCH_SIZE);
    let run_batch = |batch: u32| -> Result<EquityEstimate, DeckError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(u64::from(batch));
        let trials = BATCH_SIZE.min(iterations - batch * BATCH_SIZE);
        let mut tally = EquityEstimate::default();
        for _ in 0..trials {
            match play_out(ranker, hole, board, &excluded, num_opponents, &mut rng)? {
                Some(won) => {
                    tally.trials += 1;
                    if won {
                        tally.wins += 1;
                    }
                }
                None => continue,
            }
        }
        Ok(tally)
    };
    let estimate = run_batches(batches, run_batch)?;
    debug!(
        "{} on [{}] vs {num_opponents}: {}/{} = {:.4}",
        hole.as_array().map(|c| c.to_string()).join(""),
        board.as_slice().iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "),
        estimate.wins,
        estimate.trials,
        estimate.probability()
    );
    Ok(estimate)
}

/// One simulated runout. `None` when a hand could not be evaluated.
fn play_out<H: HandRanker + ?Sized, R: Rng + ?Sized>(
    ranker: &H,
    hole: &HoleCards,
    board: &Board,
    excluded: &[Card],
    num_opponents: usize,
    rng: &mut R,
) -> Result<Option<bool>, DeckError> {
    let mut deck = Deck::shuffle_excluding(excluded, rng)?;
    let mut runout = board.as_slice().to_vec();
    runout.extend(deck.deal(board.missing())?);
    let Some(hero) = strength(ranker, &hole.as_array(), &runout) else {
        return Ok(None);
    };
    for _ in 0..num_opponents {
        let villain = deck.deal(2)?;
        match strength(ranker, &villain, &runout) {
            Some(s) if s >= hero => return Ok(Some(false)),
            Some(_) => {}
            None => return Ok(None),
        }
    }
    Ok(Some(true))
}

#[cfg(feature = "parallel")]
fn run_batches<F>(batches: u32, run: F) -> Result<EquityEstimate, DeckError>
where
    F: Fn(u32) -> Result<EquityEstimate, DeckError> + Sync + Send,
{
    use rayon::prelude::*;
    (0..batches).into_par_iter().map(run).try_reduce(EquityEstimate::default, |a, b| Ok(a.merge(b)))
}

#[cfg(not(feature = "parallel"))]
fn run_batches<F>(batches: u32, run: F) -> Result<EquityEstimate, DeckError>
where
    F: Fn(u32) -> Result<EquityEstimate, DeckError>,
{
    (0..batches).map(run).try_fold(EquityEstimate::default(), |acc, r| r.map(|e| acc.merge(e)))
}

/// Per-combination estimates and their aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflopEquity {
    pub combos: Vec<(HoleCards, EquityEstimate)>,
    pub total: EquityEstimate,
}

impl PreflopEquity {
    pub fn probability(&self) -> f64 {
        self.total.probability()
    }
}

/// Concrete holdings that share the strength class of `hole` before the flop.
///
/// Suited hands need one representative. Everything else (pairs included)
/// expands to the twelve ordered pairs of distinct suits.
pub fn suit_combinations(hole: &HoleCards) -> Vec<HoleCards> {
    if hole.is_suited() {
        return vec![*hole];
    }
    let (a, b) = (hole.first(), hole.second());
    Suit::ALL
        .iter()
        .flat_map(|&s1| Suit::ALL.iter().filter(move |&&s2| s2 != s1).map(move |&s2| (s1, s2)))
        .filter_map(|(s1, s2)| HoleCards::try_new(a.with_suit(s1), b.with_suit(s2)).ok())
        .collect()
}

/// Preflop equity of the rank pattern of `hole` against `num_opponents`.
///
/// Each suit combination gets `iterations` trials on an empty board. The
/// result weighs combinations equally: total wins over total evaluated trials.
pub fn preflop_equity<H: HandRanker + ?Sized>(
    ranker: &H,
    hole: &HoleCards,
    num_opponents: usize,
    iterations: u32,
    seed: u64,
) -> Result<PreflopEquity, EquityError> {
    let board = Board::empty();
    let mut combos = Vec::new();
    let mut total = EquityEstimate::default();
    for (i, combo) in suit_combinations(hole).into_iter().enumerate() {
        let est = estimate_win_probability(
            ranker,
            &combo,
            &board,
            &[],
            num_opponents,
            iterations,
            derive_seed(seed, i as u64),
        )?;
        total = total.merge(est);
        combos.push((combo, est));
    }
    debug!("preflop {} combos: {:.4}", combos.len(), total.probability());
    Ok(PreflopEquity { combos, total })
}

/// Spread sub-seeds so sibling simulations do not share streams.
fn derive_seed(seed: u64, index: u64) -> u64 {
    seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::evaluator::StandardRanker;

    #[test]
    fn suited_hands_use_one_combination() {
        let hole: HoleCards = "Ah Kh".parse().unwrap();
        assert_eq!(suit_combinations(&hole), vec![hole]);
    }

    #[test]
    fn offsuit_and_pairs_use_twelve() {
        for s in ["Ah Kd", "7c 7s"] {
            let hole: HoleCards = s.parse().unwrap();
            let combos = suit_combinations(&hole);
            assert_eq!(combos.len(), 12, "{s}");
            assert!(combos.iter().all(|c| !c.is_suited()));
            assert!(combos.iter().all(|c| c.first().rank() == hole.first().rank()));
        }
    }

    #[test]
    fn same_seed_same_estimate() {
        let hole: HoleCards = "Qs Jh".parse().unwrap();
        let board = Board::empty();
        let a = estimate_win_probability(&StandardRanker, &hole, &board, &[], 2, 2500, 11).unwrap();
        let b = estimate_win_probability(&StandardRanker, &hole, &board, &[], 2, 2500, 11).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.trials, 2500);
    }

    #[test]
    fn completed_board_without_opponents_always_wins() {
        let hole: HoleCards = "2c 7d".parse().unwrap();
        let board: Board = "9s Th Jc Qd 3h".parse().unwrap();
        let est = estimate_win_probability(&StandardRanker, &hole, &board, &[], 0, 100, 1).unwrap();
        assert_eq!(est, EquityEstimate { wins: 100, trials: 100 });
    }

    #[test]
    fn board_tie_is_not_a_win() {
        // royal flush on board: every hand ties
        let hole: HoleCards = "2c 3d".parse().unwrap();
        let board: Board = "As Ks Qs Js Ts".parse().unwrap();
        let est = estimate_win_probability(&StandardRanker, &hole, &board, &[], 1, 200, 3).unwrap();
        assert_eq!(est.wins, 0);
        assert_eq!(est.trials, 200);
    }

    #[test]
    fn known_cards_may_repeat_hole_and_board() {
        let hole: HoleCards = "As Ah".parse().unwrap();
        let board: Board = "2c 3c 4c".parse().unwrap();
        let mut known = parse_cards("As Ah 2c 3c 4c").unwrap();
        known.push(known[0]);
        let est =
            estimate_win_probability(&StandardRanker, &hole, &board, &known, 2, 100, 5).unwrap();
        assert_eq!(est.trials, 100);
    }

    #[test]
    fn overlap_and_exhaustion_are_reported() {
        let hole: HoleCards = "As Ah".parse().unwrap();
        let board: Board = "As 3c 4c".parse().unwrap();
        let err =
            estimate_win_probability(&StandardRanker, &hole, &board, &[], 1, 10, 5).unwrap_err();
        assert_eq!(err, EquityError::Hand(HandError::Overlap));

        let board = Board::empty();
        let err =
            estimate_win_probability(&StandardRanker, &hole, &board, &[], 24, 10, 5).unwrap_err();
        assert_eq!(err, EquityError::NotEnoughCards { needed: 53, available: 50, opponents: 24 });
    }

    #[test]
    fn preflop_total_is_sum_of_combinations() {
        let hole: HoleCards = "Ts 9d".parse().unwrap();
        let eq = preflop_equity(&StandardRanker, &hole, 1, 200, 21).unwrap();
        assert_eq!(eq.combos.len(), 12);
        let wins: u64 = eq.combos.iter().map(|(_, e)| e.wins).sum();
        let trials: u64 = eq.combos.iter().map(|(_, e)| e.trials).sum();
        assert_eq!(eq.total, EquityEstimate { wins, trials });
        assert_eq!(trials, 12 * 200);
    }
}
