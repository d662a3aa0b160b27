//! Strength and pot economics to a suggested action and size.
//!
//! Everything here is a pure function of its inputs plus one uniform roll for
//! the bluff gate, so callers control randomness through the RNG they pass.

use crate::config::{DecisionConfig, TableConfig};
use crate::opponent::PlayStyle;
use crate::strategy::{BetTier, StrategyTable};
use log::debug;
use rand::Rng;
use std::fmt;

/// Smallest and largest bet, as fractions of the pot, before table limits.
const POT_FRACTION_RANGE: (f64, f64) = (0.25, 1.0);
/// Size multiplier when the hand is far ahead of the price.
const VALUE_SCALE: f64 = 1.5;

/// Coarse phase of the hand, from the number of community cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Preflop and flop.
    Early,
    /// Turn and river.
    Late,
}

impl Stage {
    pub fn from_board_len(cards: usize) -> Stage {
        if cards <= 3 {
            Stage::Early
        } else {
            Stage::Late
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestedAction {
    Bet,
    Bluff,
    CheckFold,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SuggestedAction::Bet => "bet",
            SuggestedAction::Bluff => "bluff",
            SuggestedAction::CheckFold => "check/fold",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub action: SuggestedAction,
    /// Zero for check/fold.
    pub bet_size: u64,
}

/// Output of the heuristic. `InsufficientInformation` means "skip this
/// decision", which is not the same as being told to check or fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Play(Play),
    InsufficientInformation,
}

impl Recommendation {
    pub fn play(&self) -> Option<Play> {
        match self {
            Recommendation::Play(p) => Some(*p),
            Recommendation::InsufficientInformation => None,
        }
    }
}

/// Quick advice from a simulated win probability alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquityAction {
    Raise,
    Call,
    Fold,
}

/// Above 45% raise, above 25% call, otherwise fold.
pub fn equity_action(win_probability: f64) -> EquityAction {
    if win_probability > 0.45 {
        EquityAction::Raise
    } else if win_probability > 0.25 {
        EquityAction::Call
    } else {
        EquityAction::Fold
    }
}

/// Price of continuing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PotOdds {
    /// Nothing to call.
    Free,
    /// `pot / call`.
    Ratio(f64),
}

impl PotOdds {
    /// Equity needed to break even on a call.
    pub fn required_equity(self) -> f64 {
        match self {
            PotOdds::Free => 0.0,
            PotOdds::Ratio(r) => 1.0 / (1.0 + r),
        }
    }
}

pub fn pot_odds(pot: u64, call_amount: u64) -> PotOdds {
    if call_amount == 0 {
        PotOdds::Free
    } else {
        PotOdds::Ratio(pot as f64 / call_amount as f64)
    }
}

/// Correct a suggested size for the price of calling.
///
/// Strength is measured against the break-even equity `1 / (1 + pot/call)`,
/// not the raw `pot/call` ratio.
///
/// A free spot leaves the size alone. A hand below the break-even equity is
/// held to the call amount; one above twice it scales up by half, capped at
/// the pot. Any adjusted size is floored at `minimum_bet`.
///
/// ```
/// use holdem_advisor::decision::adjust_for_pot_odds;
///
/// assert_eq!(adjust_for_pot_odds(75, 0.4, 100, 0, 20), 75);
/// assert_eq!(adjust_for_pot_odds(75, 0.1, 100, 50, 20), 50);
/// assert_eq!(adjust_for_pot_odds(40, 0.9, 100, 10, 20), 60);
/// ```
pub fn adjust_for_pot_odds(
    bet_size: u64,
    strength: f64,
    pot: u64,
    call_amount: u64,
    minimum_bet: u64,
) -> u64 {
    let odds = pot_odds(pot, call_amount);
    let required = odds.required_equity();
    let adjusted = match odds {
        PotOdds::Free => return bet_size,
        PotOdds::Ratio(_) if strength < required => bet_size.min(call_amount),
        PotOdds::Ratio(_) if strength > 2.0 * required => {
            ((bet_size as f64 * VALUE_SCALE).round() as u64).min(pot)
        }
        PotOdds::Ratio(_) => bet_size,
    };
    debug!(
        "pot odds {odds:?}: required equity {required:.3}, strength {strength:.3}, \
         size {bet_size} -> {adjusted}"
    );
    adjusted.max(minimum_bet)
}

/// Value-bet threshold and bluff frequency after situational adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub tier: BetTier,
    pub value_bet: f64,
    pub bluff: f64,
}

/// Everything the heuristic looks at for one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionInput {
    /// Normalized strength; `None` before the flop.
    pub strength: Option<f64>,
    pub pot: u64,
    pub call_amount: u64,
    pub player_stack: u64,
    pub opponent_stack: u64,
    pub stage: Stage,
    pub opponent: PlayStyle,
}

/// The heuristic bound to table stakes and a strategy table.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine<'a> {
    table: &'a TableConfig,
    config: &'a DecisionConfig,
    strategy: &'a StrategyTable,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(
        table: &'a TableConfig,
        config: &'a DecisionConfig,
        strategy: &'a StrategyTable,
    ) -> Self {
        Self { table, config, strategy }
    }

    /// Pick the tier for `strength` and shift its value threshold: deep stacks
    /// early demand more, short stacks and late streets demand less.
    pub fn thresholds(
        &self,
        strength: f64,
        stage: Stage,
        stack: u64,
        opponent: PlayStyle,
    ) -> Thresholds {
        let tier = BetTier::for_strength(strength);
        let base = self.strategy.get(tier);
        let depth = stack as f64 / self.table.big_blind.max(1) as f64;
        let step = self.config.stage_adjustment;

        let mut value_bet = base.value_bet;
        if stage == Stage::Early && depth >= self.config.deep_stack_bb {
            value_bet += step;
        }
        if depth <= self.config.short_stack_bb {
            value_bet -= step;
        }
        if stage == Stage::Late {
            value_bet -= step;
        }
        let bluff = match opponent {
            PlayStyle::Aggressive => (base.bluff * self.config.aggression_bluff_factor).min(1.0),
            PlayStyle::Passive => base.bluff,
        };
        Thresholds { tier, value_bet: value_bet.clamp(0.0, 1.0), bluff }
    }

    /// Whether a weak hand should bluff given a uniform `roll` in [0, 1).
    ///
    /// Any weak hand may bluff a passive opponent. Against an aggressive one
    /// only hands within one bluff frequency of the threshold qualify.
    pub fn bluff_gate(
        &self,
        strength: f64,
        t: &Thresholds,
        opponent: PlayStyle,
        roll: f64,
    ) -> bool {
        if strength > t.value_bet {
            return false;
        }
        let eligible = match opponent {
            PlayStyle::Passive => true,
            PlayStyle::Aggressive => strength > t.value_bet - t.bluff,
        };
        eligible && roll < t.bluff
    }

    /// `pot * multiplier * (1 - strength)`, kept within a quarter pot and a
    /// full pot, then within [minimum bet, pot + opponent stack].
    pub fn size_bet(&self, strength: f64, tier: BetTier, pot: u64, opponent_stack: u64) -> u64 {
        let (lo, hi) = POT_FRACTION_RANGE;
        let fraction = (tier.multiplier() * (1.0 - strength)).clamp(lo, hi);
        let raw = (pot as f64 * fraction).round() as u64;
        raw.min(pot.saturating_add(opponent_stack)).max(self.table.minimum_bet)
    }

    pub fn decide<R: Rng + ?Sized>(&self, input: &DecisionInput, rng: &mut R) -> Recommendation {
        let Some(strength) = input.strength else {
            debug!("no strength available, skipping recommendation");
            return Recommendation::InsufficientInformation;
        };
        let t = self.thresholds(strength, input.stage, input.player_stack, input.opponent);
        let action = if strength > t.value_bet {
            SuggestedAction::Bet
        } else if self.bluff_gate(strength, &t, input.opponent, rng.random::<f64>()) {
            SuggestedAction::Bluff
        } else {
            SuggestedAction::CheckFold
        };
        let bet_size = match action {
            SuggestedAction::CheckFold => 0,
            SuggestedAction::Bet | SuggestedAction::Bluff => {
                let sized = self.size_bet(strength, t.tier, input.pot, input.opponent_stack);
                let min = self.table.minimum_bet;
                adjust_for_pot_odds(sized, strength, input.pot, input.call_amount, min)
            }
        };
        debug!(
            "strength {strength:.3} tier {} value threshold {:.3} bluff {:.3} \
             -> {action} {bet_size}",
            t.tier, t.value_bet, t.bluff
        );
        Recommendation::Play(Play { action, bet_size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        table: TableConfig,
        config: DecisionConfig,
        strategy: StrategyTable,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                table: TableConfig::default(),
                config: DecisionConfig::default(),
                strategy: StrategyTable::standard(),
            }
        }

        fn engine(&self) -> DecisionEngine<'_> {
            DecisionEngine::new(&self.table, &self.config, &self.strategy)
        }
    }

    fn input(strength: Option<f64>, stage: Stage, opponent: PlayStyle) -> DecisionInput {
        DecisionInput {
            strength,
            pot: 100,
            call_amount: 0,
            player_stack: 1000,
            opponent_stack: 1000,
            stage,
            opponent,
        }
    }

    #[test]
    fn stages_follow_board_size() {
        assert_eq!(Stage::from_board_len(0), Stage::Early);
        assert_eq!(Stage::from_board_len(3), Stage::Early);
        assert_eq!(Stage::from_board_len(4), Stage::Late);
        assert_eq!(Stage::from_board_len(5), Stage::Late);
    }

    #[test]
    fn deep_early_widens_and_late_or_short_tightens() {
        let f = Fixture::new();
        let e = f.engine();
        // 1000 chips at 20 big blind = 50 bb: neither deep nor short
        let mid = e.thresholds(0.6, Stage::Early, 1000, PlayStyle::Passive);
        assert!((mid.value_bet - 0.60).abs() < 1e-9);
        let deep = e.thresholds(0.6, Stage::Early, 4000, PlayStyle::Passive);
        assert!((deep.value_bet - 0.65).abs() < 1e-9);
        let late = e.thresholds(0.6, Stage::Late, 1000, PlayStyle::Passive);
        assert!((late.value_bet - 0.55).abs() < 1e-9);
        let short_late = e.thresholds(0.6, Stage::Late, 200, PlayStyle::Passive);
        assert!((short_late.value_bet - 0.50).abs() < 1e-9);
    }

    #[test]
    fn aggression_scales_bluffing() {
        let f = Fixture::new();
        let e = f.engine();
        let passive = e.thresholds(0.2, Stage::Early, 1000, PlayStyle::Passive);
        let aggressive = e.thresholds(0.2, Stage::Early, 1000, PlayStyle::Aggressive);
        assert_eq!(passive.tier, BetTier::Pot);
        assert!((passive.bluff - 0.33).abs() < 1e-9);
        assert!((aggressive.bluff - 0.495).abs() < 1e-9);
    }

    #[test]
    fn bluff_gate_rules() {
        let f = Fixture::new();
        let e = f.engine();
        let t = Thresholds { tier: BetTier::Pot, value_bet: 0.67, bluff: 0.33 };
        assert!(e.bluff_gate(0.05, &t, PlayStyle::Passive, 0.1));
        assert!(!e.bluff_gate(0.05, &t, PlayStyle::Passive, 0.5));
        assert!(!e.bluff_gate(0.05, &t, PlayStyle::Aggressive, 0.1));
        assert!(e.bluff_gate(0.5, &t, PlayStyle::Aggressive, 0.1));
        assert!(!e.bluff_gate(0.8, &t, PlayStyle::Passive, 0.0));
    }

    #[test]
    fn strong_late_hand_bets_within_pot() {
        let f = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rec = f.engine().decide(&input(Some(0.95), Stage::Late, PlayStyle::Passive), &mut rng);
        let play = rec.play().unwrap();
        assert_eq!(play.action, SuggestedAction::Bet);
        assert!(play.bet_size >= f.table.minimum_bet);
        assert!(play.bet_size <= 100);
        assert_eq!(play.bet_size, 25);
    }

    #[test]
    fn missing_strength_is_not_check_fold() {
        let f = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rec = f.engine().decide(&input(None, Stage::Early, PlayStyle::Passive), &mut rng);
        assert_eq!(rec, Recommendation::InsufficientInformation);
        assert_eq!(rec.play(), None);
    }

    #[test]
    fn weak_hand_against_aggression_checks() {
        let f = Fixture::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let weak = input(Some(0.01), Stage::Early, PlayStyle::Aggressive);
            let rec = f.engine().decide(&weak, &mut rng);
            let fold = Play { action: SuggestedAction::CheckFold, bet_size: 0 };
            assert_eq!(rec, Recommendation::Play(fold));
        }
    }

    #[test]
    fn size_respects_table_limits() {
        let f = Fixture::new();
        let e = f.engine();
        assert_eq!(e.size_bet(0.95, BetTier::Double, 100, 1000), 25);
        assert_eq!(e.size_bet(0.1, BetTier::Pot, 100, 1000), 90);
        assert_eq!(e.size_bet(0.0, BetTier::Double, 100, 1000), 100);
        // tiny pot floors at the minimum bet
        assert_eq!(e.size_bet(0.9, BetTier::Double, 10, 1000), 20);
        // opponent stack caps the size
        assert_eq!(e.size_bet(0.0, BetTier::Double, 400, 0), 400);
    }

    #[test]
    fn pot_odds_adjustment() {
        assert_eq!(pot_odds(100, 0), PotOdds::Free);
        assert_eq!(pot_odds(100, 50), PotOdds::Ratio(2.0));
        assert_eq!(adjust_for_pot_odds(80, 0.2, 100, 0, 20), 80);
        // required equity 1/3: 0.2 is short, held to the call
        assert_eq!(adjust_for_pot_odds(80, 0.2, 100, 50, 20), 50);
        // between required and twice required: unchanged
        assert_eq!(adjust_for_pot_odds(80, 0.5, 100, 50, 20), 80);
        // far ahead: 1.5x capped at the pot
        assert_eq!(adjust_for_pot_odds(80, 0.9, 100, 50, 20), 100);
        // never below the minimum
        assert_eq!(adjust_for_pot_odds(80, 0.01, 100, 5, 20), 20);
    }

    #[test]
    fn equity_quick_advice() {
        assert_eq!(equity_action(0.85), EquityAction::Raise);
        assert_eq!(equity_action(0.45), EquityAction::Call);
        assert_eq!(equity_action(0.3), EquityAction::Call);
        assert_eq!(equity_action(0.25), EquityAction::Fold);
    }
}
