//! Static value-bet / bluff table keyed by bet-size tier.

use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum StrategyError {
    #[error("{tier}: value-bet threshold {value} must be within [0, 1]")]
    ValueThreshold { tier: BetTier, value: f64 },
    #[error("{tier}: bluff frequency {value} must be within [0, 1]")]
    BluffFrequency { tier: BetTier, value: f64 },
    #[error("{tier}: value threshold and bluff frequency sum to {sum}, above 1")]
    Unbalanced { tier: BetTier, sum: f64 },
}

/// Bet size as a multiple of the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BetTier {
    Quarter,
    Half,
    TwoThirds,
    Pot,
    OneAndHalf,
    Double,
}

impl BetTier {
    pub const ALL: [BetTier; 6] = [
        BetTier::Quarter,
        BetTier::Half,
        BetTier::TwoThirds,
        BetTier::Pot,
        BetTier::OneAndHalf,
        BetTier::Double,
    ];

    pub const fn multiplier(self) -> f64 {
        match self {
            BetTier::Quarter => 0.25,
            BetTier::Half => 0.50,
            BetTier::TwoThirds => 0.66,
            BetTier::Pot => 1.00,
            BetTier::OneAndHalf => 1.50,
            BetTier::Double => 2.00,
        }
    }

    /// Tier used for a hand of the given normalized strength.
    pub fn for_strength(strength: f64) -> BetTier {
        if strength > 0.5 {
            BetTier::Double
        } else if strength > 0.3 {
            BetTier::OneAndHalf
        } else {
            BetTier::Pot
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x pot", self.multiplier())
    }
}

/// Threshold pair for one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierStrategy {
    /// Strength a hand must exceed to bet for value.
    pub value_bet: f64,
    /// How often a weak hand bluffs.
    pub bluff: f64,
}

impl TierStrategy {
    pub const fn new(value_bet: f64, bluff: f64) -> Self {
        Self { value_bet, bluff }
    }
}

/// Read-only mapping from [`BetTier`] to [`TierStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyTable {
    tiers: [TierStrategy; 6],
}

impl StrategyTable {
    /// Build a table, rejecting thresholds outside [0, 1] or pairs summing above 1.
    ///
    /// ```
    /// use holdem_advisor::strategy::{BetTier, StrategyTable, TierStrategy};
    ///
    /// let mut tiers = [TierStrategy::new(0.7, 0.3); 6];
    /// assert!(StrategyTable::new(tiers).is_ok());
    /// tiers[0] = TierStrategy::new(0.9, 0.2);
    /// assert!(StrategyTable::new(tiers).is_err());
    /// ```
    pub fn new(tiers: [TierStrategy; 6]) -> Result<Self, StrategyError> {
        for (tier, s) in BetTier::ALL.iter().copied().zip(tiers.iter()) {
            if !(0.0..=1.0).contains(&s.value_bet) {
                return Err(StrategyError::ValueThreshold { tier, value: s.value_bet });
            }
            if !(0.0..=1.0).contains(&s.bluff) {
                return Err(StrategyError::BluffFrequency { tier, value: s.bluff });
            }
            let sum = s.value_bet + s.bluff;
            if sum > 1.0 + 1e-9 {
                return Err(StrategyError::Unbalanced { tier, sum });
            }
        }
        Ok(Self { tiers })
    }

    /// The balanced table: each tier's value threshold and bluff share sum to one.
    pub fn standard() -> Self {
        Self {
            tiers: [
                TierStrategy::new(0.83, 0.17),
                TierStrategy::new(0.75, 0.25),
                TierStrategy::new(0.72, 0.28),
                TierStrategy::new(0.67, 0.33),
                TierStrategy::new(0.62, 0.38),
                TierStrategy::new(0.60, 0.40),
            ],
        }
    }

    pub fn get(&self, tier: BetTier) -> TierStrategy {
        self.tiers[tier.index()]
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::standard()
    }
}
