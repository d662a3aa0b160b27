//! Frequency-based opponent profiling.

use crate::game::ActionKind;
use std::collections::HashMap;

/// Actions needed before a profile departs from the passive default.
pub const MIN_SAMPLE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayStyle {
    Aggressive,
    Passive,
}

/// Classify a recorded action sequence.
///
/// Passive until [`MIN_SAMPLE`] actions exist; aggressive when raises are
/// strictly more than half of the record.
///
/// ```
/// use holdem_advisor::game::ActionKind::{Call, Raise};
/// use holdem_advisor::opponent::{classify, PlayStyle};
///
/// assert_eq!(classify(&[Raise, Raise, Raise]), PlayStyle::Passive);
/// assert_eq!(classify(&[Raise, Raise, Raise, Raise, Call, Call, Call]), PlayStyle::Aggressive);
/// ```
pub fn classify(actions: &[ActionKind]) -> PlayStyle {
    if actions.len() < MIN_SAMPLE {
        return PlayStyle::Passive;
    }
    let raises = actions.iter().filter(|a| matches!(a, ActionKind::Raise)).count();
    if raises * 2 > actions.len() {
        PlayStyle::Aggressive
    } else {
        PlayStyle::Passive
    }
}

/// Per-seat, append-only action record kept for a whole session.
#[derive(Debug, Clone, Default)]
pub struct OpponentHistory {
    actions: HashMap<usize, Vec<ActionKind>>,
}

impl OpponentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, seat: usize, action: ActionKind) {
        self.actions.entry(seat).or_default().push(action);
    }

    pub fn actions(&self, seat: usize) -> &[ActionKind] {
        self.actions.get(&seat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn style(&self, seat: usize) -> PlayStyle {
        classify(self.actions(seat))
    }

    /// Combined record of every seat except `hero`, in seat order.
    pub fn opponents_of(&self, hero: usize) -> Vec<ActionKind> {
        let mut seats: Vec<usize> = self.actions.keys().copied().filter(|&s| s != hero).collect();
        seats.sort_unstable();
        seats.into_iter().flat_map(|s| self.actions(s).iter().copied()).collect()
    }
}
