//! Agents: pluggable seat controllers for the betting loop.
//!
//! `PlayerAgent` is the seam to whatever drives a seat (a terminal prompt, a
//! network client, a bot). `AgentTable` tracks which agent controls which
//! seat. The engine asks the agent at the acting seat for an [`Action`],
//! reports rejections back to it and asks again.

use crate::decision::{EquityAction, Play, Recommendation, SuggestedAction};
use crate::engine::Advice;
use crate::game::{Action, ActionError, ActionKind, Street};
use core::fmt;
use std::collections::VecDeque;

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// What an agent sees when it is asked to act.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub seat: usize,
    pub street: Street,
    pub pot: u64,
    pub current_bet: u64,
    /// Chips needed to match the bet level.
    pub owed: u64,
    pub chips: u64,
    pub minimum_bet: u64,
    pub legal: &'a [ActionKind],
    /// Present only on the hero's seat.
    pub advice: Option<&'a Advice>,
}

impl Turn<'_> {
    pub fn allows(&self, kind: ActionKind) -> bool {
        self.legal.contains(&kind)
    }

    /// Largest `Raise` amount the stack covers.
    pub fn max_raise(&self) -> u64 {
        self.chips.saturating_sub(self.owed)
    }

    /// Check if free, call if covered, shove if short, else fold.
    pub fn passive(&self) -> Action {
        if self.allows(ActionKind::Check) {
            Action::Check
        } else if self.allows(ActionKind::Call) {
            Action::Call
        } else if self.allows(ActionKind::AllIn) {
            Action::AllIn
        } else {
            Action::Fold
        }
    }

    /// Check if free, otherwise fold.
    pub fn check_or_fold(&self) -> Action {
        if self.allows(ActionKind::Check) {
            Action::Check
        } else {
            Action::Fold
        }
    }
}

/// A seat controller that supplies an action when it is their turn.
pub trait PlayerAgent {
    fn act(&mut self, turn: &Turn<'_>) -> Action;
    /// The last action failed validation; the agent will be asked again.
    fn rejected(&mut self, _action: Action, _error: &ActionError) {}
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
}

/// Plays a fixed list of actions, then falls back to check/fold.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    script: VecDeque<Action>,
    rejections: Vec<ActionError>,
}

impl ScriptedAgent {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self { script: actions.into_iter().collect(), rejections: Vec::new() }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn rejections(&self) -> &[ActionError] {
        &self.rejections
    }
}

impl PlayerAgent for ScriptedAgent {
    fn act(&mut self, turn: &Turn<'_>) -> Action {
        self.script.pop_front().unwrap_or_else(|| turn.check_or_fold())
    }
    fn rejected(&mut self, _action: Action, error: &ActionError) {
        self.rejections.push(error.clone());
    }
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
}

/// Never folds a hand it can continue with and never raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingStation;

impl PlayerAgent for CallingStation {
    fn act(&mut self, turn: &Turn<'_>) -> Action {
        turn.passive()
    }
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
}

/// Plays whatever the engine recommends for its seat.
///
/// Bets and bluffs become raises of the suggested size, fitted to the stack.
/// Without a postflop recommendation it follows the simulated win
/// probability. After a rejection it plays passively once.
#[derive(Debug, Clone, Default)]
pub struct AdvisedAgent {
    fallback: bool,
}

impl AdvisedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    fn raise(turn: &Turn<'_>, size: u64) -> Action {
        let max = turn.max_raise();
        if turn.allows(ActionKind::Raise) && max >= turn.minimum_bet {
            Action::Raise(size.clamp(turn.minimum_bet, max))
        } else {
            turn.passive()
        }
    }
}

impl PlayerAgent for AdvisedAgent {
    fn act(&mut self, turn: &Turn<'_>) -> Action {
        if std::mem::take(&mut self.fallback) {
            return turn.passive();
        }
        let Some(advice) = turn.advice else {
            return turn.passive();
        };
        match advice.recommendation {
            Recommendation::Play(Play { action: SuggestedAction::CheckFold, .. }) => {
                turn.check_or_fold()
            }
            Recommendation::Play(Play { bet_size, .. }) => Self::raise(turn, bet_size),
            Recommendation::InsufficientInformation => match advice.quick {
                EquityAction::Raise => Self::raise(turn, turn.minimum_bet),
                EquityAction::Call => turn.passive(),
                EquityAction::Fold => turn.check_or_fold(),
            },
        }
    }
    fn rejected(&mut self, _action: Action, _error: &ActionError) {
        self.fallback = true;
    }
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
}

/// One optional agent per seat.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(_) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = agent;
    }

    /// Builder form of [`set_agent`](Self::set_agent).
    pub fn with_agent(mut self, seat: usize, agent: impl PlayerAgent + 'static) -> Self {
        self.set_agent(seat, Some(Box::new(agent)));
        self
    }

    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    pub fn has_agent(&self, seat: usize) -> bool {
        self.seats.get(seat).is_some_and(|a| a.is_some())
    }

    /// Ask the agent at `turn.seat` for an action. `None` for an empty seat.
    pub fn act(&mut self, turn: &Turn<'_>) -> Option<Action> {
        match self.seats.get_mut(turn.seat) {
            Some(Some(agent)) => Some(agent.act(turn)),
            _ => None,
        }
    }

    pub fn reject(&mut self, seat: usize, action: Action, error: &ActionError) {
        if let Some(Some(agent)) = self.seats.get_mut(seat) {
            agent.rejected(action, error);
        }
    }
}
