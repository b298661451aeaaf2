use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SHAPE;
use crate::agent::Agent;
use crate::environment::Model;
use crate::environments::gridworld::{Action, GridWorld, State};
use crate::error::GridError;
use crate::policies::tabular::TabularPolicy;
use crate::utils::same_centi;

/// State-value table plus the policy it is being evaluated and improved for.
///
/// One round of generalized policy iteration is an evaluation sweep followed
/// by an improvement sweep. Both visit cells in row-major order and write in
/// place, so later cells in a sweep already see values written earlier in it.
#[derive(Debug, Clone)]
pub struct ValueFunction {
    world: GridWorld,
    policy: TabularPolicy,
    values: HashMap<State, f64>,
}

/// Serializable view of the value table and policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: i32,
    pub cols: i32,
    pub values: Vec<Vec<f64>>,
    pub policy: Vec<Vec<String>>,
}

impl ValueFunction {
    pub fn new((rows, cols): (i32, i32)) -> Result<Self, GridError> {
        Ok(Self {
            world: GridWorld::new(rows, cols)?,
            policy: TabularPolicy::new((rows, cols)),
            values: HashMap::new(),
        })
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn policy(&self) -> &TabularPolicy {
        &self.policy
    }

    /// Stored value, 0 for cells never written.
    pub fn lookup(&self, state: &State) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    /// reward + gamma * V(next) for one action.
    pub fn lookahead(&self, state: State, action: Action) -> f64 {
        let (next, reward) = self.world.transition(state, action);
        reward + self.world.gamma() * self.lookup(&next)
    }

    /// Replace every value by its expectation under the current policy.
    /// Returns the largest change written.
    pub fn evaluate_sweep(&mut self) -> f64 {
        let mut delta = 0.0_f64;
        for state in self.world.states() {
            let prob = self.policy.uniform_probability(&state);
            let value = self
                .policy
                .current_actions(&state)
                .iter()
                .map(|&action| prob * self.lookahead(state, action))
                .sum::<f64>();
            delta = delta.max((value - self.lookup(&state)).abs());
            self.values.insert(state, value);
        }
        delta
    }

    /// Make the policy greedy: at each cell keep every action whose lookahead
    /// ties the best one to two truncated decimals. Returns how many cells
    /// changed their action set.
    pub fn improve_sweep(&mut self) -> Result<usize, GridError> {
        let mut changed = 0;
        for state in self.world.states() {
            // search the whole vocabulary, not just the current set
            let scored = self
                .policy
                .default_actions()
                .iter()
                .map(|&action| (action, self.lookahead(state, action)))
                .collect::<Vec<_>>();
            let best = scored
                .iter()
                .map(|&(_, v)| v)
                .fold(f64::NEG_INFINITY, f64::max);
            let greedy = scored
                .into_iter()
                .filter(|&(_, v)| same_centi(v, best))
                .map(|(action, _)| action)
                .collect::<Vec<_>>();
            log::trace!(
                "{:<16}{:<8}{:>10.4}",
                state.to_string(),
                self.policy.render(&state),
                best
            );
            if self.policy.current_actions(&state) != greedy.as_slice() {
                changed += 1;
            }
            self.policy.set_actions(state, greedy)?;
        }
        Ok(changed)
    }

    pub fn snapshot(&self) -> Snapshot {
        let (rows, cols) = (self.world.rows(), self.world.cols());
        let values = (0..rows)
            .map(|r| (0..cols).map(|c| self.lookup(&State::new(r, c))).collect())
            .collect();
        let policy = (0..rows)
            .map(|r| (0..cols).map(|c| self.policy.render(&State::new(r, c))).collect())
            .collect();
        Snapshot {
            rows,
            cols,
            values,
            policy,
        }
    }
}

impl Default for ValueFunction {
    fn default() -> Self {
        Self {
            world: GridWorld::default(),
            policy: TabularPolicy::new(SHAPE),
            values: HashMap::new(),
        }
    }
}

impl Agent for ValueFunction {
    fn train_round(&mut self) -> Result<f64, GridError> {
        let delta = self.evaluate_sweep();
        let changed = self.improve_sweep()?;
        log::debug!("{:<32}{:>12.6}{:>8}", "evaluation delta / changed", delta, changed);
        Ok(delta)
    }
}

impl fmt::Display for ValueFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.world.rows() {
            for c in 0..self.world.cols() {
                write!(f, "{:>5.1} ", self.lookup(&State::new(r, c)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
