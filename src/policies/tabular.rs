use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use rand::rng;
use rand::seq::IndexedRandom;

use crate::SHAPE;
use crate::environments::gridworld::{Action, State};
use crate::error::GridError;
use crate::policy::Policy;

/// Per-state set of equally likely actions.
///
/// Cells that were never written read as the full action set.
#[derive(Debug, Clone)]
pub struct TabularPolicy {
    rows: i32,
    cols: i32,
    actions: HashMap<State, Vec<Action>>,
}

impl TabularPolicy {
    pub fn new((rows, cols): (i32, i32)) -> Self {
        Self {
            rows,
            cols,
            actions: HashMap::new(),
        }
    }

    /// The full vocabulary, independent of any narrowing.
    pub fn default_actions(&self) -> &'static [Action] {
        &Action::ALL
    }

    pub fn current_actions(&self, state: &State) -> &[Action] {
        match self.actions.get(state) {
            Some(actions) => actions.as_slice(),
            None => self.default_actions(),
        }
    }

    pub fn uniform_probability(&self, state: &State) -> f64 {
        1.0 / self.current_actions(state).len() as f64
    }

    pub fn sample_action(&self, state: &State) -> Action {
        self.sample_action_with(state, &mut rng())
    }

    pub fn sample_action_with<R: Rng + ?Sized>(&self, state: &State, rng: &mut R) -> Action {
        // current_actions is never empty
        *self
            .current_actions(state)
            .choose(rng)
            .unwrap_or(&Action::Right)
    }

    /// Replace the action set of `state`.
    pub fn set_actions(&mut self, state: State, actions: Vec<Action>) -> Result<(), GridError> {
        if state.row < 0 || state.row >= self.rows || state.col < 0 || state.col >= self.cols {
            return Err(GridError::invalid(format!("state {state} is off the grid")));
        }
        if actions.is_empty() {
            return Err(GridError::invalid(format!("empty action set for {state}")));
        }
        for (i, action) in actions.iter().enumerate() {
            if actions[..i].contains(action) {
                return Err(GridError::invalid(format!(
                    "duplicate action {action} for {state}"
                )));
            }
        }
        self.actions.insert(state, actions);
        Ok(())
    }

    /// Like `set_actions`, from raw (row, col) deltas.
    pub fn set_moves(&mut self, state: State, moves: &[(i32, i32)]) -> Result<(), GridError> {
        let actions = moves
            .iter()
            .map(|&m| Action::try_from(m))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_actions(state, actions)
    }

    pub fn next_state(&self, state: State, action: Action) -> State {
        state.shifted(action)
    }

    /// One letter per action, in set order, e.g. "RD".
    pub fn render(&self, state: &State) -> String {
        self.current_actions(state)
            .iter()
            .map(|a| a.symbol())
            .collect()
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }
}

impl Default for TabularPolicy {
    fn default() -> Self {
        Self::new(SHAPE)
    }
}

impl Policy<State, Action> for TabularPolicy {
    fn select_action(&self, state: &State) -> Action {
        self.sample_action(state)
    }

    fn probability(&self, state: &State, action: &Action) -> f64 {
        if self.current_actions(state).contains(action) {
            self.uniform_probability(state)
        } else {
            0.0
        }
    }
}

impl fmt::Display for TabularPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                write!(f, "{:>4} ", self.render(&State::new(r, c)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn unset_states_read_all_actions() {
        let policy = TabularPolicy::default();
        assert_eq!(policy.current_actions(&State::new(3, 2)), &Action::ALL);
        assert_eq!(policy.render(&State::new(3, 2)), "RLDU");
        assert_eq!(policy.uniform_probability(&State::new(3, 2)), 0.25);
    }

    #[test]
    fn set_actions_narrows_one_state() {
        let mut policy = TabularPolicy::default();
        policy
            .set_actions(State::new(1, 1), vec![Action::Up, Action::Left])
            .unwrap();
        assert_eq!(policy.current_actions(&State::new(1, 1)), &[Action::Up, Action::Left]);
        assert_eq!(policy.render(&State::new(1, 1)), "UL");
        assert_eq!(policy.uniform_probability(&State::new(1, 1)), 0.5);
        assert_eq!(policy.current_actions(&State::new(1, 2)).len(), 4);
        // the full vocabulary is unaffected
        assert_eq!(policy.default_actions(), &Action::ALL);
    }

    #[test]
    fn rejects_bad_action_sets() {
        let mut policy = TabularPolicy::default();
        let s = State::new(2, 2);
        assert!(matches!(
            policy.set_actions(s, vec![]),
            Err(GridError::InvalidArgument(_))
        ));
        assert!(matches!(
            policy.set_actions(s, vec![Action::Up, Action::Up]),
            Err(GridError::InvalidArgument(_))
        ));
        assert!(matches!(
            policy.set_actions(State::new(5, 0), vec![Action::Up]),
            Err(GridError::InvalidArgument(_))
        ));
        assert!(matches!(
            policy.set_moves(s, &[(0, 1), (2, 0)]),
            Err(GridError::InvalidArgument(_))
        ));
        assert!(matches!(
            policy.set_moves(s, &[]),
            Err(GridError::InvalidArgument(_))
        ));
        // failed writes leave the old set in place
        assert_eq!(policy.current_actions(&s), &Action::ALL);
        policy.set_moves(s, &[(0, -1), (1, 0)]).unwrap();
        assert_eq!(policy.current_actions(&s), &[Action::Left, Action::Down]);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let mut policy = TabularPolicy::default();
        policy
            .set_actions(State::new(0, 0), vec![Action::Right, Action::Down, Action::Up])
            .unwrap();
        policy.set_actions(State::new(4, 4), vec![Action::Left]).unwrap();
        for r in 0..5 {
            for c in 0..5 {
                let s = State::new(r, c);
                let total: f64 = Action::ALL.iter().map(|a| policy.probability(&s, a)).sum();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn samples_stay_inside_the_set() {
        let mut policy = TabularPolicy::default();
        let s = State::new(3, 3);
        policy.set_actions(s, vec![Action::Down, Action::Left]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let a = policy.sample_action_with(&s, &mut rng);
            assert!(a == Action::Down || a == Action::Left);
            if !seen.contains(&a) {
                seen.push(a);
            }
        }
        assert_eq!(seen.len(), 2);
        assert!(policy.current_actions(&s).contains(&policy.select_action(&s)));
    }

    #[test]
    fn next_state_is_unchecked() {
        let policy = TabularPolicy::default();
        assert_eq!(policy.next_state(State::new(0, 0), Action::Up), State::new(-1, 0));
        assert_eq!(policy.next_state(State::new(2, 2), Action::Right), State::new(2, 3));
    }

    #[test]
    fn console_table() {
        let mut policy = TabularPolicy::new((1, 2));
        policy.set_actions(State::new(0, 1), vec![Action::Down]).unwrap();
        assert_eq!(policy.to_string(), "RLDU    D \n");
    }
}
