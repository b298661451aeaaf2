use std::fmt;

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};

use crate::environment::{Environment, Model, StepResult};
use crate::error::GridError;
use crate::{A_REWARD, B_REWARD, GAMMA, SHAPE, WALL_REWARD};

/// A grid cell. Coordinates are signed so a move may step past the edge
/// before the boundary rule pulls it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub row: i32,
    pub col: i32,
}

impl State {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Component-wise `self + action`, no bounds checking.
    pub fn shifted(self, action: Action) -> Self {
        let (dr, dc) = action.delta();
        Self::new(self.row + dr, self.col + dc)
    }
}

impl From<(i32, i32)> for State {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Right,
    Left,
    Down,
    Up,
}

impl Action {
    /// The whole vocabulary, in default policy order.
    pub const ALL: [Action; 4] = [Action::Right, Action::Left, Action::Down, Action::Up];

    /// (row, col) offset.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Right => (0, 1),
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Up => (-1, 0),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Right => 'R',
            Action::Left => 'L',
            Action::Down => 'D',
            Action::Up => 'U',
        }
    }
}

impl TryFrom<(i32, i32)> for Action {
    type Error = GridError;

    fn try_from(delta: (i32, i32)) -> Result<Self, Self::Error> {
        Action::ALL
            .into_iter()
            .find(|a| a.delta() == delta)
            .ok_or_else(|| GridError::invalid(format!("{delta:?} is not a unit move")))
    }
}

impl TryFrom<char> for Action {
    type Error = GridError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Action::ALL
            .into_iter()
            .find(|a| a.symbol() == symbol.to_ascii_uppercase())
            .ok_or_else(|| GridError::invalid(format!("'{symbol}' is not an action code")))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The rows x cols gridworld with two portal cells.
///
/// Leaving A lands on A' with reward 10, leaving B lands on B' with reward 5,
/// whatever the action. Any other move off the grid leaves the agent in place
/// with reward -1; every remaining move is free.
#[derive(Debug, Clone)]
pub struct GridWorld {
    rows: i32,
    cols: i32,
    position: State,
}

impl GridWorld {
    pub const A: State = State::new(0, 1);
    pub const A_PRIME: State = State::new(4, 1);
    pub const B: State = State::new(0, 3);
    pub const B_PRIME: State = State::new(2, 3);

    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        let world = Self {
            rows,
            cols,
            position: State::new(0, 0),
        };
        for portal in [Self::A, Self::A_PRIME, Self::B, Self::B_PRIME] {
            if !world.contains(portal) {
                return Err(GridError::invalid(format!(
                    "shape {rows}x{cols} does not contain portal cell {portal}"
                )));
            }
        }
        Ok(world)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn contains(&self, state: State) -> bool {
        (0..self.rows).contains(&state.row) && (0..self.cols).contains(&state.col)
    }

    /// Put the walker on a uniformly random cell drawn from `rng`.
    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> State {
        let row = rng.random_range(0..self.rows);
        let col = rng.random_range(0..self.cols);
        self.position = State::new(row, col);
        self.position
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self {
            rows: SHAPE.0,
            cols: SHAPE.1,
            position: State::new(0, 0),
        }
    }
}

impl Model for GridWorld {
    type State = State;
    type Action = Action;

    /// Row-major, the order both sweeps visit cells in.
    fn states(&self) -> Vec<State> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| State::new(r, c)))
            .collect()
    }

    fn transition(&self, state: State, action: Action) -> (State, f64) {
        let next = state.shifted(action);
        // portals win over walls
        if state == Self::A {
            (Self::A_PRIME, A_REWARD)
        } else if state == Self::B {
            (Self::B_PRIME, B_REWARD)
        } else if !self.contains(next) {
            (state, WALL_REWARD)
        } else {
            (next, 0.0)
        }
    }

    fn gamma(&self) -> f64 {
        GAMMA
    }
}

impl Environment for GridWorld {
    type State = State;
    type Action = Action;
    type Reward = f64;

    fn reset(&mut self) -> Self::State {
        self.reset_with(&mut rng())
    }

    fn step(&mut self, action: &Self::Action) -> StepResult<Self::State, Self::Reward> {
        let (next_state, reward) = self.transition(self.position, *action);
        self.position = next_state;
        // continuing task: never terminates
        StepResult {
            next_state,
            reward,
            done: false,
        }
    }

    fn current_state(&self) -> Self::State {
        self.position
    }

    fn action_space(&self) -> usize {
        Action::ALL.len()
    }

    fn state_dim(&self) -> usize {
        2 // (row, col)
    }
}
