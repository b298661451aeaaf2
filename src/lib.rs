// detailed implementation
pub mod algorithms;
pub mod environments;
pub mod error;
pub mod policies;
pub mod utils;

// Traits
pub mod agent;
pub mod environment;
pub mod policy;

pub use algorithms::policy_iteration::{Snapshot, ValueFunction};
pub use environments::gridworld::{Action, GridWorld, State};
pub use error::GridError;
pub use policies::tabular::TabularPolicy;

/// Discount factor.
pub const GAMMA: f64 = 0.9;
/// Default grid shape as (rows, cols).
pub const SHAPE: (i32, i32) = (5, 5);
/// Reward for bumping into the edge of the grid.
pub const WALL_REWARD: f64 = -1.0;
/// Reward for leaving portal A.
pub const A_REWARD: f64 = 10.0;
/// Reward for leaving portal B.
pub const B_REWARD: f64 = 5.0;

/// Initialize terminal logging at the given level.
pub fn log(level: log::LevelFilter) -> Result<(), GridError> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}
