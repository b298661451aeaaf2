use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use gridworld::agent::Agent;
use gridworld::environment::Environment;
use gridworld::utils::{plot_deltas, plot_grid};
use gridworld::{GAMMA, GridError, ValueFunction};

/// Policy evaluation and improvement on the 5x5 gridworld.
#[derive(Parser)]
#[command(name = "gridworld", version)]
struct Args {
    /// Evaluation + improvement rounds
    #[arg(long, default_value_t = 20)]
    rounds: usize,
    /// Write the final value grid to this PNG
    #[arg(long)]
    plot: Option<String>,
    /// Write the per-round convergence curve to this PNG
    #[arg(long)]
    curve: Option<String>,
    /// Write a JSON snapshot of values and policy
    #[arg(long)]
    json: Option<String>,
    /// Sample a walk of this many steps under the final policy
    #[arg(long, default_value_t = 0)]
    walk: usize,
    /// Seed for the sampled walk
    #[arg(long)]
    seed: Option<u64>,
    /// Skip the per-round tables
    #[arg(long)]
    quiet: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), GridError> {
    let args = Args::parse();
    let level = args
        .log_level
        .parse::<log::LevelFilter>()
        .map_err(|e| GridError::invalid(format!("--log-level: {e}")))?;
    gridworld::log(level)?;

    println!("Policy Evaluation and Update demo");
    let mut tabular = ValueFunction::default();
    let mut deltas = Vec::with_capacity(args.rounds);
    for t in 0..args.rounds {
        deltas.push(tabular.train_round()?);
        if !args.quiet {
            println!("[{:>4}]{}", t + 1, "-".repeat(30));
            print!("{tabular}");
            print!("{}", tabular.policy());
        }
    }
    log::info!("{:<32}{:<8}", "rounds completed", args.rounds);

    let snapshot = tabular.snapshot();
    if let Some(path) = &args.plot {
        let labels = snapshot
            .values
            .iter()
            .map(|row| row.iter().map(|v| format!("{v:.1}")).collect())
            .collect::<Vec<Vec<String>>>();
        plot_grid(&labels, path, "State values")?;
    }
    if let Some(path) = &args.curve {
        plot_deltas(&deltas, path, "Evaluation delta")?;
    }
    if let Some(path) = &args.json {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &snapshot)?;
        log::info!("{:<32}{:<32}", "saved snapshot", path);
    }
    if args.walk > 0 {
        walk(&tabular, args.walk, args.seed);
    }
    Ok(())
}

/// Follow the final policy for a few steps, logging each transition.
fn walk(tabular: &ValueFunction, steps: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    };
    let mut env = tabular.world().clone();
    let mut state = env.reset_with(&mut rng);
    let mut discounted = 0.0;
    let mut discount = 1.0;
    for _ in 0..steps {
        let action = tabular.policy().sample_action_with(&state, &mut rng);
        let result = env.step(&action);
        log::info!(
            "{:<12}{:<4}{:<12}{:>6.1}",
            state.to_string(),
            action.symbol(),
            result.next_state.to_string(),
            result.reward
        );
        discounted += discount * result.reward;
        discount *= GAMMA;
        state = result.next_state;
    }
    println!("discounted return over {steps} steps: {discounted:.2}");
}
