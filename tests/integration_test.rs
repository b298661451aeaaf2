use gridworld::agent::Agent;
use gridworld::environment::Environment;
use gridworld::policy::Policy;
use gridworld::{Action, GridError, GridWorld, State, TabularPolicy, ValueFunction};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn assert_near(vf: &ValueFunction, (r, c): (i32, i32), expected: f64, tol: f64) {
    let v = vf.lookup(&State::new(r, c));
    assert!(
        (v - expected).abs() < tol,
        "value at ({r}, {c}) = {v}, expected {expected}"
    );
}

#[test]
fn uniform_policy_evaluation() {
    let mut vf = ValueFunction::default();
    for _ in 0..1000 {
        vf.evaluate_sweep();
    }
    assert_near(&vf, (0, 0), 3.3, 0.1);
    assert_near(&vf, (0, 1), 8.8, 0.1);
    assert_near(&vf, (0, 3), 5.3, 0.1);
    assert_near(&vf, (2, 2), 0.7, 0.1);
    assert_near(&vf, (4, 4), -2.0, 0.1);
    assert!(vf.evaluate_sweep() < 1e-9);
}

#[test]
fn policy_iteration_reaches_optimal_values() {
    let mut vf = ValueFunction::default();
    let deltas = vf.train(300).unwrap();
    assert_eq!(deltas.len(), 300);
    assert!(deltas[299] < deltas[0]);

    assert_near(&vf, (0, 0), 22.0, 0.1);
    assert_near(&vf, (0, 1), 24.4, 0.1);
    assert_near(&vf, (0, 3), 19.4, 0.1);
    assert_near(&vf, (2, 2), 17.8, 0.1);
    assert_near(&vf, (4, 4), 11.7, 0.1);

    let policy = vf.policy();
    assert_eq!(policy.render(&State::new(0, 0)), "R");
    assert_eq!(policy.render(&State::new(0, 4)), "L");
    assert_eq!(policy.render(&GridWorld::A), "RLDU");
    assert_eq!(policy.render(&GridWorld::B), "RLDU");
}

#[test]
fn converged_round_changes_nothing() {
    let mut vf = ValueFunction::default();
    vf.train(300).unwrap();
    let before = vf.snapshot();
    let delta = vf.train_round().unwrap();
    let after = vf.snapshot();
    assert!(delta < 1e-6);
    for (row_before, row_after) in before.values.iter().zip(&after.values) {
        for (b, a) in row_before.iter().zip(row_after) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}

#[test]
fn first_round_keeps_portal_ties() {
    let mut vf = ValueFunction::default();
    vf.train_round().unwrap();
    assert_eq!(vf.policy().current_actions(&GridWorld::A), &Action::ALL);
    for action in vf.policy().default_actions() {
        let expected = 10.0 + 0.9 * vf.lookup(&GridWorld::A_PRIME);
        assert!((vf.lookahead(GridWorld::A, *action) - expected).abs() < 1e-12);
    }
}

#[test]
fn sampled_walk_under_trained_policy() {
    let mut vf = ValueFunction::default();
    vf.train(100).unwrap();
    let policy = vf.policy();
    let mut env = vf.world().clone();
    let mut rng = SmallRng::seed_from_u64(42);
    let mut state = env.reset_with(&mut rng);
    for _ in 0..50 {
        let action = policy.sample_action_with(&state, &mut rng);
        assert!(policy.current_actions(&state).contains(&action));
        let result = env.step(&action);
        if state == GridWorld::A {
            assert_eq!((result.next_state, result.reward), (GridWorld::A_PRIME, 10.0));
        }
        // the greedy policy never walks into a wall
        assert!(result.reward >= 0.0);
        assert!(!result.done);
        state = result.next_state;
    }
    assert!(policy.probability(&state, &policy.select_action(&state)) > 0.0);
}

#[test]
fn invalid_action_sets_fail_fast() {
    let mut policy = TabularPolicy::default();
    let s = State::new(1, 1);
    assert!(matches!(
        policy.set_actions(s, Vec::new()),
        Err(GridError::InvalidArgument(_))
    ));
    assert!(matches!(
        policy.set_moves(s, &[(0, 2)]),
        Err(GridError::InvalidArgument(_))
    ));
    assert!(matches!(
        ValueFunction::new((4, 4)),
        Err(GridError::InvalidArgument(_))
    ));
}
