use nalgebra::{DMatrix, DVector};

use super::{TableMdp, policy};
use crate::{ActionId, SolveError, StateId, evaluate_policy, reward_vector, transition_matrix};

fn assert_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < tolerance, "expected {e}, got {a}");
    }
}

#[test]
fn transition_matrix_is_column_oriented() {
    let two = TableMdp::two_state();
    let p = transition_matrix(&two, &policy(&[0, 1])).expect("matrix should build");
    assert_eq!(p, DMatrix::from_row_slice(2, 2, &[0.9, 1.0, 0.1, 0.0]));

    let three = TableMdp::three_state();
    let p = transition_matrix(&three, &policy(&[0, 0, 0])).expect("matrix should build");
    assert_eq!(
        p,
        DMatrix::from_row_slice(3, 3, &[0.0, 0.5, 0.2, 1.0, 0.0, 0.8, 0.0, 0.5, 0.0])
    );
}

#[test]
fn reward_vector_holds_expected_immediate_reward() {
    let mdp = TableMdp::two_state();
    let r = reward_vector(&mdp, &policy(&[0, 1])).expect("vector should build");
    assert_eq!(r, DVector::from_column_slice(&[18.0, 0.0]));
}

#[test]
fn evaluation_matches_closed_form_values() {
    let mdp = TableMdp::two_state();
    let pi = policy(&[0, 1]);

    let half = evaluate_policy(&mdp, &pi, 0.5).expect("evaluation should succeed");
    assert_close(half.as_slice(), &[34.285714, 17.142857], 1e-6);

    let near_one = evaluate_policy(&mdp, &pi, 0.99).expect("evaluation should succeed");
    assert_close(near_one.as_slice(), &[1637.852593, 1621.474067], 1e-6);

    let three = TableMdp::three_state();
    let values =
        evaluate_policy(&three, &policy(&[0, 0, 0]), 0.9).expect("evaluation should succeed");
    assert_close(values.as_slice(), &[8.63, 9.59, 10.46], 1e-2);
}

#[test]
fn evaluation_is_repeatable() {
    let mdp = TableMdp::three_state();
    let pi = policy(&[1, 0, 0]);
    let first = evaluate_policy(&mdp, &pi, 0.9).expect("evaluation should succeed");
    let second = evaluate_policy(&mdp, &pi, 0.9).expect("evaluation should succeed");
    assert_eq!(first, second);
}

#[test]
fn deterministic_single_successor_has_no_probability_mixing() {
    // 0 -> 1 with reward 3, 1 -> 1 with reward 1.
    let mdp = TableMdp::new(2, 1, &[(0, 0, 1, 1.0, 3.0), (1, 0, 1, 1.0, 1.0)]);
    let gamma = 0.8;
    let values = evaluate_policy(&mdp, &policy(&[0, 0]), gamma).expect("evaluation should succeed");

    let v0 = values[StateId::from(0)];
    let v1 = values[StateId::from(1)];
    assert!((v1 - 5.0).abs() < 1e-12);
    assert!((v0 - (3.0 + gamma * v1)).abs() < 1e-12);
}

#[test]
fn undiscounted_recurrent_chain_is_singular() {
    let mdp = TableMdp::two_state();
    let err = evaluate_policy(&mdp, &policy(&[0, 1]), 1.0).expect_err("system should be singular");
    assert_eq!(err, SolveError::SingularMatrix);

    let absorbing = TableMdp::new(1, 1, &[(0, 0, 0, 1.0, 1.0)]);
    let err =
        evaluate_policy(&absorbing, &policy(&[0]), 1.0).expect_err("system should be singular");
    assert_eq!(err, SolveError::SingularMatrix);
}

#[test]
fn inapplicable_policy_action_is_rejected() {
    let mdp = TableMdp::two_state();
    let err = evaluate_policy(&mdp, &policy(&[1, 1]), 0.5).expect_err("a2 is not applicable in s1");
    assert_eq!(
        err,
        SolveError::InapplicableAction {
            state: StateId::from(0),
            action: ActionId::from(1),
        }
    );
}

#[test]
fn partial_policy_is_rejected() {
    let mdp = TableMdp::two_state();
    let err = evaluate_policy(&mdp, &policy(&[0]), 0.5).expect_err("policy is not total");
    assert_eq!(
        err,
        SolveError::PolicyLength {
            expected: 2,
            actual: 1,
        }
    );
}

#[test]
fn missing_reward_surfaces_the_triple() {
    let mdp = TableMdp::two_state().without_reward(0, 0, 1);
    let err = evaluate_policy(&mdp, &policy(&[0, 1]), 0.5).expect_err("reward is missing");
    assert_eq!(
        err,
        SolveError::MissingReward {
            state: StateId::from(0),
            action: ActionId::from(0),
            next: StateId::from(1),
        }
    );
}

#[test]
fn empty_model_evaluates_to_empty_values() {
    let mdp = TableMdp::new(0, 0, &[]);
    let values = evaluate_policy(&mdp, &policy(&[]), 0.5).expect("empty evaluation succeeds");
    assert!(values.is_empty());
}
