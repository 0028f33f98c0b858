use std::path::PathBuf;

use mdplan_mdp::{MdpSimulator, StateId, load_yaml};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/mdplan-mdp/examples/three_state.mdp.yaml"));

    let spec = load_yaml(&path).expect("failed to load MDP YAML");
    let config = spec.solver_config();
    let model = spec.compile().expect("failed to compile MDP YAML");

    let solution = model
        .solve_with_hook(&config, |sweep| {
            if sweep.iteration % 25 == 0 {
                println!("sweep={} max_diff={:.3e}", sweep.iteration, sweep.max_diff);
            }
        })
        .expect("value iteration failed");

    print!(
        "{}",
        model
            .report(&solution)
            .to_yaml()
            .expect("failed to render report")
    );

    let start = StateId::from(0);
    let exact = model
        .evaluate_policy(&solution.policy, config.gamma)
        .expect("policy evaluation failed");
    let mut simulator = MdpSimulator::new(model, 12345);
    let estimate = simulator
        .estimate_value(start, &solution.policy, config.gamma, 200, 1000)
        .expect("rollouts failed");
    println!("exact_value={:.6} sampled_value={:.6}", exact[start], estimate);
}
