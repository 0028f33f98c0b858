use std::collections::HashMap;

use mdplan_mdp::Model;

pub type Triple = (&'static str, &'static str, &'static str);

pub fn two_state_tables() -> (HashMap<Triple, f64>, HashMap<Triple, f64>) {
    let probabilities = HashMap::from([
        (("s1", "a1", "s1"), 0.9),
        (("s1", "a1", "s2"), 0.1),
        (("s2", "a2", "s1"), 1.0),
    ]);
    let rewards = HashMap::from([
        (("s1", "a1", "s1"), 20.0),
        (("s1", "a1", "s2"), 0.0),
        (("s2", "a2", "s1"), 0.0),
    ]);
    (probabilities, rewards)
}

pub fn three_state_tables() -> (HashMap<Triple, f64>, HashMap<Triple, f64>) {
    let probabilities = HashMap::from([
        (("a", "1", "b"), 1.0),
        (("a", "2", "c"), 1.0),
        (("b", "1", "a"), 0.5),
        (("b", "1", "c"), 0.5),
        (("b", "2", "a"), 0.5),
        (("b", "2", "c"), 0.5),
        (("c", "1", "a"), 0.2),
        (("c", "1", "b"), 0.8),
        (("c", "2", "a"), 0.7),
        (("c", "2", "b"), 0.3),
    ]);
    let rewards = probabilities
        .keys()
        .map(|&(s, a, n)| {
            let reward = match s {
                "a" => 0.0,
                "b" => 1.0,
                _ => 2.0,
            };
            ((s, a, n), reward)
        })
        .collect();
    (probabilities, rewards)
}

pub fn two_state() -> Model<&'static str, &'static str> {
    let (probabilities, rewards) = two_state_tables();
    Model::new(["s1", "s2"], ["a1", "a2"], probabilities, rewards).expect("valid model")
}

pub fn three_state() -> Model<&'static str, &'static str> {
    let (probabilities, rewards) = three_state_tables();
    Model::new(["a", "b", "c"], ["1", "2"], probabilities, rewards).expect("valid model")
}
