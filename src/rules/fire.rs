use crate::model::State;
use rand::Rng;

pub const IGNITION_PROBABILITY: usize = 0;

/// Burning cells burn out, empty cells stay empty, and a tree rolls once per
/// burning neighbor (in neighbor order) until one roll lands below `ignition`.
pub fn next_state<R: Rng + ?Sized>(
    current: State,
    neighbors: &[State],
    ignition: f64,
    rng: &mut R,
) -> State {
    match current {
        State::Burning | State::Empty => State::Empty,
        State::Tree => {
            let catches = neighbors
                .iter()
                .filter(|neighbor| **neighbor == State::Burning)
                .any(|_| rng.gen::<f64>() < ignition);

            if catches {
                State::Burning
            } else {
                State::Tree
            }
        }
        other => other,
    }
}
