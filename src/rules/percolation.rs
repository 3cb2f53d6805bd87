use crate::model::State;

/// Open cells percolate when any neighbor has; blocked and percolated cells never change.
pub fn next_state(current: State, neighbors: &[State]) -> State {
    match current {
        State::Open if neighbors.contains(&State::Percolated) => State::Percolated,
        other => other,
    }
}
