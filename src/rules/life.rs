use crate::model::State;

const BIRTH: usize = 3;
const UNDERPOPULATION: usize = 2;
const OVERPOPULATION: usize = 3;

/// Conway's rule: birth on exactly 3 live neighbors, survival on 2 or 3.
pub fn next_state(current: State, alive_neighbors: usize) -> State {
    match current {
        State::Dead if alive_neighbors == BIRTH => State::Alive,
        State::Alive if (UNDERPOPULATION..=OVERPOPULATION).contains(&alive_neighbors) => {
            State::Alive
        }
        _ => State::Dead,
    }
}
