//! Transition rules for every model.
//!
//! The plain models (life, fire, percolation) are pure functions of the cell's
//! state and its neighbors' states. Segregation and Wa-Tor move cells around, so
//! they work on the whole cell slice and write claims into other cells' pending
//! states during the computation pass.

pub mod fire;
pub mod life;
pub mod percolation;
pub mod segregation;
pub mod wator;

use crate::cell::Cell;
use crate::model::{Model, State};
use rand::Rng;

/// Runs the computation step of the cell at `index`.
pub(crate) fn compute_next<R: Rng + ?Sized>(
    model: Model,
    cells: &mut [Cell],
    index: usize,
    params: &[f64],
    rng: &mut R,
) {
    let current = cells[index].current_state();

    match model {
        Model::GameOfLife => {
            let alive = count_neighbors(cells, index, State::Alive);
            cells[index].set_next_state(life::next_state(current, alive));
        }
        Model::Fire => {
            let neighbors = neighbor_states(cells, index);
            let ignition = param(params, fire::IGNITION_PROBABILITY);
            cells[index].set_next_state(fire::next_state(current, &neighbors, ignition, rng));
        }
        Model::Percolation => {
            let neighbors = neighbor_states(cells, index);
            cells[index].set_next_state(percolation::next_state(current, &neighbors));
        }
        Model::Segregation => {
            segregation::compute_next(cells, index, param(params, segregation::THRESHOLD));
        }
        Model::WaTor => {
            wator::compute_next(cells, index, &wator::Parameters::from_slice(params), rng);
        }
    }
}

pub(crate) fn neighbor_states(cells: &[Cell], index: usize) -> Vec<State> {
    cells[index]
        .neighbors()
        .iter()
        .map(|neighbor| cells[*neighbor].current_state())
        .collect()
}

pub(crate) fn count_neighbors(cells: &[Cell], index: usize, state: State) -> usize {
    cells[index]
        .neighbors()
        .iter()
        .filter(|neighbor| cells[**neighbor].current_state() == state)
        .count()
}

pub(crate) fn param(params: &[f64], index: usize) -> f64 {
    params.get(index).copied().unwrap_or_default()
}
