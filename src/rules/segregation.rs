use crate::cell::{Cell, CellTraits};
use crate::model::State;
use log::{debug, trace};

pub const THRESHOLD: usize = 0;

/// Runs the segregation step for the cell at `index`.
///
/// An unsatisfied resident claims the first free vacancy found scanning the grid
/// in row-major order, starting at its own position and wrapping around. The
/// claim is written into the vacancy's pending state, so residents visited later
/// in the same pass see it as taken.
pub fn compute_next(cells: &mut [Cell], index: usize, threshold: f64) {
    // Already claimed by a resident moving in
    if cells[index].next_state().is_some() {
        return;
    }

    let current = cells[index].current_state();
    if current == State::Empty {
        cells[index].set_next_state(State::Empty);
        return;
    }

    let satisfaction = satisfaction(cells, index);
    if let CellTraits::Resident { satisfaction: score } = cells[index].traits_mut() {
        *score = satisfaction;
    }

    if satisfaction >= threshold {
        cells[index].set_next_state(current);
        return;
    }

    match find_vacancy(cells, index) {
        Some(target) => {
            trace!(
                "{} at ({}, {}) moves to ({}, {})",
                current,
                cells[index].row(),
                cells[index].col(),
                cells[target].row(),
                cells[target].col()
            );
            cells[target].set_next_state(current);
            cells[index].set_next_state(State::Empty);
        }
        None => {
            debug!(
                "No vacancy left for {} at ({}, {})",
                current,
                cells[index].row(),
                cells[index].col()
            );
            cells[index].set_next_state(current);
        }
    }
}

/// Share of occupied neighbors in the same group as the cell, 0 when no neighbor is occupied.
pub fn satisfaction(cells: &[Cell], index: usize) -> f64 {
    let group = cells[index].current_state();
    let (same, occupied) = cells[index]
        .neighbors()
        .iter()
        .map(|neighbor| cells[*neighbor].current_state())
        .filter(|state| *state != State::Empty)
        .fold((0usize, 0usize), |(same, occupied), state| {
            (same + usize::from(state == group), occupied + 1)
        });

    if occupied == 0 {
        0.0
    } else {
        same as f64 / occupied as f64
    }
}

fn find_vacancy(cells: &[Cell], index: usize) -> Option<usize> {
    (index..cells.len())
        .chain(0..index)
        .find(|candidate| is_vacant(&cells[*candidate]))
}

fn is_vacant(cell: &Cell) -> bool {
    cell.current_state() == State::Empty
        && matches!(cell.next_state(), None | Some(State::Empty))
}
