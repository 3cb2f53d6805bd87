//! Wa-Tor predator-prey rules.
//!
//! Fish and sharks move by claiming a neighboring cell: the mover writes its
//! state into the destination's pending state and stages its counters in the
//! destination's shadow fields. A shark eating a fish that already moved this
//! generation cancels the fish's claim, so the fish disappears instead of
//! escaping.

use crate::cell::{Cell, Creature};
use crate::model::State;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

pub const FISH_BREED_TURNS: usize = 0;
pub const SHARK_BREED_TURNS: usize = 1;
pub const SHARK_ENERGY: usize = 2;
pub const EATING_ENERGY: usize = 3;

/// The four Wa-Tor parameters, read from the ordered parameter list.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    pub fish_breed_turns: f64,
    pub shark_breed_turns: f64,
    pub shark_energy: f64,
    pub eating_energy: f64,
}

impl Parameters {
    pub fn from_slice(params: &[f64]) -> Parameters {
        let get = |index: usize| params.get(index).copied().unwrap_or_default();
        Parameters {
            fish_breed_turns: get(FISH_BREED_TURNS),
            shark_breed_turns: get(SHARK_BREED_TURNS),
            shark_energy: get(SHARK_ENERGY),
            eating_energy: get(EATING_ENERGY),
        }
    }
}

/// Runs the Wa-Tor step for the cell at `index`.
pub fn compute_next<R: Rng + ?Sized>(
    cells: &mut [Cell],
    index: usize,
    params: &Parameters,
    rng: &mut R,
) {
    if let Some(creature) = cells[index].creature_mut() {
        creature.turns_survived += 1.0;
    }

    match cells[index].current_state() {
        // A fish with a pending state was eaten earlier in this pass
        State::Fish if cells[index].next_state().is_none() => move_fish(cells, index, params, rng),
        State::Shark => move_shark(cells, index, params, rng),
        State::Empty if cells[index].next_state().is_none() => {
            stage(&mut cells[index], State::Empty, 0.0, 0.0);
        }
        _ => {}
    }
}

fn move_fish<R: Rng + ?Sized>(cells: &mut [Cell], index: usize, params: &Parameters, rng: &mut R) {
    let mut turns = creature(&cells[index]).turns_survived;
    let free = free_neighbors(cells, index);

    let target = match free.choose(rng) {
        Some(target) => *target,
        None => {
            stage(&mut cells[index], State::Fish, turns, 0.0);
            return;
        }
    };

    let breeds = turns > params.fish_breed_turns;
    if breeds {
        turns = 0.0;
        stage(&mut cells[index], State::Fish, 0.0, 0.0);
    }

    trace!("Fish at {} claims {}", index, target);
    stage(&mut cells[target], State::Fish, turns, 0.0);
    if let Some(creature) = cells[index].creature_mut() {
        creature.destination = Some(target);
    }

    if !breeds {
        stage(&mut cells[index], State::Empty, 0.0, 0.0);
    }
}

fn move_shark<R: Rng + ?Sized>(cells: &mut [Cell], index: usize, params: &Parameters, rng: &mut R) {
    let Creature {
        mut turns_survived,
        energy,
        ..
    } = *creature(&cells[index]);

    if energy <= 0.0 {
        trace!("Shark at {} starved", index);
        stage(&mut cells[index], State::Empty, 0.0, 0.0);
        return;
    }

    let prey = prey_neighbors(cells, index);
    let free = free_neighbors(cells, index);

    let (target, gained) = if let Some(fish) = prey.choose(rng) {
        (*fish, params.eating_energy)
    } else if let Some(empty) = free.choose(rng) {
        (*empty, 0.0)
    } else {
        stage(&mut cells[index], State::Shark, turns_survived, energy - 1.0);
        return;
    };

    let breeds = turns_survived > params.shark_breed_turns;
    if breeds {
        turns_survived = 0.0;
        stage(&mut cells[index], State::Shark, 0.0, params.shark_energy);
    }

    if cells[target].current_state() == State::Fish {
        // The eaten fish may already have claimed a cell this pass
        if let Some(escape) = creature(&cells[target]).destination {
            trace!("Shark at {} eats fish at {}, cancelling its move to {}", index, target, escape);
            stage(&mut cells[escape], State::Empty, 0.0, 0.0);
        }
    }

    stage(
        &mut cells[target],
        State::Shark,
        turns_survived,
        energy - 1.0 + gained,
    );

    if !breeds {
        stage(&mut cells[index], State::Empty, 0.0, 0.0);
    }
}

/// Empty neighbors nobody has claimed yet.
fn free_neighbors(cells: &[Cell], index: usize) -> Vec<usize> {
    cells[index]
        .neighbors()
        .iter()
        .copied()
        .filter(|neighbor| {
            let cell = &cells[*neighbor];
            cell.current_state() == State::Empty
                && matches!(cell.next_state(), None | Some(State::Empty))
        })
        .collect()
}

/// Fish neighbors no other shark has eaten yet.
fn prey_neighbors(cells: &[Cell], index: usize) -> Vec<usize> {
    cells[index]
        .neighbors()
        .iter()
        .copied()
        .filter(|neighbor| {
            let cell = &cells[*neighbor];
            cell.current_state() == State::Fish && cell.next_state() != Some(State::Shark)
        })
        .collect()
}

fn stage(cell: &mut Cell, state: State, turns_survived: f64, energy: f64) {
    cell.set_next_state(state);
    if let Some(creature) = cell.creature_mut() {
        creature.next_turns_survived = turns_survived;
        creature.next_energy = energy;
    }
}

fn creature(cell: &Cell) -> &Creature {
    static NONE: Creature = Creature {
        turns_survived: 0.0,
        energy: 0.0,
        next_turns_survived: 0.0,
        next_energy: 0.0,
        destination: None,
    };
    cell.creature().unwrap_or(&NONE)
}
