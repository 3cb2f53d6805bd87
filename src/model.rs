use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;

/// A cell state. Each [`Model`] uses a small subset of these as its alphabet.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum State {
    Dead,
    Alive,
    Burning,
    Tree,
    Empty,
    Open,
    Blocked,
    Percolated,
    Group1,
    Group2,
    Fish,
    Shark,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Dead => "Dead",
            State::Alive => "Alive",
            State::Burning => "Burning",
            State::Tree => "Tree",
            State::Empty => "Empty",
            State::Open => "Open",
            State::Blocked => "Blocked",
            State::Percolated => "Percolated",
            State::Group1 => "Group1",
            State::Group2 => "Group2",
            State::Fish => "Fish",
            State::Shark => "Shark",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The simulation models the crate knows how to run.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Model {
    GameOfLife,
    Fire,
    Percolation,
    Segregation,
    WaTor,
}

impl Model {
    pub const ALL: [Model; 5] = [
        Model::GameOfLife,
        Model::Fire,
        Model::Percolation,
        Model::Segregation,
        Model::WaTor,
    ];

    /// The name used for the model in the registry and in descriptors.
    pub fn name(&self) -> &'static str {
        match self {
            Model::GameOfLife => "Game of Life",
            Model::Fire => "Fire",
            Model::Percolation => "Percolation",
            Model::Segregation => "Segregation",
            Model::WaTor => "WaTor",
        }
    }

    /// The states a cell of this model can be in, in cycling order.
    pub fn alphabet(&self) -> &'static [State] {
        match self {
            Model::GameOfLife => &[State::Dead, State::Alive],
            Model::Fire => &[State::Burning, State::Tree, State::Empty],
            Model::Percolation => &[State::Open, State::Blocked, State::Percolated],
            Model::Segregation => &[State::Group1, State::Group2, State::Empty],
            Model::WaTor => &[State::Fish, State::Empty, State::Shark],
        }
    }

    /// Looks a state name up in this model's alphabet.
    pub fn state(&self, name: &str) -> Option<State> {
        let name = name.trim();
        self.alphabet()
            .iter()
            .find(|state| state.name() == name)
            .copied()
    }

    /// The alphabet member following `state`, wrapping around.
    pub fn cycle(&self, state: State) -> State {
        let alphabet = self.alphabet();
        match alphabet.iter().position(|candidate| *candidate == state) {
            Some(index) => alphabet[(index + 1) % alphabet.len()],
            None => alphabet[0],
        }
    }
}

impl FromStr for Model {
    type Err = SimulationError;

    fn from_str(value: &str) -> Result<Model, SimulationError> {
        let value = value.trim();
        Model::ALL
            .iter()
            .find(|model| model.name() == value)
            .copied()
            .ok_or_else(|| SimulationError::ModelError(value.to_string()))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
