use crate::model::{Model, State};

/// Per-model fields a cell carries next to its states.
#[derive(Clone, Debug, PartialEq)]
pub enum CellTraits {
    Plain,
    Resident { satisfaction: f64 },
    Creature(Creature),
}

/// Wa-Tor bookkeeping.
///
/// Values written by a neighbor during the computation pass go to the `next_*`
/// shadow fields and only become visible when this cell commits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Creature {
    pub turns_survived: f64,
    pub energy: f64,
    pub next_turns_survived: f64,
    pub next_energy: f64,
    /// Flat index of the cell a fish claimed this generation.
    pub destination: Option<usize>,
}

impl Creature {
    pub fn new(energy: f64) -> Creature {
        Creature {
            energy,
            ..Creature::default()
        }
    }

    fn commit(&mut self) {
        self.turns_survived = self.next_turns_survived;
        self.energy = self.next_energy;
        self.next_turns_survived = 0.0;
        self.next_energy = 0.0;
        self.destination = None;
    }
}

/// A single grid position with its current and pending state.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    row: usize,
    col: usize,
    current: State,
    next: Option<State>,
    neighbors: Vec<usize>,
    traits: CellTraits,
}

impl Cell {
    /// Creates a cell of the given model.
    ///
    /// # Arguments
    /// * `row` - The row of the cell in the grid.
    /// * `col` - The column of the cell in the grid.
    /// * `state` - The initial state, which must belong to the model's alphabet.
    /// * `model` - The model whose traits the cell carries.
    /// * `params` - The model parameters, used to give new sharks their initial energy.
    pub fn new(row: usize, col: usize, state: State, model: Model, params: &[f64]) -> Cell {
        let traits = match model {
            Model::Segregation => CellTraits::Resident { satisfaction: 0.0 },
            Model::WaTor => CellTraits::Creature(Creature::new(wator_initial_energy(params))),
            _ => CellTraits::Plain,
        };

        Cell {
            row,
            col,
            current: state,
            next: None,
            neighbors: Vec::new(),
            traits,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn current_state(&self) -> State {
        self.current
    }

    /// The state claimed for the next generation, `None` while unset.
    pub fn next_state(&self) -> Option<State> {
        self.next
    }

    pub fn set_next_state(&mut self, state: State) {
        self.next = Some(state);
    }

    /// Flat grid indices of the resolved neighbors, in requested order.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn traits(&self) -> &CellTraits {
        &self.traits
    }

    pub fn traits_mut(&mut self) -> &mut CellTraits {
        &mut self.traits
    }

    pub fn creature(&self) -> Option<&Creature> {
        match &self.traits {
            CellTraits::Creature(creature) => Some(creature),
            _ => None,
        }
    }

    pub fn creature_mut(&mut self) -> Option<&mut Creature> {
        match &mut self.traits {
            CellTraits::Creature(creature) => Some(creature),
            _ => None,
        }
    }

    /// Segregation satisfaction from the last computation pass.
    pub fn satisfaction(&self) -> Option<f64> {
        match self.traits {
            CellTraits::Resident { satisfaction } => Some(satisfaction),
            _ => None,
        }
    }

    /// Promotes the pending state to the current state.
    ///
    /// Panics if no pending state was set: every reachable state of every model
    /// must produce one during the computation pass.
    pub fn commit(&mut self) {
        let next = self.next.take().unwrap_or_else(|| {
            panic!(
                "Cell ({}, {}) has no next state to commit from {}",
                self.row, self.col, self.current
            )
        });

        self.current = next;

        if let CellTraits::Creature(creature) = &mut self.traits {
            creature.commit();
        }
    }

    /// Moves the current state to the next member of the model's alphabet.
    pub fn cycle_state(&mut self, model: Model, params: &[f64]) {
        self.current = model.cycle(self.current);

        let current = self.current;
        if let CellTraits::Creature(creature) = &mut self.traits {
            creature.turns_survived = 0.0;
            if current == State::Shark {
                creature.energy = wator_initial_energy(params);
            }
        }
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<usize>) {
        self.neighbors = neighbors;
    }
}

pub(crate) fn wator_initial_energy(params: &[f64]) -> f64 {
    params
        .get(crate::rules::wator::SHARK_ENERGY)
        .copied()
        .unwrap_or_default()
}
