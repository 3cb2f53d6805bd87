use crate::configurator::{Configurator, SimulationDescriptor};
use crate::error::Result;
use crate::grid::Grid;
use crate::history::{create_history_recorder, HistoryRecorder};
use crate::model::State;
use log::info;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

/// A running simulation session.
///
/// The session owns the active grid. Resetting or switching models builds a
/// whole new grid and discards the old one.
pub struct Simulation {
    configurator: Configurator,
    source: String,
    seed: u64,
    id: String,
    generation: usize,
    descriptor: SimulationDescriptor,
    grid: Grid,
    history_filename: Option<PathBuf>,
    history: Box<dyn HistoryRecorder>,
}

/// Represents the state of the simulation after a generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationState {
    /// The generation that was just reached, 0 right after building.
    pub generation: usize,
    /// The number of cells in each state of the model.
    pub counts: BTreeMap<State, usize>,
}

impl Simulation {
    /// Creates a new session.
    ///
    /// # Arguments
    /// * `configurator` - The configurator used to build this and every later grid.
    /// * `source` - A registered model name or a path to a descriptor document.
    /// * `seed` - The seed for the random number generator.
    /// * `history_filename` - The file to save the population history to. If `None`, no history
    ///   will be saved.
    pub fn new(
        configurator: Configurator,
        source: &str,
        seed: u64,
        history_filename: Option<PathBuf>,
    ) -> Result<Simulation> {
        let (descriptor, grid) = configurator.configure(source, seed)?;
        let id = Uuid::new_v4().to_string();
        let history = create_history_recorder(
            history_filename.clone(),
            id.clone(),
            descriptor.model,
            descriptor.width,
            descriptor.height,
        );

        let mut simulation = Simulation {
            configurator,
            source: source.to_string(),
            seed,
            id,
            generation: 0,
            descriptor,
            grid,
            history_filename,
            history,
        };
        simulation.record();
        info!("Started session {} running {}", simulation.id, simulation.descriptor.model);

        Ok(simulation)
    }

    /// Advances the simulation by one generation.
    pub fn step(&mut self) -> GenerationState {
        self.grid.step();
        self.generation += 1;
        self.record()
    }

    /// Rebuilds the grid from the same descriptor and seed.
    ///
    /// On failure the current session is left untouched.
    pub fn reset(&mut self) -> Result<GenerationState> {
        let source = self.source.clone();
        self.rebuild(&source)
    }

    /// Replaces the running model with the one named by `source`.
    ///
    /// On failure the current session is left untouched.
    pub fn switch(&mut self, source: &str) -> Result<GenerationState> {
        self.rebuild(source)
    }

    /// Writes the population history if a history file was requested.
    pub fn save_history(&self) -> io::Result<()> {
        self.history.save()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn descriptor(&self) -> &SimulationDescriptor {
        &self.descriptor
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The grid, for toggling cells and tuning parameters between generations.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }
}

impl Simulation {
    fn rebuild(&mut self, source: &str) -> Result<GenerationState> {
        let (descriptor, grid) = self.configurator.configure(source, self.seed)?;

        self.id = Uuid::new_v4().to_string();
        self.source = source.to_string();
        self.generation = 0;
        self.history = create_history_recorder(
            self.history_filename.clone(),
            self.id.clone(),
            descriptor.model,
            descriptor.width,
            descriptor.height,
        );
        self.descriptor = descriptor;
        self.grid = grid;

        info!("Rebuilt session {} running {}", self.id, self.descriptor.model);
        Ok(self.record())
    }

    fn record(&mut self) -> GenerationState {
        self.history
            .log_generation(self.generation, self.grid.state_percentages());

        GenerationState {
            generation: self.generation,
            counts: self.grid.state_counts(),
        }
    }
}
