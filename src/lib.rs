//! # cell_society
//!
//! A grid cellular-automaton engine with interchangeable models: Game of Life,
//! fire spread, percolation, Schelling segregation and Wa-Tor predator-prey.
//!
//! Simulations are described by a JSON descriptor validated against a model
//! registry, then advanced one synchronous generation at a time.

pub mod cell;
pub mod configurator;
pub mod descriptor;
pub mod error;
pub mod grid;
pub mod model;
pub mod registry;
pub mod rules;
pub mod simulation;
pub mod topology;

mod history;

pub use cell::Cell;
pub use configurator::Configurator;
pub use configurator::SimulationDescriptor;
pub use error::SimulationError;
pub use grid::Grid;
pub use model::Model;
pub use model::State;
pub use simulation::GenerationState;
pub use simulation::Simulation;
pub use topology::EdgePolicy;
pub use topology::Shape;
pub use topology::Topology;
