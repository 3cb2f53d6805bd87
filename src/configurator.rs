//! Validation of descriptors against the registry and construction of grids.
//!
//! Validation is fail-fast and runs in a fixed order: model, parameters,
//! states, grid size, shape and edge policy, neighbor indices, the explicit
//! layout flag and finally the explicit cell table. The first failure is
//! returned and no grid is built.

use crate::descriptor::Descriptor;
use crate::error::{Result, SimulationError};
use crate::grid::{Grid, MAX_CELLS};
use crate::model::{Model, State};
use crate::registry::{Registry, DEFAULT_REGISTRY_PATH};
use crate::topology::{EdgePolicy, Shape, Topology};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How the initial states of a grid are chosen.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// Every cell's state, row-major.
    Explicit(Vec<State>),
    /// Each cell samples this list uniformly. States appear proportionally to
    /// their declared percentage, or once each when none was declared.
    Seeded(Vec<State>),
}

/// A descriptor that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationDescriptor {
    pub model: Model,
    pub title: Option<String>,
    pub author: Option<String>,
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    pub parameters: Vec<f64>,
    /// Declared states in declaration order.
    pub states: Vec<State>,
    /// Presentation keys of the declared states.
    pub display_keys: BTreeMap<State, String>,
    /// Declared seeding percentages, empty when none were given.
    pub percentages: BTreeMap<State, f64>,
    pub layout: Layout,
}

impl SimulationDescriptor {
    pub fn shape(&self) -> Shape {
        self.topology.shape()
    }
}

/// Validates a raw descriptor against the registry.
///
/// # Arguments
/// * `raw` - The descriptor as parsed from its document.
/// * `registry` - The registry holding the expected parameter and state counts.
pub fn validate(raw: &Descriptor, registry: &Registry) -> Result<SimulationDescriptor> {
    let name = raw
        .model
        .as_deref()
        .ok_or_else(|| SimulationError::ModelError("no model type given".to_string()))?;
    let registration = registry
        .model(name)
        .ok_or_else(|| SimulationError::ModelError(name.trim().to_string()))?;
    let model: Model = name.parse()?;

    if raw.parameters.len() != registration.parameter_count {
        return Err(SimulationError::ParameterCountError {
            model: model.to_string(),
            expected: registration.parameter_count,
            found: raw.parameters.len(),
        });
    }

    let states = declared_states(raw, model, registration.state_count)?;
    let display_keys = raw
        .states
        .iter()
        .filter_map(|entry| {
            let state = model.state(&entry.state_name)?;
            let key = entry.state_image.clone().unwrap_or_else(|| state.to_string());
            Some((state, key))
        })
        .collect();
    let percentages = declared_percentages(raw, model)?;
    let seeding = seeding_list(&states, &percentages, registry.distribution_accuracy())?;

    let width = dimension(raw.width, "width")?;
    let height = dimension(raw.height, "height")?;
    cell_count(width, height)?;

    let shape: Shape = raw
        .cell_shape
        .as_deref()
        .ok_or_else(|| SimulationError::CellShapeError("no cell shape given".to_string()))?
        .parse()?;
    let edge_name = raw
        .edge_type
        .as_deref()
        .ok_or_else(|| SimulationError::EdgePolicyError("no edge type given".to_string()))?;
    edge_name.parse::<EdgePolicy>()?;

    let indices = raw
        .neighbor_indices()?
        .unwrap_or_else(|| (0..shape.canonical_count()).collect());
    let topology = Topology::new(shape, edge_name, indices)?;

    let layout = match (raw.specified_config, &raw.cells) {
        (None, _) => {
            return Err(SimulationError::SpecificationMismatchError(
                "SpecifiedConfig is missing".to_string(),
            ))
        }
        (Some(true), Some(cells)) if !cells.is_empty() => {
            Layout::Explicit(explicit_layout(raw, model, &states, width, height)?)
        }
        (Some(true), _) => {
            return Err(SimulationError::SpecificationMismatchError(
                "SpecifiedConfig is set but no cells are listed".to_string(),
            ))
        }
        (Some(false), Some(cells)) if !cells.is_empty() => {
            return Err(SimulationError::SpecificationMismatchError(
                "cells are listed but SpecifiedConfig is not set".to_string(),
            ))
        }
        (Some(false), _) => Layout::Seeded(seeding),
    };

    Ok(SimulationDescriptor {
        model,
        title: raw.title.clone(),
        author: raw.author.clone(),
        width,
        height,
        topology,
        parameters: raw.parameters.clone(),
        states,
        display_keys,
        percentages,
        layout,
    })
}

/// Seeds the initial states and builds the grid.
///
/// One generator seeded from `seed` picks the initial states and then drives
/// the grid's stochastic rules.
pub fn build_grid(descriptor: &SimulationDescriptor, seed: u64) -> Result<Grid> {
    let mut rng = StdRng::seed_from_u64(seed);
    let cell_count = cell_count(descriptor.width, descriptor.height)?;

    let states = match &descriptor.layout {
        Layout::Explicit(states) => states.clone(),
        Layout::Seeded(list) => (0..cell_count)
            .map(|_| {
                list.choose(&mut rng).copied().ok_or_else(|| {
                    SimulationError::StatePercentageError("the seeding list is empty".to_string())
                })
            })
            .collect::<Result<Vec<State>>>()?,
    };

    Grid::new(
        descriptor.model,
        descriptor.width,
        descriptor.height,
        descriptor.topology.clone(),
        descriptor.parameters.clone(),
        states,
        rng,
    )
}

/// Loads descriptors and turns them into grids.
pub struct Configurator {
    registry: Registry,
    resources: PathBuf,
}

impl Configurator {
    /// Creates a configurator.
    ///
    /// # Arguments
    /// * `registry` - The model registry.
    /// * `resources` - The directory holding one `<model name>.json` descriptor per registered
    ///   model.
    pub fn new<P: Into<PathBuf>>(registry: Registry, resources: P) -> Configurator {
        Configurator {
            registry,
            resources: resources.into(),
        }
    }

    /// Loads the registry at `path` and looks for descriptors next to it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configurator> {
        let path = path.as_ref();
        let registry = Registry::load(path)?;
        let resources = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Configurator::new(registry, resources))
    }

    /// Loads the registry shipped with the crate.
    pub fn load_default() -> Result<Configurator> {
        Configurator::load(DEFAULT_REGISTRY_PATH)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Maps a registered model name to its descriptor, anything else is taken as a path.
    pub fn descriptor_path(&self, source: &str) -> PathBuf {
        match self.registry.model(source) {
            Some(registration) => self.resources.join(format!("{}.json", registration.name)),
            None => PathBuf::from(source),
        }
    }

    /// Loads and validates the descriptor named by `source`.
    pub fn describe(&self, source: &str) -> Result<SimulationDescriptor> {
        let raw = Descriptor::load(self.descriptor_path(source))?;
        validate(&raw, &self.registry)
    }

    /// Loads, validates and builds the simulation named by `source`.
    ///
    /// # Arguments
    /// * `source` - A registered model name or a path to a descriptor document.
    /// * `seed` - The seed for the random number generator.
    pub fn configure(&self, source: &str, seed: u64) -> Result<(SimulationDescriptor, Grid)> {
        let descriptor = self.describe(source)?;
        let grid = build_grid(&descriptor, seed)?;

        info!(
            "Configured {} on a {}x{} {} grid",
            descriptor.model,
            descriptor.width,
            descriptor.height,
            descriptor.shape()
        );

        Ok((descriptor, grid))
    }
}

fn declared_states(raw: &Descriptor, model: Model, expected: usize) -> Result<Vec<State>> {
    let mut names: Vec<&str> = Vec::new();
    for entry in &raw.states {
        let name = entry.state_name.trim();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    if names.len() != expected {
        return Err(SimulationError::StateCountError {
            model: model.to_string(),
            expected,
            found: names.len(),
        });
    }

    names
        .into_iter()
        .map(|name| {
            model.state(name).ok_or_else(|| SimulationError::StateNameError {
                model: model.to_string(),
                state: name.to_string(),
            })
        })
        .collect()
}

fn declared_percentages(raw: &Descriptor, model: Model) -> Result<BTreeMap<State, f64>> {
    let declared = raw
        .states
        .iter()
        .filter(|entry| entry.state_percentage.is_some())
        .count();

    if declared == 0 {
        return Ok(BTreeMap::new());
    }

    if declared != raw.states.len() {
        return Err(SimulationError::StatePercentageError(format!(
            "{} of {} states declare a percentage",
            declared,
            raw.states.len()
        )));
    }

    let mut percentages = BTreeMap::new();
    for entry in &raw.states {
        let percentage = entry.state_percentage.unwrap_or_default();
        if percentage.is_nan() || percentage < 0.0 {
            return Err(SimulationError::StatePercentageError(format!(
                "{} has percentage {}",
                entry.state_name.trim(),
                percentage
            )));
        }
        if let Some(state) = model.state(&entry.state_name) {
            percentages.insert(state, percentage);
        }
    }

    Ok(percentages)
}

/// Replicates each state `ceil(percentage * accuracy)` times in declaration order.
fn seeding_list(
    states: &[State],
    percentages: &BTreeMap<State, f64>,
    accuracy: f64,
) -> Result<Vec<State>> {
    if percentages.is_empty() {
        return Ok(states.to_vec());
    }

    let list: Vec<State> = states
        .iter()
        .flat_map(|state| {
            let percentage = percentages.get(state).copied().unwrap_or_default();
            let copies = (percentage * accuracy).ceil().max(0.0) as usize;
            std::iter::repeat(*state).take(copies)
        })
        .collect();

    if list.is_empty() {
        return Err(SimulationError::StatePercentageError(
            "no state has a positive share".to_string(),
        ));
    }

    Ok(list)
}

fn dimension(value: Option<i64>, name: &str) -> Result<usize> {
    match value {
        Some(value) if value > 0 => Ok(value as usize),
        Some(value) => Err(SimulationError::GridSizeError(format!(
            "{} must be positive, got {}",
            name, value
        ))),
        None => Err(SimulationError::GridSizeError(format!("{} is missing", name))),
    }
}

fn cell_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .filter(|count| *count <= MAX_CELLS)
        .ok_or_else(|| {
            SimulationError::GridSizeError(format!(
                "{}x{} exceeds the limit of {} cells",
                width, height, MAX_CELLS
            ))
        })
}

fn explicit_layout(
    raw: &Descriptor,
    model: Model,
    declared: &[State],
    width: usize,
    height: usize,
) -> Result<Vec<State>> {
    let mut layout: Vec<Option<State>> = vec![None; cell_count(width, height)?];
    let entries = raw.cells.as_deref().unwrap_or_default();

    for (position, entry) in entries.iter().enumerate() {
        let (row, col, name) = match (entry.row, entry.col, entry.cell_state.as_deref()) {
            (Some(row), Some(col), Some(name)) => (row, col, name.trim()),
            _ => {
                return Err(SimulationError::CellCompletenessError(format!(
                    "cell block {} is missing its row, column or state",
                    position
                )))
            }
        };

        if row < 0 || col < 0 || row as usize >= height || col as usize >= width {
            return Err(SimulationError::CellIndexError {
                row,
                col,
                width,
                height,
            });
        }

        let state = model
            .state(name)
            .filter(|state| declared.contains(state))
            .ok_or_else(|| SimulationError::CellStateError {
                row,
                col,
                state: name.to_string(),
            })?;

        let slot = &mut layout[row as usize * width + col as usize];
        if slot.is_some() {
            return Err(SimulationError::CellCompletenessError(format!(
                "cell ({}, {}) is listed more than once",
                row, col
            )));
        }
        *slot = Some(state);
    }

    if let Some(missing) = layout.iter().position(Option::is_none) {
        return Err(SimulationError::CellCompletenessError(format!(
            "cell ({}, {}) has no state",
            missing / width,
            missing % width
        )));
    }

    Ok(layout.into_iter().flatten().collect())
}
