//! Neighbor resolution for square and triangle tessellations.
//!
//! Every shape numbers the positions around a cell with a stable canonical index.
//! A [`Topology`] projects that canonical numbering onto the subset of indices a
//! model asked for, dropping or wrapping candidates that fall off the grid
//! depending on the [`EdgePolicy`].

use crate::error::{Result, SimulationError};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

static SQUARE_OFFSETS: [isize; 3] = [-1, 0, 1];

// Column offsets per row band, in canonical order
static UP_BELOW: [isize; 5] = [2, 1, 0, -1, -2];
static UP_CENTER: [isize; 4] = [2, 1, -1, -2];
static UP_ABOVE: [isize; 3] = [1, 0, -1];
static DOWN_ABOVE: [isize; 5] = [-2, -1, 0, 1, 2];
static DOWN_CENTER: [isize; 4] = [-2, -1, 1, 2];
static DOWN_BELOW: [isize; 3] = [-1, 0, 1];

/// The tessellation the cells are laid out in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Shape {
    Square,
    Triangle,
}

impl Shape {
    /// Number of canonical neighbor slots around a cell of this shape.
    pub fn canonical_count(&self) -> usize {
        match self {
            Shape::Square => 8,
            Shape::Triangle => 12,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Square => "Square",
            Shape::Triangle => "Triangle",
        }
    }
}

impl FromStr for Shape {
    type Err = SimulationError;

    fn from_str(value: &str) -> Result<Shape> {
        match value.trim() {
            "Square" => Ok(Shape::Square),
            "Triangle" => Ok(Shape::Triangle),
            other => Err(SimulationError::CellShapeError(other.to_string())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How candidates that fall outside the grid are handled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EdgePolicy {
    /// Out-of-bounds candidates are dropped.
    Finite,
    /// Out-of-bounds candidates wrap around, row and column independently.
    Toroidal,
}

impl FromStr for EdgePolicy {
    type Err = SimulationError;

    fn from_str(value: &str) -> Result<EdgePolicy> {
        match value.trim() {
            "Finite" => Ok(EdgePolicy::Finite),
            "Toroidal" => Ok(EdgePolicy::Toroidal),
            other => Err(SimulationError::EdgePolicyError(other.to_string())),
        }
    }
}

/// A shape, an edge policy and the canonical indices a model wants as neighbors.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    shape: Shape,
    edge: EdgePolicy,
    indices: Vec<usize>,
}

impl Topology {
    /// Creates a topology after checking every requested index against the shape.
    ///
    /// # Arguments
    /// * `shape` - The tessellation of the grid.
    /// * `edge` - The edge policy name, `Finite` or `Toroidal`.
    /// * `indices` - The canonical neighbor indices to resolve, in the order they should be
    ///   returned.
    pub fn new(shape: Shape, edge: &str, indices: Vec<usize>) -> Result<Topology> {
        let edge: EdgePolicy = edge.parse()?;

        if let Some(index) = indices
            .iter()
            .find(|index| **index >= shape.canonical_count())
        {
            return Err(SimulationError::NeighborIndexError(format!(
                "{} is outside the {} range 0..{}",
                index,
                shape,
                shape.canonical_count()
            )));
        }

        Ok(Topology {
            shape,
            edge,
            indices,
        })
    }

    /// A topology requesting every canonical index of the shape.
    pub fn full(shape: Shape, edge: EdgePolicy) -> Topology {
        Topology {
            shape,
            edge,
            indices: (0..shape.canonical_count()).collect(),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn edge(&self) -> EdgePolicy {
        self.edge
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Builds the canonical index to coordinate map around `(row, col)`.
    ///
    /// Indices whose candidate was dropped by a finite edge are absent from the map.
    pub fn canonical_map(
        &self,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    ) -> BTreeMap<usize, (usize, usize)> {
        let mut map = BTreeMap::new();

        for (index, (d_row, d_col)) in self.offsets(row, col).into_iter().enumerate() {
            let candidate = (row as isize + d_row, col as isize + d_col);
            if let Some(coords) = self.place(candidate, width, height) {
                map.insert(index, coords);
            }
        }

        map
    }

    /// Resolves the requested neighbors of `(row, col)` into grid coordinates.
    ///
    /// The result follows the request order and is shorter than the request when
    /// finite-edge candidates were dropped.
    pub fn resolve_neighbors(
        &self,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    ) -> Vec<(usize, usize)> {
        let map = self.canonical_map(row, col, width, height);
        self.indices
            .iter()
            .filter_map(|index| map.get(index).copied())
            .collect()
    }

    fn offsets(&self, row: usize, col: usize) -> Vec<(isize, isize)> {
        match self.shape {
            Shape::Square => SQUARE_OFFSETS
                .iter()
                .flat_map(|d_row| SQUARE_OFFSETS.iter().map(move |d_col| (*d_row, *d_col)))
                .filter(|offset| *offset != (0, 0))
                .collect(),
            Shape::Triangle => {
                let bands: [(isize, &[isize]); 3] = if points_up(row, col) {
                    [(1, &UP_BELOW[..]), (0, &UP_CENTER[..]), (-1, &UP_ABOVE[..])]
                } else {
                    [(-1, &DOWN_ABOVE[..]), (0, &DOWN_CENTER[..]), (1, &DOWN_BELOW[..])]
                };

                bands
                    .iter()
                    .flat_map(|(d_row, d_cols)| d_cols.iter().map(move |d_col| (*d_row, *d_col)))
                    .collect()
            }
        }
    }

    fn place(
        &self,
        (row, col): (isize, isize),
        width: usize,
        height: usize,
    ) -> Option<(usize, usize)> {
        let in_bounds = row >= 0 && row < height as isize && col >= 0 && col < width as isize;

        if in_bounds {
            return Some((row as usize, col as usize));
        }

        match self.edge {
            EdgePolicy::Finite => None,
            EdgePolicy::Toroidal => Some((
                row.rem_euclid(height as isize) as usize,
                col.rem_euclid(width as isize) as usize,
            )),
        }
    }
}

/// Triangles with an even `row + col` point up, the others point down.
pub fn points_up(row: usize, col: usize) -> bool {
    (row + col) % 2 == 0
}
