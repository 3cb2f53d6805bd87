use crate::cell::Cell;
use crate::error::{Result, SimulationError};
use crate::model::{Model, State};
use crate::rules;
use crate::topology::{Shape, Topology};
use log::debug;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 24;

/// A fixed-size, row-major arena of cells advanced one generation at a time.
///
/// The grid owns the shared parameter list and the random number generator that
/// seeded it, so a run is reproducible from the seed it was built with.
pub struct Grid {
    model: Model,
    width: usize,
    height: usize,
    topology: Topology,
    cells: Vec<Cell>,
    params: Vec<f64>,
    rng: StdRng,
}

impl Grid {
    /// Creates a grid and wires every cell's neighbors.
    ///
    /// # Arguments
    /// * `model` - The model every cell follows.
    /// * `width` - The number of columns.
    /// * `height` - The number of rows.
    /// * `topology` - The shape, edge policy and neighbor indices to resolve.
    /// * `params` - The ordered model parameters.
    /// * `states` - The initial state of every cell, row-major.
    /// * `rng` - The generator used by the stochastic rules.
    pub fn new(
        model: Model,
        width: usize,
        height: usize,
        topology: Topology,
        params: Vec<f64>,
        states: Vec<State>,
        rng: StdRng,
    ) -> Result<Grid> {
        if width == 0 || height == 0 {
            return Err(SimulationError::GridSizeError(format!(
                "{}x{} has no cells",
                width, height
            )));
        }

        if width.checked_mul(height).map_or(true, |count| count > MAX_CELLS) {
            return Err(SimulationError::GridSizeError(format!(
                "{}x{} exceeds the limit of {} cells",
                width, height, MAX_CELLS
            )));
        }

        if states.len() != width * height {
            return Err(SimulationError::GridSizeError(format!(
                "{} initial states for a {}x{} grid",
                states.len(),
                width,
                height
            )));
        }

        let mut cells = Vec::with_capacity(states.len());
        for (index, state) in states.into_iter().enumerate() {
            let (row, col) = (index / width, index % width);
            if !model.alphabet().contains(&state) {
                return Err(SimulationError::CellStateError {
                    row: row as i64,
                    col: col as i64,
                    state: state.to_string(),
                });
            }

            let mut cell = Cell::new(row, col, state, model, &params);
            let neighbors = topology
                .resolve_neighbors(row, col, width, height)
                .into_iter()
                .map(|(n_row, n_col)| n_row * width + n_col)
                .collect();
            cell.set_neighbors(neighbors);
            cells.push(cell);
        }

        Ok(Grid {
            model,
            width,
            height,
            topology,
            cells,
            params,
            rng,
        })
    }

    /// Runs the computation step of every cell in row-major order.
    pub fn compute_pass(&mut self) {
        for index in 0..self.cells.len() {
            rules::compute_next(
                self.model,
                &mut self.cells,
                index,
                &self.params,
                &mut self.rng,
            );
        }
    }

    /// Commits every cell.
    ///
    /// Panics if a cell was left without a pending state by the computation pass.
    pub fn commit_pass(&mut self) {
        self.cells.iter_mut().for_each(Cell::commit);
    }

    /// Advances the grid by one generation.
    pub fn step(&mut self) {
        self.compute_pass();
        self.commit_pass();

        debug!("{} counts: {:?}", self.model, self.state_counts());
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> Shape {
        self.topology.shape()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// The parameter list shared by every cell, for live tuning between generations.
    pub fn params_mut(&mut self) -> &mut [f64] {
        &mut self.params
    }

    /// Advances the cell at `(row, col)` to the next state of the model's alphabet.
    ///
    /// Returns the new state, or `None` when the position is outside the grid.
    pub fn cycle_state(&mut self, row: usize, col: usize) -> Option<State> {
        if row >= self.height || col >= self.width {
            return None;
        }

        let cell = &mut self.cells[row * self.width + col];
        cell.cycle_state(self.model, &self.params);
        Some(cell.current_state())
    }

    /// Number of cells in each state of the model's alphabet, including states no cell is in.
    pub fn state_counts(&self) -> BTreeMap<State, usize> {
        let mut counts: BTreeMap<State, usize> = self
            .model
            .alphabet()
            .iter()
            .map(|state| (*state, 0))
            .collect();

        for cell in &self.cells {
            *counts.entry(cell.current_state()).or_default() += 1;
        }

        counts
    }

    /// Share of cells in each state, between 0 and 1.
    pub fn state_percentages(&self) -> BTreeMap<State, f64> {
        let total = self.cells.len() as f64;
        self.state_counts()
            .into_iter()
            .map(|(state, count)| (state, count as f64 / total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::State::{Alive as L, Blocked as X, Dead as D, Open as O, Percolated as P};
    use crate::topology::EdgePolicy;
    use rand::SeedableRng;

    fn grid(model: Model, edge: EdgePolicy, rows: &[&[State]], params: Vec<f64>) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let states = rows.iter().flat_map(|row| row.iter().copied()).collect();

        Grid::new(
            model,
            width,
            height,
            Topology::full(Shape::Square, edge),
            params,
            states,
            StdRng::seed_from_u64(7),
        )
        .unwrap()
    }

    fn states(grid: &Grid) -> Vec<State> {
        grid.cells().iter().map(|cell| cell.current_state()).collect()
    }

    #[test]
    fn when_initializing_the_neighbors_are_flat_indices_of_the_resolved_cells() {
        let grid = grid(
            Model::GameOfLife,
            EdgePolicy::Finite,
            &[&[D, D, D], &[D, D, D]],
            vec![],
        );

        assert_eq!(grid.cell(0, 0).unwrap().neighbors(), &[1, 3, 4]);
        assert_eq!(grid.cell(1, 1).unwrap().neighbors(), &[0, 1, 2, 3, 5]);
        assert!(grid.cell(2, 0).is_none());
    }

    #[test]
    fn when_the_initial_states_do_not_cover_the_grid_an_error_is_returned() {
        let result = Grid::new(
            Model::GameOfLife,
            2,
            2,
            Topology::full(Shape::Square, EdgePolicy::Finite),
            vec![],
            vec![D, D, D],
            StdRng::seed_from_u64(0),
        );

        assert!(matches!(result, Err(SimulationError::GridSizeError(_))));
    }

    #[test]
    fn when_the_grid_is_too_large_an_error_is_returned() {
        let result = Grid::new(
            Model::GameOfLife,
            usize::MAX,
            2,
            Topology::full(Shape::Square, EdgePolicy::Finite),
            vec![],
            vec![D, D],
            StdRng::seed_from_u64(0),
        );

        assert!(matches!(result, Err(SimulationError::GridSizeError(_))));
    }

    #[test]
    fn when_an_initial_state_is_outside_the_alphabet_an_error_is_returned() {
        let result = Grid::new(
            Model::GameOfLife,
            2,
            1,
            Topology::full(Shape::Square, EdgePolicy::Finite),
            vec![],
            vec![D, State::Tree],
            StdRng::seed_from_u64(0),
        );

        assert_eq!(
            result.err(),
            Some(SimulationError::CellStateError {
                row: 0,
                col: 1,
                state: "Tree".to_string()
            })
        );
    }

    #[test]
    fn when_stepping_a_block_on_a_toroidal_grid_it_stays_fixed() {
        let initial: &[&[State]] = &[
            &[D, D, D, D],
            &[D, L, L, D],
            &[D, L, L, D],
            &[D, D, D, D],
        ];
        let mut grid = grid(Model::GameOfLife, EdgePolicy::Toroidal, initial, vec![]);
        let expected = states(&grid);

        for _ in 0..5 {
            grid.step();
            assert_eq!(states(&grid), expected);
        }
    }

    #[test]
    fn when_stepping_a_block_on_a_finite_grid_it_stays_fixed() {
        let initial: &[&[State]] = &[&[L, L, D], &[L, L, D], &[D, D, D]];
        let mut grid = grid(Model::GameOfLife, EdgePolicy::Finite, initial, vec![]);
        let expected = states(&grid);

        for _ in 0..5 {
            grid.step();
            assert_eq!(states(&grid), expected);
        }
    }

    #[test]
    fn when_stepping_a_blinker_it_oscillates() {
        let initial: &[&[State]] = &[
            &[D, D, D, D, D],
            &[D, D, L, D, D],
            &[D, D, L, D, D],
            &[D, D, L, D, D],
            &[D, D, D, D, D],
        ];
        let mut grid = grid(Model::GameOfLife, EdgePolicy::Finite, initial, vec![]);
        let vertical = states(&grid);

        grid.step();
        assert_eq!(grid.cell(2, 1).unwrap().current_state(), L);
        assert_eq!(grid.cell(2, 3).unwrap().current_state(), L);
        assert_eq!(grid.cell(1, 2).unwrap().current_state(), D);

        grid.step();
        assert_eq!(states(&grid), vertical);
    }

    #[test]
    fn when_stepping_percolation_it_spreads_one_ring_per_generation_around_blocks() {
        let initial: &[&[State]] = &[&[P, O, O, O], &[X, X, X, O]];
        let mut grid = grid(Model::Percolation, EdgePolicy::Finite, initial, vec![]);

        grid.step();
        assert_eq!(states(&grid), vec![P, P, O, O, X, X, X, O]);

        grid.step();
        grid.step();
        assert_eq!(states(&grid), vec![P, P, P, P, X, X, X, P]);
    }

    #[test]
    fn when_stepping_fire_with_full_ignition_it_burns_out() {
        use crate::model::State::{Burning, Empty, Tree};
        let initial: &[&[State]] = &[&[Burning, Tree, Tree], &[Tree, Tree, Empty]];
        let mut grid = grid(Model::Fire, EdgePolicy::Finite, initial, vec![1.0]);

        grid.step();
        assert_eq!(
            states(&grid),
            vec![Empty, Burning, Tree, Burning, Burning, Empty]
        );

        grid.step();
        grid.step();
        assert!(states(&grid).iter().all(|state| *state == Empty));
    }

    #[test]
    fn when_stepping_segregation_every_cell_keeps_a_state_of_the_alphabet() {
        use crate::model::State::{Empty as E, Group1 as A, Group2 as B};
        let initial: &[&[State]] = &[&[A, B, E, A], &[B, A, B, E], &[E, A, B, A]];
        let mut grid = grid(Model::Segregation, EdgePolicy::Toroidal, initial, vec![0.7]);
        let before = grid.state_counts();

        for _ in 0..10 {
            grid.step();
            assert_eq!(grid.state_counts(), before);
        }
    }

    #[test]
    fn when_stepping_wator_the_fish_and_sharks_stay_inside_the_alphabet() {
        use crate::model::State::{Empty as E, Fish as F, Shark as S};
        let initial: &[&[State]] = &[&[F, E, S, E], &[E, F, E, F], &[S, E, F, E]];
        let mut grid = grid(
            Model::WaTor,
            EdgePolicy::Toroidal,
            initial,
            vec![2.0, 4.0, 3.0, 2.0],
        );

        for _ in 0..30 {
            grid.step();
            let total: usize = grid.state_counts().values().sum();
            assert_eq!(total, 12);
            assert_eq!(grid.state_counts().len(), 3);
        }
    }

    #[test]
    fn when_cycling_a_cell_it_advances_through_the_alphabet() {
        let mut grid = grid(Model::GameOfLife, EdgePolicy::Finite, &[&[D, D]], vec![]);

        assert_eq!(grid.cycle_state(0, 1), Some(L));
        assert_eq!(grid.cycle_state(0, 1), Some(D));
        assert_eq!(grid.cycle_state(1, 0), None);
    }

    #[test]
    fn when_tuning_parameters_the_next_generation_uses_the_new_values() {
        use crate::model::State::{Burning, Tree};
        let mut grid = grid(Model::Fire, EdgePolicy::Finite, &[&[Burning, Tree]], vec![0.0]);

        grid.params_mut()[0] = 1.0;
        grid.step();

        assert_eq!(grid.cell(0, 1).unwrap().current_state(), Burning);
    }

    #[test]
    fn when_counting_states_every_alphabet_member_is_present() {
        let grid = grid(Model::GameOfLife, EdgePolicy::Finite, &[&[D, D, D, L]], vec![]);

        let counts = grid.state_counts();
        let percentages = grid.state_percentages();

        assert_eq!(counts[&D], 3);
        assert_eq!(counts[&L], 1);
        assert_eq!(percentages[&L], 0.25);
    }
}
