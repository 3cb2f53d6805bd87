use cell_society::descriptor::{CellEntry, Descriptor};
use cell_society::{Configurator, Model, Simulation, SimulationError, State};
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn configurator() -> Configurator {
    Configurator::load_default().unwrap()
}

fn write_descriptor(descriptor: &Descriptor) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("descriptor.json");
    fs::write(&path, serde_json::to_string_pretty(descriptor).unwrap()).unwrap();
    (dir, path)
}

fn shipped(name: &str) -> Descriptor {
    Descriptor::load(format!("resources/{}.json", name)).unwrap()
}

fn alive_cells(simulation: &Simulation) -> Vec<(usize, usize)> {
    simulation
        .grid()
        .cells()
        .iter()
        .filter(|cell| cell.current_state() == State::Alive)
        .map(|cell| (cell.row(), cell.col()))
        .collect()
}

#[test]
fn when_running_every_shipped_model_the_population_is_conserved_in_size() {
    let configurator = configurator();

    for model in Model::ALL {
        let (descriptor, mut grid) = configurator.configure(model.name(), 5).unwrap();
        assert_eq!(descriptor.model, model);

        for _ in 0..20 {
            grid.step();
            let total: usize = grid.state_counts().values().sum();
            assert_eq!(total, descriptor.width * descriptor.height);
        }
    }
}

#[test]
fn when_a_glider_runs_four_generations_it_moves_one_cell_diagonally() {
    let mut simulation = Simulation::new(configurator(), "Game of Life", 0, None).unwrap();
    let start = alive_cells(&simulation);

    for _ in 0..4 {
        simulation.step();
    }

    let moved: Vec<(usize, usize)> = start
        .iter()
        .map(|(row, col)| ((row + 1) % 8, (col + 1) % 8))
        .collect();
    let mut end = alive_cells(&simulation);
    let mut expected = moved;
    end.sort();
    expected.sort();
    assert_eq!(end, expected);
}

#[test]
fn when_using_triangles_with_edge_indices_every_cell_has_three_neighbors() {
    let (_, grid) = configurator().configure("WaTor", 1).unwrap();

    assert!(grid.cells().iter().all(|cell| cell.neighbors().len() == 3));
}

#[test]
fn when_a_descriptor_has_too_few_parameters_configuring_fails() {
    let mut descriptor = shipped("WaTor");
    descriptor.parameters = vec![3.0, 8.0];
    let (_dir, path) = write_descriptor(&descriptor);

    let result = configurator().configure(path.to_str().unwrap(), 0);

    assert_eq!(
        result.err(),
        Some(SimulationError::ParameterCountError {
            model: "WaTor".to_string(),
            expected: 4,
            found: 2,
        })
    );
}

#[test]
fn when_an_explicit_layout_misses_a_cell_configuring_fails() {
    let mut descriptor = shipped("Game of Life");
    descriptor.cells.as_mut().unwrap().pop();
    let (_dir, path) = write_descriptor(&descriptor);

    let result = configurator().configure(path.to_str().unwrap(), 0);

    assert_eq!(
        result.err(),
        Some(SimulationError::CellCompletenessError(
            "cell (7, 7) has no state".to_string()
        ))
    );
}

#[test]
fn when_an_explicit_layout_lists_a_cell_outside_the_grid_configuring_fails() {
    let mut descriptor = shipped("Game of Life");
    descriptor.cells.as_mut().unwrap()[0] = CellEntry {
        row: Some(-1),
        col: Some(0),
        cell_state: Some("Dead".to_string()),
    };
    let (_dir, path) = write_descriptor(&descriptor);

    let result = configurator().configure(path.to_str().unwrap(), 0);

    assert!(matches!(
        result,
        Err(SimulationError::CellIndexError { row: -1, .. })
    ));
}

#[test]
fn when_no_percentages_or_table_are_given_every_cell_is_filled() {
    let mut descriptor = shipped("Segregation");
    descriptor.states.iter_mut().for_each(|state| state.state_percentage = None);
    let (_dir, path) = write_descriptor(&descriptor);

    let (_, grid) = configurator().configure(path.to_str().unwrap(), 8).unwrap();

    assert_eq!(grid.cells().len(), 400);
    assert!(grid
        .cells()
        .iter()
        .all(|cell| Model::Segregation.alphabet().contains(&cell.current_state())));
}

#[test]
fn when_the_descriptor_is_malformed_configuring_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"Type\": \"Fire\", \"Width\": ").unwrap();

    let result = configurator().configure(path.to_str().unwrap(), 0);

    assert!(matches!(
        result,
        Err(SimulationError::MalformedDocumentError(_))
    ));
}

#[test]
fn when_the_descriptor_does_not_exist_configuring_fails() {
    let result = configurator().configure("resources/Rock Paper Scissors.json", 0);

    assert_eq!(
        result.err(),
        Some(SimulationError::FileNotFoundError(PathBuf::from(
            "resources/Rock Paper Scissors.json"
        )))
    );
}

#[test]
fn when_a_session_saves_its_history_every_generation_is_in_the_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut simulation =
        Simulation::new(configurator(), "Fire", 3, Some(path.clone())).unwrap();

    for _ in 0..5 {
        simulation.step();
    }
    simulation.save_history().unwrap();

    let data: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(data["model"], "Fire");
    assert_eq!(data["width"], 20);
    assert_eq!(data["generations"].as_array().unwrap().len(), 6);
}
