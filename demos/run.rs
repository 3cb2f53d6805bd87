//! Runs a simulation in the console.
//!
//! Usage: `cargo run --example run -- [model or descriptor] [generations] [seed]`
//! Set `RUST_LOG=debug` to see the per-generation population counts.

use cell_society::{Configurator, Grid, Simulation, State};
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::env;
use std::error::Error;
use std::io::{stdout, Write};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "Game of Life".to_string());
    let generations: usize = args.next().map(|value| value.parse()).transpose()?.unwrap_or(50);
    let seed: u64 = args.next().map(|value| value.parse()).transpose()?.unwrap_or(42);

    let configurator = Configurator::load_default()?;
    let delay = Duration::from_millis(configurator.registry().max_delay().max(0.0) as u64 / 4);
    let mut simulation = Simulation::new(configurator, &source, seed, None)?;

    draw(&simulation)?;
    for _ in 0..generations {
        thread::sleep(delay);
        simulation.step();
        draw(&simulation)?;
    }

    Ok(())
}

fn draw(simulation: &Simulation) -> Result<(), Box<dyn Error>> {
    let mut stdout = stdout();
    let grid = simulation.grid();

    execute!(
        stdout,
        Clear(ClearType::All),
        Hide,
        Print(simulation.descriptor().title.as_deref().unwrap_or("")),
        Print("\nModel: "),
        Print(grid.model().to_string()),
        Print("\nGeneration: "),
        Print(simulation.generation().to_string()),
        Print("\n")
    )?;

    for (state, count) in grid.state_counts() {
        execute!(
            stdout,
            SetForegroundColor(color(state)),
            Print(format!("{}: {}  ", state, count)),
            SetForegroundColor(Color::Reset)
        )?;
    }
    execute!(stdout, Print("\n\n"))?;

    draw_cells(grid)?;
    stdout.flush()?;

    Ok(())
}

fn draw_cells(grid: &Grid) -> Result<(), Box<dyn Error>> {
    let mut stdout = stdout();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if let Some(cell) = grid.cell(row, col) {
                let state = cell.current_state();
                execute!(
                    stdout,
                    SetForegroundColor(color(state)),
                    Print(symbol(state)),
                    SetForegroundColor(Color::Reset)
                )?;
            }
        }
        execute!(stdout, Print("\n"))?;
    }

    Ok(())
}

fn color(state: State) -> Color {
    match state {
        State::Alive | State::Blocked => Color::White,
        State::Burning => Color::Red,
        State::Tree | State::Fish => Color::Green,
        State::Percolated | State::Group2 => Color::Blue,
        State::Group1 => Color::Magenta,
        State::Shark => Color::Grey,
        State::Dead | State::Empty | State::Open => Color::DarkGrey,
    }
}

fn symbol(state: State) -> char {
    match state {
        State::Dead | State::Empty | State::Open => '.',
        State::Alive | State::Blocked => '#',
        State::Burning => '*',
        State::Tree => 'T',
        State::Percolated => '~',
        State::Group1 => 'x',
        State::Group2 => 'o',
        State::Fish => 'f',
        State::Shark => 'S',
    }
}
