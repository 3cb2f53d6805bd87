use crate::model::{Model, State};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

pub fn create_history_recorder(
    filename: Option<PathBuf>,
    session: String,
    model: Model,
    width: usize,
    height: usize,
) -> Box<dyn HistoryRecorder> {
    match filename {
        None => Box::new(NoOpHistoryRecorder {}),
        Some(filename) => Box::new(JsonHistoryRecorder::new(
            filename, session, model, width, height,
        )),
    }
}

/// Collects the population of every generation of a session.
pub trait HistoryRecorder: Send + Sync {
    #[allow(unused_variables)]
    fn log_generation(&mut self, generation: usize, percentages: BTreeMap<State, f64>) {}

    fn save(&self) -> io::Result<()> {
        Ok(())
    }
}

struct Generation {
    generation: usize,
    percentages: BTreeMap<State, f64>,
}

struct NoOpHistoryRecorder;
impl HistoryRecorder for NoOpHistoryRecorder {}

struct JsonHistoryRecorder {
    filename: PathBuf,
    session: String,
    model: Model,
    width: usize,
    height: usize,
    generations: Vec<Generation>,
}

impl JsonHistoryRecorder {
    pub fn new(
        filename: PathBuf,
        session: String,
        model: Model,
        width: usize,
        height: usize,
    ) -> JsonHistoryRecorder {
        JsonHistoryRecorder {
            filename,
            session,
            model,
            width,
            height,
            generations: Vec::new(),
        }
    }
}

impl HistoryRecorder for JsonHistoryRecorder {
    fn log_generation(&mut self, generation: usize, percentages: BTreeMap<State, f64>) {
        self.generations.push(Generation {
            generation,
            percentages,
        });
    }

    fn save(&self) -> io::Result<()> {
        let file = File::create(&self.filename)?;
        let generations: Vec<_> = self
            .generations
            .iter()
            .map(|generation| {
                let percentages: BTreeMap<&str, f64> = generation
                    .percentages
                    .iter()
                    .map(|(state, percentage)| (state.name(), *percentage))
                    .collect();

                json!({
                    "generation": generation.generation,
                    "percentages": percentages,
                })
            })
            .collect();

        let data = json!({
            "session": self.session,
            "model": self.model.name(),
            "width": self.width,
            "height": self.height,
            "generations": generations,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn percentages(alive: f64) -> BTreeMap<State, f64> {
        BTreeMap::from([(State::Dead, 1.0 - alive), (State::Alive, alive)])
    }

    #[test]
    fn when_saving_the_generations_are_written_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut recorder = create_history_recorder(
            Some(path.clone()),
            "session".to_string(),
            Model::GameOfLife,
            4,
            3,
        );

        recorder.log_generation(0, percentages(0.25));
        recorder.log_generation(1, percentages(0.5));
        recorder.save().unwrap();

        let data: Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(data["session"], "session");
        assert_eq!(data["model"], "Game of Life");
        assert_eq!(data["width"], 4);
        assert_eq!(data["generations"].as_array().unwrap().len(), 2);
        assert_eq!(data["generations"][1]["generation"], 1);
        assert_eq!(data["generations"][1]["percentages"]["Alive"], 0.5);
    }

    #[test]
    fn when_no_filename_is_given_nothing_is_written() {
        let mut recorder = create_history_recorder(None, "s".to_string(), Model::Fire, 1, 1);

        recorder.log_generation(0, percentages(0.0));

        assert!(recorder.save().is_ok());
    }

    #[test]
    fn when_the_file_cannot_be_created_an_error_is_returned() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("history.json");
        let recorder = create_history_recorder(Some(path), "s".to_string(), Model::Fire, 1, 1);

        assert!(recorder.save().is_err());
    }
}
