use crate::error::{read_document, Result, SimulationError};
use log::info;
use std::path::Path;
use std::str::FromStr;

/// Where the registry shipped with the crate lives, relative to the crate root.
pub const DEFAULT_REGISTRY_PATH: &str = "resources/SimulationConfig.txt";

/// The parameter and state counts a model's descriptors must declare.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRegistration {
    pub name: String,
    pub parameter_count: usize,
    pub state_count: usize,
}

/// The global registry: application defaults followed by the registered models.
///
/// The text format holds one value per line: title, default width, default
/// height, distribution accuracy, minimum delay and maximum delay, then one
/// `name / parameter count / state count` triple per model.
#[derive(Clone, Debug, PartialEq)]
pub struct Registry {
    title: String,
    width: usize,
    height: usize,
    distribution_accuracy: f64,
    min_delay: f64,
    max_delay: f64,
    models: Vec<ModelRegistration>,
}

impl Registry {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Registry> {
        let path = path.as_ref();
        let contents = read_document(path)?;

        let registry = Registry::parse(&contents)?;
        info!(
            "Loaded registry {} with {} models from {}",
            registry.title,
            registry.models.len(),
            path.display()
        );

        Ok(registry)
    }

    pub fn parse(contents: &str) -> Result<Registry> {
        let mut lines = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let title = next_value::<String>(&mut lines, "title")?;
        let width = next_value(&mut lines, "width")?;
        let height = next_value(&mut lines, "height")?;
        let distribution_accuracy = next_value(&mut lines, "distribution accuracy")?;
        let min_delay = next_value(&mut lines, "minimum delay")?;
        let max_delay = next_value(&mut lines, "maximum delay")?;

        let mut models = Vec::new();
        while let Some(name) = lines.next() {
            let parameter_count = next_value(&mut lines, "parameter count")?;
            let state_count = next_value(&mut lines, "state count")?;
            models.push(ModelRegistration {
                name: name.to_string(),
                parameter_count,
                state_count,
            });
        }

        Ok(Registry {
            title,
            width,
            height,
            distribution_accuracy,
            min_delay,
            max_delay,
            models,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Multiplier turning state percentages into seeding list repetitions.
    pub fn distribution_accuracy(&self) -> f64 {
        self.distribution_accuracy
    }

    pub fn min_delay(&self) -> f64 {
        self.min_delay
    }

    pub fn max_delay(&self) -> f64 {
        self.max_delay
    }

    pub fn models(&self) -> &[ModelRegistration] {
        &self.models
    }

    pub fn model(&self, name: &str) -> Option<&ModelRegistration> {
        let name = name.trim();
        self.models.iter().find(|model| model.name == name)
    }
}

fn next_value<'a, T: FromStr>(
    lines: &mut impl Iterator<Item = &'a str>,
    field: &str,
) -> Result<T> {
    let line = lines.next().ok_or_else(|| {
        SimulationError::MalformedDocumentError(format!("registry is missing the {}", field))
    })?;

    line.parse().map_err(|_| {
        SimulationError::MalformedDocumentError(format!(
            "registry {} is not valid: {}",
            field, line
        ))
    })
}
