use crate::error::{read_document, Result, SimulationError};
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

static SEPARATORS: OnceLock<Regex> = OnceLock::new();

/// One declared state of a descriptor.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateEntry {
    pub state_name: String,
    /// Key the presentation layer uses to pick the state's color or image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_percentage: Option<f64>,
}

/// One block of an explicit cell table. Missing fields are reported during validation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CellEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_state: Option<String>,
}

/// A per-model descriptor exactly as written in its JSON document.
///
/// Nothing is checked beyond JSON syntax and field types here; the configurator
/// validates the contents and reports the first problem it finds.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Descriptor {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specified_config: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    /// Delimited canonical neighbor indices, e.g. `"1,3 4;6"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbor_style: Option<String>,
    #[serde(rename = "State", default)]
    pub states: Vec<StateEntry>,
    #[serde(rename = "Parameter", default)]
    pub parameters: Vec<f64>,
    #[serde(rename = "Cell", default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<CellEntry>>,
}

impl Descriptor {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Descriptor> {
        let path = path.as_ref();
        let contents = read_document(path)?;

        let descriptor = Descriptor::parse(&contents)?;
        info!(
            "Loaded {} descriptor from {}",
            descriptor.model.as_deref().unwrap_or("untyped"),
            path.display()
        );

        Ok(descriptor)
    }

    pub fn parse(contents: &str) -> Result<Descriptor> {
        serde_json::from_str(contents)
            .map_err(|err| SimulationError::MalformedDocumentError(err.to_string()))
    }

    /// The requested canonical neighbor indices, `None` when no style was given.
    ///
    /// Indices may be separated by commas, semicolons or whitespace.
    pub fn neighbor_indices(&self) -> Result<Option<Vec<usize>>> {
        let style = match &self.neighbor_style {
            Some(style) => style,
            None => return Ok(None),
        };

        SEPARATORS
            .get_or_init(|| Regex::new(r"[,;\s]+").unwrap())
            .split(style.trim())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<usize>().map_err(|_| {
                    SimulationError::NeighborIndexError(format!("{} is not an index", token))
                })
            })
            .collect::<Result<Vec<usize>>>()
            .map(Some)
    }
}
