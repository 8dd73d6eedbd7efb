//! Album names attached to tile values. Front-ends use them to pick the
//! cover art and track for a tile, most often the largest one reached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Tile;
use crate::error::{Error, Result};

const ALBUMS: [(Tile, &str); 11] = [
    (2, "TaylorSwift"),
    (4, "Fearless"),
    (8, "SpeakNow"),
    (16, "Red"),
    (32, "1989"),
    (64, "Reputation"),
    (128, "Lover"),
    (256, "Folklore"),
    (512, "Evermore"),
    (1024, "Midnights"),
    (2048, "END"),
];

/// One `[[theme.tiles]]` entry of the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLabel {
    pub value: Tile,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    labels: BTreeMap<Tile, String>,
}

impl Theme {
    /// Default albums with `overrides` applied on top.
    pub fn with_overrides(overrides: &[TileLabel]) -> Result<Self> {
        let mut theme = Self::default();
        for entry in overrides {
            if entry.value != 0 && !entry.value.is_power_of_two() {
                return Err(Error::InvalidLabel(entry.value));
            }
            theme.labels.insert(entry.value, entry.label.clone());
        }
        Ok(theme)
    }

    /// Label for `tile`; empty cells have none unless configured.
    pub fn label(&self, tile: Tile) -> Option<&str> {
        self.labels.get(&tile).map(String::as_str)
    }

    /// Label grid matching a row-major board snapshot.
    pub fn label_rows(&self, rows: &[Vec<Tile>]) -> Vec<Vec<Option<String>>> {
        rows.iter()
            .map(|row| row.iter().map(|&t| self.label(t).map(str::to_owned)).collect())
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            labels: ALBUMS
                .iter()
                .map(|&(tile, name)| (tile, name.to_string()))
                .collect(),
        }
    }
}
