use std::path::Path;

use crate::board::Tile;
use crate::error::{Error, Result};
use crate::game::{Game, Rules, WinPolicy};
use crate::theme::{Theme, TileLabel};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default = "defaults::size")]
    pub size: usize,
    #[serde(default = "defaults::winning_tile")]
    pub winning_tile: Tile,
    #[serde(default)]
    pub win_policy: WinPolicy,
    /// Fixed RNG seed; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct ThemeConfig {
    #[serde(default)]
    pub tiles: Vec<TileLabel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            winning_tile: defaults::winning_tile(),
            win_policy: WinPolicy::default(),
            seed: None,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.rules().validate()?;
        Ok(cfg)
    }

    pub fn rules(&self) -> Rules {
        Rules {
            winning_tile: self.winning_tile,
            win_policy: self.win_policy,
        }
    }

    pub fn theme(&self) -> Result<Theme> {
        Theme::with_overrides(&self.theme.tiles)
    }

    /// Start a game with these settings.
    pub fn new_game(&self) -> Result<Game> {
        Game::with_rules((self.size, self.size), self.rules(), self.seed)
    }
}

mod defaults {
    use crate::board::Tile;
    use crate::game::{DEFAULT_SIZE, DEFAULT_WINNING_TILE};

    pub fn size() -> usize { DEFAULT_SIZE }
    pub fn winning_tile() -> Tile { DEFAULT_WINNING_TILE }
}
