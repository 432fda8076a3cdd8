use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_min_block_len() -> usize {
    100
}

fn default_big_blind() -> u64 {
    400
}

fn default_leak_count() -> usize {
    3
}

fn default_key_hand_count() -> usize {
    5
}

fn default_big_pot_bb() -> f64 {
    20.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Blocks shorter than this many characters are treated as fragments.
    #[serde(default = "default_min_block_len")]
    pub min_block_len: usize,
    #[serde(default)]
    pub require_hole_cards_section: bool,
    /// Big blind used when neither the level header nor a blind post is found.
    #[serde(default = "default_big_blind")]
    pub default_big_blind: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_block_len: default_min_block_len(),
            require_hole_cards_section: false,
            default_big_blind: default_big_blind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_leak_count")]
    pub leak_count: usize,
    #[serde(default = "default_key_hand_count")]
    pub key_hand_count: usize,
    #[serde(default = "default_big_pot_bb")]
    pub big_pot_bb: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            leak_count: default_leak_count(),
            key_hand_count: default_key_hand_count(),
            big_pot_bb: default_big_pot_bb(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
