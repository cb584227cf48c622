//! Resolver configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Name of the export directory inside the user's home directory.
pub const EXPORT_DIR_NAME: &str = "UmodelExport";

/// Longest parent chain followed before it is reported as a cycle.
pub const DEFAULT_MAX_PARENT_DEPTH: usize = 32;

/// Characters whose materials ship in a DLC pack, as (character, DLC) pairs.
pub const DEFAULT_DLC_TABLE: &[(u32, u32)] = &[
    (60, 1),  // 2B
    (30, 4),  // Cassandra
    (17, 6),  // Amy
    (28, 7),  // Hilde
    (61, 9),  // Haohmaru
    (22, 11), // Setsuka
    (9, 13),  // Hwang
];

/// Immutable settings for a [`ResourceResolver`](crate::ResourceResolver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Root of the UModel export tree.
    pub base_dir: PathBuf,
    /// Character number to DLC number.
    pub dlc_table: BTreeMap<u32, u32>,
    /// Maximum number of ancestors followed when merging parents.
    pub max_parent_depth: usize,
}

impl ResolverConfig {
    /// Default configuration rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Load overrides from a TOML file.
    ///
    /// Keys absent from the file keep their default values:
    ///
    /// ```toml
    /// base_dir = "/data/UmodelExport"
    /// max_parent_depth = 16
    ///
    /// [[dlc]]
    /// character = 60
    /// dlc = 1
    /// ```
    ///
    /// When `[[dlc]]` entries are present they replace the built-in table.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse overrides from TOML text.
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::default();

        if let Some(base_dir) = file.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(depth) = file.max_parent_depth {
            config.max_parent_depth = depth;
        }
        if let Some(entries) = file.dlc {
            config.dlc_table = entries.into_iter().map(|e| (e.character, e.dlc)).collect();
        }

        Ok(config)
    }

    /// DLC number for a character, if the character is DLC content.
    #[inline]
    pub fn dlc_for(&self, character_id: u32) -> Option<u32> {
        self.dlc_table.get(&character_id).copied()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            dlc_table: DEFAULT_DLC_TABLE.iter().copied().collect(),
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
        }
    }
}

/// `~/UmodelExport`, or a relative `UmodelExport` when no home is set.
fn default_base_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(EXPORT_DIR_NAME)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_dir: Option<PathBuf>,
    max_parent_depth: Option<usize>,
    dlc: Option<Vec<DlcEntry>>,
}

#[derive(Debug, Deserialize)]
struct DlcEntry {
    character: u32,
    dlc: u32,
}
