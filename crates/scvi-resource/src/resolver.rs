//! Resource path resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::{Error, ResolverConfig, ResourceKind, Result};

/// Shared engine resources.
const COMMON_ROOT: &str = "Common/BasicResource";
/// Materials shared by all characters.
const CHARA_COMMON_MATERIAL_ROOT: &str = "Chara/CMN/Material";
/// Textures shared by all characters.
const CHARA_COMMON_TEXTURE_ROOT: &str = "Chara/CMN/Texture";

/// Character material names look like `MI_R060_Body`.
static CHARA_MATERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+_R0?([0-9]+)_[a-zA-Z0-9]+").expect("valid regex"));

/// Extract the character number from a character material name.
///
/// ```
/// assert_eq!(scvi_resource::character_id("MI_R060_Body"), Some(60));
/// assert_eq!(scvi_resource::character_id("MI_R009_Hair"), Some(9));
/// assert_eq!(scvi_resource::character_id("M_Skin_Base"), None);
/// ```
pub fn character_id(name: &str) -> Option<u32> {
    CHARA_MATERIAL_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Finds resource files inside an export tree.
///
/// The resolver never mutates its configuration and only reads from disk,
/// so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ResourceResolver {
    config: ResolverConfig,
}

impl ResourceResolver {
    /// Create a resolver from a configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Create a resolver with default settings rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(ResolverConfig::with_base_dir(base_dir))
    }

    /// Get the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Get the export root.
    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }

    /// Directory holding a character's own materials, relative to the base.
    ///
    /// DLC characters live under `DLC/DD/Chara/NNN/Material` instead of
    /// `Chara/NNN/Material`; the two locations are never both searched.
    pub fn character_root(&self, name: &str) -> Option<PathBuf> {
        let id = character_id(name)?;
        let root = match self.config.dlc_for(id) {
            Some(dlc) => format!("DLC/{:02}/Chara/{:03}/Material", dlc, id),
            None => format!("Chara/{:03}/Material", id),
        };
        Some(PathBuf::from(root))
    }

    /// List every path that [`resolve_path`](Self::resolve_path) would
    /// probe, in search order.
    ///
    /// Qualified names yield a single candidate. Kinds without a search
    /// rule yield none.
    pub fn candidate_paths(&self, kind: ResourceKind, name: &str) -> Vec<PathBuf> {
        if name.contains('/') {
            return vec![self.qualified_path(kind, name)];
        }

        let Some(ext) = kind.extension() else {
            warn!("no search rule for {} resource {}", kind, name);
            return Vec::new();
        };

        let mut roots = vec![PathBuf::from(COMMON_ROOT)];
        match kind {
            ResourceKind::CharaMaterial => {
                roots.push(PathBuf::from(CHARA_COMMON_MATERIAL_ROOT));
                roots.extend(self.character_root(name));
            }
            ResourceKind::Texture2D => roots.push(PathBuf::from(CHARA_COMMON_TEXTURE_ROOT)),
            _ => {}
        }

        let file_name = format!("{}{}", name, ext);
        roots
            .into_iter()
            .map(|root| self.config.base_dir.join(root).join(&file_name))
            .collect()
    }

    /// Find the file that defines a resource.
    ///
    /// Returns `None` when no candidate exists on disk; a missing optional
    /// reference is an ordinary outcome.
    pub fn resolve_path(&self, kind: ResourceKind, name: &str) -> Option<PathBuf> {
        self.candidate_paths(kind, name).into_iter().find(|path| {
            let exists = path.is_file();
            debug!("probe {} -> {}", path.display(), exists);
            exists
        })
    }

    /// Read a resource as text.
    ///
    /// Returns `Ok(None)` if the resource cannot be found and an error if it
    /// exists but cannot be read.
    pub fn read_text(&self, kind: ResourceKind, name: &str) -> Result<Option<String>> {
        let Some(path) = self.resolve_path(kind, name) else {
            warn!("could not find resource {} of type {}", name, kind);
            return Ok(None);
        };

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| Error::Io { path, source })
    }

    /// Path for a package-qualified name such as `/Game/Chara/CMN/Texture/Foo.Foo`.
    ///
    /// The exporter writes object references as `Name.Name`; those, and names
    /// without any extension, get the kind's file extension instead.
    fn qualified_path(&self, kind: ResourceKind, name: &str) -> PathBuf {
        let path = self.config.base_dir.join(name.trim_start_matches('/'));

        let stem = path.file_stem().and_then(|s| s.to_str());
        let ext = path.extension().and_then(|s| s.to_str());
        let needs_extension = match (stem, ext) {
            (_, None) => true,
            (Some(stem), Some(ext)) => stem == ext,
            _ => false,
        };
        if !needs_extension {
            return path;
        }

        match kind.extension() {
            Some(canonical) => path.with_extension(&canonical[1..]),
            None => {
                warn!("unknown file type for {} resource {}", kind, name);
                path
            }
        }
    }
}
