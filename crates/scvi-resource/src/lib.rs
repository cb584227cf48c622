//! Resource resolution for Soul Calibur VI asset exports.
//!
//! UModel dumps the game's packages into a directory tree where each material
//! instance becomes a `.props.json` document and each texture a `.tga` image.
//! Materials reference each other and their textures by bare name or by a
//! package-qualified path, so finding the file behind a reference means
//! searching a handful of roots:
//!
//! - `Common/BasicResource` - shared engine resources, always tried first
//! - `Chara/CMN/Material` / `Chara/CMN/Texture` - resources shared by all characters
//! - `Chara/NNN/Material` - per-character materials
//! - `DLC/DD/Chara/NNN/Material` - characters shipped in a DLC pack
//!
//! # Example
//!
//! ```no_run
//! use scvi_resource::{ResourceKind, ResourceResolver};
//!
//! let resolver = ResourceResolver::with_base_dir("/data/UmodelExport");
//! if let Some(path) = resolver.resolve_path(ResourceKind::CharaMaterial, "MI_R060_Body") {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod kind;
mod resolver;

pub use config::{ResolverConfig, DEFAULT_DLC_TABLE, DEFAULT_MAX_PARENT_DEPTH, EXPORT_DIR_NAME};
pub use error::{Error, Result};
pub use kind::ResourceKind;
pub use resolver::{character_id, ResourceResolver};
