//! Scvi - Soul Calibur VI material export resolution library.
//!
//! This crate provides a unified interface to the resolver and property
//! crates, plus the entry points a scene importer needs.
//!
//! # Crates
//!
//! - [`scvi_resource`] - Finding resource files in a UModel export tree
//! - [`scvi_props`] - Parsing material property files and merging parents
//!
//! # Example
//!
//! ```no_run
//! use scvi::prelude::*;
//!
//! let resolver = ResourceResolver::with_base_dir("/data/UmodelExport");
//!
//! if let Some(props) = scvi::resolve_material(&resolver, "MI_R060_Body")? {
//!     if let Some(metallic) = props.get("Metallic").and_then(|p| p.as_float()) {
//!         println!("Metallic: {}", metallic);
//!     }
//!
//!     for binding in scvi::resolve_textures(&resolver, &props) {
//!         println!("{} -> {:?}", binding.property, binding.path);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod material;

// Re-export sub-crates
pub use scvi_props as props;
pub use scvi_resource as resource;

pub use material::{resolve_material, resolve_textures, TextureBinding};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use scvi_props::{PropertyFile, PropertySet, PropertyValue, Value};
    pub use scvi_resource::{ResolverConfig, ResourceKind, ResourceResolver};

    pub use crate::{resolve_material, resolve_textures, TextureBinding};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
