//! Material property files for Soul Calibur VI exports.
//!
//! UModel writes every material instance as a JSON document listing its
//! parameter overrides. A document may name a parent material; parameters
//! it does not override are inherited from that parent, recursively.
//!
//! # Document Format
//!
//! ```json
//! {
//!     "Parent": "MaterialInstanceConstant'M_Skin_Base'",
//!     "ScalarParameterValues": [
//!         { "ParameterName": "Metallic", "ParameterValue": 0.5 }
//!     ],
//!     "TextureParameterValues": [
//!         { "ParameterName": "BaseColor", "ParameterValue": "Texture2D'/Game/Chara/Tex.Tex'" }
//!     ],
//!     "VectorParameterValues": [
//!         { "ParameterName": "CreationColor1", "ParameterValue": { "R": 1, "G": 0, "B": 0, "A": 1 } }
//!     ]
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use scvi_props::PropertyFile;
//! use scvi_resource::{ResourceKind, ResourceResolver};
//!
//! let resolver = ResourceResolver::default();
//! if let Some(mut file) = PropertyFile::open(ResourceKind::CharaMaterial, "MI_R060_Body", &resolver)? {
//!     file.build()?;
//!     for (name, value) in file.properties().iter() {
//!         println!("{}: {}", name, value);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod set;
mod value;

pub use error::{Error, Result};
pub use file::{PropertyFile, PARENT_KEY};
pub use set::PropertySet;
pub use value::{decode_reference, PropertyValue, Value};
