//! Resource kinds.

use std::fmt;

use serde::Serialize;

/// The category of a resource or property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[default]
    Unknown,
    Int,
    Float,
    Bool,
    Array,
    /// Character material instance (`.props.json`).
    CharaMaterial,
    /// 2D texture (`.tga`).
    Texture2D,
    /// Four-component vector, usually an RGBA color.
    Vector4,
}

impl ResourceKind {
    /// Map an Unreal class name to a kind.
    ///
    /// Every name outside the known set maps to [`ResourceKind::Unknown`].
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "MaterialInstanceConstant" | "Material3" => Self::CharaMaterial,
            "Texture2D" => Self::Texture2D,
            _ => Self::Unknown,
        }
    }

    /// File extension used by the exporter for this kind, including the dot.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::CharaMaterial => Some(".props.json"),
            Self::Texture2D => Some(".tga"),
            _ => None,
        }
    }

    /// Whether values of this kind name another resource on disk.
    #[inline]
    pub fn is_resource(&self) -> bool {
        self.extension().is_some()
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::CharaMaterial => "chara_material",
            Self::Texture2D => "texture_2d",
            Self::Vector4 => "vector_4",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
