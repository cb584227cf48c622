//! Typed property values.

use std::fmt;

use scvi_resource::ResourceKind;

use crate::{Error, Result};

/// The payload of a property.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    /// Scalar parameter.
    Float(f32),
    /// Text, usually the name of another resource.
    Text(String),
    /// RGBA vector parameter.
    Vector4([f32; 4]),
    /// Any other JSON value, kept as exported.
    Raw(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Vector4([r, g, b, a]) => write!(f, "[{}, {}, {}, {}]", r, g, b, a),
            Value::Raw(v) => write!(f, "{}", v),
        }
    }
}

/// A single named entry of a property set.
///
/// Constructors keep `kind` consistent with the payload: floats are
/// [`ResourceKind::Float`] and vectors [`ResourceKind::Vector4`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertyValue {
    kind: ResourceKind,
    value: Value,
}

impl PropertyValue {
    /// Create a scalar property.
    pub fn float(value: f32) -> Self {
        Self {
            kind: ResourceKind::Float,
            value: Value::Float(value),
        }
    }

    /// Create a four-component vector property.
    pub fn vector4(value: [f32; 4]) -> Self {
        Self {
            kind: ResourceKind::Vector4,
            value: Value::Vector4(value),
        }
    }

    /// Create a text property of the given kind.
    ///
    /// Fails for [`ResourceKind::Float`] and [`ResourceKind::Vector4`], whose
    /// payloads have their own constructors.
    pub fn text(kind: ResourceKind, value: impl Into<String>) -> Result<Self> {
        Ok(Self {
            kind: check_untyped_payload(kind)?,
            value: Value::Text(value.into()),
        })
    }

    /// Keep an arbitrary JSON value.
    ///
    /// Fails for the same kinds as [`text`](Self::text).
    pub fn raw(kind: ResourceKind, value: serde_json::Value) -> Result<Self> {
        Ok(Self {
            kind: check_untyped_payload(kind)?,
            value: Value::Raw(value),
        })
    }

    /// Get the kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Get the payload.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Get the float value if this is a scalar.
    pub fn as_float(&self) -> Option<f32> {
        match self.value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Get the components if this is a vector.
    pub fn as_vector4(&self) -> Option<[f32; 4]> {
        match self.value {
            Value::Vector4(v) => Some(v),
            _ => None,
        }
    }

    /// Get the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn check_untyped_payload(kind: ResourceKind) -> Result<ResourceKind> {
    match kind {
        ResourceKind::Float | ResourceKind::Vector4 => Err(Error::KindMismatch(kind)),
        kind => Ok(kind),
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.kind)
    }
}

/// Decode a value that may use the exporter's `TypeName'Value'` notation.
///
/// `Texture2D'/Game/Tex.Tex'` becomes a [`ResourceKind::Texture2D`] text
/// value `/Game/Tex.Tex`. Strings without the trailing quote keep `hint`
/// as their kind, and non-string JSON is kept as [`Value::Raw`].
pub fn decode_reference(value: &serde_json::Value, hint: ResourceKind) -> Result<PropertyValue> {
    let serde_json::Value::String(s) = value else {
        return PropertyValue::raw(hint, value.clone());
    };

    if !s.ends_with('\'') {
        return PropertyValue::text(hint, s.as_str());
    }

    let parts: Vec<&str> = s.split('\'').collect();
    match parts.as_slice() {
        [type_name, name, ""] => PropertyValue::text(ResourceKind::from_type_name(type_name), *name),
        _ => Err(Error::InvalidReference(s.clone())),
    }
}
