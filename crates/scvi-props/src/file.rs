//! Property file parsing and parent merging.

use std::collections::HashSet;

use log::{debug, info, warn};
use scvi_resource::{ResourceKind, ResourceResolver};
use serde_json::{Map, Value as Json};

use crate::{decode_reference, Error, PropertySet, PropertyValue, Result};

/// Top-level key naming the parent material.
pub const PARENT_KEY: &str = "Parent";

/// Suffix of keys holding parameter groups, e.g. `ScalarParameterValues`.
const PARAMETER_VALUES: &str = "ParameterValues";
const COLLECTED_PREFIX: &str = "Collected";
const COLLECTED_SUFFIX: &str = "Parameters";

const NAME_FIELD: &str = "ParameterName";
const VALUE_FIELD: &str = "ParameterValue";

/// The exporter writes this string instead of an empty array.
const EMPTY_GROUP: &str = "{}";

/// Parameter group types that carry values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Scalar,
    Texture,
    Vector,
}

impl GroupKind {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "Scalar" => Some(Self::Scalar),
            "Texture" => Some(Self::Texture),
            "Vector" => Some(Self::Vector),
            _ => None,
        }
    }
}

/// Materials visited while following one parent chain.
#[derive(Debug)]
struct Lineage {
    visited: HashSet<String>,
    depth: usize,
    max_depth: usize,
}

impl Lineage {
    fn new(max_depth: usize, root: Option<&str>) -> Self {
        Self {
            visited: root.into_iter().map(str::to_owned).collect(),
            depth: 0,
            max_depth,
        }
    }

    fn enter(&mut self, name: &str) -> Result<()> {
        if self.depth >= self.max_depth || !self.visited.insert(name.to_owned()) {
            return Err(Error::CycleDetected {
                name: name.to_owned(),
                depth: self.depth,
            });
        }
        self.depth += 1;
        Ok(())
    }
}

/// A material property document and the properties built from it.
///
/// Built in two steps: [`parse`](Self::parse) reads the document's own
/// parameters and parent reference, and
/// [`merge_with_parents`](Self::merge_with_parents) folds in everything the
/// parent chain declares that this document does not override.
/// [`build`](Self::build) runs both.
#[derive(Debug, Clone)]
pub struct PropertyFile<'r> {
    resolver: &'r ResourceResolver,
    name: Option<String>,
    contents: String,
    parent: Option<PropertyValue>,
    properties: PropertySet,
}

impl<'r> PropertyFile<'r> {
    /// Create a property file from document text.
    pub fn new(contents: impl Into<String>, resolver: &'r ResourceResolver) -> Self {
        Self {
            resolver,
            name: None,
            contents: contents.into(),
            parent: None,
            properties: PropertySet::new(),
        }
    }

    /// Read a named resource through the resolver.
    ///
    /// Returns `Ok(None)` when the resource does not exist.
    pub fn open(kind: ResourceKind, name: &str, resolver: &'r ResourceResolver) -> Result<Option<Self>> {
        let Some(contents) = resolver.read_text(kind, name)? else {
            return Ok(None);
        };
        Ok(Some(Self::new(contents, resolver).with_name(name)))
    }

    /// Attach the resource name this document was read from.
    ///
    /// The name seeds cycle detection, so a chain that leads back to this
    /// document is caught on its first revisit.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the resource name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the raw document text.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Get the parent reference found by [`parse`](Self::parse).
    pub fn parent(&self) -> Option<&PropertyValue> {
        self.parent.as_ref()
    }

    /// Get the properties.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Take the properties.
    pub fn into_properties(self) -> PropertySet {
        self.properties
    }

    /// Parse the document and merge in the parent chain.
    pub fn build(&mut self) -> Result<()> {
        self.parse()?;
        self.merge_with_parents()
    }

    /// Read this document's own parameters and parent reference.
    pub fn parse(&mut self) -> Result<()> {
        let document: Json = serde_json::from_str(&self.contents)?;
        let Json::Object(document) = document else {
            return Err(Error::malformed("<document>", "expected a JSON object"));
        };

        // Document order: a later group overwrites a name set by an earlier one.
        for (key, value) in &document {
            if key == PARENT_KEY {
                self.parent = match value {
                    Json::Null => None,
                    _ => Some(decode_reference(value, ResourceKind::Unknown)?),
                };
            } else if let Some((prefix, _)) = key.split_once(PARAMETER_VALUES) {
                self.parse_group(key, prefix, value)?;
            } else if key.starts_with(COLLECTED_PREFIX) && key.ends_with(COLLECTED_SUFFIX) {
                // Collected*Parameters repeats the *ParameterValues groups under
                // different field names. Reading it is deliberately disabled.
            }
        }

        Ok(())
    }

    /// Inherit every parameter of the parent chain not set by this document.
    ///
    /// Call after [`parse`](Self::parse). A parent that cannot be found ends
    /// the chain with a warning; a chain that loops or runs deeper than the
    /// resolver's `max_parent_depth` fails with [`Error::CycleDetected`].
    pub fn merge_with_parents(&mut self) -> Result<()> {
        let mut lineage = Lineage::new(
            self.resolver.config().max_parent_depth,
            self.name.as_deref(),
        );
        self.merge_lineage(&mut lineage)
    }

    fn merge_lineage(&mut self, lineage: &mut Lineage) -> Result<()> {
        let Some(parent) = &self.parent else {
            return Ok(());
        };

        let name = parent
            .as_str()
            .ok_or_else(|| {
                Error::malformed(PARENT_KEY, format!("expected a resource name, got {}", parent.value()))
            })?
            .to_owned();
        // Untyped parents are materials.
        let kind = match parent.kind() {
            ResourceKind::Unknown => ResourceKind::CharaMaterial,
            kind => kind,
        };

        lineage.enter(&name)?;

        let Some(contents) = self.resolver.read_text(kind, &name)? else {
            warn!(
                "missing parent {} of {}, inherited properties unavailable",
                name,
                self.display_name()
            );
            return Ok(());
        };

        let mut parent_file = PropertyFile::new(contents, self.resolver).with_name(name);
        parent_file.parse()?;
        parent_file.merge_lineage(lineage)?;

        let parent_name = parent_file.display_name().to_owned();
        let inherited = self.properties.inherit(parent_file.into_properties());
        debug!(
            "{} inherited {} properties from {}",
            self.display_name(),
            inherited,
            parent_name
        );

        Ok(())
    }

    fn parse_group(&mut self, key: &str, prefix: &str, value: &Json) -> Result<()> {
        if value.as_str() == Some(EMPTY_GROUP) {
            return Ok(());
        }

        let Some(group) = GroupKind::from_prefix(prefix) else {
            info!("discarded property group of type {:?} in {}", prefix, self.display_name());
            return Ok(());
        };

        let records = value
            .as_array()
            .ok_or_else(|| Error::malformed(key, "expected an array of parameters"))?;

        for record in records {
            let record = record
                .as_object()
                .ok_or_else(|| Error::malformed(key, "expected a parameter object"))?;
            let name = record
                .get(NAME_FIELD)
                .and_then(Json::as_str)
                .ok_or_else(|| Error::malformed(key, format!("missing string {}", NAME_FIELD)))?;
            let raw = record
                .get(VALUE_FIELD)
                .ok_or_else(|| Error::malformed(key, format!("{} has no {}", name, VALUE_FIELD)))?;

            let property = match group {
                GroupKind::Scalar => PropertyValue::float(read_float(key, name, raw)?),
                // A bare name inside a texture group is still a texture.
                GroupKind::Texture => decode_reference(raw, ResourceKind::Texture2D)?,
                GroupKind::Vector => PropertyValue::vector4(read_color(key, name, raw)?),
            };
            self.properties.insert(name, property);
        }

        Ok(())
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<document>")
    }
}

/// Scalars are exported either as numbers or as numeric strings.
fn read_float(key: &str, name: &str, value: &Json) -> Result<f32> {
    let parsed = match value {
        Json::Number(n) => n.as_f64().map(|v| v as f32),
        Json::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::malformed(key, format!("{} is not a number: {}", name, value)))
}

/// Vector parameters are `{ "R": .., "G": .., "B": .., "A": .. }` objects.
fn read_color(key: &str, name: &str, value: &Json) -> Result<[f32; 4]> {
    let components: &Map<String, Json> = value
        .as_object()
        .ok_or_else(|| Error::malformed(key, format!("{} is not an RGBA object", name)))?;

    let mut rgba = [0.0f32; 4];
    for (slot, channel) in rgba.iter_mut().zip(["R", "G", "B", "A"]) {
        let component = components
            .get(channel)
            .ok_or_else(|| Error::malformed(key, format!("{} has no {} component", name, channel)))?;
        *slot = read_float(key, name, component)?;
    }
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(document: &str) -> Result<PropertyFile<'static>> {
        static RESOLVER: std::sync::LazyLock<ResourceResolver> =
            std::sync::LazyLock::new(|| ResourceResolver::with_base_dir("/nonexistent"));
        let mut file = PropertyFile::new(document, &RESOLVER);
        file.parse()?;
        Ok(file)
    }

    #[test]
    fn test_scalar_group() {
        let file = parse(
            r#"{"ScalarParameterValues": [
                {"ParameterName": "Metallic", "ParameterValue": "0.5"},
                {"ParameterName": "IoR", "ParameterValue": 1.5}
            ]}"#,
        )
        .unwrap();

        let props = file.properties();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("Metallic"), Some(&PropertyValue::float(0.5)));
        assert_eq!(props.get("IoR"), Some(&PropertyValue::float(1.5)));
        assert!(file.parent().is_none());
    }

    #[test]
    fn test_vector_group() {
        let file = parse(
            r#"{"VectorParameterValues": [
                {"ParameterName": "CreationColor1",
                 "ParameterValue": {"R": 0.1, "G": 0.2, "B": 0.3, "A": 1.0}}
            ]}"#,
        )
        .unwrap();

        let color = file.properties().get("CreationColor1").unwrap();
        assert_eq!(color.kind(), ResourceKind::Vector4);
        assert_eq!(color.as_vector4(), Some([0.1, 0.2, 0.3, 1.0]));
    }

    #[test]
    fn test_texture_group() {
        let file = parse(
            r#"{"TextureParameterValues": [
                {"ParameterName": "BaseColor", "ParameterValue": "Texture2D'/Game/Chara/Tex.Tex'"},
                {"ParameterName": "NormalMap", "ParameterValue": "EYE_NORMALS"}
            ]}"#,
        )
        .unwrap();

        let base = file.properties().get("BaseColor").unwrap();
        assert_eq!(base.kind(), ResourceKind::Texture2D);
        assert_eq!(base.as_str(), Some("/Game/Chara/Tex.Tex"));
        assert_eq!(
            file.properties().get("NormalMap"),
            Some(&PropertyValue::text(ResourceKind::Texture2D, "EYE_NORMALS").unwrap())
        );
    }

    #[test]
    fn test_empty_group_sentinel() {
        let file = parse(r#"{"TextureParameterValues": "{}", "ScalarParameterValues": "{}"}"#).unwrap();
        assert!(file.properties().is_empty());
    }

    #[test]
    fn test_parent_reference() {
        let file = parse(r#"{"Parent": "MaterialInstanceConstant'M_Skin_Base'"}"#).unwrap();
        let parent = file.parent().unwrap();
        assert_eq!(parent.kind(), ResourceKind::CharaMaterial);
        assert_eq!(parent.as_str(), Some("M_Skin_Base"));

        let file = parse(r#"{"Parent": null}"#).unwrap();
        assert!(file.parent().is_none());
    }

    #[test]
    fn test_later_group_overrides_earlier() {
        let file = parse(
            r#"{
                "VectorParameterValues": [
                    {"ParameterName": "X", "ParameterValue": {"R": 1, "G": 1, "B": 1, "A": 1}}
                ],
                "ScalarParameterValues": [{"ParameterName": "X", "ParameterValue": 0.5}]
            }"#,
        )
        .unwrap();
        assert_eq!(file.properties().get("X"), Some(&PropertyValue::float(0.5)));

        let file = parse(
            r#"{
                "ScalarParameterValues": [{"ParameterName": "X", "ParameterValue": 0.5}],
                "VectorParameterValues": [
                    {"ParameterName": "X", "ParameterValue": {"R": 1, "G": 1, "B": 1, "A": 1}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(file.properties().get("X").map(|v| v.kind()), Some(ResourceKind::Vector4));
    }

    #[test]
    fn test_last_parent_key_wins() {
        let file = parse(
            r#"{"Parent": "Material3'M_First'", "Parent": "MaterialInstanceConstant'M_Second'"}"#,
        )
        .unwrap();
        assert_eq!(file.parent().and_then(|p| p.as_str()), Some("M_Second"));

        let file = parse(r#"{"Parent": "Material3'M_First'", "Parent": null}"#).unwrap();
        assert!(file.parent().is_none());
    }

    #[test]
    fn test_ignored_keys() {
        let file = parse(
            r#"{
                "CollectedScalarParameters": [{"Name": "Metallic", "Value": 1.0}],
                "BasePropertyOverrides": {"TwoSided": true},
                "SwitchParameterValues": [{"ParameterName": "UseMask", "ParameterValue": true}]
            }"#,
        )
        .unwrap();
        assert!(file.properties().is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse("not json"), Err(Error::Json(_))));
        assert!(matches!(parse("[1, 2]"), Err(Error::Malformed { .. })));
        assert!(matches!(
            parse(r#"{"ScalarParameterValues": 3}"#),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse(r#"{"ScalarParameterValues": [{"ParameterValue": 1.0}]}"#),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse(r#"{"ScalarParameterValues": [{"ParameterName": "X", "ParameterValue": "high"}]}"#),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse(r#"{"VectorParameterValues": [{"ParameterName": "C", "ParameterValue": {"R": 1, "G": 1, "B": 1}}]}"#),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            parse(r#"{"Parent": "A'b'c'"}"#),
            Err(Error::InvalidReference(_))
        ));
    }

    #[test]
    fn test_missing_parent_terminates_chain() {
        let mut file = parse(
            r#"{"Parent": "Material3'M_Gone'",
                "ScalarParameterValues": [{"ParameterName": "Metallic", "ParameterValue": 0.5}]}"#,
        )
        .unwrap();
        file.merge_with_parents().unwrap();
        assert_eq!(file.properties().len(), 1);
    }

    #[test]
    fn test_zero_depth_rejects_any_parent() {
        let mut lineage = Lineage::new(0, None);
        assert!(matches!(
            lineage.enter("M_Skin"),
            Err(Error::CycleDetected { depth: 0, .. })
        ));
    }

    #[test]
    fn test_lineage_revisit() {
        let mut lineage = Lineage::new(32, Some("A"));
        lineage.enter("B").unwrap();
        assert!(matches!(
            lineage.enter("A"),
            Err(Error::CycleDetected { depth: 1, .. })
        ));
    }
}
