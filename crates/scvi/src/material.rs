//! Material resolution entry points.

use std::path::PathBuf;

use log::debug;
use scvi_props::{PropertyFile, PropertySet, Result};
use scvi_resource::{ResourceKind, ResourceResolver};

/// Build the flattened property set of a character material.
///
/// Returns `Ok(None)` when the export contains no definition for `name`.
pub fn resolve_material(resolver: &ResourceResolver, name: &str) -> Result<Option<PropertySet>> {
    let Some(mut file) = PropertyFile::open(ResourceKind::CharaMaterial, name, resolver)? else {
        return Ok(None);
    };

    file.build()?;
    debug!("resolved {} with {} properties", name, file.properties().len());

    Ok(Some(file.into_properties()))
}

/// A property that references another resource file, and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBinding {
    /// Property name, e.g. `BaseColor`.
    pub property: String,
    /// Kind of the referenced resource.
    pub kind: ResourceKind,
    /// Referenced resource name as written in the export.
    pub resource: String,
    /// Resolved file, if it exists.
    pub path: Option<PathBuf>,
}

/// Resolve every texture referenced by a property set.
///
/// Bindings are returned in property name order; unresolved references are
/// kept with `path: None`.
pub fn resolve_textures(resolver: &ResourceResolver, props: &PropertySet) -> Vec<TextureBinding> {
    props
        .iter()
        .filter(|(_, value)| value.kind() == ResourceKind::Texture2D)
        .filter_map(|(property, value)| {
            let resource = value.as_str()?;
            Some(TextureBinding {
                property: property.clone(),
                kind: value.kind(),
                resource: resource.to_owned(),
                path: resolver.resolve_path(value.kind(), resource),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use scvi_props::PropertyValue;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_resolve_material() {
        let dir = TempDir::new().unwrap();
        let materials = dir.path().join("Chara/CMN/Material");
        fs::create_dir_all(&materials).unwrap();
        fs::write(
            materials.join("Foo.props.json"),
            r#"{"Parent": "Base'Bar'", "ScalarParameterValues": [{"ParameterName":"Metallic","ParameterValue":"0.5"}]}"#,
        )
        .unwrap();
        fs::write(
            materials.join("Bar.props.json"),
            r#"{"ScalarParameterValues":[{"ParameterName":"Metallic","ParameterValue":"0.1"},{"ParameterName":"IoR","ParameterValue":"1.5"}]}"#,
        )
        .unwrap();

        let resolver = ResourceResolver::with_base_dir(dir.path());
        let props = resolve_material(&resolver, "Foo").unwrap().unwrap();
        assert_eq!(props.get("Metallic"), Some(&PropertyValue::float(0.5)));
        assert_eq!(props.get("IoR"), Some(&PropertyValue::float(1.5)));

        assert!(resolve_material(&resolver, "Baz").unwrap().is_none());
    }

    #[test]
    fn test_resolve_textures() {
        let dir = TempDir::new().unwrap();
        let textures = dir.path().join("Chara/CMN/Texture");
        fs::create_dir_all(&textures).unwrap();
        fs::write(textures.join("EYE_NORMALS.tga"), b"").unwrap();

        let mut props = PropertySet::new();
        props.insert("NormalMap", PropertyValue::text(ResourceKind::Texture2D, "EYE_NORMALS").unwrap());
        props.insert("BaseColor", PropertyValue::text(ResourceKind::Texture2D, "Missing_COLOR").unwrap());
        props.insert("Metallic", PropertyValue::float(0.5));

        let resolver = ResourceResolver::with_base_dir(dir.path());
        let bindings = resolve_textures(&resolver, &props);

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].property, "BaseColor");
        assert_eq!(bindings[0].path, None);
        assert_eq!(bindings[1].property, "NormalMap");
        assert_eq!(bindings[1].path, Some(textures.join("EYE_NORMALS.tga")));
    }
}
