//! Scvi CLI - Command-line tool for Soul Calibur VI material exports.
//!
//! This is the main entry point for the scvi command-line application.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use rayon::prelude::*;
use walkdir::WalkDir;

use scvi::prelude::*;

/// File suffix of exported material property documents.
const PROPS_SUFFIX: &str = ".props.json";

/// Scvi - Soul Calibur VI material export tool
#[derive(Parser)]
#[command(name = "scvi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the UModel export tree (defaults to ~/UmodelExport)
    #[arg(short, long, global = true, env = "SCVI_EXPORT_DIR")]
    base_dir: Option<PathBuf>,

    /// Resolver settings file (TOML)
    #[arg(short, long, global = true, env = "SCVI_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the file that defines a resource
    Resolve {
        /// Resource name
        name: String,

        /// Resource type
        #[arg(short, long, value_enum, default_value_t = KindArg::Material)]
        kind: KindArg,

        /// List every searched location
        #[arg(long)]
        candidates: bool,
    },

    /// Print the merged properties of a material
    Props {
        /// Material name
        name: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the textures a material references
    Textures {
        /// Material name
        name: String,
    },

    /// Build every material in the export tree
    Batch {
        /// Filter pattern for material names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Write all property sets to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Resource types addressable from the command line.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Material,
    Texture,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Material => ResourceKind::CharaMaterial,
            KindArg::Texture => ResourceKind::Texture2D,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    let resolver = load_resolver(cli.base_dir.as_deref(), cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { name, kind, candidates } => {
            cmd_resolve(&resolver, &name, kind.into(), candidates)?;
        }
        Commands::Props { name, json } => {
            cmd_props(&resolver, &name, json)?;
        }
        Commands::Textures { name } => {
            cmd_textures(&resolver, &name)?;
        }
        Commands::Batch { filter, output } => {
            cmd_batch(&resolver, filter.as_deref(), output.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // RUST_LOG, when set, overrides the -v level.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_resolver(base_dir: Option<&Path>, config: Option<&Path>) -> Result<ResourceResolver> {
    let mut config = match config {
        Some(path) => ResolverConfig::from_toml_file(path).context("Failed to load resolver config")?,
        None => ResolverConfig::default(),
    };

    if let Some(base_dir) = base_dir {
        config.base_dir = base_dir.to_path_buf();
    }

    log::info!("Export root: {}", config.base_dir.display());
    Ok(ResourceResolver::new(config))
}

fn cmd_resolve(resolver: &ResourceResolver, name: &str, kind: ResourceKind, candidates: bool) -> Result<()> {
    if candidates {
        for path in resolver.candidate_paths(kind, name) {
            let marker = if path.is_file() { "*" } else { " " };
            println!("{} {}", marker, path.display());
        }
    }

    match resolver.resolve_path(kind, name) {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("No {} resource named {}", kind, name),
    }

    Ok(())
}

fn cmd_props(resolver: &ResourceResolver, name: &str, json: bool) -> Result<()> {
    let props = build_material(resolver, name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&props)?);
    } else {
        for (prop_name, value) in &props {
            println!("{}: {}", prop_name, value);
        }
        println!("\nTotal: {} properties", props.len());
    }

    Ok(())
}

fn cmd_textures(resolver: &ResourceResolver, name: &str) -> Result<()> {
    let props = build_material(resolver, name)?;

    let mut missing = 0;
    for binding in scvi::resolve_textures(resolver, &props) {
        match &binding.path {
            Some(path) => println!("{}: {}", binding.property, path.display()),
            None => {
                println!("{}: {} (not found)", binding.property, binding.resource);
                missing += 1;
            }
        }
    }

    if missing > 0 {
        println!("\n{} texture(s) could not be resolved", missing);
    }

    Ok(())
}

fn cmd_batch(resolver: &ResourceResolver, filter: Option<&str>, output: Option<&Path>) -> Result<()> {
    let base_dir = resolver.base_dir();
    println!("Scanning export tree: {}", base_dir.display());

    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;

    let mut materials: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(base_dir) {
        let entry = entry.context("Failed to scan export tree")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry
            .file_name()
            .to_str()
            .and_then(|f| f.strip_suffix(PROPS_SUFFIX))
        else {
            continue;
        };

        if let Some(pattern) = &pattern {
            if !pattern.matches(name) {
                continue;
            }
        }

        materials.push((name.to_string(), entry.into_path()));
    }

    println!("Building {} materials...", materials.len());

    let pb = ProgressBar::new(materials.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(String, Result<PropertySet>)> = materials
        .par_iter()
        .map(|(name, path)| {
            let result = build_file(resolver, name, path);
            pb.inc(1);

            let key = path
                .strip_prefix(base_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            (key, result)
        })
        .collect();

    pb.finish_with_message("Done");

    let mut built = BTreeMap::new();
    let mut errors = 0;
    for (key, result) in results {
        match result {
            Ok(props) => {
                built.insert(key, props);
            }
            Err(e) => {
                eprintln!("Error building {}: {:#}", key, e);
                errors += 1;
            }
        }
    }

    println!(
        "Built {} materials in {:?} ({} errors)",
        built.len(),
        start.elapsed(),
        errors
    );

    if let Some(output) = output {
        let json = serde_json::to_string_pretty(&built)?;
        fs::write(output, json).context("Failed to write output file")?;
        println!("Output written to {}", output.display());
    }

    Ok(())
}

fn build_material(resolver: &ResourceResolver, name: &str) -> Result<PropertySet> {
    scvi::resolve_material(resolver, name)
        .with_context(|| format!("Failed to build material {}", name))?
        .with_context(|| format!("No material named {}", name))
}

/// Build a material from a file found by scanning rather than by name.
fn build_file(resolver: &ResourceResolver, name: &str, path: &Path) -> Result<PropertySet> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut file = PropertyFile::new(contents, resolver);
    // A shadowed copy may name the file that shadows it as its parent.
    if resolver.resolve_path(ResourceKind::CharaMaterial, name).as_deref() == Some(path) {
        file = file.with_name(name);
    }
    file.build()?;
    Ok(file.into_properties())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["scvi", "resolve", "--kind", "texture", "EYE_NORMALS", "-b", "/export"])
            .unwrap();
        assert_eq!(cli.base_dir, Some(PathBuf::from("/export")));
        match cli.command {
            Commands::Resolve { name, kind, candidates } => {
                assert_eq!(name, "EYE_NORMALS");
                assert_eq!(ResourceKind::from(kind), ResourceKind::Texture2D);
                assert!(!candidates);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_parse_verbosity() {
        let cli = Cli::try_parse_from(["scvi", "-vv", "props", "MI_R060_Body", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Props { json: true, .. }));
    }

    #[test]
    fn test_build_shadowed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let common = dir.path().join("Common/BasicResource");
        let chara = dir.path().join("Chara/CMN/Material");
        fs::create_dir_all(&common).unwrap();
        fs::create_dir_all(&chara).unwrap();
        fs::write(
            common.join("M_Skin.props.json"),
            r#"{"ScalarParameterValues": [{"ParameterName": "IoR", "ParameterValue": 1.5}]}"#,
        )
        .unwrap();
        fs::write(
            chara.join("M_Skin.props.json"),
            r#"{"Parent": "Material3'M_Skin'",
                "ScalarParameterValues": [{"ParameterName": "Metallic", "ParameterValue": 0.5}]}"#,
        )
        .unwrap();

        let resolver = ResourceResolver::with_base_dir(dir.path());
        let props = build_file(&resolver, "M_Skin", &chara.join("M_Skin.props.json")).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("Metallic").and_then(|v| v.as_float()), Some(0.5));
        assert_eq!(props.get("IoR").and_then(|v| v.as_float()), Some(1.5));

        fs::write(
            common.join("M_Loop.props.json"),
            r#"{"Parent": "Material3'M_Loop'"}"#,
        )
        .unwrap();
        let err = build_file(&resolver, "M_Loop", &common.join("M_Loop.props.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<scvi::props::Error>(),
            Some(scvi::props::Error::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_resolver_override() {
        let resolver = load_resolver(Some(Path::new("/export")), None).unwrap();
        assert_eq!(resolver.base_dir(), Path::new("/export"));
    }
}
