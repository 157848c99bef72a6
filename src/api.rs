use crate::{
    builder::{self, BuildError},
    config::{BinaryPolicy, Config, ConfigError},
    manifest::{self, Manifest, ManifestError},
    preview,
    source::{SourceError, Template, TemplateCollection},
};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ScaffyError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),
}

/// Command-line overrides applied on top of `scaffy.toml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub sort: bool,
    pub skip_binary: bool,
}
impl Options {
    fn resolve(&self, templates_root: &Path) -> Result<Config, ConfigError> {
        let mut config = Config::load(templates_root)?;

        if self.sort {
            config.sort = true;
        }
        if self.skip_binary {
            config.binary = BinaryPolicy::Skip;
        }

        Ok(config)
    }
}

/// A manifest written for one template.
#[derive(Debug, Clone)]
pub struct GeneratedManifest {
    pub template: String,
    pub path: PathBuf,
    pub manifest: Manifest,
}

fn generate(
    template: &Template,
    output_dir: &Path,
    config: &Config,
) -> Result<GeneratedManifest, ScaffyError> {
    log::info!("building manifest for template: {}", template.name);

    let tree = builder::build_tree(&template.path, config)?;
    let manifest = Manifest::from(tree);

    let path = manifest::write_manifest(output_dir, &template.name, &manifest)?;

    println!("{} {}", "create".green(), path.display());

    Ok(GeneratedManifest {
        template: template.name.clone(),
        path,
        manifest,
    })
}

/// Builds and writes the manifest of every template under `templates_root`.
///
/// Templates are processed one after another; the first failure stops the run and
/// manifests already written stay on disk.
///
/// # Errors
///
/// Returns a [`ScaffyError`] if:
///
/// - `scaffy.toml` exists but cannot be read or parsed.
/// - The templates root cannot be listed.
/// - A template file cannot be read, or its content is not text and binary files are rejected.
/// - The manifest output directory does not exist or a manifest cannot be written.
pub fn generate_all(
    templates_root: &Path,
    options: Options,
) -> Result<Vec<GeneratedManifest>, ScaffyError> {
    let config = options.resolve(templates_root)?;

    let collection = TemplateCollection::discover(templates_root, &config)?;
    let output_dir = collection.output_dir(&config);

    log::debug!(
        "found {} templates under {}",
        collection.templates.len(),
        templates_root.display()
    );

    collection
        .templates
        .iter()
        .map(|template| generate(template, &output_dir, &config))
        .collect()
}

/// Builds and writes the manifest of the single template called `name`.
pub fn generate_one(
    templates_root: &Path,
    name: &str,
    options: Options,
) -> Result<GeneratedManifest, ScaffyError> {
    let config = options.resolve(templates_root)?;

    let collection = TemplateCollection::discover(templates_root, &config)?;
    let template = collection.get(name)?;

    generate(template, &collection.output_dir(&config), &config)
}

/// Reads the existing manifest of `name` and prints it as a tree.
pub fn show(templates_root: &Path, name: &str) -> Result<Manifest, ScaffyError> {
    let config = Config::load(templates_root)?;

    let path = manifest::manifest_path(&templates_root.join(&config.output_dir), name);

    let manifest = Manifest::from_file(path)?;

    preview::preview_as_tree(name, &manifest);

    Ok(manifest)
}
