use crate::{
    errors::{FileOperation, IoError, ParseError},
    tree::{self, Children, Node, Tree},
};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const MANIFEST_FILE_EXTENSION: &str = "json";

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("I/O error within manifest domain")]
    #[diagnostic(code(scaffy::manifest::io))]
    Io(#[from] IoError),

    #[error("Unable to read manifest")]
    #[diagnostic(code(scaffy::manifest::parse))]
    Parse(#[from] ParseError),

    #[error("Unable to serialize manifest for template: {template}")]
    #[diagnostic(code(scaffy::manifest::serialize))]
    Serialize {
        template: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest output directory does not exist: '{path}'")]
    #[diagnostic(
        code(scaffy::manifest::missing_output_dir),
        help("Create the directory before generating manifests")
    )]
    MissingOutputDir { path: PathBuf },
}

/// The persisted form of a template tree: the root's children, without the root itself.
///
/// Serialized as compact JSON, e.g.
/// `{"src":{"type":"folder","injectProjectInfo":false,"children":{"a.txt":{"type":"file","injectProjectInfo":false}}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(pub Children);
impl Manifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: Manifest = serde_json::from_str(&content)
            .map_err(|error| ParseError::json(path.to_path_buf(), error))?;

        Ok(parsed)
    }

    /// Resolves a `/`-separated path relative to the template root.
    pub fn get(&self, path: &str) -> Option<&Node> {
        tree::lookup(&self.0, path)
    }

    /// Returns the number of folders and files described by the manifest.
    pub fn count(&self) -> (usize, usize) {
        tree::count_children(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<Tree> for Manifest {
    fn from(tree: Tree) -> Self {
        Self(tree.children)
    }
}

/// Path of the manifest for `template` inside `output_dir`.
pub fn manifest_path(output_dir: &Path, template: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", template, MANIFEST_FILE_EXTENSION))
}

/// Serializes `manifest` without whitespace and writes it to `<output_dir>/<template>.json`,
/// replacing any previous manifest. The output directory is never created here.
pub fn write_manifest(
    output_dir: &Path,
    template: &str,
    manifest: &Manifest,
) -> Result<PathBuf, ManifestError> {
    if !output_dir.is_dir() {
        return Err(ManifestError::MissingOutputDir {
            path: output_dir.to_path_buf(),
        });
    }

    let contents = serde_json::to_string(manifest).map_err(|error| ManifestError::Serialize {
        template: template.to_string(),
        source: error,
    })?;

    let path = manifest_path(output_dir, template);

    fs::write(&path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.clone(), error))?;

    Ok(path)
}
