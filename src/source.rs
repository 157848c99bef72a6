use crate::{
    config::Config,
    errors::{FileOperation, IoError},
};
use miette::Diagnostic;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("I/O error within source domain")]
    #[diagnostic(code(scaffy::source::io))]
    Io(#[from] IoError),

    #[error("Template not found with name: {name} in '{root}'")]
    #[diagnostic(
        code(scaffy::source::template_not_found),
        help("Templates are the directories directly under the templates root")
    )]
    TemplateNotFound { name: String, root: PathBuf },

    #[error("Template directory name is not valid UTF-8: '{path}'")]
    #[diagnostic(code(scaffy::source::non_utf8_name))]
    NonUtf8Name { path: PathBuf },
}

/// A single template: one directory directly under the templates root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub path: PathBuf,
}

/// Every template found under a templates root.
#[derive(Debug, Clone)]
pub struct TemplateCollection {
    pub root: PathBuf,
    pub templates: Vec<Template>,
}
impl TemplateCollection {
    /// Lists the immediate subdirectories of `root`, skipping the manifest output directory.
    ///
    /// Files at the root (such as `scaffy.toml`) are ignored. Order follows directory
    /// enumeration unless `config.sort` is set.
    pub fn discover(root: &Path, config: &Config) -> Result<Self, SourceError> {
        let entries = fs::read_dir(root)
            .map_err(|error| IoError::new(FileOperation::ReadDir, root.to_path_buf(), error))?;

        let mut templates = Vec::new();

        for entry in entries {
            let entry = entry
                .map_err(|error| IoError::new(FileOperation::ReadDir, root.to_path_buf(), error))?;
            let path = entry.path();

            let file_type = entry
                .file_type()
                .map_err(|error| IoError::new(FileOperation::ReadDir, path.clone(), error))?;
            if !file_type.is_dir() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                return Err(SourceError::NonUtf8Name { path });
            };

            if name == config.output_dir {
                log::debug!("skipping manifest output directory: {}", path.display());
                continue;
            }

            templates.push(Template { name, path });
        }

        if config.sort {
            templates.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(Self {
            root: root.to_path_buf(),
            templates,
        })
    }

    pub fn get(&self, name: &str) -> Result<&Template, SourceError> {
        self.templates
            .iter()
            .find(|template| template.name == name)
            .ok_or_else(|| SourceError::TemplateNotFound {
                name: name.to_string(),
                root: self.root.clone(),
            })
    }

    /// Directory the manifests are written to.
    pub fn output_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.output_dir)
    }
}
