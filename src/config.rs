use crate::errors::{FileOperation, IoError, ParseError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Component, Path},
};
use thiserror::Error;

/// Name of the optional configuration file looked up at the templates root.
pub const CONFIG_FILE_NAME: &str = "scaffy.toml";
/// Directory under the templates root that holds generated manifests.
pub const DEFAULT_OUTPUT_DIR: &str = "__scaffy_template_contents";
/// Prefix shared by every scaffy substitution variable.
pub const DEFAULT_MARKER: &str = "@@SCAFFY_";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(scaffy::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse config file")]
    #[diagnostic(
        code(scaffy::config::parse),
        help("Valid keys are: output_dir, marker, sort, binary")
    )]
    Parse(#[from] ParseError),

    #[error("marker must not be empty")]
    #[diagnostic(
        code(scaffy::config::empty_marker),
        help("An empty marker would flag every file; leave `marker` unset to use the default")
    )]
    EmptyMarker,

    #[error("output_dir must be a single directory name, got: '{output_dir}'")]
    #[diagnostic(
        code(scaffy::config::invalid_output_dir),
        help("Manifests live in a directory directly under the templates root, e.g. `output_dir = \"__scaffy_template_contents\"`")
    )]
    InvalidOutputDir { output_dir: String },
}

/// What to do with a template file whose content is not valid UTF-8.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BinaryPolicy {
    /// Fail the run with a decoding error.
    #[default]
    Reject,
    /// Skip the content scan; the name alone decides the flag.
    Skip,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_dir: String,
    pub marker: String,
    pub sort: bool,
    pub binary: BinaryPolicy,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            sort: false,
            binary: BinaryPolicy::Reject,
        }
    }
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: Config = toml::from_str(&content)
            .map_err(|error| ParseError::toml(path.to_path_buf(), error))?;

        parsed.validate()?;

        Ok(parsed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }

        // a nested or relative path would leave its top-level folder to be read as a template
        let mut components = Path::new(&self.output_dir).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None)
                if name.to_str() == Some(self.output_dir.as_str()) =>
            {
                Ok(())
            }
            _ => Err(ConfigError::InvalidOutputDir {
                output_dir: self.output_dir.clone(),
            }),
        }
    }

    /// Loads `scaffy.toml` from the templates root, falling back to defaults when absent.
    pub fn load(templates_root: &Path) -> Result<Self, ConfigError> {
        let path = templates_root.join(CONFIG_FILE_NAME);

        match fs::metadata(&path) {
            Ok(_) => {
                log::debug!("loading config from {}", path.display());
                Self::from_file(path)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(IoError::new(FileOperation::Read, path, error).into()),
        }
    }

    /// True when `text` holds at least one occurrence of the placeholder marker.
    pub fn has_marker(&self, text: &str) -> bool {
        text.contains(self.marker.as_str())
    }
}
