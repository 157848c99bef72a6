use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("writing a file")]
    Write,
    #[error("listing a directory")]
    ReadDir,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(scaffy::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: std::path::PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum FileFormat {
    #[error("toml")]
    Toml,
    #[error("json")]
    Json,
}
#[derive(Debug, Error, Diagnostic)]
#[error("Parsing error: {file_format} on '{path}'")]
#[diagnostic(
    code(scaffy::parse),
    help("scaffy.toml must be valid toml; manifests are regenerated with `scaffy-manifest generate`")
)]
pub struct ParseError {
    pub file_format: FileFormat,
    pub path: std::path::PathBuf,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}
impl ParseError {
    pub fn toml(path: std::path::PathBuf, error: toml::de::Error) -> Self {
        Self {
            file_format: FileFormat::Toml,
            path,
            source: Box::new(error),
        }
    }

    pub fn json(path: std::path::PathBuf, error: serde_json::Error) -> Self {
        Self {
            file_format: FileFormat::Json,
            path,
            source: Box::new(error),
        }
    }
}
