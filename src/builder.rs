use crate::{
    config::{BinaryPolicy, Config},
    errors::{FileOperation, IoError},
    tree::Tree,
};
use miette::Diagnostic;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("I/O error within build domain")]
    #[diagnostic(code(scaffy::build::io))]
    Io(#[from] IoError),

    #[error("unable to strip prefix from directory")]
    #[diagnostic(code(scaffy::build::strip_prefix))]
    StripPrefix {
        path: PathBuf,
        dir: PathBuf,
        source: std::path::StripPrefixError,
    },

    #[error("Path cannot be used as a manifest key: '{path}'")]
    #[diagnostic(
        code(scaffy::build::invalid_path),
        help("Manifest keys must be UTF-8; rename the file or folder")
    )]
    InvalidPath { path: PathBuf },

    #[error("File content is not valid UTF-8: '{path}'")]
    #[diagnostic(
        code(scaffy::build::decode),
        help("Set `binary = \"skip\"` in scaffy.toml (or pass --skip-binary) to flag binary files by name only")
    )]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Splits a path relative to the template root into its folder names and its file name.
fn split_segments(relative: &Path) -> Result<(Vec<&str>, &str), BuildError> {
    let mut segments = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(|| BuildError::InvalidPath {
                    path: relative.to_path_buf(),
                })?;
                segments.push(segment);
            }
            // walkdir yields paths below the root only
            _ => continue,
        }
    }

    let file_name = segments.pop().ok_or_else(|| BuildError::InvalidPath {
        path: relative.to_path_buf(),
    })?;

    Ok((segments, file_name))
}

/// Reads a template file and reports whether its text contains the marker.
fn content_has_marker(path: &Path, config: &Config) -> Result<bool, BuildError> {
    let bytes = std::fs::read(path)
        .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(config.has_marker(&text)),
        Err(error) => match config.binary {
            BinaryPolicy::Reject => Err(BuildError::Decode {
                path: path.to_path_buf(),
                source: error,
            }),
            BinaryPolicy::Skip => {
                log::debug!("skipping content scan of binary file: {}", path.display());
                Ok(false)
            }
        },
    }
}

/// Recursively walks `template_directory` and builds the [`Tree`] of every regular file
/// beneath it, flagging files and folders that contain the placeholder marker.
///
/// Folders are only ever recorded on the way to a file, so an empty folder never shows up.
/// Paths are resolved against `template_directory`; the process working directory is left
/// untouched.
pub fn build_tree(template_directory: &Path, config: &Config) -> Result<Tree, BuildError> {
    let mut tree = Tree::new();

    for entry in WalkDir::new(template_directory).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or(template_directory).to_path_buf();

                Err(IoError::new(FileOperation::ReadDir, path, error.into()))?
            }
        };

        // symlinks are not followed, so they are neither files nor folders here
        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.path();
        let relative = match full_path.strip_prefix(template_directory) {
            Ok(r) => r,
            Err(error) => Err(BuildError::StripPrefix {
                path: full_path.to_path_buf(),
                dir: template_directory.to_path_buf(),
                source: error,
            })?,
        };

        let (dirs, file_name) = split_segments(relative)?;

        let has_marker = content_has_marker(full_path, config)?;

        log::debug!(
            "{} (content marker: {})",
            relative.display(),
            has_marker
        );

        tree.insert_file(dirs.as_slice(), file_name, has_marker, &config.marker);
    }

    if config.sort {
        tree.sort_by_name();
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn splits_folders_from_file_name() {
        let (dirs, file) = split_segments(Path::new("src/routes/app/index.tsx")).unwrap();

        assert_eq!(dirs, ["src", "routes", "app"]);
        assert_eq!(file, "index.tsx");
    }

    #[test]
    fn top_level_file_has_no_folders() {
        let (dirs, file) = split_segments(Path::new("vite.config.ts")).unwrap();

        assert!(dirs.is_empty());
        assert_eq!(file, "vite.config.ts");
    }

    #[test]
    fn empty_folders_are_not_recorded() {
        let template = tempfile::tempdir().unwrap();
        fs::create_dir_all(template.path().join("empty/nested")).unwrap();
        fs::create_dir_all(template.path().join("@@SCAFFY_EMPTY@@")).unwrap();

        let tree = build_tree(template.path(), &Config::default()).unwrap();

        assert!(tree.children.is_empty());
    }

    #[test]
    fn binary_content_is_rejected_by_default() {
        let template = tempfile::tempdir().unwrap();
        fs::write(template.path().join("logo.png"), b"\x89PNG\xff\xfe").unwrap();

        let result = build_tree(template.path(), &Config::default());

        assert!(matches!(result, Err(BuildError::Decode { .. })));
    }

    #[test]
    fn binary_content_can_be_skipped() {
        let template = tempfile::tempdir().unwrap();
        fs::write(template.path().join("logo.png"), b"\xff\xfe\x00").unwrap();
        fs::write(template.path().join("@@SCAFFY_PROJECT_NAME@@.ico"), b"\xff\x00").unwrap();

        let config = Config {
            binary: BinaryPolicy::Skip,
            ..Config::default()
        };
        let tree = build_tree(template.path(), &config).unwrap();

        assert!(!tree.get("logo.png").unwrap().inject_project_info());
        assert!(tree
            .get("@@SCAFFY_PROJECT_NAME@@.ico")
            .unwrap()
            .inject_project_info());
    }

    #[test]
    fn working_directory_is_left_alone() {
        let before = std::env::current_dir().unwrap();
        let template = tempfile::tempdir().unwrap();
        fs::create_dir(template.path().join("src")).unwrap();
        fs::write(template.path().join("src/lib.rs"), "pub fn hello() {}").unwrap();

        build_tree(template.path(), &Config::default()).unwrap();

        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn custom_marker_is_honoured() {
        let template = tempfile::tempdir().unwrap();
        fs::write(template.path().join("a.txt"), "{{ name }}").unwrap();
        fs::write(template.path().join("b.txt"), "@@SCAFFY_PROJECT_NAME@@").unwrap();

        let config = Config {
            marker: "{{".to_string(),
            ..Config::default()
        };
        let tree = build_tree(template.path(), &config).unwrap();

        assert!(tree.get("a.txt").unwrap().inject_project_info());
        assert!(!tree.get("b.txt").unwrap().inject_project_info());
    }
}
