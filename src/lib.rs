//! Builds the injection manifests that tell the scaffy scaffolding engine which files and
//! folders of a starter template carry `@@SCAFFY_` placeholders.
//!
//! Each directory under a templates root is one template. Its files are walked, every
//! file and folder is flagged when its name (or, for files, its content) contains the
//! marker, and the resulting tree is written as compact JSON to
//! `<root>/__scaffy_template_contents/<template>.json`.

pub mod api;
pub mod builder;
pub mod config;
pub mod errors;
pub mod manifest;
pub mod preview;
pub mod source;
pub mod tree;

pub use api::{generate_all, generate_one, show, GeneratedManifest, Options, ScaffyError};
pub use manifest::Manifest;
pub use tree::{Children, Node, Tree};
