use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Child entries of a folder or of the root, keyed by file or folder name.
///
/// Starts empty and only ever holds what was explicitly inserted, so a name such
/// as `__proto__` or `constructor` resolves to its own node and nothing else.
/// Insertion order follows the order in which the walk first met each name.
pub type Children = IndexMap<String, Node>;

/// A folder or file in a template manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Node {
    Folder {
        inject_project_info: bool,
        children: Children,
    },
    File {
        inject_project_info: bool,
    },
}
impl Node {
    fn folder(inject_project_info: bool) -> Self {
        Self::Folder {
            inject_project_info,
            children: Children::new(),
        }
    }

    pub fn inject_project_info(&self) -> bool {
        match self {
            Self::Folder {
                inject_project_info,
                ..
            }
            | Self::File {
                inject_project_info,
            } => *inject_project_info,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Folder { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }
}

/// The synthetic root of a template's tree. Only its children are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub children: Children,
}
impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file found at `dirs/file_name`, creating any missing folders on the way.
    ///
    /// A folder's flag is taken from its own name when the folder is first created and is
    /// never revisited. The file's flag is set when its name contains `marker` or when
    /// `content_has_marker` is true. Flags are not propagated up or down the tree.
    pub fn insert_file<S: AsRef<str>>(
        &mut self,
        dirs: &[S],
        file_name: &str,
        content_has_marker: bool,
        marker: &str,
    ) {
        let mut current = &mut self.children;

        for dir in dirs {
            let dir = dir.as_ref();

            if !matches!(current.get(dir), Some(Node::Folder { .. })) {
                current.insert(dir.to_string(), Node::folder(dir.contains(marker)));
            }

            current = match current.get_mut(dir) {
                Some(Node::Folder { children, .. }) => children,
                _ => unreachable!("folder node was inserted above"),
            };
        }

        current.insert(
            file_name.to_string(),
            Node::File {
                inject_project_info: file_name.contains(marker) || content_has_marker,
            },
        );
    }

    /// Resolves a `/`-separated path relative to the root.
    pub fn get(&self, path: &str) -> Option<&Node> {
        lookup(&self.children, path)
    }

    /// Sorts every children map by name, recursively.
    pub fn sort_by_name(&mut self) {
        sort_children(&mut self.children);
    }

    /// Returns the number of folders and files in the tree.
    pub fn count(&self) -> (usize, usize) {
        count_children(&self.children)
    }
}

pub(crate) fn lookup<'a>(children: &'a Children, path: &str) -> Option<&'a Node> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());

    let mut node = children.get(segments.next()?)?;

    for segment in segments {
        node = node.children()?.get(segment)?;
    }

    Some(node)
}

fn sort_children(children: &mut Children) {
    children.sort_keys();

    for node in children.values_mut() {
        if let Node::Folder { children, .. } = node {
            sort_children(children);
        }
    }
}

pub(crate) fn count_children(children: &Children) -> (usize, usize) {
    children
        .values()
        .fold((0, 0), |(folders, files), node| match node {
            Node::Folder { children, .. } => {
                let (nested_folders, nested_files) = count_children(children);
                (folders + 1 + nested_folders, files + nested_files)
            }
            Node::File { .. } => (folders, files + 1),
        })
}
