//! Directory tree for the navigation sidebar
//!
//! Only directories are tracked. Children are ordered by the date in their
//! name, undated directories first, so dated archive folders read
//! chronologically.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::media::file_name;
use crate::ordering::DirSortKey;

/// Deepest level scanned below the root
const MAX_DEPTH: usize = 32;

/// A directory in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// Directory name (not full path)
    pub name: String,
    /// Full path to the directory
    pub path: PathBuf,
    /// Subdirectories, in smart order
    pub children: Vec<DirNode>,
}

impl DirNode {
    fn new(path: PathBuf) -> Self {
        Self {
            name: file_name(&path),
            path,
            children: Vec::new(),
        }
    }

    /// Total number of directories in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(DirNode::count).sum::<usize>()
    }
}

/// Directory tree rooted at the directory the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTree {
    pub root: DirNode,
}

impl DirTree {
    /// Scan `root` and every directory below it
    ///
    /// Subdirectories that cannot be listed appear as leaves.
    pub fn from_root(root: &Path) -> Result<Self, ScanError> {
        let metadata = fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut node = DirNode::new(root.to_path_buf());
        node.children = Self::scan_children(root, 0)?;
        Ok(Self { root: node })
    }

    fn scan_children(dir: &Path, depth: usize) -> Result<Vec<DirNode>, ScanError> {
        let mut children: Vec<DirNode> = crate::collector::subdirectories(dir)?
            .into_iter()
            .map(DirNode::new)
            .collect();
        children.sort_by_cached_key(|node| DirSortKey::by_name(&node.path));

        if depth < MAX_DEPTH {
            for child in &mut children {
                match Self::scan_children(&child.path, depth + 1) {
                    Ok(grandchildren) => child.children = grandchildren,
                    Err(e) => {
                        tracing::debug!("Not descending into {}: {}", child.path.display(), e)
                    }
                }
            }
        }

        Ok(children)
    }

    /// Re-scan from disk
    pub fn refresh(&mut self) -> Result<(), ScanError> {
        *self = Self::from_root(&self.root.path)?;
        Ok(())
    }

    /// Depth-first walk yielding `(depth, node)`, root at depth 0
    pub fn walk(&self) -> Vec<(usize, &DirNode)> {
        fn visit<'a>(node: &'a DirNode, depth: usize, out: &mut Vec<(usize, &'a DirNode)>) {
            out.push((depth, node));
            for child in &node.children {
                visit(child, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        visit(&self.root, 0, &mut out);
        out
    }

    /// Find the node for `path`
    pub fn find(&self, path: &Path) -> Option<&DirNode> {
        self.walk()
            .into_iter()
            .map(|(_, node)| node)
            .find(|node| node.path == path)
    }

    /// Render as an indented outline, one directory per line
    pub fn outline(&self) -> String {
        self.walk()
            .into_iter()
            .map(|(depth, node)| format!("{}{}", "  ".repeat(depth), node.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
