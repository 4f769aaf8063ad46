//! Project list parsing.
//!
//! The project list holds one project per line as four colon-separated
//! labels (`client:area:project:task`). Lines starting with `#` are comments.
//! Projects are stored as an arena tree: nodes refer to their children by
//! index, and the root is a hidden node that is never listed.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Number of labels in a project list line.
const PROJECT_DEPTH: usize = 4;

/// Project list errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read project list {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Index of a node within a [`ProjectTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One label in the project hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    pub label: String,
    /// Labels from the top of the hierarchy down to this node, joined by `:`.
    pub path: String,
    pub children: Vec<NodeId>,
    pub expanded: bool,
}

/// A visible node and its depth below the hidden root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTree {
    nodes: Vec<ProjectNode>,
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![ProjectNode {
                label: String::new(),
                path: String::new(),
                children: Vec::new(),
                expanded: true,
            }],
        }
    }

    /// Reads a project list file.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let to_error = |source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(to_error)?;
        Self::parse(BufReader::new(file)).map_err(to_error)
    }

    /// Builds a tree from project list lines, skipping comments and lines
    /// without exactly four labels.
    pub fn parse<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut tree = Self::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let labels: Vec<&str> = line.split(':').collect();
            if labels.len() != PROJECT_DEPTH {
                tracing::debug!(line = %line, "skipping project line");
                continue;
            }
            tree.append_path(&labels);
        }
        Ok(tree)
    }

    pub fn node(&self, id: NodeId) -> &ProjectNode {
        &self.nodes[id.0]
    }

    /// Number of projects, not counting the hidden root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts the chain of labels under the root, reusing existing nodes.
    /// Returns the node of the last label.
    pub fn append_path(&mut self, labels: &[&str]) -> NodeId {
        let mut current = Self::ROOT;
        for (depth, label) in labels.iter().enumerate() {
            current = match self.child(current, label) {
                Some(id) => id,
                None => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(ProjectNode {
                        label: (*label).to_string(),
                        path: labels[..=depth].join(":"),
                        children: Vec::new(),
                        expanded: false,
                    });
                    self.nodes[current.0].children.push(id);
                    id
                }
            };
        }
        current
    }

    /// Finds the node reached by following `labels` from the root.
    pub fn find_path(&self, labels: &[&str]) -> Option<NodeId> {
        labels
            .iter()
            .try_fold(Self::ROOT, |id, label| self.child(id, label))
    }

    fn child(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&id| self.nodes[id.0].label == label)
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = true;
        }
    }

    /// Visible nodes in depth-first order. Children of collapsed nodes are
    /// hidden.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack: Vec<Row> = self.nodes[0]
            .children
            .iter()
            .rev()
            .map(|&id| Row { id, depth: 0 })
            .collect();

        while let Some(row) = stack.pop() {
            rows.push(row);
            let node = &self.nodes[row.id.0];
            if node.expanded {
                stack.extend(node.children.iter().rev().map(|&id| Row {
                    id,
                    depth: row.depth + 1,
                }));
            }
        }
        rows
    }
}
