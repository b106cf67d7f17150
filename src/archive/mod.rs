//! Archive summarization: a bounded structural snapshot of a zipped project.

pub mod filters;
pub mod summarizer;
pub mod tree;

pub use summarizer::{summarize, summarize_path, MAX_CONTENT_CHARS, TRUNCATION_MARKER};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether a tree node is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A regular file.
    File,
    /// A directory.
    Folder,
}

/// One entry of the reconstructed project tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTreeNode {
    /// Last path segment.
    pub name: String,
    /// File or folder.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Forward-slash path from the archive root.
    pub path: String,
    /// Children in first-seen order; `None` for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
}

impl FileTreeNode {
    /// Creates a node; folders start with an empty child list.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
            children: (kind == NodeKind::Folder).then(Vec::new),
        }
    }

    /// Returns `true` for folder nodes.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Allow-listed file contents keyed by archive path, in extraction order.
pub type ExtractedContents = IndexMap<String, String>;

/// Everything the summarizer learned about an archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedArchive {
    /// Top-level tree nodes.
    pub tree: Vec<FileTreeNode>,
    /// Extracted (possibly truncated) text of allow-listed files.
    pub contents: ExtractedContents,
    /// Number of file entries kept.
    pub file_count: usize,
    /// Number of explicit directory entries kept.
    pub folder_count: usize,
}
