//! Incremental reconstruction of the folder hierarchy from flat entry paths.

use super::{FileTreeNode, NodeKind};

/// Inserts `path` into `roots`, creating missing ancestor folders on the way.
///
/// Each depth is matched by name before a new node is created, so inserting
/// the same path twice is a no-op and siblings keep first-seen order. An
/// existing file never gains children: a path that would descend through a
/// file is ignored.
pub fn insert_path(roots: &mut Vec<FileTreeNode>, path: &str, kind: NodeKind) {
    let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
    let mut level = roots;

    for (index, part) in parts.iter().enumerate() {
        let is_last = index + 1 == parts.len();

        let position = if let Some(position) = level.iter().position(|node| node.name == *part) {
            position
        } else {
            let node_kind = if is_last { kind } else { NodeKind::Folder };
            level.push(FileTreeNode::new(*part, node_kind, parts[..=index].join("/")));
            level.len() - 1
        };

        if is_last {
            return;
        }

        let Some(children) = level[position].children.as_mut() else {
            return;
        };
        level = children;
    }
}
