//! Rendering of the two stage prompts.
//!
//! The system message carries fixed instructions; the user message carries
//! the per-archive data. Both are plain strings so they can be recorded and
//! compared verbatim.

use std::fmt::Write as _;

use serde_json::Value;

use crate::archive::{FileTreeNode, ParsedArchive};

/// Fixed instructions for the architecture-definition call.
pub const STAGE1_SYSTEM_PROMPT: &str = r#"You are an expert software architect.

STAGE 1: Architecture Pattern & Layer Structure Definition

Instructions:
1. Identify the project boundaries (frontend, backend, shared, ...).
2. Name the architecture patterns of each boundary and cite the evidence.
3. Define a layer structure of at least 5 layers per boundary:
   - name: layer name
   - responsibility: what the layer is responsible for
   - characteristics: how to recognise files that belong to it
4. Describe the dependency flow within each boundary.
5. Describe how the boundaries interact.

Output VALID JSON ONLY, no markdown and no prose, in exactly this shape:

{
  "boundaries": {
    "boundaryName": {
      "architecturePatterns": [{"name": "pattern", "evidence": ["evidence"]}],
      "layers": [{"name": "layer", "responsibility": "responsibility", "characteristics": ["characteristic"]}],
      "dependencyFlow": "dependency description"
    }
  },
  "crossBoundaryInteraction": "interaction description"
}

Do NOT map files to layers yet."#;

/// Fixed instructions for the file-mapping call.
pub const STAGE2_SYSTEM_PROMPT: &str = r#"You are an expert software architect analysing code to draw a layered architecture diagram.

STAGE 2: Complete File-to-Layer Mapping

PURPOSE: the output feeds a layer diagram, so EVERY file must be mapped.

Instructions:
- Assign every file and folder to exactly one layer of its boundary, using the Stage 1 characteristics.
- Use the Stage 1 layer names exactly.
- List every individual file explicitly.
- Record ambiguous decisions under "assumptions".

Output VALID JSON ONLY, no markdown and no prose, in exactly this shape:

{
  "boundaries": {
    "boundaryName": {
      "layers": [
        {
          "name": "layer name (match Stage 1)",
          "folders": ["path1", "path2"],
          "files": ["file1.js", "file2.tsx"]
        }
      ]
    }
  },
  "assumptions": ["explanation"]
}"#;

/// A system/user message pair ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Fixed instructions.
    pub system: &'static str,
    /// Rendered per-archive data.
    pub user: String,
}

/// Builds the architecture-definition prompt.
///
/// The user message lists the tree without paths and names the extracted
/// files without their bodies.
#[must_use]
pub fn stage1_prompt(archive: &ParsedArchive) -> Prompt {
    let outline = render_outline(&archive.tree, false);
    let files = archive.contents.keys().map(String::as_str).collect::<Vec<_>>().join(", ");

    Prompt {
        system: STAGE1_SYSTEM_PROMPT,
        user: format!("# Project Structure\n{outline}\n\n# Configuration Files Found\n{files}"),
    }
}

/// Builds the file-mapping prompt, embedding the decoded Stage 1 result.
#[must_use]
pub fn stage2_prompt(archive: &ParsedArchive, stage1: &Value) -> Prompt {
    let outline = render_outline(&archive.tree, true);
    let architecture =
        serde_json::to_string_pretty(stage1).unwrap_or_else(|_| stage1.to_string());

    Prompt {
        system: STAGE2_SYSTEM_PROMPT,
        user: format!("# Stage 1 Architecture\n{architecture}\n\n# Project Structure\n{outline}"),
    }
}

/// Renders the tree as an indented outline, one node per line.
#[must_use]
pub fn render_outline(nodes: &[FileTreeNode], with_paths: bool) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0, with_paths);
    out
}

fn write_nodes(out: &mut String, nodes: &[FileTreeNode], depth: usize, with_paths: bool) {
    for node in nodes {
        if !out.is_empty() {
            out.push('\n');
        }
        let icon = if node.is_folder() { "📁" } else { "📄" };
        let _ = write!(out, "{}{icon} {}", "  ".repeat(depth), node.name);
        if with_paths {
            let _ = write!(out, " ({})", node.path);
        }
        if let Some(children) = &node.children {
            write_nodes(out, children, depth + 1, with_paths);
        }
    }
}
