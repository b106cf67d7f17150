//! Path normalization, exclusion rules and the content allow-list.

/// Basenames (lower-case) whose content is extracted for prompting.
pub const ALLOWED_FILENAMES: &[&str] = &[
    // documentation
    "readme.md",
    "readme",
    "readme.txt",
    // frontend tooling
    "package.json",
    "tsconfig.json",
    "next.config.js",
    "next.config.mjs",
    "next.config.ts",
    "vite.config.js",
    "vite.config.ts",
    "webpack.config.js",
    "tailwind.config.js",
    "tailwind.config.ts",
    // containers
    "docker-compose.yml",
    "docker-compose.yaml",
    "dockerfile",
    // monorepo
    "turbo.json",
    "pnpm-workspace.yaml",
    "lerna.json",
    "nx.json",
    // misc and entry points
    ".gitignore",
    ".env.example",
    ".env.sample",
    "main.js",
    "main.ts",
    "main.jsx",
    "main.tsx",
    "app.js",
    "app.ts",
    "app.jsx",
    "app.tsx",
    "index.js",
    "index.ts",
    "index.jsx",
    "index.tsx",
    "server.js",
    "server.ts",
];

/// Directory names skipped wherever they appear.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    "coverage",
    ".turbo",
    "out",
    ".cache",
    "public",
    "static",
];

/// Normalizes a raw archive entry name to a forward-slash relative path.
///
/// Backslashes become slashes, `.` and empty segments are dropped, so
/// `./src//app\main.js` becomes `src/app/main.js`.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the last segment of a normalized path.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns `true` if the entry lives under (or is) an excluded directory.
///
/// Only directory segments are compared: every segment of a directory entry,
/// every segment but the last of a file entry.
#[must_use]
pub fn is_excluded(path: &str, is_dir: bool) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    let dir_segments = if is_dir { &segments[..] } else { &segments[..segments.len() - 1] };
    dir_segments.iter().any(|segment| EXCLUDED_DIRS.contains(segment))
}

/// Returns `true` if the file's basename is on the allow-list (case-insensitive).
#[must_use]
pub fn is_allowed_file(path: &str) -> bool {
    let name = basename(path).to_ascii_lowercase();
    ALLOWED_FILENAMES.contains(&name.as_str())
}
