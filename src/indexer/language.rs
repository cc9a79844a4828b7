//! Language detection from file extensions

use std::path::Path;

/// Detect programming language from file extension.
///
/// Known extensions map to a language name; anything else falls back to the
/// lower-cased extension, and a path without extension yields `""`.
pub fn detect_language(path: &Path) -> String {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return String::new();
    };
    let ext = ext.to_lowercase();

    let language = match ext.as_str() {
        "rs" => "rust",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" => "javascript",
        "py" => "python",
        "java" => "java",
        "cpp" | "hpp" | "cxx" | "cc" => "cpp",
        "c" | "h" => "c",
        "go" => "go",
        "php" => "php",
        "rb" => "ruby",
        "sql" => "sql",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "yml" | "yaml" => "yaml",
        "md" | "markdown" => "markdown",
        "sh" | "bash" => "bash",
        "zsh" => "zsh",
        _ => return ext,
    };

    language.to_string()
}
