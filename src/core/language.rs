//! Language tags derived from file names
//!
//! The tag doubles as the code-fence info string in document output and as the
//! key into the docstring adapter registry. An empty tag means "unknown".

use std::path::Path;

/// Extension (lowercase, without dot) to language tag
static EXTENSIONS: &[(&str, &str)] = &[
    ("bash", "bash"),
    ("c", "c"),
    ("cc", "cpp"),
    ("cfg", "ini"),
    ("conf", "ini"),
    ("cpp", "cpp"),
    ("css", "css"),
    ("cxx", "cpp"),
    ("go", "go"),
    ("h", "c"),
    ("hpp", "cpp"),
    ("htm", "html"),
    ("html", "html"),
    ("ini", "ini"),
    ("java", "java"),
    ("js", "javascript"),
    ("json", "json"),
    ("markdown", "markdown"),
    ("md", "markdown"),
    ("mjs", "javascript"),
    ("php", "php"),
    ("py", "python"),
    ("pyi", "python"),
    ("rs", "rust"),
    ("sh", "bash"),
    ("sql", "sql"),
    ("toml", "toml"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("zsh", "bash"),
];

/// Language tag for a relative path
pub fn detect(path: &str) -> &'static str {
    let name = crate::core::paths::file_name(path);
    if name == "Dockerfile" || name.starts_with("Dockerfile.") {
        return "dockerfile";
    }
    if name == "Makefile" || name == "GNUmakefile" {
        return "makefile";
    }

    let ext = match Path::new(name).extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return "",
    };
    if ext == "dockerfile" {
        return "dockerfile";
    }
    EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, tag)| *tag)
        .unwrap_or("")
}
