use std::path::{Component, Path, PathBuf};

pub const TEMPLATE_EXTENSION: &str = "json";

pub mod emojis {
    use console::Emoji;
    pub static SPARKLES: Emoji<'_, '_> = Emoji("✨ ", "");
    pub static EYES: Emoji<'_, '_> = Emoji("👀 ", "");
}

pub fn is_template_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION)
}

/// `en\greeting.json` -> `en/greeting`. Only the last extension is removed.
pub fn path_to_identifier(path: &Path) -> String {
    path.with_extension("").to_string_lossy().replace('\\', "/")
}

/// Absolute form of `path` without requiring it to exist.
pub fn get_abs_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    normalize(&absolute)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
