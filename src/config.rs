use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_NAMESPACE: &str = "i18n";
pub const DEFAULT_INCLUDE: &str = "**/*.json";
pub const DEFAULT_OUTPUT_FILE: &str = "i18n.js";
const RESERVED_GLOBAL_PREFIX: &str = "window.";

static LOCALE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ ,]+").unwrap());
static JS_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "<stdout>"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingLocale,
    EmptyPrimaryLocale,
    InvalidNamespace(String),
    UnknownLocale(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingLocale => {
                write!(f, "Usage: messageformat -l [locale] [INPUT_DIR] [OUTPUT_DIR]")
            }
            ConfigError::EmptyPrimaryLocale => write!(f, "The primary locale must not be empty"),
            ConfigError::InvalidNamespace(namespace) => {
                write!(f, "Invalid namespace \"{namespace}\": expected a JavaScript identifier")
            }
            ConfigError::UnknownLocale(locale) => {
                write!(f, "No plural rules available for locale \"{locale}\"")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-run configuration. Only constructed through [`BuildConfig::new`], so every
/// instance has a primary locale and a usable namespace.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    input_dir: PathBuf,
    output: OutputTarget,
    locales: Vec<String>,
    include: String,
    namespace: String,
    pub watch: bool,
}

impl BuildConfig {
    pub fn new(
        input_dir: PathBuf,
        output: OutputTarget,
        locales: Vec<String>,
        include: String,
        namespace: String,
    ) -> Result<Self, ConfigError> {
        match locales.first() {
            None => return Err(ConfigError::MissingLocale),
            Some(primary) if primary.trim().is_empty() => return Err(ConfigError::EmptyPrimaryLocale),
            Some(_) => (),
        }
        if namespace.starts_with(RESERVED_GLOBAL_PREFIX) || !JS_IDENTIFIER.is_match(&namespace) {
            return Err(ConfigError::InvalidNamespace(namespace));
        }

        Ok(Self {
            input_dir,
            output,
            locales,
            include,
            namespace,
            watch: false,
        })
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.output {
            OutputTarget::File(path) => Some(path),
            OutputTarget::Stdout => None,
        }
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn primary_locale(&self) -> &str {
        &self.locales[0]
    }

    /// Locales requested after the primary one.
    pub fn additional_locales(&self) -> &[String] {
        &self.locales[1..]
    }

    pub fn include(&self) -> &str {
        &self.include
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Splits a `--locale` value such as `"en, fr de"` into its identifiers.
pub fn parse_locale_list(raw: &str) -> Vec<String> {
    LOCALE_SEPARATOR
        .split(raw.trim())
        .filter(|lc| !lc.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn normalize_namespace(raw: &str) -> String {
    raw.strip_prefix(RESERVED_GLOBAL_PREFIX).unwrap_or(raw).to_string()
}

/// An existing directory as output means `<dir>/i18n.js`.
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(DEFAULT_OUTPUT_FILE)
    } else {
        output.to_path_buf()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn create_config(input_dir: &Path, locales: &[&str]) -> BuildConfig {
        BuildConfig::new(
            input_dir.to_path_buf(),
            OutputTarget::Stdout,
            locales.iter().map(|lc| lc.to_string()).collect(),
            DEFAULT_INCLUDE.to_string(),
            DEFAULT_NAMESPACE.to_string(),
        )
        .expect("valid test config")
    }

    #[test]
    fn splits_locale_lists_on_commas_and_spaces() {
        assert_eq!(parse_locale_list(" en, fr  de,,pt-BR "), vec!["en", "fr", "de", "pt-BR"]);
        assert!(parse_locale_list("   ").is_empty());
    }

    #[test]
    fn strips_window_prefix_from_namespace() {
        assert_eq!(normalize_namespace("window.messages"), "messages");
        assert_eq!(normalize_namespace("i18n"), "i18n");
    }

    #[test]
    fn rejects_missing_or_empty_primary_locale() {
        let new = |locales: Vec<String>| {
            BuildConfig::new(
                PathBuf::from("."),
                OutputTarget::Stdout,
                locales,
                DEFAULT_INCLUDE.to_string(),
                DEFAULT_NAMESPACE.to_string(),
            )
        };
        assert_eq!(new(vec![]).unwrap_err(), ConfigError::MissingLocale);
        assert_eq!(new(vec![" ".into()]).unwrap_err(), ConfigError::EmptyPrimaryLocale);
    }

    #[test]
    fn rejects_reserved_or_malformed_namespace() {
        for namespace in ["window.i18n", "", "my-ns", "1abc"] {
            let result = BuildConfig::new(
                PathBuf::from("."),
                OutputTarget::Stdout,
                vec!["en".into()],
                DEFAULT_INCLUDE.to_string(),
                namespace.to_string(),
            );
            assert!(
                matches!(result, Err(ConfigError::InvalidNamespace(_))),
                "{namespace} should be rejected"
            );
        }
    }

    #[test]
    fn exposes_primary_and_additional_locales() {
        let config = create_config(Path::new("."), &["en", "fr", "de"]);
        assert_eq!(config.primary_locale(), "en");
        assert_eq!(config.additional_locales(), ["fr".to_string(), "de".to_string()]);
    }

    #[test]
    fn directory_output_resolves_to_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_output_path(dir.path()), dir.path().join(DEFAULT_OUTPUT_FILE));

        let file = dir.path().join("messages.js");
        assert_eq!(resolve_output_path(&file), file);
    }
}
