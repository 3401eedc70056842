use crate::config::ConfigError;

const ONE_OTHER: &str = r#"function(n){return n==1?"one":"other"}"#;
const ZERO_ONE_OTHER: &str = r#"function(n){return n>=0&&n<2?"one":"other"}"#;
const OTHER_ONLY: &str = r#"function(n){return "other"}"#;
const EAST_SLAVIC: &str = r#"function(n){var n10=n%10,n100=n%100;if(n%1!==0)return "other";return n10==1&&n100!=11?"one":n10>=2&&n10<=4&&(n100<12||n100>14)?"few":"many"}"#;

/// Cardinal plural rules by language subtag, as JavaScript function source.
const PLURAL_RULES: &[(&str, &str)] = &[
    (
        "ar",
        r#"function(n){var n100=n%100;return n==0?"zero":n==1?"one":n==2?"two":n100>=3&&n100<=10?"few":n100>=11&&n100<=99?"many":"other"}"#,
    ),
    (
        "cs",
        r#"function(n){return n%1!==0?"many":n==1?"one":n>=2&&n<=4?"few":"other"}"#,
    ),
    ("da", ONE_OTHER),
    ("de", ONE_OTHER),
    ("en", ONE_OTHER),
    ("es", ONE_OTHER),
    ("fi", ONE_OTHER),
    ("fr", ZERO_ONE_OTHER),
    ("he", r#"function(n){return n==1?"one":n==2?"two":"other"}"#),
    ("hu", ONE_OTHER),
    ("it", ONE_OTHER),
    ("ja", OTHER_ONLY),
    ("ko", OTHER_ONLY),
    ("nb", ONE_OTHER),
    ("nl", ONE_OTHER),
    (
        "pl",
        r#"function(n){var n10=n%10,n100=n%100;if(n%1!==0)return "other";if(n==1)return "one";return n10>=2&&n10<=4&&(n100<12||n100>14)?"few":"many"}"#,
    ),
    ("pt", ZERO_ONE_OTHER),
    ("ru", EAST_SLAVIC),
    ("sv", ONE_OTHER),
    ("tr", ONE_OTHER),
    ("uk", EAST_SLAVIC),
    ("zh", OTHER_ONLY),
];

fn language_subtag(id: &str) -> &str {
    id.split(['-', '_']).next().unwrap_or(id)
}

fn builtin_rule(id: &str) -> Option<&'static str> {
    let language = language_subtag(id).to_ascii_lowercase();
    PLURAL_RULES
        .iter()
        .find(|(lc, _)| *lc == language)
        .map(|(_, rule)| *rule)
}

/// The set of locales whose plural rules have been loaded for a build.
///
/// Only loaded locales are "known": path segments naming a locale that was not
/// requested fall back to the default locale during inference.
#[derive(Debug, Default)]
pub struct LocaleRegistry {
    loaded: Vec<(String, &'static str)>,
}

impl LocaleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_known_locale(&self, id: &str) -> bool {
        self.loaded.iter().any(|(lc, _)| lc == id)
    }

    pub fn load_locale(&mut self, id: &str) -> Result<(), ConfigError> {
        if self.is_known_locale(id) {
            return Ok(());
        }
        let rule = builtin_rule(id).ok_or_else(|| ConfigError::UnknownLocale(id.to_string()))?;
        log::debug!("loaded plural rules for {id}");
        self.loaded.push((id.to_string(), rule));
        Ok(())
    }

    /// Loaded locales with their plural rule source, in load order.
    pub fn loaded(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.loaded.iter().map(|(lc, rule)| (lc.as_str(), *rule))
    }
}
