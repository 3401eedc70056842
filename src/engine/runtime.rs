use super::codegen::string_literal;
use super::locale::LocaleRegistry;

// Helpers are invoked as methods of the namespace object, so they reach each
// other (and the plural table) through `this`.
const HELPERS: &[&str] = &[
    r#"c:function(d,k){if(!d)throw new Error("MessageFormat: Data required for '"+k+"'.")}"#,
    r#"n:function(d,k,o){if(isNaN(d[k]))throw new Error("MessageFormat: '"+k+"' isn't a number.");return d[k]-(o||0)}"#,
    r#"v:function(d,k){this.c(d,k);return d[k]}"#,
    r#"p:function(d,k,o,l,p){this.c(d,k);return (d[k] in p?p[d[k]]:(k=this.lc[l](d[k]-o),k in p?p[k]:p.other))()}"#,
    r#"s:function(d,k,p){this.c(d,k);return (d[k] in p?p[d[k]]:p.other)()}"#,
];

/// Object literal with the plural table of every loaded locale plus the
/// functions compiled messages call.
pub fn helpers_source(registry: &LocaleRegistry) -> String {
    let plural_table = registry
        .loaded()
        .map(|(locale, rule)| format!("{}:{rule}", string_literal(locale)))
        .collect::<Vec<_>>()
        .join(",");

    let mut members = vec![format!("lc:{{{plural_table}}}")];
    members.extend(HELPERS.iter().map(|helper| helper.to_string()));
    format!("{{{}}}", members.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_loaded_locales_in_load_order() {
        let mut registry = LocaleRegistry::new();
        registry.load_locale("fr").unwrap();
        registry.load_locale("en").unwrap();
        let source = helpers_source(&registry);

        assert!(source.starts_with(r#"{lc:{"fr":function(n){"#));
        let fr = source.find(r#""fr":"#).unwrap();
        let en = source.find(r#""en":"#).unwrap();
        assert!(fr < en);
        for helper in ["c:", "n:", "v:", "p:", "s:"] {
            assert!(source.contains(helper), "missing helper {helper}");
        }
        assert!(source.ends_with("}"));
    }

    #[test]
    fn empty_registry_has_empty_plural_table() {
        assert!(helpers_source(&LocaleRegistry::new()).starts_with("{lc:{},c:"));
    }
}
