use super::parser::{Case, Element};

/// JavaScript string literal for `value`. JSON strings are valid JS strings.
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Compiles one parsed message into `function(d){return ...}`.
pub fn function(elements: &[Element], namespace: &str, locale: &str) -> String {
    let generator = Generator { namespace, locale };
    format!("function(d){{return {}}}", generator.concat(elements, None))
}

struct Generator<'a> {
    namespace: &'a str,
    locale: &'a str,
}

/// The innermost enclosing plural: argument name and offset.
type PluralScope<'s> = Option<(&'s str, u32)>;

impl Generator<'_> {
    fn concat(&self, elements: &[Element], plural: PluralScope) -> String {
        if elements.is_empty() {
            return string_literal("");
        }
        elements
            .iter()
            .map(|element| self.element(element, plural))
            .collect::<Vec<_>>()
            .join("+")
    }

    fn element(&self, element: &Element, plural: PluralScope) -> String {
        let ns = self.namespace;
        match element {
            Element::Text(text) => string_literal(text),
            Element::Argument(argument) => format!("{ns}.v(d,{})", string_literal(argument)),
            Element::Select { argument, cases } => format!(
                "{ns}.s(d,{},{})",
                string_literal(argument),
                self.cases(cases, plural)
            ),
            Element::Plural {
                argument,
                offset,
                cases,
            } => format!(
                "{ns}.p(d,{},{offset},{},{})",
                string_literal(argument),
                string_literal(self.locale),
                self.cases(cases, Some((argument.as_str(), *offset)))
            ),
            Element::Octothorpe => match plural {
                Some((argument, offset)) => {
                    format!("{ns}.n(d,{},{offset})", string_literal(argument))
                }
                None => string_literal("#"),
            },
        }
    }

    fn cases(&self, cases: &[Case], plural: PluralScope) -> String {
        let members = cases
            .iter()
            .map(|case| {
                // `=0` matches the exact value, which the runtime looks up as "0".
                let key = case.key.strip_prefix('=').unwrap_or(&case.key);
                format!(
                    "{}:function(){{return {}}}",
                    string_literal(key),
                    self.concat(&case.message, plural)
                )
            })
            .collect::<Vec<_>>();
        format!("{{{}}}", members.join(","))
    }
}
