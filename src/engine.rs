//! Default message compilation engine.
//!
//! The build pipeline only talks to [`MessageCompiler`]. [`MessageFormat`] is the
//! implementation shipped with the binary: it understands a small ICU
//! MessageFormat subset (plain arguments, `select` and `plural`) and emits
//! JavaScript expressions that call into the runtime helpers returned by
//! [`MessageCompiler::runtime_helpers_source`].

pub mod codegen;
pub mod locale;
pub mod parser;
pub mod runtime;

use self::locale::LocaleRegistry;
use crate::config::ConfigError;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Malformed message text. `offset` is a byte offset into the message.
    Syntax { key: String, offset: usize, message: String },
    UnsupportedValue { key: String, found: &'static str },
    UnknownLocale(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::Syntax { key, offset, message } => {
                write!(f, "{message} at offset {offset} in message \"{key}\"")
            }
            CompileError::UnsupportedValue { key, found } => {
                write!(f, "Expected a string or an object for \"{key}\", found {found}")
            }
            CompileError::UnknownLocale(locale) => write!(f, "Locale \"{locale}\" is not loaded"),
        }
    }
}

impl std::error::Error for CompileError {}

/// The seam between the build pipeline and a template compiler.
///
/// Implementations are shared by reference across the parallel fan-out, so the
/// target locale is passed to every [`compile`](MessageCompiler::compile) call
/// instead of being stored on the compiler.
pub trait MessageCompiler: Send + Sync {
    fn default_locale(&self) -> &str;

    fn is_known_locale(&self, id: &str) -> bool;

    fn compile(&self, template: &Value, locale: &str) -> Result<String, CompileError>;

    fn runtime_helpers_source(&self) -> String;
}

#[derive(Debug)]
pub struct MessageFormat {
    default_locale: String,
    namespace: String,
    registry: LocaleRegistry,
}

impl MessageFormat {
    pub fn new(default_locale: &str, namespace: &str) -> Result<Self, ConfigError> {
        let mut registry = LocaleRegistry::new();
        registry.load_locale(default_locale)?;
        Ok(Self {
            default_locale: default_locale.to_string(),
            namespace: namespace.to_string(),
            registry,
        })
    }

    /// Registers plural rules for another locale. Loading twice is a no-op.
    pub fn load_locale(&mut self, id: &str) -> Result<(), ConfigError> {
        self.registry.load_locale(id)
    }

    fn compile_value(&self, key: &str, value: &Value, locale: &str) -> Result<String, CompileError> {
        match value {
            Value::String(message) => {
                let ast = parser::parse(message).map_err(|e| CompileError::Syntax {
                    key: key.to_string(),
                    offset: e.offset,
                    message: e.message,
                })?;
                Ok(codegen::function(&ast, &self.namespace, locale))
            }
            Value::Object(entries) => {
                let members = entries
                    .iter()
                    .map(|(child, value)| {
                        let path = if key.is_empty() {
                            child.clone()
                        } else {
                            format!("{key}.{child}")
                        };
                        self.compile_value(&path, value, locale)
                            .map(|compiled| format!("{}:{compiled}", codegen::string_literal(child)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{{{}}}", members.join(",")))
            }
            other => Err(CompileError::UnsupportedValue {
                key: key.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

impl MessageCompiler for MessageFormat {
    fn default_locale(&self) -> &str {
        &self.default_locale
    }

    fn is_known_locale(&self, id: &str) -> bool {
        self.registry.is_known_locale(id)
    }

    fn compile(&self, template: &Value, locale: &str) -> Result<String, CompileError> {
        if !self.registry.is_known_locale(locale) {
            return Err(CompileError::UnknownLocale(locale.to_string()));
        }
        self.compile_value("", template, locale)
    }

    fn runtime_helpers_source(&self) -> String {
        runtime::helpers_source(&self.registry)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
