pub mod assemble;
pub mod build_types;
pub mod compile;
pub mod discover;
pub mod locale;

use crate::config::{BuildConfig, ConfigError, OutputTarget};
use crate::engine::{MessageCompiler, MessageFormat};
use build_types::PassReport;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    Enumeration { path: PathBuf, message: String },
    InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::Enumeration { path, message } => {
                write!(f, "Could not read input directory {}: {message}", path.display())
            }
            BuildError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid include pattern '{pattern}': {message}")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Creates the default compiler with every configured locale loaded.
pub fn create_compiler(config: &BuildConfig) -> Result<MessageFormat, ConfigError> {
    let mut compiler = MessageFormat::new(config.primary_locale(), config.namespace())?;
    for locale in config.additional_locales() {
        compiler.load_locale(locale)?;
    }
    Ok(compiler)
}

/// One full pass: enumerate, compile every source, assemble.
///
/// Only a failure to enumerate the input directory fails the pass; per-file
/// problems are logged and skipped.
pub fn run_once<C: MessageCompiler + ?Sized>(
    config: &BuildConfig,
    compiler: &C,
) -> Result<(String, PassReport), BuildError> {
    let start = Instant::now();
    log::info!("Input dir: {}", config.input_dir().display());
    log::info!("Included locales: {}", config.locales().join(", "));

    let sources = discover::find_sources(config.input_dir(), config.include())?;
    let (module, mut report) = compile::compile_all(&sources, config, compiler);
    let text = assemble::serialize(&module, &compiler.runtime_helpers_source(), config.namespace());

    report.duration = start.elapsed();
    log::debug!("pass finished in {:.2}s: {report:?}", report.duration.as_secs_f64());
    Ok((text, report))
}

/// Writes the module to its target. Write failures are reported, not returned.
pub fn emit(config: &BuildConfig, text: &str) {
    emit_to(config, text, &mut io::stdout().lock());
}

/// Like [`emit`], with `stdout` standing in for the process's standard output.
pub fn emit_to<W: Write>(config: &BuildConfig, text: &str, stdout: &mut W) {
    match config.output() {
        OutputTarget::Stdout => {
            if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
                log::error!("--->\t<stdout>: {e}");
            }
        }
        OutputTarget::File(path) => match fs::write(path, text) {
            Ok(()) => log::info!("{} written.", path.display()),
            Err(e) => log::error!("--->\t{}: {e}", path.display()),
        },
    }
}

/// `run_once` followed by `emit`.
pub fn build<C: MessageCompiler + ?Sized>(config: &BuildConfig, compiler: &C) -> Result<PassReport, BuildError> {
    match run_once(config, compiler) {
        Ok((text, report)) => {
            emit(config, &text);
            Ok(report)
        }
        Err(e) => {
            log::error!("--->\t{e}");
            Err(e)
        }
    }
}
