use super::build_types::*;
use super::locale::infer_locale;
use crate::config::BuildConfig;
use crate::engine::{CompileError, MessageCompiler};

use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug)]
pub enum SourceError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Compile { path: PathBuf, source: CompileError },
}

impl SourceError {
    pub fn path(&self) -> &PathBuf {
        match self {
            SourceError::Read { path, .. } | SourceError::Parse { path, .. } | SourceError::Compile { path, .. } => {
                path
            }
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceError::Read { path, source } => {
                write!(f, "Could not read {}: {source}", path.display())
            }
            SourceError::Parse { path, source } => {
                write!(f, "Parse error in {}: {source}", path.display())
            }
            SourceError::Compile { path, source } => {
                write!(f, "Compile error in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Read { source, .. } => Some(source),
            SourceError::Parse { source, .. } => Some(source),
            SourceError::Compile { source, .. } => Some(source),
        }
    }
}

/// Compiles a single template file.
///
/// `Ok(None)` means the path was not a regular file and contributes nothing.
/// The compiler is only read from; the inferred locale is passed per call.
pub fn compile_source<C: MessageCompiler + ?Sized>(
    file: &SourceFile,
    config: &BuildConfig,
    compiler: &C,
) -> Result<Option<CompiledUnit>, SourceError> {
    let path = file.absolute_path(config.input_dir());
    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => (),
        _ => {
            log::info!("Skipping {}", file.path.display());
            return Ok(None);
        }
    }

    let locale = infer_locale(
        &file.path,
        |id| compiler.is_known_locale(id),
        compiler.default_locale(),
    );

    let text = fs::read_to_string(&path).map_err(|source| SourceError::Read {
        path: path.clone(),
        source,
    })?;
    let template: serde_json::Value = serde_json::from_str(&text).map_err(|source| SourceError::Parse {
        path: path.clone(),
        source,
    })?;

    let unit = CompiledUnit {
        identifier: file.identifier.clone(),
        source: file.path.clone(),
        locale,
        expression: String::new(),
    };
    log::info!(
        "Building {} from `{}` with locale \"{}\"",
        unit.target(config.namespace()),
        file.path.display(),
        unit.locale
    );

    let expression = compiler
        .compile(&template, &unit.locale)
        .map_err(|source| SourceError::Compile { path, source })?;

    Ok(Some(CompiledUnit { expression, ..unit }))
}

/// Compiles every source in parallel and joins the results in input order.
///
/// Per-file failures are logged and leave no unit behind; they never fail the
/// pass.
pub fn compile_all<C: MessageCompiler + ?Sized>(
    sources: &[SourceFile],
    config: &BuildConfig,
    compiler: &C,
) -> (CompiledModule, PassReport) {
    let start = Instant::now();
    let results = sources
        .par_iter()
        .map(|file| compile_source(file, config, compiler))
        .collect::<Vec<_>>();

    let mut module = CompiledModule::new();
    let mut report = PassReport {
        discovered: sources.len(),
        ..PassReport::default()
    };

    for result in results {
        match result {
            Ok(Some(unit)) => {
                report.compiled += 1;
                module.push(unit);
            }
            Ok(None) => report.skipped += 1,
            Err(e) => {
                report.failed += 1;
                log::error!("--->\t{e}");
            }
        }
    }

    for (identifier, sources) in module.collisions() {
        let sources = sources
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        log::warn!("{identifier} is produced by several files ({sources}); the last one wins");
    }

    report.duration = start.elapsed();
    (module, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::create_config;
    use crate::engine::MessageFormat;
    use std::path::Path;

    fn write(root: &Path, relative: &str, contents: &str) -> SourceFile {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        SourceFile::new(PathBuf::from(relative))
    }

    fn compiler(locales: &[&str]) -> MessageFormat {
        let mut mf = MessageFormat::new(locales[0], "i18n").unwrap();
        for lc in &locales[1..] {
            mf.load_locale(lc).unwrap();
        }
        mf
    }

    #[test]
    fn compiles_a_template_under_the_default_locale() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "greeting.json", r#"{"hello":"Hello, {name}!"}"#);
        let config = create_config(dir.path(), &["en"]);

        let unit = compile_source(&file, &config, &compiler(&["en"])).unwrap().unwrap();
        assert_eq!(unit.identifier, "greeting");
        assert_eq!(unit.locale, "en");
        assert_eq!(
            unit.assignment("i18n"),
            r#"i18n["greeting"]={"hello":function(d){return "Hello, "+i18n.v(d,"name")+"!"}};"#
        );
    }

    #[test]
    fn compiles_each_file_against_its_inferred_locale() {
        let dir = tempfile::tempdir().unwrap();
        let en = write(dir.path(), "en/greeting.json", r#"{"n":"{n, plural, other{#}}"}"#);
        let fr = write(dir.path(), "fr/greeting.json", r#"{"n":"{n, plural, other{#}}"}"#);
        let config = create_config(dir.path(), &["en", "fr"]);
        let mf = compiler(&["en", "fr"]);

        let en = compile_source(&en, &config, &mf).unwrap().unwrap();
        let fr = compile_source(&fr, &config, &mf).unwrap().unwrap();
        assert_eq!((en.identifier.as_str(), en.locale.as_str()), ("en/greeting", "en"));
        assert_eq!((fr.identifier.as_str(), fr.locale.as_str()), ("fr/greeting", "fr"));
        assert!(fr.expression.contains(r#",0,"fr","#));
        assert_eq!(mf.default_locale(), "en");
    }

    #[test]
    fn non_regular_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("folder.json")).unwrap();
        let config = create_config(dir.path(), &["en"]);

        let skipped = SourceFile::new(PathBuf::from("folder.json"));
        assert!(compile_source(&skipped, &config, &compiler(&["en"])).unwrap().is_none());
        let vanished = SourceFile::new(PathBuf::from("gone.json"));
        assert!(compile_source(&vanished, &config, &compiler(&["en"])).unwrap().is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "broken.json", r#"{"hello": "#);
        let config = create_config(dir.path(), &["en"]);
        let mf = compiler(&["en"]);

        let err = compile_source(&file, &config, &mf).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert_eq!(err.path(), &dir.path().join("broken.json"));
        assert!(err.to_string().starts_with("Parse error in "));
        assert_eq!(mf.default_locale(), "en");
    }

    #[test]
    fn failing_files_do_not_affect_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![
            write(dir.path(), "a.json", r#"{"a":"A"}"#),
            write(dir.path(), "b.json", "not json"),
            write(dir.path(), "c.json", r#"{"c":"{x, select}"}"#),
            write(dir.path(), "d.json", r#"{"d":"D"}"#),
        ];
        let config = create_config(dir.path(), &["en"]);

        let (module, report) = compile_all(&sources, &config, &compiler(&["en"]));
        let identifiers: Vec<_> = module.units().iter().map(|u| u.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["a", "d"]);
        assert_eq!((report.discovered, report.compiled, report.failed, report.skipped), (4, 2, 2, 0));
    }

    #[test]
    fn units_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..32).map(|i| format!("m{i:02}.json")).collect();
        let sources: Vec<_> = names
            .iter()
            .map(|name| write(dir.path(), name, r#"{"k":"v"}"#))
            .collect();
        let config = create_config(dir.path(), &["en"]);

        let (module, _) = compile_all(&sources, &config, &compiler(&["en"]));
        let identifiers: Vec<_> = module.units().iter().map(|u| u.identifier.clone()).collect();
        let expected: Vec<_> = sources.iter().map(|s| s.identifier.clone()).collect();
        assert_eq!(identifiers, expected);
    }
}
