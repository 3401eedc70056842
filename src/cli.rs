use crate::config::{
    self, BuildConfig, ConfigError, DEFAULT_INCLUDE, DEFAULT_NAMESPACE, OutputTarget,
};
use crate::helpers;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::LevelFilter;
use std::path::PathBuf;

/// Compile a directory of MessageFormat JSON files into a single JavaScript module.
#[derive(Parser, Debug)]
#[command(name = "messageformat", version)]
pub struct Cli {
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Locale(s) to use, separated by commas or spaces. The first one is the default. [mandatory]
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Directory containing messageformat files to compile
    #[arg(short, long)]
    pub inputdir: Option<PathBuf>,

    /// Output where messageformat will be compiled. A directory gets `i18n.js`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Global object in the output containing the templates
    #[arg(short, long, visible_alias = "ns", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Glob pattern for files to include from the input directory
    #[arg(short = 'I', long, default_value = DEFAULT_INCLUDE)]
    pub include: String,

    /// Print the result in stdout instead of writing in a file
    #[arg(short, long)]
    pub stdout: bool,

    /// Watch the input directory for changes
    #[arg(short, long)]
    pub watch: bool,

    /// Input directory (overrides --inputdir)
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir_arg: Option<PathBuf>,

    /// Output path (overrides --output)
    #[arg(value_name = "OUTPUT")]
    pub output_arg: Option<PathBuf>,
}

impl Cli {
    pub fn log_level_filter(&self) -> LevelFilter {
        self.verbose.log_level_filter()
    }

    /// Applies defaults and positional overrides, then validates.
    pub fn into_config(self) -> Result<BuildConfig, ConfigError> {
        let locales = self
            .locale
            .as_deref()
            .map(config::parse_locale_list)
            .unwrap_or_default();
        if locales.is_empty() {
            return Err(ConfigError::MissingLocale);
        }

        let current_dir = PathBuf::from(".");
        let input_dir = self.input_dir_arg.or(self.inputdir).unwrap_or_else(|| current_dir.clone());
        let output = if self.stdout {
            OutputTarget::Stdout
        } else {
            let output = self.output_arg.or(self.output).unwrap_or(current_dir);
            OutputTarget::File(config::resolve_output_path(&helpers::get_abs_path(&output)))
        };

        let mut build_config = BuildConfig::new(
            helpers::get_abs_path(&input_dir),
            output,
            locales,
            self.include,
            config::normalize_namespace(&self.namespace),
        )?;
        build_config.watch = self.watch;
        Ok(build_config)
    }
}
