pub mod check;
pub mod classify;
pub mod generate;

use std::path::{Path, PathBuf};

use jbridge_codegen::{GenerationReport, Generator, GeneratorConfig};

use crate::error::{convert_syntax_error, CliError, ErrorContext};
use crate::io::read_file;

/// Loads the generator configuration, applying a command-line module override.
pub fn load_config(path: Option<&Path>, module: Option<String>) -> Result<GeneratorConfig, CliError> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(module) = module {
        config.module = module;
        config.validate()?;
    }
    Ok(config)
}

/// Reads `file`, extracts its binding sites and runs one generation pass.
pub fn run_generator(file: PathBuf, config: GeneratorConfig) -> Result<GenerationReport, CliError> {
    let source = read_file(file)?;
    let sites = jbridge_syntax::parse_declarations(&source, &config.module)
        .map_err(|e| convert_syntax_error(e, ErrorContext { source: &source }))?;
    log::info!("Found {} closure binding site(s)", sites.len());
    Ok(Generator::new(config).run(&sites))
}

/// Prints each failed declaration as a full diagnostic.
pub fn report_failures(report: GenerationReport) -> usize {
    let count = report.failures.len();
    for failure in report.failures {
        log::debug!("{} failed", failure.site);
        eprintln!("{}: {:?}", failure.site, miette::Report::new(failure.error));
    }
    count
}
