use std::path::PathBuf;

use jbridge_codegen::GeneratorConfig;

use super::{report_failures, run_generator};
use crate::error::CliError;

pub fn handle_check(file: PathBuf, config: GeneratorConfig) -> Result<(), CliError> {
    let report = run_generator(file, config)?;
    let total = report.artifacts.len() + report.failures.len();
    let bridged = report.artifacts.len();

    let failed = report_failures(report);
    if failed > 0 {
        return Err(CliError::GenerationFailed { failed, total });
    }
    println!("{} closure binding site(s) can be bridged", bridged);
    Ok(())
}
