use std::path::{Path, PathBuf};

use jbridge_codegen::{BindingArtifacts, GenerationReport, GeneratorConfig, ThunkPlan};
use serde::Serialize;

use super::{report_failures, run_generator};
use crate::error::CliError;
use crate::io::write_output;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitFormat {
    /// One block per binding site
    Summary,
    /// Full descriptor trees as TOML
    Toml,
}

#[derive(Serialize)]
struct DescriptorFile<'a> {
    binding: &'a [BindingArtifacts],
}

pub fn handle_generate(
    file: PathBuf,
    config: GeneratorConfig,
    emit: EmitFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let report = run_generator(file, config)?;
    let rendered = match emit {
        EmitFormat::Summary => render_summary(&report),
        EmitFormat::Toml => toml::to_string_pretty(&DescriptorFile {
            binding: &report.artifacts,
        })?,
    };
    write_output(output, &rendered)?;

    let failed = report_failures(report);
    if failed > 0 {
        log::warn!("{} declaration(s) skipped", failed);
    }
    Ok(())
}

pub fn render_summary(report: &GenerationReport) -> String {
    let mut out = String::new();
    for artifacts in &report.artifacts {
        render_site(&mut out, artifacts);
    }
    out
}

fn render_site(out: &mut String, artifacts: &BindingArtifacts) {
    let interface = &artifacts.interface;
    out.push_str(&format!("{} [{}]\n", artifacts.site, artifacts.strategy));
    out.push_str(&format!(
        "  interface {} {}{}\n",
        interface.name,
        interface.method.name,
        interface.method.jni_descriptor()
    ));
    match &artifacts.thunk {
        ThunkPlan::Inline(_) => out.push_str("  thunk     inline\n"),
        ThunkPlan::Adapter(thunk) => {
            out.push_str(&format!(
                "  thunk     {} : {}\n",
                thunk.adapter.name, thunk.capability.name
            ));
        }
    }
    if let Some(plan) = artifacts.lifetime() {
        out.push_str(&format!(
            "  lifetime  {:?} {} acquire at {:?}, release on {:?}\n",
            plan.shape, plan.acquire.holder, plan.acquire.at, plan.release.triggers
        ));
    }
    for entry in &artifacts.contract.entries {
        out.push_str(&format!(
            "  native    {:?} {}{} -> {}\n",
            entry.role,
            entry.name,
            entry.descriptor(),
            entry.symbol
        ));
    }
}
