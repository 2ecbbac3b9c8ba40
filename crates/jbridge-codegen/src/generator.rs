use jbridge_model::{BindingSite, GenerationStrategy};
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::downcall::{resolve_contract, CallableRef, DowncallContract};
use crate::error::{CodegenError, CodegenResult};
use crate::lifetime::{check_conflict, plan_lifetime, LifetimePlan};
use crate::naming::{NameRegistry, SiteNames};
use crate::select::select_site;
use crate::target::{synthesize_interface, TargetInterfaceDescriptor};
use crate::thunk::{synthesize_thunk, ThunkPlan};

/// All descriptors generated for one binding site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingArtifacts {
    pub site: BindingSite,
    pub strategy: GenerationStrategy,
    pub names: SiteNames,
    pub interface: TargetInterfaceDescriptor,
    pub thunk: ThunkPlan,
    pub contract: DowncallContract,
}

impl BindingArtifacts {
    pub fn lifetime(&self) -> Option<&LifetimePlan> {
        self.thunk.lifetime()
    }
}

/// A declaration that failed; the rest of the run is unaffected.
#[derive(Debug)]
pub struct DeclarationFailure {
    pub site: String,
    pub error: CodegenError,
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    pub artifacts: Vec<BindingArtifacts>,
    pub failures: Vec<DeclarationFailure>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn artifact(&self, site: &str) -> Option<&BindingArtifacts> {
        self.artifacts.iter().find(|a| a.site.to_string() == site)
    }
}

/// Drives one generation run over a batch of binding sites.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    registry: NameRegistry,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            registry: NameRegistry::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Starts a fresh run: forgets every name handed out before.
    pub fn reset(&mut self) {
        self.registry.reset();
    }

    /// Generates every site in order. Failures are collected per declaration.
    pub fn run(&mut self, sites: &[BindingSite]) -> GenerationReport {
        self.reset();
        log::info!("Generating closure bindings for {} declaration(s)", sites.len());

        let mut report = GenerationReport::default();
        for site in sites {
            match self.generate_site(site) {
                Ok(artifacts) => report.artifacts.push(artifacts),
                Err(error) => {
                    log::warn!("Skipping {}: {}", site, error);
                    report.failures.push(DeclarationFailure {
                        site: site.to_string(),
                        error,
                    });
                }
            }
        }
        log::info!(
            "Generated {} binding(s), {} failure(s)",
            report.artifacts.len(),
            report.failures.len()
        );
        report
    }

    /// Generates one site within the current run.
    ///
    /// Everything that can fail is checked before names are claimed, so a
    /// failing declaration never shifts the names of the ones after it.
    pub fn generate_site(&mut self, site: &BindingSite) -> CodegenResult<BindingArtifacts> {
        let selection = select_site(site)?;
        let site_label = site.to_string();

        check_conflict(site)?;

        let names = self.registry.resolve(site, &self.config);
        let interface = synthesize_interface(
            &site.signature,
            selection.strategy,
            &names,
            &self.config.package,
            &site_label,
        )?;
        let callable = CallableRef::for_interface(&interface);
        let thunk = synthesize_thunk(
            &site.signature,
            selection.strategy,
            &names,
            &callable,
            &self.config.package,
            &site_label,
        )?;
        let thunk = match thunk {
            ThunkPlan::Adapter(adapter) => {
                let plan = plan_lifetime(site, &selection, &names)?;
                ThunkPlan::Adapter(adapter.with_lifetime(plan))
            }
            inline => inline,
        };
        let contract = resolve_contract(site, &interface, &names);

        Ok(BindingArtifacts {
            site: site.clone(),
            strategy: selection.strategy,
            names,
            interface,
            thunk,
            contract,
        })
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
