//! Plans the cloud resources that serve a static website behind a CDN.
//!
//! The pipeline is `validate -> resolve -> build`:
//!
//! - [`validation::validate`] turns a [`RawSiteConfig`] into a [`SiteConfig`] or rejects it.
//! - [`topology::resolve`] decides which optional pieces exist.
//! - [`resources::build`] materializes those pieces as a [`ResourceGraph`] with every
//!   dependency ordered before its dependents.
//!
//! [`plan`] runs all three. Nothing here talks to a provider: the graph (or the
//! template rendered from it by [`template::render`]) is handed to a provisioning engine.

pub mod config;
pub mod error;
pub mod graph;
pub mod regions;
pub mod resources;
pub mod template;
pub mod topology;
pub mod validation;

#[cfg(test)]
mod module_testing;

use serde::Serialize;

pub use config::{ExternalIds, RawSiteConfig, SiteConfig};
pub use error::{ConfigError, GraphConsistencyError, PlanError, PlanResult, ValidationError};
pub use graph::{AliasBinding, ResourceGraph};
pub use template::SavedStack;
pub use topology::Topology;

/// everything derived from one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub config: SiteConfig,
    pub topology: Topology,
    pub graph: ResourceGraph,
}

impl Plan {
    pub fn render(&self) -> Result<SavedStack, GraphConsistencyError> {
        template::render(&self.graph, &self.config.stack_name)
    }
}

pub fn plan(raw: &RawSiteConfig, ids: &ExternalIds) -> PlanResult<Plan> {
    validation::validate_external_ids(ids)?;
    let config = validation::validate(raw)?;
    tracing::debug!(domain = %config.domain_name, stack = %config.stack_name, "validated site config");
    let topology = topology::resolve(&config);
    let graph = match resources::build(&topology, &config, ids) {
        Ok(graph) => graph,
        Err(e) => {
            tracing::error!(error = %e, domain = %config.domain_name, "refusing to emit inconsistent resource graph");
            return Err(e.into());
        }
    };
    tracing::info!(
        domain = %config.domain_name,
        resources = graph.resources().len(),
        aliases = graph.aliases().len(),
        "planned static website"
    );
    Ok(Plan { config, topology, graph })
}
