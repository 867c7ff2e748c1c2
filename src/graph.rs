//! The planned set of resources and the edges between them.
//!
//! [`GraphBuilder`] collects resources in any order that is convenient to write,
//! and [`GraphBuilder::finish`] checks the graph is consistent and sorts it so
//! that every resource comes after everything it depends on. An inconsistent
//! graph is never returned.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::error::GraphConsistencyError;
use crate::resources::*;

/// which side of the www handling a hostname is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HostRole {
    Content,
    Redirect,
}

/// A hostname, the DNS record that publishes it, and the distribution it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasBinding {
    pub hostname: String,
    pub role: HostRole,
    pub distribution: ResourceId,
    pub record: ResourceId,
    /// whether the distribution carries this hostname as a TLS backed alias.
    pub tls_alias: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub description: String,
    pub value: StrVal,
}

/// immutable once built. resources are stored in creation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGraph {
    resources: Vec<LogicalResource>,
    aliases: Vec<AliasBinding>,
    outputs: BTreeMap<String, Output>,
}

impl ResourceGraph {
    /// resources in an order where every dependency comes first.
    pub fn resources(&self) -> &[LogicalResource] {
        &self.resources
    }

    pub fn aliases(&self) -> &[AliasBinding] {
        &self.aliases
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    pub fn get(&self, id: &str) -> Option<&LogicalResource> {
        self.resources.iter().find(|r| r.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &LogicalResource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    pub fn distribution(&self, id: &str) -> Option<&Distribution> {
        self.get(id).and_then(|r| r.properties.as_cdn())
    }

    pub fn binding_for(&self, hostname: &str) -> Option<&AliasBinding> {
        self.aliases.iter().find(|b| b.hostname == hostname)
    }

    pub fn creation_order(&self) -> Vec<&ResourceId> {
        self.resources.iter().map(|r| &r.id).collect()
    }

    /// the order to delete resources in: dependents before their dependencies.
    pub fn teardown_order(&self) -> Vec<&ResourceId> {
        self.resources.iter().rev().map(|r| &r.id).collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    resources: Vec<LogicalResource>,
    aliases: Vec<AliasBinding>,
    outputs: BTreeMap<String, Output>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<P: Into<Properties>>(&mut self, id: &str, properties: P) -> Result<ResourceId, GraphConsistencyError> {
        self.add_with_deps(id, properties, &[])
    }

    /// like `add`, with ordering constraints that are not visible as references in the properties.
    pub fn add_with_deps<P: Into<Properties>>(
        &mut self,
        id: &str,
        properties: P,
        depends_on: &[&ResourceId],
    ) -> Result<ResourceId, GraphConsistencyError> {
        let id = ResourceId::new(id)?;
        let resource = LogicalResource::new(id.clone(), properties.into(), depends_on)?;
        tracing::trace!(id = %resource.id, kind = ?resource.kind, deps = resource.depends_on.len(), "adding resource");
        self.resources.push(resource);
        Ok(id)
    }

    pub fn bind(&mut self, binding: AliasBinding) {
        self.aliases.push(binding);
    }

    pub fn output<S: Into<String>>(&mut self, name: &str, description: S, value: StrVal) {
        self.outputs.insert(name.to_string(), Output { description: description.into(), value });
    }

    pub fn finish(self) -> Result<ResourceGraph, GraphConsistencyError> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, resource) in self.resources.iter().enumerate() {
            if index.insert(resource.id.as_str(), i).is_some() {
                return Err(GraphConsistencyError::DuplicateId(resource.id.to_string()));
            }
        }
        for resource in self.resources.iter() {
            resource.properties.validate(&resource.id)?;
            for dep in resource.depends_on.iter() {
                if !index.contains_key(dep.as_str()) {
                    return Err(GraphConsistencyError::DanglingReference {
                        from: resource.id.to_string(),
                        to: dep.to_string(),
                    });
                }
            }
        }
        for binding in self.aliases.iter() {
            for target in [&binding.distribution, &binding.record] {
                if !index.contains_key(target.as_str()) {
                    return Err(GraphConsistencyError::DanglingReference {
                        from: binding.hostname.clone(),
                        to: target.to_string(),
                    });
                }
            }
        }
        for (name, output) in self.outputs.iter() {
            let mut found = BTreeSet::new();
            references(&output.value.to_value(), &mut found);
            if let Some(missing) = found.into_iter().find(|id| !index.contains_key(id.as_str())) {
                return Err(GraphConsistencyError::DanglingReference { from: name.clone(), to: missing });
            }
        }

        let order = topological_order(&self.resources, &index)?;
        let mut slots: Vec<Option<LogicalResource>> = self.resources.into_iter().map(Some).collect();
        let resources = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Ok(ResourceGraph {
            resources,
            aliases: self.aliases,
            outputs: self.outputs,
        })
    }
}

/// Kahn's algorithm. among resources that are ready at the same time, the one added
/// first goes first, so the same input always gives the same order.
fn topological_order(resources: &[LogicalResource], index: &HashMap<&str, usize>) -> Result<Vec<usize>, GraphConsistencyError> {
    let mut remaining_deps: Vec<usize> = resources.iter().map(|r| r.depends_on.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![vec![]; resources.len()];
    for (i, resource) in resources.iter().enumerate() {
        for dep in resource.depends_on.iter() {
            // presence was checked by the caller
            if let Some(&d) = index.get(dep.as_str()) {
                dependents[d].push(i);
            }
        }
    }
    let mut ready: BTreeSet<usize> = remaining_deps.iter().enumerate()
        .filter(|(_, n)| **n == 0)
        .map(|(i, _)| i)
        .collect();
    let mut order = Vec::with_capacity(resources.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &dependent in dependents[i].iter() {
            remaining_deps[dependent] -= 1;
            if remaining_deps[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }
    if order.len() != resources.len() {
        let stuck = remaining_deps.iter().enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(i, _)| resources[i].id.to_string())
            .collect();
        return Err(GraphConsistencyError::Cycle(stuck));
    }
    Ok(order)
}
