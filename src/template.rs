//! Renders a [`ResourceGraph`] as a CloudFormation template, which is what the
//! provisioning engine actually consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::StackName;
use crate::error::GraphConsistencyError;
use crate::graph::ResourceGraph;
use crate::resources::CfnResource;

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResource {
    #[serde(rename = "Type")]
    pub ty: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    /// only the ordering constraints that are not already implied by a `Ref` or `Fn::GetAtt`.
    #[serde(rename = "DependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceOutput {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTemplate {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub version: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, SavedResource>,
    #[serde(rename = "Outputs")]
    pub outputs: BTreeMap<String, ResourceOutput>,
}

impl Default for SavedTemplate {
    fn default() -> Self {
        Self {
            version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: String::new(),
            resources: Default::default(),
            outputs: Default::default(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStack {
    /// this is expected to only have 1 item.
    /// we structure it this way so that we can separate the stack name
    /// from the template
    pub template: BTreeMap<String, SavedTemplate>,
}

impl SavedStack {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// pretty, so if a user needs to look at the stack in the Cfn console it looks nice
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn stack_name(&self) -> Option<&str> {
        self.template.keys().next().map(String::as_str)
    }
}

pub fn render(graph: &ResourceGraph, stack_name: &StackName) -> Result<SavedStack, GraphConsistencyError> {
    let mut out_template = SavedTemplate {
        description: format!("static website stack {stack_name}"),
        ..Default::default()
    };
    for resource in graph.resources() {
        let saved_resource = SavedResource {
            ty: resource.properties.type_string().to_string(),
            properties: resource.properties.to_value(&resource.id)?,
            depends_on: resource.explicit_depends_on()?.into_iter().map(|d| d.to_string()).collect(),
        };
        out_template.resources.insert(resource.id.to_string(), saved_resource);
    }
    for (name, output) in graph.outputs() {
        out_template.outputs.insert(name.clone(), ResourceOutput {
            description: output.description.clone(),
            value: output.value.to_value(),
        });
    }
    tracing::debug!(stack = %stack_name, resources = out_template.resources.len(), "rendered template");
    let mut stack = SavedStack::default();
    stack.template.insert(stack_name.to_string(), out_template);
    Ok(stack)
}
