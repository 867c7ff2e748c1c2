//! Typed CloudFormation resources the planner can emit, and the values used to
//! reference one resource from another.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::GraphConsistencyError;

mod route53;
pub use route53::*;
mod s3_bucket;
pub use s3_bucket::*;
mod cloudfront;
pub use cloudfront::*;
mod iam;
pub use iam::*;

// higher level resources:
mod static_website;
pub use static_website::*;

/// logical id of a resource within one graph. alphanumeric, 1 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new<S: AsRef<str>>(s: S) -> Result<Self, GraphConsistencyError> {
        let s = s.as_ref();
        match verify_resource_name(s) {
            Some(_) => Err(GraphConsistencyError::InvalidResourceId(s.to_string())),
            None => Ok(Self(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn verify_resource_name(resource_name: &str) -> Option<String> {
    if resource_name.len() > 255 {
        return Some(format!("Invalid resource name {:?}\nmust be less than 255 characters", resource_name));
    }
    if resource_name.len() < 1 {
        return Some(format!("Invalid resource name {:?}\nMust contain at least 1 character", resource_name));
    }
    if !resource_name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(format!("Invalid resource name {:?}\nMust contain only alphanumeric characters [A-Za-z0-9]", resource_name));
    }
    None
}

/// A property value: either a literal, or something the provisioning engine
/// resolves from another resource once it exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrVal {
    Val(String),
    /// `{ "Ref": id }`
    Ref(ResourceId),
    /// `{ "Fn::GetAtt": [id, attribute] }`
    GetAtt(ResourceId, &'static str),
    /// concatenation of the parts with no delimiter.
    Join(Vec<StrVal>),
    /// a list valued attribute joined into one string.
    JoinList(&'static str, Box<StrVal>),
    /// the host part of a URL valued attribute:
    /// `{ "Fn::Select": ["2", { "Fn::Split": ["/", url] }] }`
    HostOf(Box<StrVal>),
}

impl StrVal {
    pub fn to_value(&self) -> Value {
        match self {
            StrVal::Val(s) => Value::String(s.clone()),
            StrVal::Ref(id) => json!({ "Ref": id.as_str() }),
            StrVal::GetAtt(id, attr) => json!({ "Fn::GetAtt": [id.as_str(), attr] }),
            StrVal::Join(parts) => {
                let parts: Vec<Value> = parts.iter().map(StrVal::to_value).collect();
                json!({ "Fn::Join": ["", parts] })
            }
            StrVal::JoinList(delimiter, list) => json!({ "Fn::Join": [delimiter, list.to_value()] }),
            StrVal::HostOf(url) => json!({ "Fn::Select": ["2", { "Fn::Split": ["/", url.to_value()] }] }),
        }
    }
}

impl Serialize for StrVal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

pub trait ToStrVal {
    fn to_str_val(&self) -> StrVal;
}

impl ToStrVal for str {
    fn to_str_val(&self) -> StrVal {
        StrVal::Val(self.to_string())
    }
}

impl ToStrVal for String {
    fn to_str_val(&self) -> StrVal {
        StrVal::Val(self.clone())
    }
}

pub fn get_ref(id: &ResourceId) -> StrVal {
    StrVal::Ref(id.clone())
}

pub fn get_att(id: &ResourceId, attr: &'static str) -> StrVal {
    StrVal::GetAtt(id.clone(), attr)
}

/// walks serialized properties and collects every logical id they reference.
pub fn references(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("Ref") {
                out.insert(id.clone());
            }
            if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                if let Some(Value::String(id)) = parts.first() {
                    out.insert(id.clone());
                }
            }
            for v in map.values() {
                references(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                references(v, out);
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ResourceKind {
    Zone,
    DnsRecord,
    Bucket,
    BucketPolicy,
    Cdn,
    IdentityPrincipal,
    ServiceAccount,
}

impl ResourceKind {
    pub fn type_string(&self) -> &'static str {
        match self {
            ResourceKind::Zone => "AWS::Route53::HostedZone",
            ResourceKind::DnsRecord => "AWS::Route53::RecordSet",
            ResourceKind::Bucket => "AWS::S3::Bucket",
            ResourceKind::BucketPolicy => "AWS::S3::BucketPolicy",
            ResourceKind::Cdn => "AWS::CloudFront::Distribution",
            ResourceKind::IdentityPrincipal => "AWS::CloudFront::CloudFrontOriginAccessIdentity",
            ResourceKind::ServiceAccount => "AWS::IAM::User",
        }
    }
}

pub trait CfnResource {
    fn kind(&self) -> ResourceKind;

    fn type_string(&self) -> &'static str {
        self.kind().type_string()
    }

    /// checks invariants local to this one resource.
    fn validate(&self, _id: &ResourceId) -> Result<(), GraphConsistencyError> {
        Ok(())
    }
}

/// kind specific properties of a resource. serializes as the bare CloudFormation `Properties` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Properties {
    Zone(HostedZone),
    DnsRecord(RecordSet),
    Bucket(Bucket),
    BucketPolicy(BucketPolicy),
    Cdn(Distribution),
    IdentityPrincipal(OriginAccessIdentity),
    ServiceAccount(User),
}

impl Properties {
    pub fn as_cdn(&self) -> Option<&Distribution> {
        match self {
            Properties::Cdn(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_bucket(&self) -> Option<&Bucket> {
        match self {
            Properties::Bucket(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordSet> {
        match self {
            Properties::DnsRecord(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bucket_policy(&self) -> Option<&BucketPolicy> {
        match self {
            Properties::BucketPolicy(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Properties::ServiceAccount(u) => Some(u),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn CfnResource {
        match self {
            Properties::Zone(p) => p,
            Properties::DnsRecord(p) => p,
            Properties::Bucket(p) => p,
            Properties::BucketPolicy(p) => p,
            Properties::Cdn(p) => p,
            Properties::IdentityPrincipal(p) => p,
            Properties::ServiceAccount(p) => p,
        }
    }
}

impl CfnResource for Properties {
    fn kind(&self) -> ResourceKind {
        self.inner().kind()
    }

    fn validate(&self, id: &ResourceId) -> Result<(), GraphConsistencyError> {
        self.inner().validate(id)
    }
}

macro_rules! into_properties {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Properties {
                fn from(p: $ty) -> Self {
                    Properties::$variant(p)
                }
            }
        )*
    };
}

into_properties!(
    HostedZone => Zone,
    RecordSet => DnsRecord,
    Bucket => Bucket,
    BucketPolicy => BucketPolicy,
    Distribution => Cdn,
    OriginAccessIdentity => IdentityPrincipal,
    User => ServiceAccount,
);

/// one node of the resource graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalResource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub properties: Properties,
    /// every resource this one must be created after: all references found in
    /// `properties` plus any explicit ordering constraints.
    pub depends_on: BTreeSet<ResourceId>,
}

impl LogicalResource {
    pub fn new(id: ResourceId, properties: Properties, explicit: &[&ResourceId]) -> Result<Self, GraphConsistencyError> {
        let value = properties.to_value(&id)?;
        let mut found = BTreeSet::new();
        references(&value, &mut found);
        let mut depends_on = BTreeSet::new();
        for dep in found {
            depends_on.insert(ResourceId::new(dep)?);
        }
        depends_on.extend(explicit.iter().map(|d| (*d).clone()));
        Ok(Self {
            kind: properties.kind(),
            id,
            properties,
            depends_on,
        })
    }

    /// edges that are not already implied by a reference inside the properties.
    pub fn explicit_depends_on(&self) -> Result<Vec<&ResourceId>, GraphConsistencyError> {
        let value = self.properties.to_value(&self.id)?;
        let mut found = BTreeSet::new();
        references(&value, &mut found);
        Ok(self.depends_on.iter().filter(|d| !found.contains(d.as_str())).collect())
    }
}

impl Properties {
    pub fn to_value(&self, id: &ResourceId) -> Result<Value, GraphConsistencyError> {
        serde_json::to_value(self).map_err(|e| GraphConsistencyError::Serialization {
            id: id.to_string(),
            message: e.to_string(),
        })
    }
}
