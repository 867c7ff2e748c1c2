use serde::Serialize;

use super::*;

pub const S3_LOGGING_SERVICE: &str = "logging.s3.amazonaws.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Principal {
    Service(String),
    CanonicalUser(StrVal),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    pub action: Vec<String>,
    pub resource: Vec<StrVal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

pub fn create_policy_doc(statement: Vec<Statement>) -> PolicyDocument {
    PolicyDocument {
        version: "2012-10-17".into(),
        statement,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessIdentityConfig {
    pub comment: String,
}

/// the principal CloudFront uses to read from the content bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessIdentity {
    pub cloud_front_origin_access_identity_config: OriginAccessIdentityConfig,
}

impl CfnResource for OriginAccessIdentity {
    fn kind(&self) -> ResourceKind {
        ResourceKind::IdentityPrincipal
    }
}

pub fn origin_access_identity(domain_name: &str) -> OriginAccessIdentity {
    OriginAccessIdentity {
        cloud_front_origin_access_identity_config: OriginAccessIdentityConfig {
            comment: format!("origin access for {domain_name}"),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub policies: Vec<Policy>,
}

impl CfnResource for User {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ServiceAccount
    }
}

/// `arn:aws:cloudfront::<account>:distribution/<id>`
pub fn distribution_arn(account_id: &str, distribution: &ResourceId) -> StrVal {
    StrVal::Join(vec![
        format!("arn:aws:cloudfront::{account_id}:distribution/").to_str_val(),
        get_ref(distribution),
    ])
}

/// the credentials used to publish the site: may list and change objects in the
/// content bucket and invalidate the content distribution. nothing else.
pub fn deploy_user(content_bucket: &ResourceId, content_distribution: &ResourceId, account_id: &str) -> User {
    let statements = vec![
        Statement {
            sid: Some("ListContent".into()),
            effect: Effect::Allow,
            principal: None,
            action: vec!["s3:ListBucket".into()],
            resource: vec![get_att(content_bucket, "Arn")],
            condition: None,
        },
        Statement {
            sid: Some("WriteContent".into()),
            effect: Effect::Allow,
            principal: None,
            action: vec!["s3:PutObject".into(), "s3:DeleteObject".into()],
            resource: vec![bucket_objects_arn(content_bucket)],
            condition: None,
        },
        Statement {
            sid: Some("InvalidateContent".into()),
            effect: Effect::Allow,
            principal: None,
            action: vec!["cloudfront:CreateInvalidation".into()],
            resource: vec![distribution_arn(account_id, content_distribution)],
            condition: None,
        },
    ];
    User {
        policies: vec![Policy {
            policy_name: "deploy-static-website".into(),
            policy_document: create_policy_doc(statements),
        }],
    }
}
