use serde::Serialize;

use super::*;

/// role suffixes used in physical bucket names.
pub const CONTENT_ROLE: &str = "content";
pub const REDIRECT_ROLE: &str = "redirect";
pub const LOGS_ROLE: &str = "logs";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlockConfiguration {
    pub block_public_acls: bool,
    pub block_public_policy: bool,
    pub ignore_public_acls: bool,
    pub restrict_public_buckets: bool,
}

impl Default for PublicAccessBlockConfiguration {
    fn default() -> Self {
        Self {
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerSideEncryptionByDefault {
    #[serde(rename = "SSEAlgorithm")]
    pub sse_algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerSideEncryptionRule {
    pub server_side_encryption_by_default: ServerSideEncryptionByDefault,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketEncryption {
    pub server_side_encryption_configuration: Vec<ServerSideEncryptionRule>,
}

impl Default for BucketEncryption {
    fn default() -> Self {
        Self {
            server_side_encryption_configuration: vec![ServerSideEncryptionRule {
                server_side_encryption_by_default: ServerSideEncryptionByDefault {
                    sse_algorithm: "AES256".into(),
                },
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnershipControlsRule {
    pub object_ownership: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnershipControls {
    pub rules: Vec<OwnershipControlsRule>,
}

impl Default for OwnershipControls {
    fn default() -> Self {
        Self {
            rules: vec![OwnershipControlsRule { object_ownership: "BucketOwnerEnforced".into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfiguration {
    pub destination_bucket_name: StrVal,
    pub log_file_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedirectAllRequestsTo {
    pub host_name: StrVal,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebsiteConfiguration {
    pub redirect_all_requests_to: RedirectAllRequestsTo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleRule {
    pub id: String,
    pub status: String,
    pub expiration_in_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleConfiguration {
    pub rules: Vec<LifecycleRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    pub bucket_name: String,
    pub public_access_block_configuration: PublicAccessBlockConfiguration,
    pub bucket_encryption: BucketEncryption,
    pub ownership_controls: OwnershipControls,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_configuration: Option<LoggingConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_configuration: Option<WebsiteConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_configuration: Option<LifecycleConfiguration>,
}

impl Bucket {
    /// a private, encrypted bucket. every bucket we create starts here.
    pub fn private(bucket_name: String) -> Self {
        Self {
            bucket_name,
            public_access_block_configuration: Default::default(),
            bucket_encryption: Default::default(),
            ownership_controls: Default::default(),
            logging_configuration: None,
            website_configuration: None,
            lifecycle_configuration: None,
        }
    }

    pub fn with_access_logs(mut self, logs_bucket: &ResourceId, prefix: &str) -> Self {
        self.logging_configuration = Some(LoggingConfiguration {
            destination_bucket_name: get_ref(logs_bucket),
            log_file_prefix: prefix.to_string(),
        });
        self
    }

    /// turns on the website endpoint, answering every request with a redirect to `host_name`.
    pub fn redirect_all_to(mut self, host_name: StrVal) -> Self {
        self.website_configuration = Some(WebsiteConfiguration {
            redirect_all_requests_to: RedirectAllRequestsTo {
                host_name,
                protocol: "https".into(),
            },
        });
        self
    }

    pub fn expire_after_days(mut self, days: u32) -> Self {
        self.lifecycle_configuration = Some(LifecycleConfiguration {
            rules: vec![LifecycleRule {
                id: "expire-access-logs".into(),
                status: "Enabled".into(),
                expiration_in_days: days,
            }],
        });
        self
    }
}

impl CfnResource for Bucket {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Bucket
    }

    fn validate(&self, id: &ResourceId) -> Result<(), GraphConsistencyError> {
        match bucket_name_violation(&self.bucket_name) {
            Some(constraint) => Err(GraphConsistencyError::InvalidBucketName {
                id: id.to_string(),
                name: self.bucket_name.clone(),
                constraint,
            }),
            None => Ok(()),
        }
    }
}

pub fn bucket_name_violation(bucket_name: &str) -> Option<String> {
    if bucket_name.len() > 63 || bucket_name.len() < 3 {
        return Some("Must be between 3 and 63 characters".into());
    }
    let valid_char_check = |c: char| -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'
    };
    if !bucket_name.chars().all(valid_char_check) {
        return Some("May only contain lowercase letters, numbers, dots, and dashes".into());
    }
    let first_ok = bucket_name.starts_with(|c: char| c.is_ascii_alphanumeric());
    let last_ok = bucket_name.ends_with(|c: char| c.is_ascii_alphanumeric());
    if !first_ok || !last_ok {
        return Some("First and last character must be either lowercase letter, or number".into());
    }
    if bucket_name.contains("..") {
        return Some("May not contain two consecutive dots".into());
    }
    None
}

/// deterministic, globally unique-ish physical bucket name:
/// `<domain slug>-<role>-<adler32 of domain and account>`.
/// the slug gets truncated so the whole name fits in 63 characters.
pub fn physical_bucket_name(domain_slug: &str, account_id: &str, role: &str) -> String {
    let hash = adler::adler32_slice(format!("{domain_slug}|{account_id}").as_bytes());
    let hash_str = format!("{:08x}", hash);
    let max_slug_len = 63 - role.len() - hash_str.len() - 2;
    let mut slug = domain_slug.to_string();
    slug.truncate(max_slug_len);
    let slug = slug.trim_end_matches('-');
    format!("{slug}-{role}-{hash_str}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    pub bucket: StrVal,
    pub policy_document: PolicyDocument,
}

impl CfnResource for BucketPolicy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::BucketPolicy
    }
}

pub fn bucket_objects_arn(bucket: &ResourceId) -> StrVal {
    StrVal::Join(vec![get_att(bucket, "Arn"), "/*".to_str_val()])
}

/// only the origin access identity may read objects from the content bucket.
pub fn origin_read_policy(bucket: &ResourceId, identity: &ResourceId) -> BucketPolicy {
    BucketPolicy {
        bucket: get_ref(bucket),
        policy_document: create_policy_doc(vec![Statement {
            sid: Some("AllowOriginAccessIdentityRead".into()),
            effect: Effect::Allow,
            principal: Some(Principal::CanonicalUser(get_att(identity, "S3CanonicalUserId"))),
            action: vec!["s3:GetObject".into()],
            resource: vec![bucket_objects_arn(bucket)],
            condition: None,
        }]),
    }
}

/// the logs bucket only accepts writes from the S3 log delivery service, on behalf of our own account.
pub fn log_delivery_policy(logs_bucket: &ResourceId, account_id: &str) -> BucketPolicy {
    BucketPolicy {
        bucket: get_ref(logs_bucket),
        policy_document: create_policy_doc(vec![Statement {
            sid: Some("AllowServerAccessLogDelivery".into()),
            effect: Effect::Allow,
            principal: Some(Principal::Service(S3_LOGGING_SERVICE.into())),
            action: vec!["s3:PutObject".into()],
            resource: vec![bucket_objects_arn(logs_bucket)],
            condition: Some(json!({ "StringEquals": { "aws:SourceAccount": account_id } })),
        }]),
    }
}
