//! Turns a [`RawSiteConfig`] into a [`SiteConfig`], or says exactly which field is wrong.
//! Pure: no I/O, no lookups against the provider. References like certificate ARNs
//! are only checked for shape.

use crate::config::*;
use crate::error::ValidationError;
use crate::regions::{self, EDGE_REGION};

pub const MAX_DOMAIN_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_ERROR_DOCUMENT_LEN: usize = 1024;
pub const MAX_STACK_NAME_LEN: usize = 128;
pub const MAX_LOG_RETENTION_DAYS: u32 = 3650;

/// treats `Some("")` the same as `None`.
fn non_empty(s: &Option<String>) -> Option<&str> {
    match s.as_deref() {
        Some("") | None => None,
        Some(s) => Some(s),
    }
}

pub fn validate(raw: &RawSiteConfig) -> Result<SiteConfig, ValidationError> {
    let domain_name = validate_domain_name(&raw.domain_name)?;
    let www_mode = non_empty(&raw.www_mode).map(validate_www_mode).transpose()?;
    if www_mode.is_some() && domain_name.www().len() > MAX_DOMAIN_LEN {
        return Err(ValidationError::InvalidDomainName {
            value: raw.domain_name.clone(),
            constraint: format!("Must be at most {} characters when www_mode is set, so that www.<domain> is a valid name", MAX_DOMAIN_LEN - 4),
        });
    }
    let certificate_ref = non_empty(&raw.certificate_ref).map(validate_certificate_ref).transpose()?;
    let origin_rewrite_ref = non_empty(&raw.origin_rewrite_ref).map(validate_origin_rewrite_ref).transpose()?;
    let error_document_path = non_empty(&raw.error_document_path).map(validate_error_document_path).transpose()?;
    let index_document = match non_empty(&raw.index_document) {
        Some(s) => IndexDocument::parse(s).map_err(|_| ValidationError::InvalidIndexDocument { value: s.to_string() })?,
        None => IndexDocument::default(),
    };
    let stack_name = match non_empty(&raw.stack_name) {
        Some(s) => validate_stack_name(s)?,
        None => default_stack_name(&domain_name),
    };
    let log_retention_days = match raw.log_retention_days {
        Some(days) if days == 0 || days > MAX_LOG_RETENTION_DAYS => {
            return Err(ValidationError::InvalidLogRetention { value: days });
        }
        other => other,
    };
    Ok(SiteConfig {
        domain_name,
        www_mode,
        certificate_ref,
        origin_rewrite_ref,
        error_document_path,
        index_document,
        stack_name,
        log_retention_days,
    })
}

pub fn validate_external_ids(ids: &ExternalIds) -> Result<(), ValidationError> {
    if let Some(constraint) = account_id_violation(&ids.account_id) {
        return Err(ValidationError::InvalidExternalId { field: "account_id", value: ids.account_id.clone(), constraint });
    }
    if let Some(constraint) = regions::region_violation(&ids.region) {
        return Err(ValidationError::InvalidExternalId { field: "region", value: ids.region.clone(), constraint });
    }
    Ok(())
}

fn account_id_violation(s: &str) -> Option<String> {
    if s.len() != 12 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Some("Must be exactly 12 digits".into());
    }
    None
}

fn label_violation(label: &str, is_tld: bool) -> Option<String> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Some(format!("Each label must be between 1 and {MAX_LABEL_LEN} characters"));
    }
    let valid_char_check = |c: char| -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
    };
    if !label.chars().all(valid_char_check) {
        return Some("May only contain lowercase letters, numbers, dots, and dashes".into());
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Some(format!("Label {label:?} may not start or end with a dash"));
    }
    if label.starts_with("xn--") {
        if !is_tld {
            return Some(format!("Label {label:?}: the xn-- prefix is only permitted on the top level domain"));
        }
        return None;
    }
    if is_tld && !label.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Some(format!("Top level domain {label:?} must start with a letter"));
    }
    None
}

fn domain_name_violation(s: &str) -> Option<String> {
    if s.is_empty() {
        return Some("Must provide a domain name".into());
    }
    if s.len() > MAX_DOMAIN_LEN {
        return Some(format!("Must be at most {MAX_DOMAIN_LEN} characters"));
    }
    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return Some("Must contain at least two labels, eg: example.com".into());
    }
    if labels[0] == "www" {
        return Some("Must not start with the www label. Use www_mode to serve www".into());
    }
    let last = labels.len() - 1;
    labels.iter().enumerate().find_map(|(i, label)| label_violation(label, i == last))
}

pub fn validate_domain_name(s: &str) -> Result<DomainName, ValidationError> {
    match domain_name_violation(s) {
        Some(constraint) => Err(ValidationError::InvalidDomainName { value: s.to_string(), constraint }),
        None => Ok(DomainName(s.to_string())),
    }
}

pub fn validate_www_mode(s: &str) -> Result<WwwMode, ValidationError> {
    match s {
        "HostName" => Ok(WwwMode::HostName),
        "Redirect" => Ok(WwwMode::Redirect),
        _ => Err(ValidationError::InvalidWwwMode { value: s.to_string() }),
    }
}

fn is_uuid_shaped(s: &str) -> bool {
    s.len() == 36 && s.char_indices().all(|(i, c)| match i {
        8 | 13 | 18 | 23 => c == '-',
        _ => c.is_ascii_digit() || ('a'..='f').contains(&c),
    })
}

fn certificate_ref_violation(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split(':').collect();
    let expected = "Must be an ACM certificate ARN, eg: arn:aws:acm:us-east-1:123456789012:certificate/<id>";
    if parts.len() != 6 || parts[0] != "arn" || parts[1] != "aws" || parts[2] != "acm" {
        return Some(expected.into());
    }
    if parts[3] != EDGE_REGION {
        return Some(format!("Certificate must be in {EDGE_REGION} to be used by CloudFront, found {:?}", parts[3]));
    }
    if account_id_violation(parts[4]).is_some() {
        return Some(format!("Account id {:?} must be exactly 12 digits", parts[4]));
    }
    match parts[5].strip_prefix("certificate/") {
        Some(id) if is_uuid_shaped(id) => None,
        _ => Some(expected.into()),
    }
}

pub fn validate_certificate_ref(s: &str) -> Result<CertificateRef, ValidationError> {
    match certificate_ref_violation(s) {
        Some(constraint) => Err(ValidationError::InvalidCertificateRef { value: s.to_string(), constraint }),
        None => Ok(CertificateRef(s.to_string())),
    }
}

fn origin_rewrite_ref_violation(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split(':').collect();
    let expected = "Must be a versioned Lambda function ARN, eg: arn:aws:lambda:us-east-1:123456789012:function:my-fn:3";
    if parts.len() != 8 || parts[0] != "arn" || parts[1] != "aws" || parts[2] != "lambda" || parts[5] != "function" {
        return Some(expected.into());
    }
    if parts[3] != EDGE_REGION {
        return Some(format!("Edge functions must be created in {EDGE_REGION}, found {:?}", parts[3]));
    }
    if account_id_violation(parts[4]).is_some() {
        return Some(format!("Account id {:?} must be exactly 12 digits", parts[4]));
    }
    let name = parts[6];
    let valid_name_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if name.is_empty() || name.len() > 64 || !name.chars().all(valid_name_char) {
        return Some(format!("Function name {name:?} must be 1 to 64 characters of [A-Za-z0-9-_]"));
    }
    let version = parts[7];
    let is_positive_int = !version.is_empty()
        && version.chars().all(|c| c.is_ascii_digit())
        && version.trim_start_matches('0') != "";
    if !is_positive_int {
        return Some(format!("Version {version:?} must be a published version number. $LATEST and aliases are mutable and not allowed"));
    }
    None
}

pub fn validate_origin_rewrite_ref(s: &str) -> Result<OriginRewriteRef, ValidationError> {
    match origin_rewrite_ref_violation(s) {
        Some(constraint) => Err(ValidationError::InvalidOriginRewriteRef { value: s.to_string(), constraint }),
        None => Ok(OriginRewriteRef(s.to_string())),
    }
}

fn error_document_path_violation(s: &str) -> Option<String> {
    if !s.starts_with('/') {
        return Some("Must be an absolute path starting with /".into());
    }
    if s.len() > MAX_ERROR_DOCUMENT_LEN {
        return Some(format!("Must be at most {MAX_ERROR_DOCUMENT_LEN} characters"));
    }
    if s.ends_with('/') {
        return Some("Must point at a document, not a directory".into());
    }
    let valid_char_check = |c: char| -> bool {
        c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
    };
    for segment in s[1..].split('/') {
        if segment.is_empty() {
            return Some("May not contain empty path segments".into());
        }
        if segment == "." || segment == ".." {
            return Some("May not contain . or .. segments".into());
        }
        if !segment.chars().all(valid_char_check) {
            return Some(format!("Segment {segment:?} may only contain [A-Za-z0-9._-]"));
        }
    }
    None
}

pub fn validate_error_document_path(s: &str) -> Result<ErrorDocumentPath, ValidationError> {
    match error_document_path_violation(s) {
        Some(constraint) => Err(ValidationError::InvalidErrorDocumentPath { value: s.to_string(), constraint }),
        None => Ok(ErrorDocumentPath(s.to_string())),
    }
}

// A stack name can contain only alphanumeric characters (case sensitive) and hyphens.
// It must start with an alphabetical character and can't be longer than 128 characters.
pub fn validate_stack_name(s: &str) -> Result<StackName, ValidationError> {
    let starts_alpha = s.starts_with(|c: char| c.is_ascii_alphabetic());
    let valid_chars = s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !starts_alpha || !valid_chars || s.len() > MAX_STACK_NAME_LEN {
        return Err(ValidationError::InvalidStackName { value: s.to_string() });
    }
    Ok(StackName(s.to_string()))
}

fn default_stack_name(domain: &DomainName) -> StackName {
    let mut stack_name = format!("site-{}", domain.slug());
    stack_name.truncate(MAX_STACK_NAME_LEN);
    StackName(stack_name.trim_end_matches('-').to_string())
}
