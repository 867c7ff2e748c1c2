//! The complete set of resources for one static website.
//!
//! Which resources exist, and how they point at each other, is decided by the
//! [`Topology`]. Everything else comes from the validated config and the
//! external ids, so the same inputs always produce the same graph.

use super::*;
use crate::config::{ExternalIds, SiteConfig};
use crate::graph::{AliasBinding, GraphBuilder, HostRole, ResourceGraph};
use crate::topology::{HostRoles, RedirectTarget, Topology};

pub const HOSTED_ZONE_ID: &str = "HostedZone";
pub const LOGS_BUCKET_ID: &str = "LogsBucket";
pub const LOGS_BUCKET_POLICY_ID: &str = "LogsBucketPolicy";
pub const ORIGIN_ACCESS_IDENTITY_ID: &str = "OriginAccessIdentity";
pub const CONTENT_BUCKET_ID: &str = "ContentBucket";
pub const CONTENT_BUCKET_POLICY_ID: &str = "ContentBucketPolicy";
pub const CONTENT_DISTRIBUTION_ID: &str = "ContentDistribution";
pub const REDIRECT_BUCKET_ID: &str = "RedirectBucket";
pub const REDIRECT_DISTRIBUTION_ID: &str = "RedirectDistribution";
/// the record for the bare domain.
pub const CANONICAL_RECORD_ID: &str = "CanonicalRecord";
/// the record for `www.<domain>`. only exists with www handling.
pub const WWW_RECORD_ID: &str = "WwwRecord";
pub const DEPLOY_USER_ID: &str = "DeployUser";

pub const CONTENT_LOG_PREFIX: &str = "content/";
pub const REDIRECT_LOG_PREFIX: &str = "redirect/";

pub fn build(topology: &Topology, config: &SiteConfig, ids: &ExternalIds) -> Result<ResourceGraph, GraphConsistencyError> {
    let roles = HostRoles::new(config, topology);
    let domain = config.domain_name.as_str();
    let slug = config.domain_name.slug();
    let account = ids.account_id.as_str();
    let certificate = config.certificate_ref.as_ref().map(|c| c.as_str());
    let mut builder = GraphBuilder::new();

    let zone = builder.add(HOSTED_ZONE_ID, hosted_zone(domain))?;

    // logs
    let mut logs_bucket = Bucket::private(physical_bucket_name(&slug, account, LOGS_ROLE));
    if let Some(days) = config.log_retention_days {
        logs_bucket = logs_bucket.expire_after_days(days);
    }
    let logs = builder.add(LOGS_BUCKET_ID, logs_bucket)?;
    let logs_policy = builder.add(LOGS_BUCKET_POLICY_ID, log_delivery_policy(&logs, account))?;

    // content
    let identity = builder.add(ORIGIN_ACCESS_IDENTITY_ID, origin_access_identity(domain))?;
    let content_bucket = Bucket::private(physical_bucket_name(&slug, account, CONTENT_ROLE))
        .with_access_logs(&logs, CONTENT_LOG_PREFIX);
    // S3 checks the logs bucket accepts deliveries when logging is turned on
    let content = builder.add_with_deps(CONTENT_BUCKET_ID, content_bucket, &[&logs_policy])?;
    builder.add(CONTENT_BUCKET_POLICY_ID, origin_read_policy(&content, &identity))?;

    let mut content_cdn = s3_content_distribution(&roles.content_hostname, &content, &identity, config.index_document.as_str())
        .with_tls(certificate, &roles.content_aliases);
    if let Some(function) = &config.origin_rewrite_ref {
        content_cdn = content_cdn.with_origin_request_function(function.as_str());
    }
    if let Some(path) = &config.error_document_path {
        content_cdn = content_cdn.with_error_document(path.as_str());
    }
    let content_cdn = builder.add(CONTENT_DISTRIBUTION_ID, content_cdn)?;

    // redirect
    let redirect_cdn = match (&roles.redirect_hostname, &roles.redirect_target) {
        (Some(hostname), Some(target)) => {
            let target = match target {
                RedirectTarget::Hostname(h) => h.to_str_val(),
                RedirectTarget::ContentCdnDefaultHostname => get_att(&content_cdn, "DomainName"),
            };
            let redirect_bucket = Bucket::private(physical_bucket_name(&slug, account, REDIRECT_ROLE))
                .with_access_logs(&logs, REDIRECT_LOG_PREFIX)
                .redirect_all_to(target);
            let redirect = builder.add_with_deps(REDIRECT_BUCKET_ID, redirect_bucket, &[&logs_policy])?;
            let cdn = s3_website_distribution(hostname, &redirect).with_tls(certificate, &roles.redirect_aliases);
            Some((hostname.as_str(), builder.add(REDIRECT_DISTRIBUTION_ID, cdn)?))
        }
        _ => None,
    };

    // dns. each hostname resolves to the distribution playing its role
    let www = config.domain_name.www();
    let mut hostnames = vec![(roles.content_hostname.as_str(), HostRole::Content, &content_cdn, !roles.content_aliases.is_empty())];
    if let Some((hostname, cdn)) = &redirect_cdn {
        hostnames.push((*hostname, HostRole::Redirect, cdn, !roles.redirect_aliases.is_empty()));
    }
    hostnames.sort_by_key(|(hostname, ..)| *hostname == www);
    for (hostname, role, cdn, tls_alias) in hostnames {
        let record_id = if hostname == www { WWW_RECORD_ID } else { CANONICAL_RECORD_ID };
        let record = builder.add(record_id, alias_record(&zone, hostname, cdn))?;
        builder.bind(AliasBinding {
            hostname: hostname.to_string(),
            role,
            distribution: cdn.clone(),
            record,
            tls_alias,
        });
    }

    let user = builder.add(DEPLOY_USER_ID, deploy_user(&content, &content_cdn, account))?;

    builder.output("ContentBucketName", "bucket the site content gets uploaded to", get_ref(&content));
    builder.output("ContentDistributionId", "distribution to invalidate after an upload", get_ref(&content_cdn));
    builder.output(
        "ContentDistributionDomainName",
        "provider assigned hostname of the content distribution",
        get_att(&content_cdn, "DomainName"),
    );
    if let Some((_, cdn)) = &redirect_cdn {
        builder.output("RedirectDistributionId", "distribution that redirects to the canonical hostname", get_ref(cdn));
    }
    builder.output(
        "NameServers",
        "delegate the domain to these name servers",
        StrVal::JoinList(",", Box::new(get_att(&zone, "NameServers"))),
    );
    builder.output("DeployUserName", "user allowed to publish the site", get_ref(&user));
    let website_url = if topology.has_certificate {
        format!("https://{}", roles.content_hostname).to_str_val()
    } else {
        StrVal::Join(vec!["https://".to_str_val(), get_att(&content_cdn, "DomainName")])
    };
    builder.output("WebsiteURL", "where the site is served", website_url);

    builder.finish()
}
