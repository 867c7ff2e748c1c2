use serde::Serialize;

use super::*;
use crate::topology::ERROR_STATUS_CODES;

/// caching optimized:
/// https://docs.aws.amazon.com/AmazonCloudFront/latest/DeveloperGuide/using-managed-cache-policies.html#managed-cache-caching-optimized
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";
pub const ORIGIN_REQUEST_EVENT: &str = "origin-request";
pub const MAX_EDGE_FUNCTIONS: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3OriginConfig {
    pub origin_access_identity: StrVal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomOriginConfig {
    pub origin_protocol_policy: String,
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    #[serde(rename = "HTTPSPort")]
    pub https_port: u16,
}

impl Default for CustomOriginConfig {
    fn default() -> Self {
        Self {
            origin_protocol_policy: "http-only".into(),
            http_port: 80,
            https_port: 443,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    pub id: String,
    pub domain_name: StrVal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_origin_config: Option<S3OriginConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_origin_config: Option<CustomOriginConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LambdaFunctionAssociation {
    pub event_type: String,
    #[serde(rename = "LambdaFunctionARN")]
    pub lambda_function_arn: String,
    pub include_body: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultCacheBehavior {
    pub target_origin_id: String,
    pub viewer_protocol_policy: String,
    pub cache_policy_id: String,
    pub compress: bool,
    pub allowed_methods: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lambda_function_associations: Vec<LambdaFunctionAssociation>,
}

impl DefaultCacheBehavior {
    pub fn new(target_origin_id: &str) -> Self {
        Self {
            target_origin_id: target_origin_id.to_string(),
            viewer_protocol_policy: "redirect-to-https".into(),
            cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.into(),
            compress: true,
            allowed_methods: vec!["GET".into(), "HEAD".into()],
            lambda_function_associations: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewerCertificate {
    pub acm_certificate_arn: String,
    pub minimum_protocol_version: String,
    pub ssl_support_method: String,
}

impl ViewerCertificate {
    pub fn sni(acm_certificate_arn: &str) -> Self {
        Self {
            acm_certificate_arn: acm_certificate_arn.to_string(),
            minimum_protocol_version: "TLSv1.2_2021".into(),
            ssl_support_method: "sni-only".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    pub comment: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_root_object: Option<String>,
    pub http_version: String,
    #[serde(rename = "IPV6Enabled")]
    pub ipv6_enabled: bool,
    pub price_class: String,
    pub origins: Vec<Origin>,
    pub default_cache_behavior: DefaultCacheBehavior,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_error_responses: Vec<CustomErrorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_certificate: Option<ViewerCertificate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distribution {
    pub distribution_config: DistributionConfig,
}

impl CfnResource for Distribution {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Cdn
    }

    fn validate(&self, id: &ResourceId) -> Result<(), GraphConsistencyError> {
        let conf = &self.distribution_config;
        if !conf.aliases.is_empty() && conf.viewer_certificate.is_none() {
            return Err(GraphConsistencyError::AliasWithoutCertificate(id.to_string()));
        }
        let count = conf.custom_error_responses.len();
        if count > ERROR_STATUS_CODES.len() {
            return Err(GraphConsistencyError::TooManyErrorResponses {
                id: id.to_string(),
                count,
                max: ERROR_STATUS_CODES.len(),
            });
        }
        let count = conf.default_cache_behavior.lambda_function_associations.len();
        if count > MAX_EDGE_FUNCTIONS {
            return Err(GraphConsistencyError::TooManyEdgeFunctions { id: id.to_string(), count });
        }
        Ok(())
    }
}

impl Distribution {
    pub fn aliases(&self) -> &[String] {
        &self.distribution_config.aliases
    }

    pub fn has_certificate(&self) -> bool {
        self.distribution_config.viewer_certificate.is_some()
    }

    pub fn custom_error_responses(&self) -> &[CustomErrorResponse] {
        &self.distribution_config.custom_error_responses
    }

    pub fn edge_functions(&self) -> &[LambdaFunctionAssociation] {
        &self.distribution_config.default_cache_behavior.lambda_function_associations
    }

    /// binds the certificate and the custom hostnames together.
    /// with no certificate, aliases are dropped so a hostname is never served without TLS.
    pub fn with_tls(mut self, certificate_arn: Option<&str>, aliases: &[String]) -> Self {
        if let Some(arn) = certificate_arn {
            self.distribution_config.viewer_certificate = Some(ViewerCertificate::sni(arn));
            self.distribution_config.aliases = aliases.to_vec();
        } else {
            self.distribution_config.viewer_certificate = None;
            self.distribution_config.aliases = vec![];
        }
        self
    }

    /// runs the function whenever the distribution forwards a request to the origin (cache misses).
    pub fn with_origin_request_function(mut self, function_arn: &str) -> Self {
        self.distribution_config.default_cache_behavior.lambda_function_associations = vec![LambdaFunctionAssociation {
            event_type: ORIGIN_REQUEST_EVENT.into(),
            lambda_function_arn: function_arn.to_string(),
            include_body: false,
        }];
        self
    }

    /// every status code in [`ERROR_STATUS_CODES`] serves `page_path` and keeps its own status.
    pub fn with_error_document(mut self, page_path: &str) -> Self {
        self.distribution_config.custom_error_responses = ERROR_STATUS_CODES
            .iter()
            .map(|code| CustomErrorResponse {
                error_code: *code,
                response_code: *code,
                response_page_path: page_path.to_string(),
            })
            .collect();
        self
    }
}

fn distribution(comment: String, origin: Origin, default_root_object: Option<String>) -> Distribution {
    let default_cache_behavior = DefaultCacheBehavior::new(&origin.id);
    Distribution {
        distribution_config: DistributionConfig {
            comment,
            enabled: true,
            aliases: vec![],
            default_root_object,
            http_version: "http2".into(),
            ipv6_enabled: true,
            price_class: "PriceClass_All".into(),
            origins: vec![origin],
            default_cache_behavior,
            custom_error_responses: vec![],
            viewer_certificate: None,
        },
    }
}

/// serves the private content bucket, read through the origin access identity.
pub fn s3_content_distribution(
    hostname: &str,
    content_bucket: &ResourceId,
    identity: &ResourceId,
    index_document: &str,
) -> Distribution {
    let origin = Origin {
        id: "content".into(),
        domain_name: get_att(content_bucket, "RegionalDomainName"),
        s3_origin_config: Some(S3OriginConfig {
            origin_access_identity: StrVal::Join(vec![
                "origin-access-identity/cloudfront/".to_str_val(),
                get_ref(identity),
            ]),
        }),
        custom_origin_config: None,
    };
    distribution(format!("content for {hostname}"), origin, Some(index_document.to_string()))
}

/// the S3 website endpoint only speaks http, so the origin is http-only.
/// the origin host is pulled out of the bucket's WebsiteURL.
pub fn s3_website_distribution(hostname: &str, website_bucket: &ResourceId) -> Distribution {
    let origin = Origin {
        id: "redirect".into(),
        domain_name: select_s3website_url(website_bucket),
        s3_origin_config: None,
        custom_origin_config: Some(CustomOriginConfig::default()),
    };
    distribution(format!("redirect for {hostname}"), origin, None)
}

/// { "Fn::Select" : [ "2", { "Fn::Split": ["/", { "Fn::GetAtt": [bucket, "WebsiteURL"] }] } ] }
pub fn select_s3website_url(bucket: &ResourceId) -> StrVal {
    StrVal::HostOf(Box::new(get_att(bucket, "WebsiteURL")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT: &str = "arn:aws:acm:us-east-1:123456789012:certificate/0d3a7b1c-1234-4cde-8f90-abcdef012345";

    fn ids() -> (ResourceId, ResourceId) {
        (ResourceId::new("ContentBucket").unwrap(), ResourceId::new("OriginAccessIdentity").unwrap())
    }

    #[test]
    fn aliases_require_certificate() {
        let (bucket, oai) = ids();
        let id = ResourceId::new("ContentDistribution").unwrap();
        let aliases = vec!["example.com".to_string()];
        let with = s3_content_distribution("example.com", &bucket, &oai, "index.html").with_tls(Some(CERT), &aliases);
        assert_eq!(with.aliases(), aliases.as_slice());
        assert!(with.has_certificate());
        assert!(with.validate(&id).is_ok());

        let without = with.clone().with_tls(None, &aliases);
        assert!(without.aliases().is_empty());
        assert!(!without.has_certificate());

        let mut broken = without;
        broken.distribution_config.aliases = aliases;
        assert_eq!(broken.validate(&id), Err(GraphConsistencyError::AliasWithoutCertificate("ContentDistribution".into())));
    }

    #[test]
    fn error_document_maps_every_code_to_itself() {
        let (bucket, oai) = ids();
        let cdn = s3_content_distribution("example.com", &bucket, &oai, "index.html").with_error_document("/error.html");
        let responses = cdn.custom_error_responses();
        assert_eq!(responses.len(), 11);
        for (response, code) in responses.iter().zip(ERROR_STATUS_CODES) {
            assert_eq!(response.error_code, code);
            assert_eq!(response.response_code, code);
            assert_eq!(response.response_page_path, "/error.html");
        }
    }

    #[test]
    fn origin_request_function_is_attached_to_default_behavior() {
        let (bucket, oai) = ids();
        let arn = "arn:aws:lambda:us-east-1:123456789012:function:rewrite:3";
        let cdn = s3_content_distribution("example.com", &bucket, &oai, "index.html").with_origin_request_function(arn);
        let value = serde_json::to_value(&cdn).unwrap();
        assert_eq!(
            value["DistributionConfig"]["DefaultCacheBehavior"]["LambdaFunctionAssociations"],
            json!([{ "EventType": "origin-request", "LambdaFunctionARN": arn, "IncludeBody": false }])
        );
        assert_eq!(value["DistributionConfig"]["DefaultRootObject"], "index.html");
        assert_eq!(value["DistributionConfig"]["Origins"][0]["S3OriginConfig"], json!({
            "OriginAccessIdentity": { "Fn::Join": ["", ["origin-access-identity/cloudfront/", { "Ref": "OriginAccessIdentity" }]] }
        }));
    }

    #[test]
    fn website_distribution_uses_http_origin() {
        let bucket = ResourceId::new("RedirectBucket").unwrap();
        let cdn = s3_website_distribution("www.example.com", &bucket);
        let value = serde_json::to_value(&cdn).unwrap();
        let origin = &value["DistributionConfig"]["Origins"][0];
        assert_eq!(origin["CustomOriginConfig"]["OriginProtocolPolicy"], "http-only");
        assert_eq!(origin["CustomOriginConfig"]["HTTPPort"], 80);
        assert_eq!(origin["DomainName"], json!({
            "Fn::Select": ["2", { "Fn::Split": ["/", { "Fn::GetAtt": ["RedirectBucket", "WebsiteURL"] }] }]
        }));
        assert!(value["DistributionConfig"].get("DefaultRootObject").is_none());
        assert!(value["DistributionConfig"].get("Aliases").is_none());
    }
}
