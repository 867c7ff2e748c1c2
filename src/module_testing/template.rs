#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::{plan, ExternalIds, RawSiteConfig};

    const CERT: &str = "arn:aws:acm:us-east-1:123456789012:certificate/0d3a7b1c-1234-4cde-8f90-abcdef012345";

    fn rendered(raw: &RawSiteConfig) -> Value {
        let plan = plan(raw, &ExternalIds::new("123456789012", "us-east-1")).unwrap();
        let stack = plan.render().unwrap();
        let mut value: Value = serde_json::from_str(&stack.to_json_pretty().unwrap()).unwrap();
        value["template"][plan.config.stack_name.as_str()].take()
    }

    #[test]
    fn full_site_template_shape() {
        let template = rendered(&RawSiteConfig {
            domain_name: "example.com".into(),
            www_mode: Some("HostName".into()),
            certificate_ref: Some(CERT.into()),
            stack_name: Some("my-site".into()),
            ..Default::default()
        });
        let resources = template["Resources"].as_object().unwrap();
        let mut types: Vec<(&str, &str)> = resources.iter()
            .map(|(k, v)| (k.as_str(), v["Type"].as_str().unwrap()))
            .collect();
        types.sort();
        assert_eq!(types, vec![
            ("CanonicalRecord", "AWS::Route53::RecordSet"),
            ("ContentBucket", "AWS::S3::Bucket"),
            ("ContentBucketPolicy", "AWS::S3::BucketPolicy"),
            ("ContentDistribution", "AWS::CloudFront::Distribution"),
            ("DeployUser", "AWS::IAM::User"),
            ("HostedZone", "AWS::Route53::HostedZone"),
            ("LogsBucket", "AWS::S3::Bucket"),
            ("LogsBucketPolicy", "AWS::S3::BucketPolicy"),
            ("OriginAccessIdentity", "AWS::CloudFront::CloudFrontOriginAccessIdentity"),
            ("RedirectBucket", "AWS::S3::Bucket"),
            ("RedirectDistribution", "AWS::CloudFront::Distribution"),
            ("WwwRecord", "AWS::Route53::RecordSet"),
        ]);
        assert_eq!(resources["ContentBucket"]["DependsOn"], json!(["LogsBucketPolicy"]));
        assert_eq!(resources["RedirectBucket"]["DependsOn"], json!(["LogsBucketPolicy"]));
        assert!(resources["ContentDistribution"].get("DependsOn").is_none());

        let viewer_cert = &resources["ContentDistribution"]["Properties"]["DistributionConfig"]["ViewerCertificate"];
        assert_eq!(viewer_cert, &json!({
            "AcmCertificateArn": CERT,
            "MinimumProtocolVersion": "TLSv1.2_2021",
            "SslSupportMethod": "sni-only",
        }));

        let outputs: Vec<&String> = template["Outputs"].as_object().unwrap().keys().collect();
        assert_eq!(outputs, vec![
            "ContentBucketName",
            "ContentDistributionDomainName",
            "ContentDistributionId",
            "DeployUserName",
            "NameServers",
            "RedirectDistributionId",
            "WebsiteURL",
        ]);
        assert_eq!(template["Description"], "static website stack my-site");
    }

    #[test]
    fn no_certificate_means_no_viewer_certificate_or_aliases() {
        let template = rendered(&RawSiteConfig {
            domain_name: "example.com".into(),
            www_mode: Some("Redirect".into()),
            ..Default::default()
        });
        for id in ["ContentDistribution", "RedirectDistribution"] {
            let conf = &template["Resources"][id]["Properties"]["DistributionConfig"];
            assert!(conf.get("ViewerCertificate").is_none(), "{id}");
            assert!(conf.get("Aliases").is_none(), "{id}");
        }
    }
}
