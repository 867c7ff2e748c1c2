#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::resources::*;
    use crate::graph::HostRole;
    use crate::topology::ERROR_STATUS_CODES;
    use crate::{plan, ExternalIds, Plan, RawSiteConfig};

    const CERT: &str = "arn:aws:acm:us-east-1:123456789012:certificate/0d3a7b1c-1234-4cde-8f90-abcdef012345";
    const REWRITE: &str = "arn:aws:lambda:us-east-1:123456789012:function:index-rewrite:7";

    fn ids() -> ExternalIds {
        ExternalIds::new("123456789012", "eu-central-1")
    }

    fn site(www_mode: Option<&str>, cert: bool) -> RawSiteConfig {
        RawSiteConfig {
            domain_name: "example.com".into(),
            www_mode: www_mode.map(Into::into),
            certificate_ref: cert.then(|| CERT.to_string()),
            ..Default::default()
        }
    }

    fn planned(raw: &RawSiteConfig) -> Plan {
        plan(raw, &ids()).unwrap()
    }

    fn cdns(plan: &Plan) -> Vec<&Distribution> {
        plan.graph.of_kind(ResourceKind::Cdn).filter_map(|r| r.properties.as_cdn()).collect()
    }

    fn record_target(plan: &Plan, record: &str) -> String {
        plan.graph.get(record).unwrap().properties.as_record().unwrap().alias_distribution().unwrap().to_string()
    }

    fn redirect_target(plan: &Plan) -> serde_json::Value {
        let bucket = plan.graph.get(REDIRECT_BUCKET_ID).unwrap().properties.as_bucket().unwrap();
        bucket.website_configuration.as_ref().unwrap().redirect_all_requests_to.host_name.to_value()
    }

    #[test]
    fn no_www_means_one_cdn_and_no_redirect_bucket() {
        for cert in [false, true] {
            let plan = planned(&site(None, cert));
            assert!(!plan.topology.has_www);
            assert_eq!(cdns(&plan).len(), 1);
            assert!(!plan.graph.contains(REDIRECT_BUCKET_ID));
            assert!(!plan.graph.contains(REDIRECT_DISTRIBUTION_ID));
            assert!(!plan.graph.contains(WWW_RECORD_ID));
            assert_eq!(record_target(&plan, CANONICAL_RECORD_ID), CONTENT_DISTRIBUTION_ID);
            let buckets: Vec<&str> = plan.graph.of_kind(ResourceKind::Bucket).map(|r| r.id.as_str()).collect();
            assert_eq!(buckets, vec![LOGS_BUCKET_ID, CONTENT_BUCKET_ID]);
        }
    }

    #[test]
    fn hostname_mode_with_certificate() {
        let plan = planned(&site(Some("HostName"), true));
        let content = plan.graph.distribution(CONTENT_DISTRIBUTION_ID).unwrap();
        assert_eq!(content.aliases(), &["www.example.com".to_string()]);
        assert!(content.has_certificate());
        let redirect = plan.graph.distribution(REDIRECT_DISTRIBUTION_ID).unwrap();
        assert_eq!(redirect.aliases(), &["example.com".to_string()]);
        assert!(redirect.has_certificate());

        assert_eq!(record_target(&plan, CANONICAL_RECORD_ID), REDIRECT_DISTRIBUTION_ID);
        assert_eq!(record_target(&plan, WWW_RECORD_ID), CONTENT_DISTRIBUTION_ID);
        assert_eq!(redirect_target(&plan), json!("www.example.com"));
        assert_eq!(
            plan.graph.outputs()["WebsiteURL"].value.to_value(),
            json!("https://www.example.com")
        );
    }

    #[test]
    fn redirect_mode_without_certificate() {
        let plan = planned(&site(Some("Redirect"), false));
        for cdn in cdns(&plan) {
            assert!(cdn.aliases().is_empty());
            assert!(!cdn.has_certificate());
        }
        assert_eq!(
            redirect_target(&plan),
            json!({ "Fn::GetAtt": ["ContentDistribution", "DomainName"] })
        );
        assert_eq!(record_target(&plan, CANONICAL_RECORD_ID), CONTENT_DISTRIBUTION_ID);
        assert_eq!(record_target(&plan, WWW_RECORD_ID), REDIRECT_DISTRIBUTION_ID);
        // the redirect bucket points at the content distribution, so it has to come after it
        let order: Vec<&str> = plan.graph.creation_order().iter().map(|id| id.as_str()).collect();
        let position = |id: &str| order.iter().position(|o| *o == id).unwrap();
        assert!(position(CONTENT_DISTRIBUTION_ID) < position(REDIRECT_BUCKET_ID));
    }

    #[test]
    fn www_mode_binds_each_hostname_to_a_different_cdn() {
        for (mode, content_host, redirect_host) in [
            ("HostName", "www.example.com", "example.com"),
            ("Redirect", "example.com", "www.example.com"),
        ] {
            let plan = planned(&site(Some(mode), true));
            let bindings = plan.graph.aliases();
            assert_eq!(bindings.len(), 2);
            assert_ne!(bindings[0].distribution, bindings[1].distribution);
            let content = plan.graph.binding_for(content_host).unwrap();
            assert_eq!(content.role, HostRole::Content);
            assert_eq!(content.distribution.as_str(), CONTENT_DISTRIBUTION_ID);
            let redirect = plan.graph.binding_for(redirect_host).unwrap();
            assert_eq!(redirect.role, HostRole::Redirect);
            assert_eq!(redirect.distribution.as_str(), REDIRECT_DISTRIBUTION_ID);
        }
    }

    #[test]
    fn error_document_maps_exactly_eleven_codes() {
        let raw = RawSiteConfig { error_document_path: Some("/error.html".into()), ..site(Some("HostName"), true) };
        let plan = planned(&raw);
        let content = plan.graph.distribution(CONTENT_DISTRIBUTION_ID).unwrap();
        let responses = content.custom_error_responses();
        assert_eq!(responses.len(), 11);
        let codes: Vec<u16> = responses.iter().map(|r| r.error_code).collect();
        assert_eq!(codes, ERROR_STATUS_CODES.to_vec());
        assert!(responses.iter().all(|r| r.response_code == r.error_code && r.response_page_path == "/error.html"));
        // only the content distribution serves the error page
        assert!(plan.graph.distribution(REDIRECT_DISTRIBUTION_ID).unwrap().custom_error_responses().is_empty());

        let plan = planned(&site(None, false));
        assert!(plan.graph.distribution(CONTENT_DISTRIBUTION_ID).unwrap().custom_error_responses().is_empty());
    }

    #[test]
    fn origin_rewrite_attaches_to_content_cdn_only() {
        let raw = RawSiteConfig { origin_rewrite_ref: Some(REWRITE.into()), ..site(Some("Redirect"), false) };
        let plan = planned(&raw);
        let functions = plan.graph.distribution(CONTENT_DISTRIBUTION_ID).unwrap().edge_functions();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].event_type, "origin-request");
        assert_eq!(functions[0].lambda_function_arn, REWRITE);
        assert!(plan.graph.distribution(REDIRECT_DISTRIBUTION_ID).unwrap().edge_functions().is_empty());
    }

    #[test]
    fn every_dependency_is_created_first() {
        let raw = RawSiteConfig {
            error_document_path: Some("/404.html".into()),
            origin_rewrite_ref: Some(REWRITE.into()),
            log_retention_days: Some(30),
            ..site(Some("HostName"), false)
        };
        let plan = planned(&raw);
        let order = plan.graph.creation_order();
        for resource in plan.graph.resources() {
            let me = order.iter().position(|id| *id == &resource.id).unwrap();
            for dep in resource.depends_on.iter() {
                let them = order.iter().position(|id| *id == dep).unwrap();
                assert!(them < me, "{dep} must be created before {}", resource.id);
            }
        }
        let mut teardown = plan.graph.teardown_order();
        teardown.reverse();
        assert_eq!(teardown, order);
    }

    #[test]
    fn deploy_user_is_least_privilege() {
        let plan = planned(&site(Some("HostName"), true));
        let user = plan.graph.get(DEPLOY_USER_ID).unwrap();
        let referenced: Vec<&str> = user.depends_on.iter().map(|d| d.as_str()).collect();
        assert_eq!(referenced, vec![CONTENT_BUCKET_ID, CONTENT_DISTRIBUTION_ID]);
        let policies = &user.properties.as_user().unwrap().policies;
        assert_eq!(policies.len(), 1);
        assert!(policies[0].policy_document.statement.iter().all(|s| s.effect == Effect::Allow && s.principal.is_none()));
    }

    #[test]
    fn bucket_policies_grant_single_principals() {
        let plan = planned(&site(Some("Redirect"), true));
        let policy = |id: &str| plan.graph.get(id).unwrap().properties.as_bucket_policy().unwrap().clone();

        let content = policy(CONTENT_BUCKET_POLICY_ID);
        assert_eq!(content.bucket.to_value(), json!({ "Ref": "ContentBucket" }));
        assert_eq!(content.policy_document.statement.len(), 1);
        assert!(matches!(content.policy_document.statement[0].principal, Some(Principal::CanonicalUser(_))));

        let logs = policy(LOGS_BUCKET_POLICY_ID);
        assert_eq!(logs.bucket.to_value(), json!({ "Ref": "LogsBucket" }));
        assert_eq!(logs.policy_document.statement[0].principal, Some(Principal::Service(S3_LOGGING_SERVICE.into())));
        assert_eq!(
            logs.policy_document.statement[0].condition,
            Some(json!({ "StringEquals": { "aws:SourceAccount": "123456789012" } }))
        );
        // the redirect bucket serves no objects, so it gets no policy
        assert_eq!(plan.graph.of_kind(ResourceKind::BucketPolicy).count(), 2);
    }

    #[test]
    fn planning_is_idempotent() {
        let raw = RawSiteConfig {
            error_document_path: Some("/error.html".into()),
            origin_rewrite_ref: Some(REWRITE.into()),
            ..site(Some("HostName"), true)
        };
        let first = planned(&raw);
        let second = planned(&raw);
        assert_eq!(first, second);
        assert_eq!(first.graph.to_json_pretty().unwrap(), second.graph.to_json_pretty().unwrap());
        assert_eq!(first.render().unwrap().to_json().unwrap(), second.render().unwrap().to_json().unwrap());
    }

    #[test]
    fn different_accounts_get_different_bucket_names() {
        let raw = site(None, false);
        let a = planned(&raw);
        let b = plan(&raw, &ExternalIds::new("210987654321", "eu-central-1")).unwrap();
        let name = |p: &Plan| p.graph.get(CONTENT_BUCKET_ID).unwrap().properties.as_bucket().unwrap().bucket_name.clone();
        assert_ne!(name(&a), name(&b));
        assert!(name(&a).starts_with("example-com-content-"));
    }
}
