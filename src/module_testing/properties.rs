#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::validation::{validate, validate_domain_name};
    use crate::{plan, ExternalIds, RawSiteConfig, ValidationError};

    fn label() -> impl Strategy<Value = String> {
        "[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?"
    }

    fn domain() -> impl Strategy<Value = String> {
        (prop::collection::vec(label(), 1..4), "[a-z]{2,10}")
            .prop_filter("must not start with www", |(labels, _)| labels[0] != "www")
            .prop_filter("xn-- is only allowed on the tld", |(labels, _)| labels.iter().all(|l| !l.starts_with("xn--")))
            .prop_map(|(labels, tld)| format!("{}.{}", labels.join("."), tld))
    }

    proptest! {
        #[test]
        fn valid_domains_are_accepted(d in domain()) {
            let parsed = validate_domain_name(&d);
            prop_assert!(parsed.is_ok(), "{d} rejected: {parsed:?}");
            let parsed = parsed.unwrap();
            prop_assert_eq!(parsed.as_str(), d.as_str());
        }

        #[test]
        fn www_prefixed_domains_are_rejected(d in domain()) {
            let www = format!("www.{d}");
            let is_invalid_domain = matches!(validate_domain_name(&www), Err(ValidationError::InvalidDomainName { .. }));
            prop_assert!(is_invalid_domain);
        }

        #[test]
        fn invalid_characters_are_rejected(d in domain(), bad in "[A-Z_!@ /]") {
            let broken = format!("{bad}{d}");
            let is_invalid_domain = matches!(validate_domain_name(&broken), Err(ValidationError::InvalidDomainName { .. }));
            prop_assert!(is_invalid_domain);
        }

        #[test]
        fn planning_is_deterministic(
            d in domain(),
            www in prop::option::of(prop_oneof![Just("HostName"), Just("Redirect")]),
            error_page in any::<bool>(),
            account in "[0-9]{12}",
        ) {
            let raw = RawSiteConfig {
                domain_name: d,
                www_mode: www.map(Into::into),
                error_document_path: error_page.then(|| "/error.html".to_string()),
                ..Default::default()
            };
            let ids = ExternalIds::new(account, "us-east-1");
            let first = plan(&raw, &ids).unwrap();
            let second = plan(&raw, &ids).unwrap();
            prop_assert_eq!(first.graph.to_json_pretty().unwrap(), second.graph.to_json_pretty().unwrap());
            prop_assert_eq!(first.render().unwrap(), second.render().unwrap());
            prop_assert_eq!(first.topology.has_www, www.is_some());
            prop_assert_eq!(validate(&raw).unwrap(), first.config);
        }
    }
}
