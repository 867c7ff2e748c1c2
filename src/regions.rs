//! Regions a site can be planned into.
//!
//! Only the commercial `aws` partition: the ARNs the planner writes (deploy user
//! policy, certificate and function refs) all start with `arn:aws:`, which the
//! China and GovCloud partitions do not accept.

pub const PLANNABLE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-north-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-south-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-east-1",
    "sa-east-1",
    "me-south-1",
    "af-south-1",
];

/// CloudFront only accepts certificates and edge functions from this region,
/// regardless of where the rest of the stack lives.
pub const EDGE_REGION: &str = "us-east-1";

pub fn region_violation(region: &str) -> Option<String> {
    if PLANNABLE_REGIONS.contains(&region) {
        return None;
    }
    let partition_hint = if region.starts_with("cn-") || region.starts_with("us-gov-") {
        " (only the commercial aws partition is supported)"
    } else {
        ""
    };
    Some(format!("Unknown region {region:?}{partition_hint}\nMust be one of {PLANNABLE_REGIONS:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commercial_regions_only() {
        assert_eq!(region_violation("us-east-1"), None);
        assert_eq!(region_violation("eu-central-1"), None);
        assert_eq!(region_violation(EDGE_REGION), None);
        assert!(region_violation("us-east-9").unwrap().contains("Must be one of"));
        assert!(region_violation("cn-north-1").unwrap().contains("commercial aws partition"));
        assert!(region_violation("us-gov-west-1").unwrap().contains("commercial aws partition"));
    }
}
