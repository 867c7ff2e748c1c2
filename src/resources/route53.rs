use serde::Serialize;

use super::*;

/// the fixed hosted zone id AWS uses for every CloudFront distribution alias target.
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneConfig {
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZone {
    pub name: String,
    pub hosted_zone_config: HostedZoneConfig,
}

impl CfnResource for HostedZone {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Zone
    }
}

pub fn hosted_zone(domain_name: &str) -> HostedZone {
    HostedZone {
        name: domain_name.to_string(),
        hosted_zone_config: HostedZoneConfig {
            comment: format!("static website {domain_name}"),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasTarget {
    #[serde(rename = "DNSName")]
    pub dns_name: StrVal,
    pub hosted_zone_id: String,
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordSet {
    pub hosted_zone_id: StrVal,
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub comment: String,
    pub alias_target: AliasTarget,
}

impl CfnResource for RecordSet {
    fn kind(&self) -> ResourceKind {
        ResourceKind::DnsRecord
    }
}

impl RecordSet {
    /// logical id of the distribution this record aliases.
    pub fn alias_distribution(&self) -> Option<&ResourceId> {
        match &self.alias_target.dns_name {
            StrVal::GetAtt(id, "DomainName") => Some(id),
            _ => None,
        }
    }
}

/// an A record in `zone` pointing `hostname` at the provider assigned hostname of `distribution`.
pub fn alias_record(zone: &ResourceId, hostname: &str, distribution: &ResourceId) -> RecordSet {
    RecordSet {
        hosted_zone_id: get_ref(zone),
        name: hostname.to_string(),
        record_type: "A".into(),
        comment: hostname.to_string(),
        alias_target: AliasTarget {
            dns_name: get_att(distribution, "DomainName"),
            hosted_zone_id: CLOUDFRONT_HOSTED_ZONE_ID.into(),
            evaluate_target_health: false,
        },
    }
}
