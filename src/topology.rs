//! Decides which optional pieces of the website exist and which hostname plays which role.
//!
//! Everything here is a pure function of a validated [`SiteConfig`]. The resolver cannot fail:
//! any combination that passed validation has exactly one topology.

use serde::Serialize;

use crate::config::{SiteConfig, WwwMode};

/// status codes that get mapped to the error document when one is configured.
/// each one keeps its own status code in the response.
pub const ERROR_STATUS_CODES: [u16; 11] = [400, 403, 404, 405, 414, 416, 500, 501, 502, 503, 504];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Topology {
    /// a www mode was given, so a redirect bucket and distribution exist.
    pub has_www: bool,
    /// `www.<domain>` serves content and the bare domain redirects.
    pub www_is_hostname: bool,
    pub has_certificate: bool,
    pub has_origin_rewrite: bool,
    pub has_error_document: bool,
}

pub fn resolve(config: &SiteConfig) -> Topology {
    let topology = Topology {
        has_www: config.www_mode.is_some(),
        www_is_hostname: config.www_mode == Some(WwwMode::HostName),
        has_certificate: config.certificate_ref.is_some(),
        has_origin_rewrite: config.origin_rewrite_ref.is_some(),
        has_error_document: config.error_document_path.is_some(),
    };
    tracing::debug!(?topology, domain = %config.domain_name, "resolved topology");
    topology
}

/// where the redirect bucket sends every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum RedirectTarget {
    /// the custom hostname serving content. only used when a certificate covers it.
    Hostname(String),
    /// the provider assigned hostname of the content distribution, eg: `d111111abcdef8.cloudfront.net`.
    /// used when there is no certificate, since no custom hostname can be served over TLS then.
    ContentCdnDefaultHostname,
}

/// The hostnames each distribution is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRoles {
    /// the hostname the content distribution serves. the canonical public endpoint.
    pub content_hostname: String,
    /// the hostname that only redirects. `None` without www handling.
    pub redirect_hostname: Option<String>,
    pub redirect_target: Option<RedirectTarget>,
    /// custom aliases for the content distribution. empty without a certificate.
    pub content_aliases: Vec<String>,
    /// custom aliases for the redirect distribution. empty without a certificate or without www.
    pub redirect_aliases: Vec<String>,
}

impl HostRoles {
    pub fn new(config: &SiteConfig, topology: &Topology) -> Self {
        let bare = config.domain_name.as_str().to_string();
        let www = config.domain_name.www();
        let (content_hostname, redirect_hostname) = match (topology.has_www, topology.www_is_hostname) {
            (false, _) => (bare, None),
            (true, true) => (www, Some(bare)),
            (true, false) => (bare, Some(www)),
        };
        let redirect_target = redirect_hostname.as_ref().map(|_| {
            if topology.has_certificate {
                RedirectTarget::Hostname(content_hostname.clone())
            } else {
                RedirectTarget::ContentCdnDefaultHostname
            }
        });
        // a custom alias on a distribution without a certificate silently breaks https
        // for that hostname, so aliases only exist when a certificate does.
        let (content_aliases, redirect_aliases) = if topology.has_certificate {
            (vec![content_hostname.clone()], redirect_hostname.iter().cloned().collect())
        } else {
            (vec![], vec![])
        };
        Self {
            content_hostname,
            redirect_hostname,
            redirect_target,
            content_aliases,
            redirect_aliases,
        }
    }
}
