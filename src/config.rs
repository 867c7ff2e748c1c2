use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
pub use edge_index_rewrite::IndexDocument;

/// The user facing configuration before validation.
/// Every optional field treats an empty string the same as leaving it out.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSiteConfig {
    /// the canonical domain, without a `www` label. eg: `example.com`
    pub domain_name: String,
    /// `HostName` serves content on `www.<domain>` and redirects the bare domain to it.
    /// `Redirect` serves content on the bare domain and redirects `www.<domain>` to it.
    /// leave empty for no www handling at all.
    pub www_mode: Option<String>,
    /// ARN of an issued ACM certificate in us-east-1 covering the domain (and `www.` if used).
    /// Without one, no custom hostnames are attached to the distributions.
    pub certificate_ref: Option<String>,
    /// versioned ARN of a Lambda@Edge function to run on origin requests.
    pub origin_rewrite_ref: Option<String>,
    /// absolute path of the document served for error responses, eg: `/404.html`
    pub error_document_path: Option<String>,
    /// defaults to `index.html`
    pub index_document: Option<String>,
    /// name of the stack the graph gets deployed as. defaults to one derived from the domain.
    pub stack_name: Option<String>,
    /// if set, access logs are expired after this many days.
    pub log_retention_days: Option<u32>,
}

impl RawSiteConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// reads a `.toml` or `.json` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase());
        tracing::debug!(path = %path.display(), "loading site config");
        match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// identifiers that come from outside the planner (the account and region the
/// stack gets deployed to). Part of the planning input so that the same config
/// and the same ids always produce the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    pub account_id: String,
    pub region: String,
}

impl ExternalIds {
    pub fn new<A: AsRef<str>, R: AsRef<str>>(account_id: A, region: R) -> Self {
        Self {
            account_id: account_id.as_ref().into(),
            region: region.as_ref().into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WwwMode {
    HostName,
    Redirect,
}

impl WwwMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WwwMode::HostName => "HostName",
            WwwMode::Redirect => "Redirect",
        }
    }
}

macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub(crate) String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_string!(
    /// lowercase, dot separated DNS name that never starts with the `www` label.
    DomainName
);
validated_string!(
    /// ARN of an issued ACM certificate in us-east-1. Opaque past validation.
    CertificateRef
);
validated_string!(
    /// versioned Lambda function ARN. Opaque past validation.
    OriginRewriteRef
);
validated_string!(ErrorDocumentPath);
validated_string!(StackName);

impl DomainName {
    pub fn www(&self) -> String {
        format!("www.{}", self.0)
    }

    /// the domain with dots replaced, usable inside bucket and stack names.
    pub fn slug(&self) -> String {
        self.0.replace('.', "-")
    }
}

/// A configuration that passed validation. Only obtainable through [`crate::validation::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    pub domain_name: DomainName,
    pub www_mode: Option<WwwMode>,
    pub certificate_ref: Option<CertificateRef>,
    pub origin_rewrite_ref: Option<OriginRewriteRef>,
    pub error_document_path: Option<ErrorDocumentPath>,
    pub index_document: IndexDocument,
    pub stack_name: StackName,
    pub log_retention_days: Option<u32>,
}
