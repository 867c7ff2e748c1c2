use thiserror::Error;

/// Rejected user input. Always recoverable by correcting the configuration;
/// no graph is produced when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid domain_name {value:?}\n{constraint}")]
    InvalidDomainName { value: String, constraint: String },

    #[error("invalid www_mode {value:?}\nMust be one of \"HostName\" or \"Redirect\", or left empty")]
    InvalidWwwMode { value: String },

    #[error("invalid certificate_ref {value:?}\n{constraint}")]
    InvalidCertificateRef { value: String, constraint: String },

    #[error("invalid origin_rewrite_ref {value:?}\n{constraint}")]
    InvalidOriginRewriteRef { value: String, constraint: String },

    #[error("invalid error_document_path {value:?}\n{constraint}")]
    InvalidErrorDocumentPath { value: String, constraint: String },

    #[error("invalid index_document {value:?}\nMust only contain [a-zA-Z0-9-_.] and be at least 1 character")]
    InvalidIndexDocument { value: String },

    #[error("invalid stack_name {value:?}\nMust only consist of alphanumeric characters and hyphens, Must start with an alphabetical character, and cannot be longer than 128 characters.")]
    InvalidStackName { value: String },

    #[error("invalid log_retention_days {value}\nMust be between 1 and 3650")]
    InvalidLogRetention { value: u32 },

    #[error("invalid {field} {value:?}\n{constraint}")]
    InvalidExternalId { field: &'static str, value: String, constraint: String },
}

impl ValidationError {
    /// name of the configuration field that was rejected.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidDomainName { .. } => "domain_name",
            ValidationError::InvalidWwwMode { .. } => "www_mode",
            ValidationError::InvalidCertificateRef { .. } => "certificate_ref",
            ValidationError::InvalidOriginRewriteRef { .. } => "origin_rewrite_ref",
            ValidationError::InvalidErrorDocumentPath { .. } => "error_document_path",
            ValidationError::InvalidIndexDocument { .. } => "index_document",
            ValidationError::InvalidStackName { .. } => "stack_name",
            ValidationError::InvalidLogRetention { .. } => "log_retention_days",
            ValidationError::InvalidExternalId { field, .. } => *field,
        }
    }
}

/// An internal invariant of the resource graph does not hold.
/// This is a defect in how the graph was built, never a user error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphConsistencyError {
    #[error("duplicate logical id '{0}'")]
    DuplicateId(String),

    #[error("resource '{from}' references '{to}' which is not part of the graph")]
    DanglingReference { from: String, to: String },

    #[error("dependency cycle between resources {0:?}")]
    Cycle(Vec<String>),

    #[error("invalid logical id {0:?}\nMust contain only alphanumeric characters [A-Za-z0-9] and be 1 to 255 characters")]
    InvalidResourceId(String),

    #[error("distribution '{0}' has custom aliases but no viewer certificate")]
    AliasWithoutCertificate(String),

    #[error("distribution '{id}' has {count} custom error responses, at most {max} are allowed")]
    TooManyErrorResponses { id: String, count: usize, max: usize },

    #[error("distribution '{id}' has {count} edge function associations, at most 1 is allowed")]
    TooManyEdgeFunctions { id: String, count: usize },

    #[error("invalid bucket name {name:?} on '{id}'\n{constraint}")]
    InvalidBucketName { id: String, name: String, constraint: String },

    #[error("failed to serialize properties of '{id}': {message}")]
    Serialization { id: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config file extension {0:?}, expected .toml or .json")]
    UnsupportedFormat(std::path::PathBuf),
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// fatal. the planner produced an inconsistent graph and refused to emit it.
    #[error("internal resource graph inconsistency: {0}")]
    Consistency(#[from] GraphConsistencyError),
}

pub type PlanResult<T> = Result<T, PlanError>;
