//! Origin-request rewriting for directory style paths.
//!
//! CloudFront invokes this on every request it forwards to the origin (cache misses only).
//! A path ending in `/` gets the index document appended so that the S3 origin,
//! which has no notion of directories, can find the object. Nothing else about the
//! request is inspected or changed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_INDEX_DOCUMENT: &str = "index.html";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    #[error("invalid index document {0:?}: must only contain [a-zA-Z0-9-_.] and be at least 1 character")]
    InvalidIndexDocument(String),
    #[error("origin request event contained no records")]
    NoRecords,
}

/// The index document bound to the edge function at deployment time.
/// Can never contain a path separator, which is what keeps `rewrite` idempotent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct IndexDocument(String);

impl IndexDocument {
    pub fn parse(s: &str) -> Result<Self, EventError> {
        let valid_char_check = |c: char| -> bool {
            c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
        };
        if s.is_empty() || !s.chars().all(valid_char_check) {
            return Err(EventError::InvalidIndexDocument(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for IndexDocument {
    fn default() -> Self {
        Self(DEFAULT_INDEX_DOCUMENT.to_string())
    }
}

impl std::fmt::Display for IndexDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// if `request_path` ends with `/`, returns it with `index_document` appended.
/// otherwise returns `request_path` unchanged.
pub fn rewrite(request_path: &str, index_document: &str) -> String {
    if request_path.ends_with('/') {
        format!("{request_path}{index_document}")
    } else {
        request_path.to_string()
    }
}

/// the request descriptor CloudFront hands to an origin-request trigger.
/// only `uri` is read. every other field is carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginRequest {
    pub uri: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl OriginRequest {
    pub fn rewritten(mut self, index_document: &IndexDocument) -> Self {
        self.uri = rewrite(&self.uri, index_document.as_str());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfPayload {
    pub request: OriginRequest,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub cf: CfPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginRequestEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

/// entrypoint for the edge runtime: takes the event, returns the (possibly rewritten) request.
pub fn handle_event(event: OriginRequestEvent, index_document: &IndexDocument) -> Result<OriginRequest, EventError> {
    let record = event.records.into_iter().next().ok_or(EventError::NoRecords)?;
    Ok(record.cf.request.rewritten(index_document))
}
