//! Type definitions for failure classification.
//!
//! Rule types deserialize from TOML; outcome types serialize to hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;

// =============================================================================
// CONFIGURATION TYPES (loaded from TOML)
// =============================================================================

/// Root of error_rules.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierRules {
    /// Detail for generic failures that carry no message
    pub fallback_detail: String,
    /// Ordered; first match wins
    pub rules: Vec<ClassifierRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierRule {
    pub name: String,
    pub kind: RuleKind,
    #[serde(default)]
    pub codes: Vec<String>,
    #[serde(default)]
    pub message_contains: Vec<String>,
    #[serde(default)]
    pub serialized_contains: Vec<String>,
    /// Fixed detail; when absent the raw message is used
    #[serde(default)]
    pub detail: Option<String>,
}

/// Outcome named by a rule.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    ConfigurationMissing,
    CredentialInvalid,
    QuotaExceeded,
    PermissionDenied,
    InvalidKey,
}

impl From<RuleKind> for ErrorKind {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::ConfigurationMissing => ErrorKind::ConfigurationMissing,
            RuleKind::CredentialInvalid => ErrorKind::CredentialInvalid,
            RuleKind::QuotaExceeded => ErrorKind::QuotaExceeded,
            RuleKind::PermissionDenied => ErrorKind::AuthorizationDenied(AuthCause::Permission),
            RuleKind::InvalidKey => ErrorKind::AuthorizationDenied(AuthCause::InvalidKey),
        }
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// A failure as received at the host boundary, before classification.
#[derive(Debug, Clone, Default)]
pub struct RawFailure {
    /// Primary message field, if the failure had one
    pub message: Option<String>,
    /// Full serialization of the failure value
    pub serialized: String,
    /// Stable error code, for failures raised by this crate
    pub code: Option<String>,
}

impl RawFailure {
    /// A failure that is just a string.
    pub fn from_message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            serialized: serde_json::Value::String(message.to_string()).to_string(),
            code: None,
        }
    }

    /// A structured failure, e.g. a decoded backend error body. The message
    /// is taken from `message` or `error.message` when present.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let message = value
            .get("message")
            .or_else(|| value.get("error").and_then(|e| e.get("message")))
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .or_else(|| value.as_str().map(|s| s.to_string()));
        Self {
            message,
            serialized: value.to_string(),
            code: None,
        }
    }
}

impl From<&StudioError> for RawFailure {
    fn from(err: &StudioError) -> Self {
        let serialized = serde_json::to_string(err).unwrap_or_else(|_| format!("{:?}", err));
        Self {
            message: Some(err.to_string()),
            serialized,
            code: Some(err.code().to_string()),
        }
    }
}

// =============================================================================
// OUTPUT TYPES (serialized to hosts)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthCause {
    /// Key lacks billing or model access
    Permission,
    /// Key itself is rejected
    InvalidKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cause", rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationMissing,
    /// The key no longer resolves; the user must pick a new one
    CredentialInvalid,
    QuotaExceeded,
    AuthorizationDenied(AuthCause),
    GenericFailure,
}

/// A failed render batch, mapped onto the user-facing taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub detail: Option<String>,
}

impl ClassifiedError {
    /// Remediation is to supply a different credential.
    pub fn needs_new_credential(&self) -> bool {
        !matches!(self.kind, ErrorKind::GenericFailure)
    }

    /// Offer a retry affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::GenericFailure)
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            ErrorKind::ConfigurationMissing => "API key not configured",
            ErrorKind::CredentialInvalid => "API key not found",
            ErrorKind::QuotaExceeded => "Quota exceeded",
            ErrorKind::AuthorizationDenied(_) => "Authorization failed",
            ErrorKind::GenericFailure => "Rendering failed",
        }
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.title(), detail),
            None => f.write_str(self.title()),
        }
    }
}

impl std::error::Error for ClassifiedError {}

impl From<ClassifiedError> for String {
    fn from(err: ClassifiedError) -> Self {
        err.to_string()
    }
}
