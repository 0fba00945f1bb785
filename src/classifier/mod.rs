//! Failure classification for render batches.
//!
//! Failures reach the host as structured errors, bare strings, or anything in
//! between. [`classify`] lower-cases the message and a full serialization of
//! the failure and walks an ordered, TOML-defined rule list; the first match
//! decides the outcome. This is a best-effort mapping over backend wording
//! that is not documented anywhere, so the rules live in data
//! (`config/error_rules.toml`) and can be revised without touching callers.
//!
//! Call it exactly once per failed batch, at the host boundary.

mod rules;
mod types;

pub use rules::{default_rules, load_rules};
pub use types::*;

use std::sync::OnceLock;

use tracing::debug;

/// Applies a rule set to raw failures.
pub struct Classifier {
    rules: ClassifierRules,
}

impl Classifier {
    /// # Arguments
    /// * `rules` - Rule set (typically from `default_rules()` or `load_rules()`)
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    /// Map a raw failure onto the user-facing taxonomy.
    ///
    /// Matching is case-insensitive. A rule fires when the failure's code is in
    /// `codes`, or its message contains any `message_contains` needle, or its
    /// serialization contains any `serialized_contains` needle.
    ///
    /// # Arguments
    /// * `raw` - Failure as received at the host boundary
    ///
    /// # Returns
    /// `ClassifiedError` from the first matching rule, carrying the rule's detail
    /// or the raw message; `GenericFailure` when nothing matches
    pub fn classify(&self, raw: &RawFailure) -> ClassifiedError {
        let message = raw.message.as_deref().unwrap_or("").to_lowercase();
        let serialized = raw.serialized.to_lowercase();

        for rule in &self.rules.rules {
            let code_hit = raw
                .code
                .as_deref()
                .map_or(false, |code| rule.codes.iter().any(|c| c == code));
            let message_hit = rule
                .message_contains
                .iter()
                .any(|p| message.contains(&p.to_lowercase()));
            let serialized_hit = rule
                .serialized_contains
                .iter()
                .any(|p| serialized.contains(&p.to_lowercase()));

            if code_hit || message_hit || serialized_hit {
                debug!("Failure matched classification rule '{}'", rule.name);
                return ClassifiedError {
                    kind: rule.kind.into(),
                    detail: rule.detail.clone().or_else(|| raw.message.clone()),
                };
            }
        }

        ClassifiedError {
            kind: ErrorKind::GenericFailure,
            detail: Some(
                raw.message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| self.rules.fallback_detail.clone()),
            ),
        }
    }
}

/// Classify with the embedded rule set.
pub fn classify(raw: &RawFailure) -> ClassifiedError {
    static DEFAULT: OnceLock<Classifier> = OnceLock::new();
    DEFAULT
        .get_or_init(|| Classifier::new(default_rules()))
        .classify(raw)
}
