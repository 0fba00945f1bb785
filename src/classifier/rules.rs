//! TOML rule loading for failure classification.
//!
//! - `default_rules()` - rules embedded in the binary
//! - `load_rules(path)` - replacement rules from a file

use std::path::Path;

use anyhow::Result;

use super::types::ClassifierRules;

/// Loaded from `config/error_rules.toml` at compile time.
const DEFAULT_RULES: &str = include_str!("../../config/error_rules.toml");

/// Load classification rules from a TOML file.
///
/// # Arguments
/// * `path` - TOML file with `fallback_detail` and an ordered `[[rules]]` list
///
/// # Returns
/// * `Ok(ClassifierRules)` - Parsed rule set, order preserved
/// * `Err` - If the file cannot be read, the TOML is invalid or a rule names an unknown kind
///
/// # Example
/// ```ignore
/// let classifier = Classifier::new(load_rules(Path::new("error_rules.toml"))?);
/// ```
pub fn load_rules(path: &Path) -> Result<ClassifierRules> {
    let content = std::fs::read_to_string(path)?;
    let rules: ClassifierRules = toml::from_str(&content)?;
    Ok(rules)
}

/// The embedded rule set.
///
/// Checked in order:
/// - Missing configuration (by error code)
/// - Entity not found (credential no longer valid)
/// - Quota / rate limit (429, "quota", "exhausted")
/// - Permission denied (403, "permission", "not authorized")
/// - Invalid API key (401, "key")
///
/// # Panics
/// Panics if the embedded TOML is invalid (a build-time bug).
pub fn default_rules() -> ClassifierRules {
    toml::from_str(DEFAULT_RULES).expect("embedded error_rules.toml must be valid TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::types::RuleKind;
    use tempfile::TempDir;

    #[test]
    fn test_default_rules_load() {
        let rules = default_rules();
        assert_eq!(rules.rules.len(), 5);
        assert!(!rules.fallback_detail.is_empty());
    }

    #[test]
    fn test_default_rule_order() {
        let kinds: Vec<RuleKind> = default_rules().rules.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::ConfigurationMissing,
                RuleKind::CredentialInvalid,
                RuleKind::QuotaExceeded,
                RuleKind::PermissionDenied,
                RuleKind::InvalidKey,
            ]
        );
    }

    #[test]
    fn test_every_rule_has_a_matcher() {
        for rule in default_rules().rules {
            assert!(
                !(rule.codes.is_empty()
                    && rule.message_contains.is_empty()
                    && rule.serialized_contains.is_empty()),
                "rule '{}' can never match",
                rule.name
            );
        }
    }

    #[test]
    fn test_load_rules_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            r#"
            fallback_detail = "Something broke."

            [[rules]]
            name = "rate"
            kind = "quota_exceeded"
            message_contains = ["rate limit"]
            "#,
        )
        .unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.fallback_detail, "Something broke.");
        assert_eq!(rules.rules[0].kind, RuleKind::QuotaExceeded);
        assert!(rules.rules[0].detail.is_none());
    }

    #[test]
    fn test_load_rules_rejects_unknown_kind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            "fallback_detail = \"x\"\n[[rules]]\nname = \"a\"\nkind = \"teapot\"\n",
        )
        .unwrap();
        assert!(load_rules(&path).is_err());
    }
}
