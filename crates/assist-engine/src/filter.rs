//! Builds the target filter from configuration.

use assist_config::key::keys;
use assist_config::Resolver;
use assist_targets::{CaseSensitivity, FilterRule};

use crate::error::EngineError;

/// `ignoreCase` value used when none is configured.
pub const DEFAULT_IGNORE_CASE: &str = "true";

/// Read the include/exclude patterns and case setting and compile the rule.
///
/// # Errors
/// Returns an error if a pattern is not a valid regex or `ignoreCase` is not
/// `true`/`false`.
pub fn filter_rule(resolver: &Resolver<'_>) -> Result<FilterRule, EngineError> {
    let include = resolver
        .resolve(&keys::TARGET_FILTER_INCLUDE.key())
        .optional();
    let exclude = resolver
        .resolve(&keys::TARGET_FILTER_EXCLUDE.key())
        .optional();
    let ignore_case =
        resolver.resolve_or(&keys::TARGET_FILTER_IGNORE_CASE.key(), DEFAULT_IGNORE_CASE);
    let case = CaseSensitivity::from_ignore_case(&ignore_case)?;

    let rule = FilterRule::new(include.as_deref(), exclude.as_deref(), case)?;
    tracing::debug!(%rule, "target filter configured");
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_config::ConfigSnapshot;
    use assist_targets::TargetName;

    fn rule(snapshot: &ConfigSnapshot) -> FilterRule {
        filter_rule(&Resolver::new(snapshot)).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn unset_allows_all_case_insensitive() {
        let rule = rule(&ConfigSnapshot::default());
        assert!(rule.include_pattern().is_none());
        assert!(rule.exclude_pattern().is_none());
        assert_eq!(rule.case_sensitivity(), CaseSensitivity::Insensitive);
    }

    #[test]
    fn reads_patterns_from_properties_and_environment() {
        let snapshot = ConfigSnapshot::builder()
            .property("targetFilter.include", "(Jvm)|(Js)")
            .environment([("TARGET_FILTER_EXCLUDE", "Js")])
            .build();
        let rule = rule(&snapshot);
        assert!(rule.should_run(&TargetName::new("Jvm")));
        assert!(!rule.should_run(&TargetName::new("Js")));
        assert!(!rule.should_run(&TargetName::new("LinuxX64")));
    }

    #[test]
    fn ignore_case_false_from_system_property() {
        let snapshot = ConfigSnapshot::builder()
            .system_property("targetFilter.ignoreCase", "false")
            .property("targetFilter.exclude", "jvm")
            .build();
        let rule = rule(&snapshot);
        assert_eq!(rule.case_sensitivity(), CaseSensitivity::Sensitive);
        assert!(rule.should_run(&TargetName::new("Jvm")));
    }

    #[test]
    fn invalid_ignore_case_is_an_error() {
        let snapshot = ConfigSnapshot::builder()
            .environment([("TARGET_FILTER_IGNORE_CASE", "maybe")])
            .build();
        let err = filter_rule(&Resolver::new(&snapshot)).unwrap_err().to_string();
        assert!(err.contains("\"maybe\""), "error was: {err}");
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let snapshot = ConfigSnapshot::builder()
            .property("targetFilter.include", "[Jvm")
            .build();
        let err = filter_rule(&Resolver::new(&snapshot)).unwrap_err().to_string();
        assert!(err.contains("include"), "error was: {err}");
        assert!(err.contains("\"[Jvm\""), "error was: {err}");
    }
}
