//! Include/exclude regex filter over target names.
//!
//! A target runs when it matches the include pattern (absent = match all)
//! and does not match the exclude pattern (absent = match none). Exclude
//! wins when both match. Matching is full-string.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::{TargetError, TargetName};

/// Case handling shared by both patterns of a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseSensitivity {
    /// Interpret an `ignoreCase` setting: `"true"` or `"false"`, any case.
    ///
    /// # Errors
    /// Returns `TargetError::InvalidIgnoreCase` for any other value.
    pub fn from_ignore_case(value: &str) -> Result<Self, TargetError> {
        match value.to_ascii_lowercase().as_str() {
            "true" => Ok(Self::Insensitive),
            "false" => Ok(Self::Sensitive),
            _ => Err(TargetError::InvalidIgnoreCase {
                value: value.to_owned(),
            }),
        }
    }
}

/// A compiled pattern together with the text it was written as.
#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    fn compile(
        role: &'static str,
        source: &str,
        case: CaseSensitivity,
    ) -> Result<Self, TargetError> {
        let build = |text: &str| {
            RegexBuilder::new(text)
                .case_insensitive(case == CaseSensitivity::Insensitive)
                .build()
                .map_err(|e| TargetError::InvalidPattern {
                    role,
                    pattern: source.to_owned(),
                    reason: e.to_string(),
                })
        };
        // Validate the pattern on its own first so that an unbalanced group
        // cannot close the anchoring group below.
        build(source)?;
        let anchored = build(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_owned(),
            anchored,
        })
    }

    fn matches(&self, target: &TargetName) -> bool {
        self.anchored.is_match(target.as_str())
    }
}

/// Decides per target whether its sign/publish actions are enabled.
#[derive(Debug, Clone, Default)]
pub struct FilterRule {
    include: Option<Pattern>,
    exclude: Option<Pattern>,
    case: CaseSensitivity,
}

impl FilterRule {
    /// Rule that lets every target run.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Compile a rule from optional include/exclude pattern text.
    ///
    /// # Errors
    /// Returns `TargetError::InvalidPattern` naming the offending pattern.
    pub fn new(
        include: Option<&str>,
        exclude: Option<&str>,
        case: CaseSensitivity,
    ) -> Result<Self, TargetError> {
        Ok(Self {
            include: include
                .map(|p| Pattern::compile("include", p, case))
                .transpose()?,
            exclude: exclude
                .map(|p| Pattern::compile("exclude", p, case))
                .transpose()?,
            case,
        })
    }

    pub fn include_pattern(&self) -> Option<&str> {
        self.include.as_ref().map(|p| p.source.as_str())
    }

    pub fn exclude_pattern(&self) -> Option<&str> {
        self.exclude.as_ref().map(|p| p.source.as_str())
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    /// `include matches && !exclude matches`.
    pub fn should_run(&self, target: &TargetName) -> bool {
        let include_match = self.include.as_ref().map_or(true, |p| p.matches(target));
        let exclude_match = self.exclude.as_ref().map_or(false, |p| p.matches(target));
        tracing::debug!(
            %target,
            include = self.include_pattern().unwrap_or("<none>"),
            include_match,
            exclude = self.exclude_pattern().unwrap_or("<none>"),
            exclude_match,
            "target filter"
        );
        include_match && !exclude_match
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "include={} exclude={} ignoreCase={}",
            self.include_pattern().unwrap_or("<all>"),
            self.exclude_pattern().unwrap_or("<none>"),
            self.case == CaseSensitivity::Insensitive
        )
    }
}
