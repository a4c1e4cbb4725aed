//! How sign and publish actions relate to the `check` gate.

use std::fmt;

use serde::Serialize;

use assist_config::key::keys;
use assist_config::{KeySpec, Resolver};

use crate::error::EngineError;

/// Ordering relation between a dependent action and a gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RelationPolicy {
    /// No ordering constraint.
    None,
    /// The dependent is scheduled with the gate and runs only if it succeeds.
    #[default]
    DependsOn,
    /// The dependent runs after the gate when both are scheduled; the gate's
    /// outcome does not affect it.
    MustRunAfter,
}

impl RelationPolicy {
    pub const ALL: [Self; 3] = [Self::None, Self::DependsOn, Self::MustRunAfter];

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::DependsOn => "DependsOn",
            Self::MustRunAfter => "MustRunAfter",
        }
    }

    /// Parse a relation value (case-insensitive). `key` names the setting in
    /// the error.
    ///
    /// # Errors
    /// Returns `EngineError::UnknownRelation` for values outside the known set.
    pub fn parse(key: &str, value: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| EngineError::UnknownRelation {
                key: key.to_owned(),
                value: value.to_owned(),
                valid: Self::ALL.map(Self::name).join(", "),
            })
    }
}

impl fmt::Display for RelationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One policy per action category, fixed for the whole invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelationConfig {
    /// Every sign action against `check`.
    pub sign: RelationPolicy,
    /// Every publish action against `check`.
    pub publish: RelationPolicy,
}

impl RelationConfig {
    /// Read `signRelatesCheck` and `publishRelatesCheck`; absent means `DependsOn`.
    ///
    /// # Errors
    /// Returns an error if either flag holds an unknown value.
    pub fn from_resolver(resolver: &Resolver<'_>) -> Result<Self, EngineError> {
        Ok(Self {
            sign: read_policy(resolver, keys::SIGN_RELATES_CHECK)?,
            publish: read_policy(resolver, keys::PUBLISH_RELATES_CHECK)?,
        })
    }
}

fn read_policy(resolver: &Resolver<'_>, spec: KeySpec) -> Result<RelationPolicy, EngineError> {
    match resolver.resolve(&spec.key()).optional() {
        Some(value) => RelationPolicy::parse(spec.property, &value),
        None => Ok(RelationPolicy::default()),
    }
}
