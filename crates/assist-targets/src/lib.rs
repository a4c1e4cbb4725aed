//! Deployment targets and the include/exclude filter that enables their
//! sign and publish actions.

pub mod filter;

use std::fmt;

use serde::Serialize;

pub use filter::{CaseSensitivity, FilterRule};

/// Verb prefixing sign action names (`signJvmPublication`).
pub const SIGN_VERB: &str = "sign";
/// Verb prefixing publish action names (`publishJvmPublicationToMavenLocal`).
pub const PUBLISH_VERB: &str = "publish";
/// Token following the target in sign and publish action names.
pub const PUBLICATION_SUFFIX: &str = "Publication";

/// A named deployment variant, e.g. `Jvm` or `KotlinMultiplatform`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TargetName(String);

impl TargetName {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the target of an action from its name.
///
/// Strips `verb` when the name starts with it, then cuts the remainder at the
/// first occurrence of `suffix`. When the suffix ends the name this is a plain
/// suffix removal; for `publishJvmPublicationToMavenLocal` it also drops the
/// repository part. A missing prefix or suffix leaves the text unstripped.
pub fn derive_target(action_name: &str, verb: &str, suffix: &str) -> TargetName {
    let without_verb = action_name.strip_prefix(verb).unwrap_or(action_name);
    let target = if suffix.is_empty() {
        without_verb
    } else {
        without_verb
            .find(suffix)
            .and_then(|end| without_verb.get(..end))
            .unwrap_or(without_verb)
    };
    TargetName::new(target)
}

/// Name of the sign action for `target`.
pub fn sign_action_name(target: &TargetName) -> String {
    format!("{SIGN_VERB}{target}{PUBLICATION_SUFFIX}")
}

/// Name of the action publishing `target` to `repository`.
///
/// `MavenLocal` yields `publish{target}PublicationToMavenLocal`; any other
/// repository yields `publish{target}PublicationTo{repository}Repository`.
pub fn publish_action_name(target: &TargetName, repository: &str) -> String {
    if repository == "MavenLocal" {
        format!("{PUBLISH_VERB}{target}{PUBLICATION_SUFFIX}ToMavenLocal")
    } else {
        format!("{PUBLISH_VERB}{target}{PUBLICATION_SUFFIX}To{repository}Repository")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("invalid {role} pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        role: &'static str,
        pattern: String,
        reason: String,
    },

    #[error("invalid ignoreCase value \"{value}\", expected one of: true, false")]
    InvalidIgnoreCase { value: String },
}


#[cfg(test)]
mod proptests {
    use super::*;

    use proptest::prelude::proptest;

    proptest! {
        /// Arbitrary action names never panic and degrade to a substring.
        #[test]
        fn derive_never_panics(name in ".*", verb in ".{0,8}", suffix in ".{0,12}") {
            let target = derive_target(&name, &verb, &suffix);
            proptest::prop_assert!(name.contains(target.as_str()));
        }

        /// Generated sign names always derive back to their target.
        #[test]
        fn sign_name_derives_target(target in "[A-Z][a-z0-9]{0,20}") {
            let target = TargetName::new(&target);
            let derived = derive_target(&sign_action_name(&target), SIGN_VERB, PUBLICATION_SUFFIX);
            proptest::prop_assert_eq!(derived, target);
        }
    }
}
