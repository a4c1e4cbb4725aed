//! The declarative action graph.
//!
//! Actions are stored in registration order and refer to each other by index.
//! `depends_on` edges pull predecessors into a schedule and propagate
//! failure; `must_run_after` edges only order actions that are already
//! scheduled.

use std::fmt;

use serde::Serialize;

use assist_targets::TargetName;

use crate::error::EngineError;
use crate::relation::RelationPolicy;

/// Index of an action in its [`Plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActionRef(usize);

impl ActionRef {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Verification gate (`check`).
    Gate,
    Sign,
    Publish,
    /// Aggregate with no work of its own (`publish`, `publishToMavenLocal`).
    Lifecycle,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gate => "gate",
            Self::Sign => "sign",
            Self::Publish => "publish",
            Self::Lifecycle => "lifecycle",
        })
    }
}

/// One node of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub kind: ActionKind,
    /// Derived target for sign and publish actions.
    pub target: Option<TargetName>,
    /// Repository name for publish actions (`MavenLocal` for the local one).
    pub repository: Option<String>,
    /// `false` when the target filter disabled this action.
    pub enabled: bool,
    pub depends_on: Vec<ActionRef>,
    pub must_run_after: Vec<ActionRef>,
}

impl Action {
    pub fn new(name: &str, kind: ActionKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            target: None,
            repository: None,
            enabled: true,
            depends_on: Vec::new(),
            must_run_after: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: TargetName, enabled: bool) -> Self {
        self.target = Some(target);
        self.enabled = enabled;
        self
    }

    pub fn with_repository(mut self, repository: &str) -> Self {
        self.repository = Some(repository.to_owned());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    actions: Vec<Action>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action.
    ///
    /// # Errors
    /// Returns `EngineError::DuplicateAction` if the name is already taken.
    pub fn add(&mut self, action: Action) -> Result<ActionRef, EngineError> {
        if self.find(&action.name).is_some() {
            return Err(EngineError::DuplicateAction { name: action.name });
        }
        self.actions.push(action);
        Ok(ActionRef(self.actions.len().saturating_sub(1)))
    }

    pub fn get(&self, action: ActionRef) -> Option<&Action> {
        self.actions.get(action.0)
    }

    pub fn find(&self, name: &str) -> Option<ActionRef> {
        self.actions
            .iter()
            .position(|action| action.name == name)
            .map(ActionRef)
    }

    /// Declare that `dependent` depends on `predecessor`. Repeated edges are
    /// recorded once.
    pub fn depends_on(&mut self, dependent: ActionRef, predecessor: ActionRef) {
        if let Some(action) = self.actions.get_mut(dependent.0) {
            if !action.depends_on.contains(&predecessor) {
                action.depends_on.push(predecessor);
            }
        }
    }

    /// Declare that `dependent` must run after `predecessor` when both are
    /// scheduled.
    pub fn must_run_after(&mut self, dependent: ActionRef, predecessor: ActionRef) {
        if let Some(action) = self.actions.get_mut(dependent.0) {
            if !action.must_run_after.contains(&predecessor) {
                action.must_run_after.push(predecessor);
            }
        }
    }

    /// Wire `dependent` to `gate` according to `policy`.
    pub fn apply_relation(&mut self, policy: RelationPolicy, dependent: ActionRef, gate: ActionRef) {
        match policy {
            RelationPolicy::None => {}
            RelationPolicy::DependsOn => self.depends_on(dependent, gate),
            RelationPolicy::MustRunAfter => self.must_run_after(dependent, gate),
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionRef, &Action)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| (ActionRef(index), action))
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Name of `action`, or `"?"` for a reference from another plan.
    pub fn name_of(&self, action: ActionRef) -> &str {
        self.get(action).map_or("?", |a| a.name.as_str())
    }
}
