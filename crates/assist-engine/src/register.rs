//! Registers the `check` gate, sign and publish actions, and their relations.

use assist_config::manifest::MAVEN_LOCAL;
use assist_targets::{
    derive_target, publish_action_name, sign_action_name, TargetName, PUBLICATION_SUFFIX,
    PUBLISH_VERB, SIGN_VERB,
};

use crate::context::BuildContext;
use crate::error::EngineError;
use crate::plan::{Action, ActionKind, ActionRef, Plan};

/// Verification gate every sign and publish action relates to.
pub const CHECK: &str = "check";
/// Lifecycle action depending on every remote publish action.
pub const PUBLISH: &str = "publish";
/// Lifecycle action depending on every `...ToMavenLocal` action.
pub const PUBLISH_TO_MAVEN_LOCAL: &str = "publishToMavenLocal";

/// Build the action graph for `ctx`.
///
/// # Errors
/// Returns `EngineError::DuplicateAction` if two targets or repositories map
/// to the same action name.
pub fn register(ctx: &BuildContext) -> Result<Plan, EngineError> {
    let mut plan = Plan::new();
    let relations = ctx.relations();
    let check = plan.add(Action::new(CHECK, ActionKind::Gate))?;

    let mut signs: Vec<(TargetName, ActionRef)> = Vec::new();
    if ctx.signing().is_configured() {
        for target in ctx.targets() {
            let name = sign_action_name(&target);
            let action = targeted(&name, ActionKind::Sign, SIGN_VERB, ctx);
            let sign = plan.add(action)?;
            plan.apply_relation(relations.sign, sign, check);
            signs.push((target, sign));
        }
    }

    let mut remote = Vec::new();
    let mut local = Vec::new();
    for target in ctx.targets() {
        let repositories = std::iter::once(MAVEN_LOCAL)
            .chain(ctx.repositories().iter().map(|repo| repo.name.as_str()));
        for repository in repositories {
            let name = publish_action_name(&target, repository);
            let action = targeted(&name, ActionKind::Publish, PUBLISH_VERB, ctx)
                .with_repository(repository);
            let publish = plan.add(action)?;
            plan.apply_relation(relations.publish, publish, check);

            if let Some((_, sign)) = signs.iter().find(|(signed, _)| *signed == target) {
                plan.depends_on(publish, *sign);
            }
            for (_, sign) in &signs {
                plan.must_run_after(publish, *sign);
            }

            if repository == MAVEN_LOCAL {
                local.push(publish);
            } else {
                remote.push(publish);
            }
        }
    }

    let publish_all = plan.add(Action::new(PUBLISH, ActionKind::Lifecycle))?;
    for publish in remote {
        plan.depends_on(publish_all, publish);
    }
    let publish_local = plan.add(Action::new(PUBLISH_TO_MAVEN_LOCAL, ActionKind::Lifecycle))?;
    for publish in local {
        plan.depends_on(publish_local, publish);
    }

    let enabled = plan.actions().filter(|(_, a)| a.enabled).count();
    tracing::info!(
        actions = plan.len(),
        enabled,
        sign = %relations.sign,
        publish = %relations.publish,
        signing = ctx.signing().mode().map_or("off", |mode| mode.label()),
        "registered actions"
    );
    Ok(plan)
}

/// A sign or publish action carrying the target derived from its own name.
fn targeted(name: &str, kind: ActionKind, verb: &str, ctx: &BuildContext) -> Action {
    let target = derive_target(name, verb, PUBLICATION_SUFFIX);
    let enabled = ctx.filter().should_run(&target);
    if !enabled {
        tracing::debug!(action = name, %target, "disabled by target filter");
    }
    Action::new(name, kind).with_target(target, enabled)
}
