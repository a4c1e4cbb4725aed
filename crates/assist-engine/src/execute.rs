//! Runs a schedule wave by wave against an [`ActionRunner`].

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;

use assist_config::manifest::MAVEN_LOCAL;
use assist_util::maven::{maven_local_repository, MavenCoordinate};

use crate::context::BuildContext;
use crate::credentials::{Repository, RepositoryCredentials};
use crate::plan::{Action, ActionKind, ActionRef, Plan};
use crate::schedule::Schedule;
use crate::signing::{SigningMode, SigningState};

/// Everything a runner needs to perform one action.
#[derive(Debug)]
pub struct ActionRequest<'a> {
    pub action: &'a Action,
    /// Set for sign actions.
    pub signing: Option<&'a SigningMode>,
    /// Set for publish actions to a remote repository.
    pub repository: Option<&'a Repository>,
    pub credentials: Option<RepositoryCredentials>,
    /// Set for sign and publish actions.
    pub coordinate: Option<MavenCoordinate>,
    /// Publication directory: a URL for remote repositories, a path under
    /// `~/.m2/repository` for MavenLocal.
    pub destination: Option<String>,
}

/// Performs the work behind an action. Called concurrently for the actions
/// of one wave.
pub trait ActionRunner: Sync {
    /// # Errors
    /// Returns a message describing why the action failed.
    fn run(&self, request: &ActionRequest<'_>) -> Result<(), String>;
}

/// Runner that only logs what it would do. Actions named in `failing` fail.
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner {
    failing: BTreeSet<String>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate failure of the named actions.
    pub fn failing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ActionRunner for DryRunRunner {
    fn run(&self, request: &ActionRequest<'_>) -> Result<(), String> {
        let action = request.action;
        if self.failing.contains(&action.name) {
            return Err(format!("simulated failure of `{}`", action.name));
        }
        let coordinate = request
            .coordinate
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        match action.kind {
            ActionKind::Sign => {
                let mode = request.signing.map_or("?", SigningMode::label);
                tracing::info!(action = %action.name, %coordinate, mode, "would sign");
            }
            ActionKind::Publish => {
                let destination = request.destination.as_deref().unwrap_or(MAVEN_LOCAL);
                let user = request
                    .credentials
                    .as_ref()
                    .map_or("<none>", |c| c.username.as_str());
                tracing::info!(action = %action.name, %coordinate, destination, user, "would publish");
            }
            ActionKind::Gate | ActionKind::Lifecycle => {
                tracing::info!(action = %action.name, "would run");
            }
        }
        Ok(())
    }
}

/// Result of one scheduled action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    Success,
    /// Disabled by the target filter.
    Skipped,
    /// A `depends_on` predecessor failed or was itself upstream-failed.
    UpstreamFailed { upstream: String },
    Failed { message: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::UpstreamFailed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub action: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcomes in completion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    entries: Vec<ReportEntry>,
}

impl ExecutionReport {
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Completion position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.action == name)
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.action == name)
            .map(|e| &e.outcome)
    }

    /// Whether any action failed or was blocked by a failure.
    pub fn failed(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.is_failure())
    }

    pub fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Execute `schedule`. Waves run one after another; the actions of a wave
/// run in parallel.
pub fn execute(
    ctx: &BuildContext,
    schedule: &Schedule,
    plan: &Plan,
    runner: &dyn ActionRunner,
) -> ExecutionReport {
    let mut outcomes: BTreeMap<ActionRef, Outcome> = BTreeMap::new();
    let mut report = ExecutionReport::default();

    for wave in schedule.levels() {
        let results: Vec<(ActionRef, Outcome)> = wave
            .par_iter()
            .map(|&action| (action, run_one(ctx, schedule, plan, &outcomes, runner, action)))
            .collect();

        for (action, outcome) in results {
            let name = plan.name_of(action).to_owned();
            match &outcome {
                Outcome::Failed { message } => tracing::warn!(action = %name, "failed: {message}"),
                Outcome::UpstreamFailed { upstream } => {
                    tracing::warn!(action = %name, %upstream, "not run, upstream failed");
                }
                Outcome::Skipped => tracing::info!(action = %name, "skipped by target filter"),
                Outcome::Success => tracing::debug!(action = %name, "done"),
            }
            report.entries.push(ReportEntry {
                action: name,
                outcome: outcome.clone(),
            });
            outcomes.insert(action, outcome);
        }
    }
    report
}

fn run_one(
    ctx: &BuildContext,
    schedule: &Schedule,
    plan: &Plan,
    outcomes: &BTreeMap<ActionRef, Outcome>,
    runner: &dyn ActionRunner,
    action_ref: ActionRef,
) -> Outcome {
    let Some(action) = plan.get(action_ref) else {
        return Outcome::Failed {
            message: format!("action #{} is not part of the plan", action_ref.index()),
        };
    };
    if !action.enabled {
        return Outcome::Skipped;
    }

    // Only `depends_on` predecessors gate the action; a skipped one does not.
    for &predecessor in &action.depends_on {
        if !schedule.contains(predecessor) {
            continue;
        }
        if outcomes.get(&predecessor).is_some_and(Outcome::is_failure) {
            return Outcome::UpstreamFailed {
                upstream: plan.name_of(predecessor).to_owned(),
            };
        }
    }

    match request(ctx, action) {
        Ok(request) => match runner.run(&request) {
            Ok(()) => Outcome::Success,
            Err(message) => Outcome::Failed { message },
        },
        Err(message) => Outcome::Failed { message },
    }
}

/// Resolve the signing mode or repository credentials `action` needs.
fn request<'a>(ctx: &'a BuildContext, action: &'a Action) -> Result<ActionRequest<'a>, String> {
    let coordinate = action.target.as_ref().map(|t| ctx.coordinate(t));
    let mut request = ActionRequest {
        action,
        signing: None,
        repository: None,
        credentials: None,
        coordinate,
        destination: None,
    };

    match action.kind {
        ActionKind::Sign => match ctx.signing() {
            SigningState::Ready(mode) => request.signing = Some(mode),
            SigningState::Misconfigured { message } => return Err(message.clone()),
            SigningState::NotConfigured => return Err("signing is not configured".to_owned()),
        },
        ActionKind::Publish => {
            let name = action.repository.as_deref().unwrap_or(MAVEN_LOCAL);
            if name != MAVEN_LOCAL {
                let repository = ctx
                    .repository(name)
                    .ok_or_else(|| format!("no repository named `{name}`"))?;
                let credentials = repository
                    .credentials(&ctx.resolver())
                    .map_err(|e| e.to_string())?;
                request.destination = request
                    .coordinate
                    .as_ref()
                    .map(|c| c.url_in(&repository.url));
                request.repository = Some(repository);
                request.credentials = Some(credentials);
            } else if let Some(coordinate) = &request.coordinate {
                match maven_local_repository() {
                    Ok(root) => {
                        request.destination =
                            Some(coordinate.path_in(&root).display().to_string());
                    }
                    Err(e) => tracing::debug!(action = %action.name, "{e}"),
                }
            }
        }
        ActionKind::Gate | ActionKind::Lifecycle => {}
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{context, manifest};
    use crate::register::{register, CHECK};
    use assist_config::ConfigSnapshot;
    use std::sync::Mutex;

    /// Records the actions it was asked to run.
    #[derive(Default)]
    struct Recorder {
        runs: Mutex<Vec<String>>,
    }

    impl ActionRunner for Recorder {
        fn run(&self, request: &ActionRequest<'_>) -> Result<(), String> {
            self.runs
                .lock()
                .map_err(|e| e.to_string())?
                .push(request.action.name.clone());
            Ok(())
        }
    }

    impl Recorder {
        fn ran(&self, name: &str) -> bool {
            self.runs
                .lock()
                .unwrap_or_else(|e| panic!("{e}"))
                .iter()
                .any(|n| n == name)
        }
    }

    const SIGNING: [(&str, &str); 2] =
        [("GPG_SECRET_KEY", "armored"), ("GPG_SIGNING_PASSWORD", "pw")];

    fn run(ctx: &BuildContext, requested: &[&str], runner: &dyn ActionRunner) -> ExecutionReport {
        let plan = register(ctx).unwrap_or_else(|e| panic!("{e}"));
        let schedule = Schedule::for_requests(&plan, requested).unwrap_or_else(|e| panic!("{e}"));
        execute(ctx, &schedule, &plan, runner)
    }

    fn with_relation(relation: &str) -> BuildContext {
        context(
            ConfigSnapshot::builder()
                .environment(SIGNING)
                .property("publishRelatesCheck", relation)
                .property("signRelatesCheck", relation)
                .build(),
        )
    }

    #[test]
    fn depends_on_failed_gate_blocks_dependent() {
        let ctx = with_relation("DependsOn");
        let runner = DryRunRunner::failing(["check"]);
        let report = run(&ctx, &["publishJvmPublicationToMavenLocal"], &runner);
        assert_eq!(
            report.outcome("check"),
            Some(&Outcome::Failed {
                message: "simulated failure of `check`".to_owned()
            })
        );
        assert_eq!(
            report.outcome("signJvmPublication"),
            Some(&Outcome::UpstreamFailed {
                upstream: "check".to_owned()
            })
        );
        assert_eq!(
            report.outcome("publishJvmPublicationToMavenLocal"),
            Some(&Outcome::UpstreamFailed {
                upstream: "check".to_owned()
            })
        );
        assert!(report.failed());
    }

    #[test]
    fn must_run_after_failed_gate_still_runs() {
        let ctx = with_relation("MustRunAfter");
        let plan = register(&ctx).unwrap_or_else(|e| panic!("{e}"));
        let schedule = Schedule::for_requests(&plan, &["check", "publishJvmPublicationToMavenLocal"])
            .unwrap_or_else(|e| panic!("{e}"));
        let report = execute(&ctx, &schedule, &plan, &DryRunRunner::failing(["check"]));
        assert_eq!(
            report.outcome("publishJvmPublicationToMavenLocal"),
            Some(&Outcome::Success)
        );
        let check = report.position("check");
        let publish = report.position("publishJvmPublicationToMavenLocal");
        assert!(check < publish, "{check:?} vs {publish:?}");
    }

    #[test]
    fn must_run_after_skipped_gate_still_runs() {
        let ctx = context(ConfigSnapshot::default());
        let mut plan = Plan::new();
        let gate = plan
            .add(
                Action::new("check", ActionKind::Gate)
                    .with_target(assist_targets::TargetName::new("Off"), false),
            )
            .unwrap_or_else(|e| panic!("{e}"));
        let publish = plan
            .add(Action::new("publishNothing", ActionKind::Lifecycle))
            .unwrap_or_else(|e| panic!("{e}"));
        plan.apply_relation(crate::relation::RelationPolicy::MustRunAfter, publish, gate);
        let schedule = Schedule::all(&plan).unwrap_or_else(|e| panic!("{e}"));
        let report = execute(&ctx, &schedule, &plan, &DryRunRunner::new());
        assert_eq!(report.outcome("check"), Some(&Outcome::Skipped));
        assert_eq!(report.outcome("publishNothing"), Some(&Outcome::Success));
    }

    #[test]
    fn must_run_after_does_not_schedule_gate() {
        let ctx = with_relation("MustRunAfter");
        let runner = Recorder::default();
        let report = run(&ctx, &["publishJvmPublicationToMavenLocal"], &runner);
        assert!(report.position("check").is_none());
        assert!(!runner.ran("check"));
        assert!(runner.ran("publishJvmPublicationToMavenLocal"));
    }

    #[test]
    fn disabled_predecessor_does_not_block() {
        let ctx = context(
            ConfigSnapshot::builder()
                .environment(SIGNING)
                .property("targetFilter.exclude", "Jvm")
                .build(),
        );
        let runner = Recorder::default();
        let report = run(&ctx, &["publishToMavenLocal"], &runner);
        assert_eq!(
            report.outcome("publishJvmPublicationToMavenLocal"),
            Some(&Outcome::Skipped)
        );
        assert_eq!(report.outcome("signJvmPublication"), Some(&Outcome::Skipped));
        assert_eq!(report.outcome("publishToMavenLocal"), Some(&Outcome::Success));
        assert!(!runner.ran("signJvmPublication"));
        assert!(runner.ran("publishToMavenLocal"));
        assert!(!report.failed());
    }

    #[test]
    fn missing_credentials_fail_only_that_repository() {
        let ctx = context(ConfigSnapshot::builder().environment(SIGNING).build());
        let report = run(&ctx, &["publish", "publishToMavenLocal"], &DryRunRunner::new());
        match report.outcome("publishJvmPublicationToSonatypeStagingRepository") {
            Some(Outcome::Failed { message }) => {
                assert!(message.contains("'ossrhUsername'"), "message was: {message}");
                assert!(message.contains("'OSSRH_USERNAME'"), "message was: {message}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            report.outcome("publish"),
            Some(&Outcome::UpstreamFailed {
                upstream: "publishKotlinMultiplatformPublicationToSonatypeStagingRepository"
                    .to_owned()
            })
        );
        assert_eq!(
            report.outcome("publishJvmPublicationToMavenLocal"),
            Some(&Outcome::Success)
        );
        assert_eq!(report.outcome("publishToMavenLocal"), Some(&Outcome::Success));
        assert_eq!(report.outcome("signJvmPublication"), Some(&Outcome::Success));
    }

    #[test]
    fn credentials_reach_the_runner() {
        struct Expect;
        impl ActionRunner for Expect {
            fn run(&self, request: &ActionRequest<'_>) -> Result<(), String> {
                if request.action.kind != ActionKind::Publish
                    || request.action.repository.as_deref() == Some(MAVEN_LOCAL)
                {
                    return Ok(());
                }
                let creds = request.credentials.as_ref().ok_or("no credentials")?;
                if creds.username != "alice" || creds.password.expose() != "s3cret" {
                    return Err("wrong credentials".to_owned());
                }
                let url = request.repository.map(|r| r.url.as_str());
                if url != Some(crate::credentials::SONATYPE_STAGING_URL) {
                    return Err(format!("wrong url {url:?}"));
                }
                Ok(())
            }
        }
        let ctx = context(
            ConfigSnapshot::builder()
                .property("ossrhUsername", "alice")
                .environment([("OSSRH_PASSWORD", "s3cret")])
                .build(),
        );
        let report = run(&ctx, &["publish"], &Expect);
        assert!(!report.failed(), "{report:?}");
    }

    #[test]
    fn misconfigured_signing_fails_sign_actions_only() {
        let ctx = context(
            ConfigSnapshot::builder()
                .environment([("GPG_SECRET_KEY", "armored")])
                .build(),
        );
        let report = run(&ctx, &["check", "signJvmPublication"], &DryRunRunner::new());
        assert_eq!(report.outcome("check"), Some(&Outcome::Success));
        match report.outcome("signJvmPublication") {
            Some(Outcome::Failed { message }) => {
                assert!(message.contains("'signing.password'"), "message was: {message}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn sign_request_carries_mode_and_coordinate() {
        struct Expect;
        impl ActionRunner for Expect {
            fn run(&self, request: &ActionRequest<'_>) -> Result<(), String> {
                if request.action.kind != ActionKind::Sign {
                    return Ok(());
                }
                match (request.signing, &request.coordinate) {
                    (Some(SigningMode::InMemory { .. }), Some(c))
                        if c.to_string() == "io.example:demo-jvm:0.1.0" =>
                    {
                        Ok(())
                    }
                    other => Err(format!("unexpected request {other:?}")),
                }
            }
        }
        let ctx = context(ConfigSnapshot::builder().environment(SIGNING).build());
        let report = run(&ctx, &["signJvmPublication"], &Expect);
        assert_eq!(report.outcome("signJvmPublication"), Some(&Outcome::Success));
    }

    #[test]
    fn remote_publish_request_carries_destination_url() {
        struct Expect;
        impl ActionRunner for Expect {
            fn run(&self, request: &ActionRequest<'_>) -> Result<(), String> {
                if request.action.name != "publishJvmPublicationToGitHubPackagesRepository" {
                    return Ok(());
                }
                match request.destination.as_deref() {
                    Some("https://maven.pkg.github.com/example/demo/io/example/demo-jvm/0.1.0") => {
                        Ok(())
                    }
                    other => Err(format!("unexpected destination {other:?}")),
                }
            }
        }
        let manifest = manifest(
            r#"
[project]
group = "io.example"
name = "demo"
version = "0.1.0"
targets = ["Jvm"]

[[repository]]
preset = "github-packages"
owner = "example"
repository = "demo"
"#,
        );
        let snapshot = ConfigSnapshot::builder()
            .environment([("GPR_USERNAME", "bob"), ("GPR_TOKEN", "ghp")])
            .build();
        let ctx = BuildContext::new(manifest, snapshot).unwrap_or_else(|e| panic!("{e}"));
        let report = run(&ctx, &["publish"], &Expect);
        assert_eq!(
            report.outcome("publishJvmPublicationToGitHubPackagesRepository"),
            Some(&Outcome::Success)
        );
    }

    /// Requesting only `publishJvmPublicationToMavenLocal` across both relation
    /// flags, signing on and off, and no/exclude/include target filters.
    #[test]
    fn single_local_publish_matrix() {
        const PUBLISH_JVM: &str = "publishJvmPublicationToMavenLocal";
        const SIGN_JVM: &str = "signJvmPublication";
        let flags = [None, Some("None"), Some("DependsOn"), Some("MustRunAfter")];
        let filters = [None, Some("targetFilter.exclude"), Some("targetFilter.include")];

        for sign_flag in flags {
            for publish_flag in flags {
                for signing in [false, true] {
                    for filter in filters {
                        let case = format!(
                            "sign={sign_flag:?} publish={publish_flag:?} signing={signing} filter={filter:?}"
                        );
                        let mut builder = ConfigSnapshot::builder();
                        if let Some(flag) = sign_flag {
                            builder = builder.property("signRelatesCheck", flag);
                        }
                        if let Some(flag) = publish_flag {
                            builder = builder.property("publishRelatesCheck", flag);
                        }
                        if signing {
                            builder = builder.environment(SIGNING);
                        }
                        if let Some(key) = filter {
                            builder = builder.property(key, "Jvm");
                        }
                        let ctx = context(builder.build());
                        let report = run(&ctx, &[PUBLISH_JVM], &DryRunRunner::new());

                        let sign_depends = signing && sign_flag.map_or(true, |f| f == "DependsOn");
                        let publish_depends = publish_flag.map_or(true, |f| f == "DependsOn");
                        let check = report.position(CHECK);
                        assert_eq!(check.is_some(), publish_depends || sign_depends, "{case}");
                        assert_eq!(report.position(SIGN_JVM).is_some(), signing, "{case}");

                        let expected = if filter == Some("targetFilter.exclude") {
                            Outcome::Skipped
                        } else {
                            Outcome::Success
                        };
                        assert_eq!(report.outcome(PUBLISH_JVM), Some(&expected), "{case}");
                        if signing {
                            assert_eq!(report.outcome(SIGN_JVM), Some(&expected), "{case}");
                            assert!(report.position(SIGN_JVM) < report.position(PUBLISH_JVM), "{case}");
                        }
                        if check.is_some() {
                            assert_eq!(report.outcome(CHECK), Some(&Outcome::Success), "{case}");
                            if publish_flag != Some("None") {
                                assert!(check < report.position(PUBLISH_JVM), "{case}");
                            }
                        }
                        assert_eq!(
                            report.entries().len(),
                            1 + usize::from(signing) + usize::from(check.is_some()),
                            "{case}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn upstream_failure_is_transitive() {
        let ctx = context(ConfigSnapshot::builder().environment(SIGNING).build());
        let runner = DryRunRunner::failing(["signLinuxX64Publication"]);
        let report = run(&ctx, &["publishToMavenLocal"], &runner);
        assert_eq!(
            report.outcome("publishLinuxX64PublicationToMavenLocal"),
            Some(&Outcome::UpstreamFailed {
                upstream: "signLinuxX64Publication".to_owned()
            })
        );
        assert_eq!(
            report.outcome("publishToMavenLocal"),
            Some(&Outcome::UpstreamFailed {
                upstream: "publishLinuxX64PublicationToMavenLocal".to_owned()
            })
        );
        assert_eq!(
            report.outcome("publishJvmPublicationToMavenLocal"),
            Some(&Outcome::Success)
        );
    }

    #[test]
    fn github_packages_repository_uses_its_own_keys() {
        let manifest = manifest(
            r#"
[project]
group = "io.example"
name = "demo"
version = "0.1.0"
targets = ["Jvm"]

[[repository]]
preset = "github-packages"
owner = "example"
repository = "demo"
"#,
        );
        let snapshot = ConfigSnapshot::builder()
            .environment([("GPR_USERNAME", "bob"), ("GPR_TOKEN", "ghp")])
            .build();
        let ctx = BuildContext::new(manifest, snapshot).unwrap_or_else(|e| panic!("{e}"));
        let report = run(&ctx, &["publish"], &DryRunRunner::new());
        assert_eq!(
            report.outcome("publishJvmPublicationToGitHubPackagesRepository"),
            Some(&Outcome::Success)
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::context::test_support::context;
    use crate::register::register;
    use assist_config::ConfigSnapshot;

    use proptest::prelude::{proptest, Just, ProptestConfig, Strategy};
    use proptest::prop_oneof;

    fn relation() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("None"), Just("DependsOn"), Just("MustRunAfter")]
    }

    fn exclude() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("Jvm")),
            Just(Some("(Jvm)|(LinuxX64)")),
            Just(Some("KotlinMultiplatform")),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Whenever a sign action and its publish action both run, the sign
        /// action completes first, whatever the relation flags say.
        #[test]
        fn sign_precedes_publish(
            sign_relation in relation(),
            publish_relation in relation(),
            exclude in exclude(),
        ) {
            let mut builder = ConfigSnapshot::builder()
                .environment([
                    ("GPG_SECRET_KEY", "armored"),
                    ("GPG_SIGNING_PASSWORD", "pw"),
                    ("OSSRH_USERNAME", "alice"),
                    ("OSSRH_PASSWORD", "s3cret"),
                ])
                .property("signRelatesCheck", sign_relation)
                .property("publishRelatesCheck", publish_relation);
            if let Some(pattern) = exclude {
                builder = builder.property("targetFilter.exclude", pattern);
            }
            let ctx = context(builder.build());
            let plan = register(&ctx).unwrap_or_else(|e| panic!("{e}"));
            let schedule = Schedule::all(&plan).unwrap_or_else(|e| panic!("{e}"));
            let report = execute(&ctx, &schedule, &plan, &DryRunRunner::new());

            for target in ctx.targets() {
                let sign = assist_targets::sign_action_name(&target);
                for repository in ["MavenLocal", "SonatypeStaging"] {
                    let publish = assist_targets::publish_action_name(&target, repository);
                    let both_ran = report.outcome(&sign) == Some(&Outcome::Success)
                        && report.outcome(&publish) == Some(&Outcome::Success);
                    if both_ran {
                        proptest::prop_assert!(report.position(&sign) < report.position(&publish));
                    }
                    let sign_pos = plan.find(&sign).and_then(|a| schedule.position(a));
                    let publish_pos = plan.find(&publish).and_then(|a| schedule.position(a));
                    proptest::prop_assert!(sign_pos < publish_pos);
                }
            }
        }
    }
}
