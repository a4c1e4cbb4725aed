#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use assist_config::snapshot::parse_assignment;
use assist_config::{ConfigKey, ConfigSnapshot, Manifest, ResolvedValue, Resolver, Source};
use assist_engine::credentials::Repository;
use assist_engine::relation::RelationConfig;
use assist_engine::signing::{signing_state, SigningMode, SigningState};
use assist_engine::{
    execute, load_snapshot, register, BuildContext, DryRunRunner, Outcome, Overrides, Plan,
    Schedule, Secret,
};
use assist_targets::TargetName;

type CliResult = Result<(), Box<dyn Error>>;

/// Manifest read when `--manifest` is not given.
const DEFAULT_MANIFEST: &str = "assist.toml";

#[derive(Debug, Parser)]
#[command(name = "assist", about = "Signing and publishing policy for Maven publications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Path to the project manifest
    #[arg(long, global = true, default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,
    /// Set a build property (KEY=VALUE)
    #[arg(short = 'P', global = true, value_name = "KEY=VALUE")]
    property: Vec<String>,
    /// Set a system property (KEY=VALUE)
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE")]
    system_property: Vec<String>,
    /// Log policy decisions to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the actions scheduled for the given tasks (all actions if none)
    Plan {
        /// Action names to schedule
        tasks: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Execute the schedule with the dry-run runner
    Run {
        /// Action names to run (all actions if none)
        tasks: Vec<String>,
        /// Simulate failure of an action (repeatable)
        #[arg(long = "fail", value_name = "ACTION")]
        fail: Vec<String>,
    },
    /// Show where a setting resolves from
    Resolve {
        /// Build/system property key
        property: String,
        /// Environment variable key (build properties only if omitted)
        environment: Option<String>,
        /// Value to use when no source is set
        #[arg(long)]
        default: Option<String>,
        /// Print the value instead of its fingerprint
        #[arg(long)]
        show: bool,
    },
    /// Check manifest, signing, and credentials setup
    Doctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = overrides(&cli.property, &cli.system_property).and_then(|overrides| {
        match cli.command {
            Command::Plan { tasks, format } => cmd_plan(&cli.manifest, &overrides, &tasks, format),
            Command::Run { tasks, fail } => cmd_run(&cli.manifest, &overrides, &tasks, fail),
            Command::Resolve {
                property,
                environment,
                default,
                show,
            } => cmd_resolve(
                &cli.manifest,
                &overrides,
                &property,
                environment.as_deref(),
                default.as_deref(),
                show,
            ),
            Command::Doctor => cmd_doctor(&cli.manifest, &overrides),
        }
    });

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn overrides(
    properties: &[String],
    system_properties: &[String],
) -> Result<Overrides, Box<dyn Error>> {
    let properties = properties
        .iter()
        .map(|raw| parse_assignment("-P", raw))
        .collect::<Result<_, _>>()?;
    let system_properties = system_properties
        .iter()
        .map(|raw| parse_assignment("-D", raw))
        .collect::<Result<_, _>>()?;
    Ok(Overrides {
        properties,
        system_properties,
    })
}

fn load_manifest(path: &Path) -> Result<Manifest, Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "no {} found, pass --manifest to point at the project manifest",
            path.display()
        )
        .into());
    }
    Ok(Manifest::from_path(path)?)
}

fn load_context(path: &Path, overrides: &Overrides) -> Result<BuildContext, Box<dyn Error>> {
    let manifest = load_manifest(path)?;
    let snapshot = load_snapshot(&manifest, overrides)?;
    Ok(BuildContext::new(manifest, snapshot)?)
}

fn schedule_for(plan: &Plan, tasks: &[String]) -> Result<Schedule, Box<dyn Error>> {
    let schedule = if tasks.is_empty() {
        Schedule::all(plan)?
    } else {
        Schedule::for_requests(plan, tasks)?
    };
    Ok(schedule)
}

// ── plan ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PlanView<'a> {
    filter: String,
    relations: RelationConfig,
    signing: &'static str,
    actions: Vec<ActionView<'a>>,
}

#[derive(Debug, Serialize)]
struct ActionView<'a> {
    name: &'a str,
    kind: assist_engine::ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<&'a str>,
    enabled: bool,
    depends_on: Vec<&'a str>,
    must_run_after: Vec<&'a str>,
}

fn plan_view<'a>(ctx: &BuildContext, plan: &'a Plan, schedule: &Schedule) -> PlanView<'a> {
    let actions = schedule
        .order()
        .iter()
        .filter_map(|&r| plan.get(r))
        .map(|action| ActionView {
            name: &action.name,
            kind: action.kind,
            target: action.target.as_ref().map(TargetName::as_str),
            repository: action.repository.as_deref(),
            enabled: action.enabled,
            depends_on: action.depends_on.iter().map(|r| plan.name_of(*r)).collect(),
            must_run_after: action
                .must_run_after
                .iter()
                .map(|r| plan.name_of(*r))
                .collect(),
        })
        .collect();
    PlanView {
        filter: ctx.filter().to_string(),
        relations: ctx.relations(),
        signing: signing_label(ctx.signing()),
        actions,
    }
}

fn signing_label(state: &SigningState) -> &'static str {
    match state {
        SigningState::NotConfigured => "off",
        SigningState::Ready(mode) => mode.label(),
        SigningState::Misconfigured { .. } => "misconfigured",
    }
}

fn render_plan_text(view: &PlanView<'_>) -> String {
    let mut out = format!(
        "filter: {}\nrelations: sign={} publish={}\nsigning: {}\n\n",
        view.filter, view.relations.sign, view.relations.publish, view.signing
    );
    for action in &view.actions {
        let mut line = format!("{} [{}]", action.name, action.kind);
        if let Some(target) = action.target {
            line.push_str(&format!(" target={target}"));
        }
        if let Some(repository) = action.repository {
            line.push_str(&format!(" repository={repository}"));
        }
        if !action.enabled {
            line.push_str(" (disabled)");
        }
        out.push_str(&line);
        out.push('\n');
        if !action.depends_on.is_empty() {
            out.push_str(&format!("    depends on: {}\n", action.depends_on.join(", ")));
        }
        if !action.must_run_after.is_empty() {
            out.push_str(&format!(
                "    must run after: {}\n",
                action.must_run_after.join(", ")
            ));
        }
    }
    out
}

fn cmd_plan(manifest: &Path, overrides: &Overrides, tasks: &[String], format: Format) -> CliResult {
    let ctx = load_context(manifest, overrides)?;
    let plan = register(&ctx)?;
    let schedule = schedule_for(&plan, tasks)?;
    let view = plan_view(&ctx, &plan, &schedule);
    match format {
        Format::Text => print!("{}", render_plan_text(&view)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}

// ── run ───────────────────────────────────────────────────────────

fn cmd_run(
    manifest: &Path,
    overrides: &Overrides,
    tasks: &[String],
    fail: Vec<String>,
) -> CliResult {
    let ctx = load_context(manifest, overrides)?;
    let plan = register(&ctx)?;
    let schedule = schedule_for(&plan, tasks)?;
    for name in &fail {
        if plan.find(name).is_none() {
            return Err(format!("--fail names unknown action `{name}`").into());
        }
    }

    let report = execute(&ctx, &schedule, &plan, &DryRunRunner::failing(fail));
    for entry in report.entries() {
        match &entry.outcome {
            Outcome::Success => eprintln!("  [ok] {}", entry.action),
            Outcome::Skipped => eprintln!("  [--] {} (disabled by target filter)", entry.action),
            Outcome::Failed { message } => eprintln!("  [!!] {}: {message}", entry.action),
            Outcome::UpstreamFailed { upstream } => {
                eprintln!("  [!!] {}: not run, `{upstream}` failed", entry.action);
            }
        }
    }

    let failed = report.count(|o| matches!(o, Outcome::Failed { .. }));
    let upstream = report.count(|o| matches!(o, Outcome::UpstreamFailed { .. }));
    let skipped = report.count(|o| *o == Outcome::Skipped);
    let succeeded = report.count(|o| *o == Outcome::Success);
    eprintln!();
    if failed > 0 {
        Err(format!(
            "{failed} action(s) failed, {upstream} skipped after upstream failure"
        )
        .into())
    } else {
        eprintln!("{succeeded} action(s) succeeded, {skipped} skipped by target filter");
        Ok(())
    }
}

// ── resolve ───────────────────────────────────────────────────────

/// Snapshot for the manifest if it exists, otherwise from the environment
/// and overrides alone.
fn snapshot(manifest: &Path, overrides: &Overrides) -> Result<ConfigSnapshot, Box<dyn Error>> {
    if manifest.exists() {
        let manifest = Manifest::from_path(manifest)?;
        Ok(load_snapshot(&manifest, overrides)?)
    } else {
        Ok(overrides
            .apply(ConfigSnapshot::builder().process_environment())
            .build())
    }
}

fn describe(value: &str, source: Source, show: bool) -> String {
    let shown = if show {
        value.to_owned()
    } else {
        Secret::new(value.to_owned()).to_string()
    };
    format!("{shown} (from {source})")
}

fn cmd_resolve(
    manifest: &Path,
    overrides: &Overrides,
    property: &str,
    environment: Option<&str>,
    default: Option<&str>,
    show: bool,
) -> CliResult {
    let key = match environment {
        Some(environment) => ConfigKey::new(property, environment)?,
        None => ConfigKey::build_property(property)?,
    };
    let snapshot = snapshot(manifest, overrides)?;
    let resolved = Resolver::new(&snapshot).resolve(&key);
    match (resolved, default) {
        (ResolvedValue::Present { value, source }, _) => {
            println!("{key}: {}", describe(&value, source, show));
        }
        (ResolvedValue::Absent { .. }, Some(default)) => println!("{key}: {default} (default)"),
        (ResolvedValue::Absent { diagnostic }, None) => return Err(diagnostic.into()),
    }
    Ok(())
}

// ── doctor ────────────────────────────────────────────────────────

fn cmd_doctor(manifest_path: &Path, overrides: &Overrides) -> CliResult {
    eprintln!("Checking publishing setup...");
    eprintln!();

    let mut issues = 0u32;

    let manifest = match load_manifest(manifest_path) {
        Ok(manifest) => {
            eprintln!(
                "  [ok] Project: {}:{}:{} ({})",
                manifest.project.group,
                manifest.project.name,
                manifest.project.version,
                manifest.project.targets.join(", ")
            );
            manifest
        }
        Err(e) => {
            eprintln!("  [!!] {}: {e}", manifest_path.display());
            return Err("1 issue(s) found".into());
        }
    };

    let snapshot = match load_snapshot(&manifest, overrides) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("  [!!] Configuration: {e}");
            return Err("1 issue(s) found".into());
        }
    };
    let resolver = Resolver::new(&snapshot);

    match assist_engine::filter::filter_rule(&resolver) {
        Ok(rule) => eprintln!("  [ok] Target filter: {rule}"),
        Err(e) => {
            eprintln!("  [!!] Target filter: {e}");
            issues = issues.saturating_add(1);
        }
    }

    match RelationConfig::from_resolver(&resolver) {
        Ok(relations) => eprintln!(
            "  [ok] Relations: sign={} publish={}",
            relations.sign, relations.publish
        ),
        Err(e) => {
            eprintln!("  [!!] Relations: {e}");
            issues = issues.saturating_add(1);
        }
    }

    match signing_state(&resolver) {
        SigningState::NotConfigured => {
            eprintln!("  [--] Signing: not configured, sign actions are not registered");
        }
        SigningState::Ready(SigningMode::GpgCommand { key_name, .. }) => {
            match assist_util::process::probe_version("gpg") {
                Some(version) => eprintln!("  [ok] Signing: gpg command, key {key_name} ({version})"),
                None => {
                    eprintln!("  [!!] Signing: gpg command selected but `gpg --version` failed, install GnuPG or unset signing.gnupg.keyName");
                    issues = issues.saturating_add(1);
                }
            }
        }
        SigningState::Ready(SigningMode::InMemory { key_id, secret_key, .. }) => {
            eprintln!(
                "  [ok] Signing: in-memory key {} ({})",
                key_id.as_deref().unwrap_or("<no key id>"),
                secret_key
            );
        }
        SigningState::Misconfigured { message } => {
            eprintln!("  [!!] Signing: {message}");
            issues = issues.saturating_add(1);
        }
    }

    for decl in &manifest.repositories {
        let repository = Repository::from_decl(decl);
        match repository.credentials(&resolver) {
            Ok(credentials) => eprintln!(
                "  [ok] Repository {}: {} as {}",
                repository.name, repository.url, credentials.username
            ),
            Err(e) => {
                eprintln!("  [!!] Repository {}: {e}", repository.name);
                issues = issues.saturating_add(1);
            }
        }
    }

    match assist_util::maven::maven_local_repository() {
        Ok(path) => eprintln!("  [ok] Maven local: {}", path.display()),
        Err(e) => {
            eprintln!("  [!!] Maven local: {e}");
            issues = issues.saturating_add(1);
        }
    }

    eprintln!();
    if issues > 0 {
        eprintln!("{issues} issue(s) found, fix them before publishing");
        Err(format!("{issues} issue(s) found").into())
    } else {
        eprintln!("All checks passed");
        Ok(())
    }
}
