//! Publishing policy: target filtering, signing and credential resolution,
//! action registration, scheduling, and execution.

pub mod context;
pub mod credentials;
pub mod error;
pub mod execute;
pub mod filter;
pub mod plan;
pub mod register;
pub mod relation;
pub mod schedule;
pub mod secret;
pub mod signing;

pub use context::{load_snapshot, BuildContext, Overrides};
pub use error::EngineError;
pub use execute::{
    execute, ActionRequest, ActionRunner, DryRunRunner, ExecutionReport, Outcome, ReportEntry,
};
pub use plan::{Action, ActionKind, ActionRef, Plan};
pub use register::register;
pub use relation::{RelationConfig, RelationPolicy};
pub use schedule::Schedule;
pub use secret::Secret;
pub use signing::{SigningMode, SigningState};
