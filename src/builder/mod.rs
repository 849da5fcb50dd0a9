//! Incremental C build engine.
//!
//! The passes run in this order over one [`Inventory`](crate::core::Inventory):
//! dependency resolution (see [`crate::scan`]), staleness propagation,
//! orchestration of compiles and the link, and finally the ledger update.

pub mod context;
pub mod errors;
pub mod graph;
pub mod ledger_policy;
pub mod orchestrator;
pub mod staleness;
pub mod toolchain;

pub use context::{BuildContext, BuildProfile};
pub use errors::BuildError;
pub use graph::IncludeGraph;
pub use ledger_policy::next_ledger;
pub use orchestrator::{BuildOrchestrator, BuildOutcome, LinkOutcome};
pub use staleness::{propagate, SeedMode, StalenessReport};
pub use toolchain::{CommandSpec, CompileInput, GccToolchain, LinkInput, Toolchain};
