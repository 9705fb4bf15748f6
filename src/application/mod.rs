//! Application layer - use cases wiring the domain to the ports.

pub mod handlers;
pub mod loaders;

mod dispatcher;
mod orchestrator;
mod registry;
mod wizard;

pub use dispatcher::{InboundUpdate, UpdateDispatcher};
pub use orchestrator::{CommandOrchestrator, OrchestratorError};
pub use registry::{build_registry, CommandDependencies};
pub use wizard::{WizardEngine, INACTIVITY_WINDOW};
