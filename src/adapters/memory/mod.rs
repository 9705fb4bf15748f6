//! In-memory repository adapters.

mod event_store;
mod template_store;

pub use event_store::InMemoryEventStore;
pub use template_store::InMemoryTemplateStore;
