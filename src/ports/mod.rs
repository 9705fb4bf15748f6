//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ChatChannel` - outbound message rendering into the chat
//! - `TemplateRepository` / `EventRepository` - persistence for the
//!   scheduling records
//!
//! Inbound event delivery is not a trait: the transport simply calls
//! `application::UpdateDispatcher::dispatch`.

mod chat_channel;
mod event_repository;
mod template_repository;

pub use chat_channel::{ChannelError, ChatChannel, OutboundMessage};
pub use event_repository::EventRepository;
pub use template_repository::{RepositoryError, TemplateRepository};
