//! Scheduling domain - templates, events, cost splitting, and the
//! per-event advisory lock.

pub mod cost;
mod event;
mod lock;
mod template;

pub use cost::split_evenly;
pub use event::{EventStatus, ScheduledEvent};
pub use lock::EventLock;
pub use template::{parse_start_time, ActivityTemplate, Weekday, MAX_COURTS};
