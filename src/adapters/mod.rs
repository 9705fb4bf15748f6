//! Adapters - implementations of the ports.

pub mod chat;
pub mod memory;
