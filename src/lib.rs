//! Matchday - Chat-Operated Scheduling Assistant
//!
//! This crate lets a group chat create recurring activity templates, spawn
//! scheduled events from them, and finalize or cancel those events through
//! short commands. Commands invoked with missing arguments are completed
//! conversationally, one field at a time, by the wizard engine.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
