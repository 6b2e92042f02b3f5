//! Dutyroster - Workers Jobs Manager
//!
//! Schedules workers into guard-duty time slots and full-day tasks, keeps
//! fairness counters up to date and rotates per-task round-robin queues.
//!
//! # Architecture
//! - `storage`: SeaORM entities access, converters and retry
//! - `services`: scheduling rules (assign/remove, queues, suggestions)
//! - `api`: HTTP services and middleware
//! - `interfaces`: operator CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
