//! Service layer for business logic
//!
//! Shared between the HTTP API and the CLI.

mod assignment_service;
mod queue_service;
mod suggestion_service;
mod worker_service;

pub use assignment_service::*;
pub use queue_service::*;
pub use suggestion_service::*;
pub use worker_service::*;
