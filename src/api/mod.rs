//! HTTP API: middleware and JSON handlers mounted under `/api`

pub mod constants;
pub mod middleware;
pub mod services;
