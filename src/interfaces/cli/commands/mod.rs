//! CLI command implementations

mod config_gen;
mod queues;
mod workers;

pub use config_gen::*;
pub use queues::*;
pub use workers::*;
