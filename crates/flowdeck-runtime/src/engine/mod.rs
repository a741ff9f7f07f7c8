//! Workflow execution engine.
//!
//! This module provides the runtime for executing resolved workflows:
//! - [`Engine`]: the main execution engine
//! - [`EngineConfig`]: configuration options
//! - [`ExecutionContext`]: per-run node outputs and error trace
//! - [`RunResult`], [`RunStatus`]: the outcome returned to callers

mod config;
mod context;
mod executor;
pub mod prompt;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use context::{ExecutionContext, NodeError, PortValue};
pub use executor::{Engine, RunResult, RunStatus};
