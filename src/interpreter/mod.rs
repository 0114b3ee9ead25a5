//! Virtual machine
//!
//! This module provides the execution side of the engine:
//! - [`engine`]: the [`engine::VirtualMachine`] and its frame and code-display handling
//! - [`context`]: state shared with the data-structure executors
//! - [`errors`]: runtime error types
//! - [`constants`]: loop and recursion caps, default timings
//!
//! # Execution Model
//!
//! The machine walks the checked AST one statement at a time. Each statement
//! moves the code pointer (when the current frame shows it) and then runs,
//! appending instructions to the stream. Data-structure operations are
//! dispatched to the executor for the instance's kind. The first runtime
//! error stops execution; the instructions recorded until then are kept.

pub mod constants;
pub mod context;
pub mod engine;
pub mod errors;
mod expressions;
mod loops;
mod statements;
