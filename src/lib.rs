//! # Introduction
//!
//! Valgo checks and executes programs written in a small language for
//! animating data structures. Running a program produces an ordered stream
//! of animation instructions, one or more per logical operation, that an
//! external renderer turns into a video.
//!
//! ## Execution pipeline
//!
//! ```text
//! AST → Semantic analysis → Config validation → Virtual machine → Instruction stream
//! ```
//!
//! 1. [`ast`] — the program tree handed over by an external parser.
//! 2. [`semantic`] — two passes over the tree against a scoped
//!    [`semantic::symbol_table::SymbolTable`], collecting every error and
//!    warning.
//! 3. [`style`] — the host's style configuration, its validation, and the
//!    variable > type > default resolution of styles.
//! 4. [`interpreter`] — the frame-based virtual machine. Data-structure
//!    operations go to the per-kind [`executors`], which keep the logical
//!    contents in [`runtime`] values and append [`instructions`].
//! 5. [`compiler`] — [`compiler::compile`], the end-to-end entry point.
//!
//! ## Supported data structures
//!
//! `Stack<T>`, `Array<T>`, `List<T>`, `Tree<Node<T>>` and `Node<T>`, with
//! `T` one of `number`, `boolean`, `char` and `string`.

pub mod ast;
pub mod compiler;
pub mod executors;
pub mod instructions;
pub mod interpreter;
pub mod runtime;
pub mod semantic;
pub mod style;
pub mod types;

pub use compiler::{compile, Compilation, ExitStatus};
