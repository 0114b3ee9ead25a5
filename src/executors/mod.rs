//! Per-kind data-structure executors
//!
//! Each supported kind has one stateless executor implementing
//! [`DataStructureExecutor`]. The virtual machine picks the executor with
//! [`executor_for`] and hands it the shared [`ExecContext`]; the executor
//! updates the logical contents of the instance and appends the matching
//! instructions in the same step.
//!
//! Executors that do not support element access keep the default
//! [`DataStructureExecutor::read`] and [`DataStructureExecutor::write`],
//! which report an unsupported operation.

pub mod array;
pub mod array_2d;
pub mod stack;
pub mod tree;

use crate::ast::NodeField;
use crate::interpreter::context::ExecContext;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::value::ExecValue;
use crate::types::{DataStructureKind, DataStructureType};

pub use array::ArrayExecutor;
pub use stack::StackExecutor;
pub use tree::TreeExecutor;

/// Everything needed to build one instance
#[derive(Debug)]
pub struct ConstructRequest<'a> {
    pub ty: &'a DataStructureType,
    pub arguments: Vec<ExecValue>,
    pub initialiser: Vec<ExecValue>,
    /// Row initialiser of a 2D array
    pub rows: Vec<Vec<ExecValue>>,
    /// Instance id: frame prefix plus variable name
    pub uid: String,
    /// Variable the instance is bound to, for labels and style lookup
    pub label: &'a str,
}

/// A method invocation on an instance
#[derive(Debug)]
pub struct MethodCall<'a> {
    /// Variable the instance was reached through
    pub variable: &'a str,
    pub method: &'a str,
    pub arguments: Vec<ExecValue>,
    /// The call is itself an argument of another method call
    pub nested: bool,
    /// The result is consumed by an enclosing expression
    pub as_expression: bool,
}

/// How an element of an instance is addressed
#[derive(Debug, Clone, Copy)]
pub enum Accessor<'a> {
    Index(&'a ExecValue),
    /// Row then column of a 2D array
    Cell(&'a ExecValue, &'a ExecValue),
    Chain {
        from_root: bool,
        chain: &'a [NodeField],
    },
}

pub trait DataStructureExecutor {
    fn construct(
        &self,
        ctx: &mut ExecContext,
        request: ConstructRequest<'_>,
    ) -> Result<ExecValue, RuntimeError>;

    fn call_method(
        &self,
        ctx: &mut ExecContext,
        call: MethodCall<'_>,
        instance: &ExecValue,
    ) -> Result<ExecValue, RuntimeError>;

    fn read(
        &self,
        ctx: &mut ExecContext,
        _instance: &ExecValue,
        _accessor: Accessor<'_>,
    ) -> Result<ExecValue, RuntimeError> {
        Err(RuntimeError::UnsupportedOperation {
            operation: "element read".to_string(),
            line: ctx.line,
        })
    }

    fn write(
        &self,
        ctx: &mut ExecContext,
        _instance: &ExecValue,
        _accessor: Accessor<'_>,
        _value: ExecValue,
    ) -> Result<(), RuntimeError> {
        Err(RuntimeError::UnsupportedOperation {
            operation: "element write".to_string(),
            line: ctx.line,
        })
    }
}

pub fn executor_for(kind: DataStructureKind) -> &'static dyn DataStructureExecutor {
    match kind {
        DataStructureKind::Stack => &StackExecutor,
        DataStructureKind::Array | DataStructureKind::List => &ArrayExecutor,
        DataStructureKind::Tree | DataStructureKind::Node => &TreeExecutor,
    }
}

/// Kind of the instance behind a runtime value
pub fn kind_of(value: &ExecValue) -> Option<DataStructureKind> {
    match value {
        ExecValue::Stack(_) => Some(DataStructureKind::Stack),
        ExecValue::Array(_) | ExecValue::Array2D(_) => Some(DataStructureKind::Array),
        ExecValue::List(_) => Some(DataStructureKind::List),
        ExecValue::Tree(_) => Some(DataStructureKind::Tree),
        ExecValue::Node(_) => Some(DataStructureKind::Node),
        _ => None,
    }
}

/// A type error naming what the executor expected
pub(crate) fn mismatch(
    ctx: &ExecContext,
    expected: &'static str,
    found: &ExecValue,
) -> RuntimeError {
    RuntimeError::TypeError {
        expected,
        found: found.to_string(),
        line: ctx.line,
    }
}

pub(crate) fn unsupported(
    ctx: &ExecContext,
    kind: DataStructureKind,
    method: &str,
) -> RuntimeError {
    RuntimeError::UnsupportedOperation {
        operation: format!("{}.{method}", kind.name()),
        line: ctx.line,
    }
}

/// Optional label shown next to an instance
pub(crate) fn label(show: bool, variable: &str) -> Option<String> {
    (show && !variable.is_empty()).then(|| variable.to_string())
}
