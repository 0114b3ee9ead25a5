//! Call stack implementation
//!
//! This module provides the call stack for function execution:
//! - [`CallStack`]: The call stack containing frames
//! - [`Frame`]: A single function's activation record
//!
//! # Scoping
//!
//! Blocks inside a function push a scope onto the frame. Declaring a name
//! that already exists shadows it for the rest of the block; popping the
//! scope drops the block's declarations and restores what they shadowed.
//!
//! # Name prefixes
//!
//! Each frame carries a prefix (`""` for the program body, `"name."` inside
//! function `name`). Prefixed variable names are the instance ids used to
//! look up positions, so a local `s` in `f` is configured as `f.s`.

use super::value::ExecValue;
use crate::ast::Line;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct ScopeData {
    shadowed: Vec<(String, ExecValue)>,
    declared: Vec<String>,
}

/// Activation record for the program body or one function call
#[derive(Debug, Clone)]
pub struct Frame {
    pub function_name: String,
    pub prefix: String,
    /// Line of the statement being executed, for error attribution
    pub line: Line,
    /// Whether statements in this frame move the code pointer
    pub show_code_pointer: bool,
    variables: FxHashMap<String, ExecValue>,
    insertion_order: Vec<String>, // Track order of variable declarations
    scope_stack: Vec<ScopeData>,
    local_data_structures: Vec<String>,
}

impl Frame {
    pub fn new(function_name: &str, prefix: String, show_code_pointer: bool) -> Self {
        Frame {
            function_name: function_name.to_string(),
            prefix,
            line: 0,
            show_code_pointer,
            variables: FxHashMap::default(),
            insertion_order: Vec::new(),
            scope_stack: Vec::new(),
            local_data_structures: Vec::new(),
        }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scope_stack.push(ScopeData {
            shadowed: Vec::new(),
            declared: Vec::new(),
        });
    }

    /// Exit the current scope
    pub fn pop_scope(&mut self) {
        if let Some(scope) = self.scope_stack.pop() {
            // Remove variables declared in this scope
            for name in scope.declared {
                self.variables.remove(&name);
                if let Some(pos) = self.insertion_order.iter().rposition(|x| x == &name) {
                    self.insertion_order.remove(pos);
                }
            }

            // Restore shadowed variables
            for (name, value) in scope.shadowed {
                self.variables.insert(name, value);
            }
        }
    }

    /// Declare a new variable in the innermost scope
    pub fn declare(&mut self, name: &str, value: ExecValue) {
        if let Some(scope) = self.scope_stack.last_mut() {
            if let Some(old) = self.variables.insert(name.to_string(), value) {
                scope.shadowed.push((name.to_string(), old));
            } else {
                scope.declared.push(name.to_string());
                self.insertion_order.push(name.to_string());
            }
        } else {
            if !self.variables.contains_key(name) {
                self.insertion_order.push(name.to_string());
            }
            self.variables.insert(name.to_string(), value);
        }
    }

    /// Overwrite an existing variable. Returns false if it is not visible.
    pub fn assign(&mut self, name: &str, value: ExecValue) -> bool {
        match self.variables.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExecValue> {
        self.variables.get(name)
    }

    /// Instance id for a variable declared in this frame
    pub fn uid(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Remember a visual object created while this frame was active
    pub fn record_data_structure(&mut self, ident: String) {
        self.local_data_structures.push(ident);
    }

    pub fn local_data_structures(&self) -> &[String] {
        &self.local_data_structures
    }

    /// `name = value` lines for the variable table, in declaration order
    pub fn displayed_variables(&self) -> Vec<String> {
        self.insertion_order
            .iter()
            .filter_map(|name| {
                self.variables
                    .get(name)
                    .filter(|value| value.is_displayable())
                    .map(|value| format!("{name} = {value}"))
            })
            .collect()
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack { frames: Vec::new() }
    }

    /// Push a new frame
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the top frame
    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Get a mutable reference to the current frame
    pub fn current_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popping_scope_restores_shadowed_value() {
        let mut frame = Frame::new("main", String::new(), true);
        frame.declare("x", ExecValue::Number(1.0));
        frame.push_scope();
        frame.declare("x", ExecValue::Number(2.0));
        frame.declare("y", ExecValue::Bool(true));
        assert_eq!(frame.get("x"), Some(&ExecValue::Number(2.0)));
        frame.pop_scope();
        assert_eq!(frame.get("x"), Some(&ExecValue::Number(1.0)));
        assert_eq!(frame.get("y"), None);
    }

    #[test]
    fn assign_requires_existing_variable() {
        let mut frame = Frame::new("main", String::new(), true);
        assert!(!frame.assign("x", ExecValue::Number(1.0)));
        frame.declare("x", ExecValue::Number(1.0));
        assert!(frame.assign("x", ExecValue::Number(5.0)));
        assert_eq!(frame.get("x"), Some(&ExecValue::Number(5.0)));
    }

    #[test]
    fn uid_uses_frame_prefix() {
        let frame = Frame::new("f", "f.".into(), true);
        assert_eq!(frame.uid("s"), "f.s");
    }

    #[test]
    fn displayed_variables_keep_declaration_order() {
        let mut frame = Frame::new("main", String::new(), true);
        frame.declare("b", ExecValue::Number(2.0));
        frame.declare("a", ExecValue::Char('z'));
        assert_eq!(frame.displayed_variables(), vec!["b = 2", "a = z"]);
    }
}
