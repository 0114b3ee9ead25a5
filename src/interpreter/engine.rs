// Virtual machine for checked programs

use crate::ast::{FunctionDecl, Line, Statement};
use crate::instructions::boundary::BoundaryMap;
use crate::instructions::{InstructionKind, InstructionStream};
use crate::interpreter::constants::CODE_POINTER_DURATION;
use crate::interpreter::context::ExecContext;
use crate::interpreter::errors::RuntimeError;
use crate::runtime::frame::{CallStack, Frame};
use crate::runtime::value::ExecValue;
use crate::semantic::CheckedProgram;
use crate::style::{CodeTracking, StyleResolver, CODE_ID, VARIABLES_ID};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

/// Control flow state for statement execution
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum ControlFlow {
    #[default]
    Normal,
    Break,
    Continue,
    Return(ExecValue),
}

/// Everything a run produced, including the partial stream of a failed run
#[derive(Debug)]
pub struct Execution {
    pub instructions: InstructionStream,
    pub boundaries: BoundaryMap,
    pub result: Result<(), RuntimeError>,
}

/// Executes a checked program and records its animation
pub struct VirtualMachine {
    /// Top-level statements
    statements: Rc<[Statement]>,

    /// Function definitions (name -> FunctionDecl)
    pub(crate) functions: FxHashMap<String, Rc<FunctionDecl>>,

    /// Call stack
    pub(crate) stack: CallStack,

    /// Output stream, boundaries and styles shared with the executors
    pub(crate) ctx: ExecContext,

    pub(crate) control_flow: ControlFlow,

    /// Current mode; `@stepInto`/`@stepOver` blocks override it for their body
    pub(crate) code_tracking: CodeTracking,
    hide_code: bool,
    hide_variables: bool,

    /// Source lines as shown in the code block
    code_lines: Vec<String>,

    /// Source line -> displayed line, when blank lines are dropped
    line_map: Option<Vec<Line>>,

    /// Lines of show-once subtitles that have been displayed
    pub(crate) shown_subtitles: FxHashSet<Line>,
}

impl VirtualMachine {
    /// Create a machine for `checked`, styled by an already validated resolver
    pub fn new(checked: CheckedProgram, styles: StyleResolver, source: Option<&str>) -> Self {
        let CheckedProgram { program, symbols } = checked;
        let config = styles.config();
        let code_tracking = config.code_tracking_mode();
        let hide_code = config.hide_code;
        let hide_variables = config.hide_variables;
        let keep_blank_lines = config.display_new_lines_in_code;

        let (code_lines, line_map) = code_listing(source.unwrap_or_default(), keep_blank_lines);

        let functions = program
            .functions
            .into_iter()
            .map(|function| (function.name.clone(), Rc::new(function)))
            .collect();

        VirtualMachine {
            statements: program.statements.into(),
            functions,
            stack: CallStack::new(),
            ctx: ExecContext::new(styles, symbols.variable_names().clone()),
            control_flow: ControlFlow::Normal,
            code_tracking,
            hide_code,
            hide_variables,
            code_lines,
            line_map,
            shown_subtitles: FxHashSet::default(),
        }
    }

    /// Run the program from start to finish
    #[tracing::instrument(level = "debug", skip_all, fields(statements = self.statements.len()))]
    pub fn run(mut self) -> Execution {
        let result = self.execute_program();
        match &result {
            Ok(()) => tracing::debug!(
                instructions = self.ctx.instructions.len(),
                "execution finished"
            ),
            Err(err) => tracing::debug!(line = err.line(), "execution stopped: {err}"),
        }
        Execution {
            instructions: self.ctx.instructions,
            boundaries: self.ctx.boundaries,
            result,
        }
    }

    fn execute_program(&mut self) -> Result<(), RuntimeError> {
        self.stack.push_frame(Frame::new("main", String::new(), true));
        self.emit_code_display()?;

        let statements = Rc::clone(&self.statements);
        for stmt in statements.iter() {
            self.execute_statement(stmt)?;
            if !matches!(self.control_flow, ControlFlow::Normal) {
                break;
            }
        }
        Ok(())
    }

    /// Code and variable blocks drawn before the first statement
    fn emit_code_display(&mut self) -> Result<(), RuntimeError> {
        if self.hide_code {
            return Ok(());
        }
        let config = self.ctx.styles.config();
        let highlighting = config
            .syntax_highlighting_on
            .then(|| config.syntax_highlighting_style.clone());
        let tab_spacing = config.tab_spacing;
        let boundary = self.ctx.placement(CODE_ID)?;
        let render = self.ctx.styles.renders(CODE_ID);
        self.ctx.emit(
            InstructionKind::CodeBlock {
                lines: self.code_lines.clone(),
                highlighting,
                tab_spacing,
                boundary,
            },
            0.0,
            render,
        );

        if !self.hide_variables {
            let boundary = self.ctx.placement(VARIABLES_ID)?;
            let render = self.ctx.styles.renders(VARIABLES_ID);
            self.ctx
                .emit(InstructionKind::VariableBlock { boundary }, 0.0, render);
        }
        Ok(())
    }

    pub(crate) fn frame(&self) -> Result<&Frame, RuntimeError> {
        self.stack
            .current_frame()
            .ok_or(RuntimeError::NoStackFrame { line: self.ctx.line })
    }

    pub(crate) fn frame_mut(&mut self) -> Result<&mut Frame, RuntimeError> {
        let line = self.ctx.line;
        self.stack
            .current_frame_mut()
            .ok_or(RuntimeError::NoStackFrame { line })
    }

    /// Record the statement being executed and move the code pointer to it
    pub(crate) fn step_to(&mut self, line: Line) -> Result<(), RuntimeError> {
        self.ctx.line = line;
        let frame = self.frame_mut()?;
        frame.line = line;
        let show_pointer = frame.show_code_pointer;

        if !self.hide_code && show_pointer {
            let displayed = self.displayed_line(line);
            let duration = CODE_POINTER_DURATION * self.ctx.time_scale();
            self.ctx
                .emit(InstructionKind::MoveToLine { line: displayed }, duration, true);
        }
        Ok(())
    }

    fn displayed_line(&self, line: Line) -> Line {
        match &self.line_map {
            Some(map) => map.get(line).copied().unwrap_or(line),
            None => line,
        }
    }

    /// Refresh the variable table after `frame` changed a variable
    pub(crate) fn update_variables(&mut self) -> Result<(), RuntimeError> {
        if self.hide_code || self.hide_variables {
            return Ok(());
        }
        let frame = self.frame()?;
        if !frame.show_code_pointer {
            return Ok(());
        }
        let entries = frame.displayed_variables();
        let duration = CODE_POINTER_DURATION * self.ctx.time_scale();
        self.ctx
            .emit(InstructionKind::UpdateVariables { entries }, duration, true);
        Ok(())
    }

    /// Whether calls made from the current frame move the code pointer
    pub(crate) fn callee_shows_code(&self) -> bool {
        let caller_shows = self
            .stack
            .current_frame()
            .is_some_and(|frame| frame.show_code_pointer);
        caller_shows && self.code_tracking == CodeTracking::StepInto
    }

    pub(crate) fn enter_scope(&mut self) {
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.push_scope();
        }
    }

    pub(crate) fn exit_scope(&mut self) {
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.pop_scope();
        }
    }
}

/// Lines of the code block, plus a source-to-display line map when blank
/// lines are left out
fn code_listing(source: &str, keep_blank_lines: bool) -> (Vec<String>, Option<Vec<Line>>) {
    if keep_blank_lines {
        return (source.lines().map(str::to_string).collect(), None);
    }
    let mut lines = Vec::new();
    // index 0 is unused so the map is indexed by 1-based source line
    let mut map = vec![0];
    for line in source.lines() {
        if !line.trim().is_empty() {
            lines.push(line.to_string());
        }
        map.push(lines.len().max(1));
    }
    (lines, Some(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_remapped_when_hidden() {
        let source = "let x = 1\n\nlet y = 2\n";
        let (lines, map) = code_listing(source, false);
        assert_eq!(lines, vec!["let x = 1", "let y = 2"]);
        let map = map.unwrap();
        assert_eq!(map[1], 1);
        assert_eq!(map[3], 2);
    }

    #[test]
    fn blank_lines_kept_by_default() {
        let (lines, map) = code_listing("a\n\nb", true);
        assert_eq!(lines.len(), 3);
        assert!(map.is_none());
    }
}
