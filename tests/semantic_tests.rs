// Integration tests for semantic analysis

use pretty_assertions::assert_eq;
use valgo::ast::build::*;
use valgo::ast::{BinaryOp, Expr, Program};
use valgo::semantic::analyze;
use valgo::semantic::diagnostics::SemanticError;
use valgo::types::Type;

fn errors(program: Program) -> Vec<SemanticError> {
    analyze(program).diagnostics.errors().to_vec()
}

#[test]
fn test_valid_program_passes() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "s", new_ds(1, Type::stack(Type::Number), vec![], vec![])),
            expr(2, method(2, "s", "push", vec![num(2, 4.0)])),
            let_(3, "top", method(3, "s", "pop", vec![])),
        ],
    };
    let analysis = analyze(program);
    assert!(analysis.is_ok(), "{:?}", analysis.diagnostics.messages());
}

#[test]
fn test_call_before_declaration_reports_both_lines() {
    // main calls f(1, 2) at line 5, f is declared at line 1 with one parameter
    let program = Program {
        functions: vec![function(
            1,
            "f",
            &[("x", Type::Number)],
            Type::Void,
            vec![],
        )],
        statements: vec![expr(5, call(5, "f", vec![num(5, 1.0), num(5, 2.0)]))],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::FunctionArity {
            function: "f".into(),
            expected: 1,
            found: 2,
            declared_line: 1,
            line: 5,
        }]
    );
}

#[test]
fn test_mutual_recursion_is_allowed() {
    // Each function calls the other, which the body pass sees only because
    // signatures are collected first
    let is_even = function(
        1,
        "isEven",
        &[("n", Type::Number)],
        Type::Bool,
        vec![
            if_else(
                2,
                binary(2, BinaryOp::Eq, ident(2, "n"), num(2, 0.0)),
                vec![ret(3, Some(boolean(3, true)))],
                None,
            ),
            ret(
                5,
                Some(call(
                    5,
                    "isOdd",
                    vec![binary(5, BinaryOp::Sub, ident(5, "n"), num(5, 1.0))],
                )),
            ),
        ],
    );
    let is_odd = function(
        7,
        "isOdd",
        &[("n", Type::Number)],
        Type::Bool,
        vec![
            if_else(
                8,
                binary(8, BinaryOp::Eq, ident(8, "n"), num(8, 0.0)),
                vec![ret(9, Some(boolean(9, false)))],
                None,
            ),
            ret(
                11,
                Some(call(
                    11,
                    "isEven",
                    vec![binary(11, BinaryOp::Sub, ident(11, "n"), num(11, 1.0))],
                )),
            ),
        ],
    );
    let program = Program {
        functions: vec![is_even, is_odd],
        statements: vec![let_(13, "answer", call(13, "isEven", vec![num(13, 4.0)]))],
    };
    assert_eq!(errors(program), vec![]);
}

#[test]
fn test_one_armed_if_does_not_return_on_every_path() {
    let program = Program {
        functions: vec![function(
            1,
            "sign",
            &[("n", Type::Number)],
            Type::Number,
            vec![if_else(
                2,
                binary(2, BinaryOp::Gt, ident(2, "n"), num(2, 0.0)),
                vec![ret(3, Some(num(3, 1.0)))],
                None,
            )],
        )],
        statements: vec![],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::MissingReturn {
            function: "sign".into(),
            return_type: Type::Number,
            line: 1,
        }]
    );
}

#[test]
fn test_break_outside_loop() {
    let program = Program {
        functions: vec![],
        statements: vec![valgo::ast::Statement::Break { line: 2 }],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::LoopControlOutsideLoop {
            keyword: "break",
            line: 2,
        }]
    );
}

#[test]
fn test_return_from_global_scope() {
    let program = Program {
        functions: vec![],
        statements: vec![ret(1, None)],
    };
    assert_eq!(errors(program), vec![SemanticError::GlobalReturn { line: 1 }]);
}

#[test]
fn test_every_error_is_collected() {
    // Analysis keeps going after the first fault
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "x", num(1, 1.0)),
            let_(2, "x", num(2, 2.0)),
            assign(3, "y", num(3, 3.0)),
            let_(4, "s", new_ds(4, Type::stack(Type::Number), vec![], vec![])),
            expr(5, method(5, "s", "append", vec![num(5, 1.0)])),
        ],
    };
    let errors = errors(program);
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors.iter().map(SemanticError::line).collect::<Vec<_>>(),
        vec![2, 3, 5]
    );
}

#[test]
fn test_method_argument_type_is_checked() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "s", new_ds(1, Type::stack(Type::Number), vec![], vec![])),
            expr(2, method(2, "s", "push", vec![string(2, "text")])),
        ],
    };
    let errors = errors(program);
    assert!(
        matches!(
            errors.as_slice(),
            [SemanticError::WrongArgumentType { position: 1, line: 2, .. }]
        ),
        "{errors:?}"
    );
}

#[test]
fn test_array_constructor_needs_a_size() {
    let program = Program {
        functions: vec![],
        statements: vec![let_(
            1,
            "a",
            new_ds(1, Type::array(Type::Number), vec![], vec![]),
        )],
    };
    let errors = errors(program);
    assert!(
        matches!(
            errors.as_slice(),
            [SemanticError::MissingConstructorArguments { line: 1, .. }]
        ),
        "{errors:?}"
    );
}

#[test]
fn test_null_cannot_infer_a_type() {
    let program = Program {
        functions: vec![],
        statements: vec![let_(1, "n", null(1))],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::CannotInferFromNull {
            name: "n".into(),
            line: 1,
        }]
    );
}

#[test]
fn test_loop_variable_cannot_be_reassigned() {
    let program = Program {
        functions: vec![],
        statements: vec![for_range(
            1,
            "i",
            num(1, 0.0),
            num(1, 3.0),
            vec![assign(2, "i", num(2, 10.0))],
        )],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::LoopVariableReassigned {
            name: "i".into(),
            line: 2,
        }]
    );
}

#[test]
fn test_functions_do_not_see_globals() {
    let program = Program {
        functions: vec![function(
            3,
            "f",
            &[],
            Type::Number,
            vec![ret(4, Some(ident(4, "g")))],
        )],
        statements: vec![let_(1, "g", num(1, 1.0))],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::Undeclared {
            name: "g".into(),
            line: 4,
        }]
    );
}

#[test]
fn test_sequential_analyses_are_independent() {
    let bad = Program {
        functions: vec![],
        statements: vec![assign(1, "missing", num(1, 1.0))],
    };
    let good = Program {
        functions: vec![],
        statements: vec![let_(1, "x", num(1, 1.0))],
    };
    assert!(!analyze(bad).is_ok());
    let analysis = analyze(good);
    assert!(analysis.is_ok());
    assert!(analysis.diagnostics.errors().is_empty());
}

#[test]
fn test_return_type_mismatch() {
    let program = Program {
        functions: vec![function(
            1,
            "f",
            &[],
            Type::Number,
            vec![ret(2, Some(boolean(2, true)))],
        )],
        statements: vec![],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::ReturnTypeMismatch {
            function: "f".into(),
            expected: Type::Number,
            found: Type::Bool,
            line: 2,
        }]
    );
}

#[test]
fn test_void_result_cannot_initialise_a_variable() {
    let program = Program {
        functions: vec![function(1, "f", &[], Type::Void, vec![])],
        statements: vec![let_(3, "x", call(3, "f", vec![]))],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::VoidDeclaration {
            name: "x".into(),
            line: 3,
        }]
    );
}

#[test]
fn test_method_arity_is_checked() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "s", new_ds(1, Type::stack(Type::Number), vec![], vec![])),
            let_(2, "n", method(2, "s", "size", vec![num(2, 1.0)])),
        ],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::WrongArity {
            data_structure: Type::stack(Type::Number),
            method: "size".into(),
            found: 1,
            line: 2,
        }]
    );
}

#[test]
fn test_assignment_keeps_declared_type() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "x", num(1, 1.0)),
            assign(2, "x", string(2, "one")),
        ],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::MismatchedAssignment {
            name: "x".into(),
            expected: Type::Number,
            found: Type::String,
            line: 2,
        }]
    );
}

#[test]
fn test_unknown_method_on_stack() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "s", new_ds(1, Type::stack(Type::Number), vec![], vec![])),
            expr(2, method(2, "s", "append", vec![num(2, 1.0)])),
        ],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::UnsupportedMethod {
            data_structure: Type::stack(Type::Number),
            method: "append".into(),
            line: 2,
        }]
    );
}

fn grid(line: usize, rows: Vec<Vec<Expr>>) -> Expr {
    new_grid(line, Type::array_2d(Type::Number), vec![], rows)
}

#[test]
fn test_grid_needs_two_indices() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(1, "g", grid(1, vec![vec![num(1, 1.0)], vec![num(1, 2.0)]])),
            let_(2, "row", index(2, "g", num(2, 0.0))),
            let_(3, "value", cell(3, "g", num(3, 1.0), num(3, 0.0))),
        ],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::ArrayIndexCount {
            dimensions: 2,
            found: 1,
            line: 2,
        }]
    );
}

#[test]
fn test_grid_constructor_takes_rows_and_columns() {
    let program = Program {
        functions: vec![],
        statements: vec![
            let_(
                1,
                "g",
                new_ds(1, Type::array_2d(Type::Number), vec![num(1, 3.0)], vec![]),
            ),
            let_(
                2,
                "h",
                new_ds(2, Type::array_2d(Type::Number), vec![num(2, 3.0), num(2, 2.0)], vec![]),
            ),
        ],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::ArrayConstructorDimensions {
            dimensions: 2,
            found: 1,
            line: 1,
        }]
    );
}

#[test]
fn test_grid_rows_must_have_equal_length() {
    let program = Program {
        functions: vec![],
        statements: vec![let_(
            4,
            "g",
            grid(4, vec![vec![num(4, 1.0), num(4, 2.0)], vec![num(4, 3.0)]]),
        )],
    };
    assert_eq!(errors(program), vec![SemanticError::RaggedInitialiser { line: 4 }]);
}

#[test]
fn test_row_initialiser_needs_a_grid() {
    let program = Program {
        functions: vec![],
        statements: vec![let_(
            1,
            "a",
            new_grid(1, Type::array(Type::Number), vec![], vec![vec![num(1, 1.0)]]),
        )],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::InitialiserShape {
            data_structure: Type::array(Type::Number),
            line: 1,
        }]
    );
}

#[test]
fn test_arrays_stop_at_two_dimensions() {
    let cube = Type::array(Type::array_2d(Type::Number));
    let program = Program {
        functions: vec![],
        statements: vec![let_(1, "c", new_ds(1, cube.clone(), vec![num(1, 2.0)], vec![]))],
    };
    assert_eq!(
        errors(program),
        vec![SemanticError::InvalidElementType {
            data_structure: cube,
            line: 1,
        }]
    );
}

#[test]
fn test_annotation_blocks_share_the_enclosing_scope() {
    let program = Program {
        functions: vec![],
        statements: vec![
            step_over(1, None, vec![let_(2, "x", num(2, 1.0))]),
            speed(3, num(3, 2.0), None, vec![let_(4, "y", ident(4, "x"))]),
            let_(5, "z", ident(5, "y")),
        ],
    };
    assert_eq!(errors(program), vec![]);
}

#[test]
fn test_annotation_condition_must_be_boolean() {
    let program = Program {
        functions: vec![],
        statements: vec![
            speed(1, string(1, "fast"), None, vec![]),
            subtitle(2, "hello", Some(num(2, 1.0)), false),
        ],
    };
    assert_eq!(
        errors(program),
        vec![
            SemanticError::UnexpectedType {
                context: "speed factor",
                expected: Type::Number,
                found: Type::String,
                line: 1,
            },
            SemanticError::UnexpectedType {
                context: "annotation condition",
                expected: Type::Bool,
                found: Type::Number,
                line: 2,
            },
        ]
    );
}
