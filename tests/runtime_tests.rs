// Integration tests for program execution and the instruction stream

use pretty_assertions::assert_eq;
use valgo::ast::build::*;
use valgo::ast::{AssignTarget, BinaryOp, NodeField, Program, Statement};
use valgo::instructions::{Instruction, InstructionKind};
use valgo::interpreter::constants::MAX_CALL_DEPTH;
use valgo::interpreter::errors::RuntimeError;
use valgo::style::{Position, StyleConfig};
use valgo::types::Type;
use valgo::{compile, Compilation, ExitStatus};

fn run(statements: Vec<Statement>) -> Compilation {
    run_with(Program { functions: vec![], statements }, StyleConfig::default())
}

fn run_with(program: Program, config: StyleConfig) -> Compilation {
    compile(program, None, config).expect("configuration is valid")
}

fn mutations(compilation: &Compilation) -> Vec<InstructionKind> {
    compilation
        .instructions
        .iter()
        .filter(|i| i.is_mutation())
        .map(|i| i.kind.clone())
        .collect()
}

fn pointer_lines(compilation: &Compilation) -> Vec<usize> {
    compilation
        .instructions
        .iter()
        .filter_map(|i| match i.kind {
            InstructionKind::MoveToLine { line } => Some(line),
            _ => None,
        })
        .collect()
}

fn new_stack(line: usize, name: &str) -> Statement {
    let_(line, name, new_ds(line, Type::stack(Type::Number), vec![], vec![]))
}

#[test]
fn test_stack_push_pop_order() {
    let compilation = run(vec![
        new_stack(1, "s"),
        expr(2, method(2, "s", "push", vec![num(2, 1.0)])),
        expr(3, method(3, "s", "push", vec![num(3, 2.0)])),
        let_(4, "top", method(4, "s", "pop", vec![])),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let kinds = mutations(&compilation);
    assert_eq!(kinds.len(), 4);
    assert!(matches!(&kinds[0], InstructionKind::ConstructStack { uid, .. } if uid == "s"));
    assert!(matches!(
        &kinds[1],
        InstructionKind::StackPush { block, reused: false, .. } if block == "rectangle1"
    ));
    assert!(matches!(
        &kinds[2],
        InstructionKind::StackPush { block, reused: false, .. } if block == "rectangle2"
    ));
    assert!(matches!(
        &kinds[3],
        InstructionKind::StackPop { block, keep_block: false, .. } if block == "rectangle2"
    ));

    assert_eq!(
        compilation.instructions.as_slice().last().map(|i| &i.kind),
        Some(&InstructionKind::UpdateVariables {
            entries: vec!["top = 2".to_string()],
        })
    );
}

#[test]
fn test_popped_block_moves_to_receiving_stack() {
    let compilation = run(vec![
        new_stack(1, "a"),
        new_stack(2, "b"),
        expr(3, method(3, "a", "push", vec![num(3, 7.0)])),
        expr(4, method(4, "b", "push", vec![method(4, "a", "pop", vec![])])),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let kinds = mutations(&compilation);
    assert_eq!(
        &kinds[3..],
        &[
            InstructionKind::StackPop {
                block: "rectangle1".into(),
                stack: "stack1".into(),
                keep_block: true,
            },
            InstructionKind::StackPush {
                block: "rectangle1".into(),
                stack: "stack2".into(),
                reused: true,
                creation_style: "FadeIn".into(),
            },
        ]
    );
}

#[test]
fn test_empty_pop_stops_with_line() {
    let compilation = run(vec![
        new_stack(1, "s"),
        expr(2, method(2, "s", "pop", vec![])),
        expr(3, method(3, "s", "push", vec![num(3, 1.0)])),
    ]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert_eq!(compilation.error_line(), Some(2));
    assert!(matches!(
        compilation.runtime_error,
        Some(RuntimeError::EmptyStackPop { line: 2, .. })
    ));

    // Instructions up to the failure are kept, nothing after it
    let kinds = mutations(&compilation);
    assert_eq!(kinds.len(), 1);
    assert!(!pointer_lines(&compilation).contains(&3));
}

#[test]
fn test_array_index_out_of_bounds() {
    let compilation = run(vec![
        let_(1, "a", new_ds(1, Type::array(Type::Number), vec![num(1, 3.0)], vec![])),
        assign_to(
            2,
            indexed("a", vec![num(2, 5.0)]),
            num(2, 1.0),
        ),
    ]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::IndexOutOfBounds {
            index: 5,
            size: 3,
            line: 2,
        })
    );
}

#[test]
fn test_array_assignment_and_swap() {
    let compilation = run(vec![
        let_(1, "a", new_ds(1, Type::array(Type::Number), vec![num(1, 3.0)], vec![])),
        assign_to(
            2,
            indexed("a", vec![num(2, 0.0)]),
            num(2, 9.0),
        ),
        expr(3, method(3, "a", "swap", vec![num(3, 0.0), num(3, 2.0)])),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let kinds = mutations(&compilation);
    assert!(matches!(
        &kinds[0],
        InstructionKind::ConstructArray { values, .. } if values == &["0", "0", "0"]
    ));
    assert_eq!(
        kinds[1],
        InstructionKind::ArrayElemAssign {
            array: "array1".into(),
            index: 0,
            value: "9".into(),
        }
    );
    assert!(matches!(
        kinds[2],
        InstructionKind::ArraySwap {
            first: 0,
            second: 2,
            ..
        }
    ));
}

#[test]
fn test_tree_append_checks_boundary_first() {
    let compilation = run(vec![
        let_(1, "root", new_ds(1, Type::node(Type::Number), vec![num(1, 1.0)], vec![])),
        let_(2, "t", new_ds(2, Type::tree(Type::Number), vec![ident(2, "root")], vec![])),
        let_(3, "child", new_ds(3, Type::node(Type::Number), vec![num(3, 2.0)], vec![])),
        assign_to(
            4,
            AssignTarget::NodeAccess {
                target: "t".into(),
                from_root: true,
                chain: vec![NodeField::Left],
            },
            ident(4, "child"),
        ),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let stream = compilation.instructions.as_slice();
    let append = stream
        .iter()
        .position(|i| matches!(i.kind, InstructionKind::TreeAppend { .. }))
        .expect("child appended");
    assert!(matches!(
        &stream[append - 1].kind,
        InstructionKind::CheckBoundary { uid, size: 2, .. } if uid == "t"
    ));
    assert_eq!(compilation.boundaries["t"].max_size, 2);
}

#[test]
fn test_tree_node_cannot_reference_its_ancestor() {
    let compilation = run(vec![
        let_(1, "root", new_ds(1, Type::node(Type::Number), vec![num(1, 1.0)], vec![])),
        let_(2, "t", new_ds(2, Type::tree(Type::Number), vec![ident(2, "root")], vec![])),
        assign_to(
            3,
            AssignTarget::NodeAccess {
                target: "t".into(),
                from_root: true,
                chain: vec![NodeField::Left],
            },
            ident(3, "root"),
        ),
    ]);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::SelfReference { line: 3 })
    );
}

#[test]
fn test_zero_area_position_hides_instance() {
    let mut config = StyleConfig {
        hide_code: true,
        ..StyleConfig::default()
    };
    config
        .positions
        .insert("s".into(), Position::new(2.0, 2.0, 0.0, 0.0));

    let program = Program {
        functions: vec![],
        statements: vec![
            new_stack(1, "s"),
            expr(2, method(2, "s", "push", vec![num(2, 1.0)])),
        ],
    };
    let compilation = run_with(program, config);
    assert_eq!(compilation.status, ExitStatus::Success);

    let stack_steps: Vec<&Instruction> = compilation
        .instructions
        .iter()
        .filter(|i| {
            matches!(
                i.kind,
                InstructionKind::ConstructStack { .. }
                    | InstructionKind::CreateBlock { .. }
                    | InstructionKind::StackPush { .. }
            )
        })
        .collect();
    assert_eq!(stack_steps.len(), 3);
    assert!(stack_steps.iter().all(|i| !i.visible));
}

#[test]
fn test_missing_position_in_manual_layout() {
    let mut config = StyleConfig {
        hide_code: true,
        ..StyleConfig::default()
    };
    config
        .positions
        .insert("s".into(), Position::new(0.0, 0.0, 2.0, 4.0));

    let program = Program {
        functions: vec![],
        statements: vec![new_stack(1, "s"), new_stack(2, "other")],
    };
    let compilation = run_with(program, config);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::MissingPosition {
            uid: "other".into(),
            line: 2,
        })
    );
}

#[test]
fn test_data_structure_limit() {
    let config = StyleConfig {
        max_data_structures: 1,
        ..StyleConfig::default()
    };
    let program = Program {
        functions: vec![],
        statements: vec![new_stack(1, "a"), new_stack(2, "b")],
    };
    let compilation = run_with(program, config);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::TooManyDataStructures { limit: 1, line: 2 })
    );
}

fn helper_building_a_stack() -> valgo::ast::FunctionDecl {
    function(
        1,
        "build",
        &[],
        Type::Void,
        vec![
            new_stack(2, "t"),
            expr(3, method(3, "t", "push", vec![num(3, 1.0)])),
        ],
    )
}

#[test]
fn test_function_locals_are_cleaned_up() {
    let program = Program {
        functions: vec![helper_building_a_stack()],
        statements: vec![expr(5, call(5, "build", vec![]))],
    };
    let compilation = run_with(program, StyleConfig::default());
    assert_eq!(compilation.status, ExitStatus::Success);

    assert!(compilation.instructions.iter().any(|i| matches!(
        &i.kind,
        InstructionKind::ConstructStack { uid, .. } if uid == "build.t"
    )));
    assert!(compilation.instructions.iter().any(|i| i.kind
        == InstructionKind::CleanUpLocals {
            idents: vec!["stack1".into()],
        }));
}

#[test]
fn test_step_into_follows_calls() {
    let program = Program {
        functions: vec![helper_building_a_stack()],
        statements: vec![expr(5, call(5, "build", vec![]))],
    };
    let compilation = run_with(program, StyleConfig::default());
    assert_eq!(pointer_lines(&compilation), vec![5, 2, 3, 5]);
}

#[test]
fn test_step_over_keeps_pointer_in_caller() {
    let config = StyleConfig {
        code_tracking: "stepOver".into(),
        ..StyleConfig::default()
    };
    let program = Program {
        functions: vec![helper_building_a_stack()],
        statements: vec![expr(5, call(5, "build", vec![]))],
    };
    let compilation = run_with(program, config);
    assert_eq!(pointer_lines(&compilation), vec![5]);
}

#[test]
fn test_recursive_function_returns_value() {
    let fact = function(
        1,
        "fact",
        &[("n", Type::Number)],
        Type::Number,
        vec![
            if_else(
                2,
                binary(2, BinaryOp::Le, ident(2, "n"), num(2, 1.0)),
                vec![ret(3, Some(num(3, 1.0)))],
                None,
            ),
            ret(
                4,
                Some(binary(
                    4,
                    BinaryOp::Mul,
                    ident(4, "n"),
                    call(
                        4,
                        "fact",
                        vec![binary(4, BinaryOp::Sub, ident(4, "n"), num(4, 1.0))],
                    ),
                )),
            ),
        ],
    );
    let program = Program {
        functions: vec![fact],
        statements: vec![let_(6, "r", call(6, "fact", vec![num(6, 5.0)]))],
    };
    let compilation = run_with(program, StyleConfig::default());
    assert_eq!(compilation.status, ExitStatus::Success);
    assert_eq!(
        compilation.instructions.as_slice().last().map(|i| &i.kind),
        Some(&InstructionKind::UpdateVariables {
            entries: vec!["r = 120".to_string()],
        })
    );
}

#[test]
fn test_infinite_loop_hits_cap() {
    let compilation = run(vec![while_(1, boolean(1, true), vec![])]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert!(matches!(
        compilation.runtime_error,
        Some(RuntimeError::LoopLimitExceeded { line: 1, .. })
    ));
}

#[test]
fn test_for_loop_updates_variable_table() {
    let compilation = run(vec![
        let_(1, "total", num(1, 0.0)),
        for_range(
            2,
            "i",
            num(2, 0.0),
            num(2, 3.0),
            vec![assign(
                3,
                "total",
                binary(3, BinaryOp::Add, ident(3, "total"), ident(3, "i")),
            )],
        ),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);
    assert_eq!(pointer_lines(&compilation), vec![1, 2, 3, 2, 3, 2, 3, 2]);

    let last_table = compilation
        .instructions
        .iter()
        .rev()
        .find_map(|i| match &i.kind {
            InstructionKind::UpdateVariables { entries } => Some(entries.clone()),
            _ => None,
        });
    assert_eq!(last_table, Some(vec!["total = 3".to_string(), "i = 2".to_string()]));
}

#[test]
fn test_hidden_code_emits_no_pointer() {
    let config = StyleConfig {
        hide_code: true,
        ..StyleConfig::default()
    };
    let program = Program {
        functions: vec![],
        statements: vec![let_(1, "x", num(1, 1.0)), sleep(2, 1.5)],
    };
    let compilation = run_with(program, config);
    assert!(pointer_lines(&compilation).is_empty());
    assert!(!compilation.instructions.iter().any(|i| matches!(
        i.kind,
        InstructionKind::CodeBlock { .. } | InstructionKind::UpdateVariables { .. }
    )));
    assert_eq!(compilation.instructions.duration(), 1.5);
}

fn sleep(line: usize, seconds: f64) -> Statement {
    Statement::Sleep {
        line,
        duration: num(line, seconds),
    }
}

#[test]
fn test_pop_into_list_append_drops_block() {
    let compilation = run(vec![
        new_stack(1, "s"),
        let_(2, "l", new_ds(2, Type::list(Type::Number), vec![], vec![])),
        expr(3, method(3, "s", "push", vec![num(3, 7.0)])),
        expr(4, method(4, "l", "append", vec![method(4, "s", "pop", vec![])])),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let kinds = mutations(&compilation);
    assert_eq!(
        kinds[3],
        InstructionKind::StackPop {
            block: "rectangle1".into(),
            stack: "stack1".into(),
            keep_block: false,
        }
    );
    assert!(matches!(
        &kinds[4],
        InstructionKind::ArrayRerender { values, .. } if values == &["7".to_string()]
    ));
}

#[test]
fn test_pop_as_contains_argument_drops_block() {
    let compilation = run(vec![
        new_stack(1, "s"),
        let_(2, "a", new_ds(2, Type::array(Type::Number), vec![], vec![num(2, 7.0)])),
        expr(3, method(3, "s", "push", vec![num(3, 7.0)])),
        let_(4, "found", method(4, "a", "contains", vec![method(4, "s", "pop", vec![])])),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);
    assert!(mutations(&compilation)
        .iter()
        .any(|kind| matches!(kind, InstructionKind::StackPop { keep_block: false, .. })));
    assert!(!mutations(&compilation)
        .iter()
        .any(|kind| matches!(kind, InstructionKind::StackPop { keep_block: true, .. })));
}

#[test]
fn test_empty_peek_stops_with_line() {
    let compilation = run(vec![new_stack(1, "s"), let_(2, "top", method(2, "s", "peek", vec![]))]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::EmptyStackPeek {
            stack: "s".into(),
            line: 2,
        })
    );
}

#[test]
fn test_oversized_array_is_a_runtime_error() {
    let compilation = run(vec![let_(
        1,
        "a",
        new_ds(1, Type::array(Type::Number), vec![num(1, 1e18)], vec![]),
    )]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::InvalidArraySize { size: 1e18, line: 1 })
    );
}

/// `down(n)` recurses until `n` reaches zero; `down(n)` holds `n + 1` frames
fn countdown(start: f64) -> Program {
    let down = function(
        1,
        "down",
        &[("n", Type::Number)],
        Type::Number,
        vec![
            if_else(
                2,
                binary(2, BinaryOp::Le, ident(2, "n"), num(2, 0.0)),
                vec![ret(3, Some(num(3, 0.0)))],
                None,
            ),
            ret(
                4,
                Some(call(
                    4,
                    "down",
                    vec![binary(4, BinaryOp::Sub, ident(4, "n"), num(4, 1.0))],
                )),
            ),
        ],
    );
    Program {
        functions: vec![down],
        statements: vec![let_(6, "r", call(6, "down", vec![num(6, start)]))],
    }
}

fn run_on_small_stack(program: Program) -> (ExitStatus, Option<RuntimeError>) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let compilation = run_with(program, StyleConfig::default());
            (compilation.status, compilation.runtime_error)
        })
        .expect("thread spawns")
        .join()
        .expect("recursion stays within the thread stack")
}

#[test]
fn test_recursion_just_under_call_cap_fits_thread_stack() {
    // The main frame plus `MAX_CALL_DEPTH - 1` function frames
    let (status, error) = run_on_small_stack(countdown((MAX_CALL_DEPTH - 2) as f64));
    assert_eq!(error, None);
    assert_eq!(status, ExitStatus::Success);
}

#[test]
fn test_recursion_past_call_cap_overflows() {
    let (status, error) = run_on_small_stack(countdown((MAX_CALL_DEPTH - 1) as f64));
    assert_eq!(status, ExitStatus::RuntimeError);
    assert_eq!(
        error,
        Some(RuntimeError::StackOverflow {
            depth: MAX_CALL_DEPTH,
            line: 4,
        })
    );
}

fn one() -> valgo::ast::FunctionDecl {
    function(1, "one", &[], Type::Number, vec![ret(2, Some(num(2, 1.0)))])
}

#[test]
fn test_step_over_block_only_covers_its_body() {
    let program = Program {
        functions: vec![one()],
        statements: vec![
            step_over(4, None, vec![let_(5, "a", call(5, "one", vec![]))]),
            let_(6, "b", call(6, "one", vec![])),
        ],
    };
    let compilation = run_with(program, StyleConfig::default());
    assert_eq!(compilation.status, ExitStatus::Success);
    assert_eq!(pointer_lines(&compilation), vec![5, 6, 2, 6]);
}

#[test]
fn test_conditional_step_into_applies_when_true() {
    let config = StyleConfig {
        code_tracking: "stepOver".into(),
        ..StyleConfig::default()
    };
    let program = Program {
        functions: vec![one()],
        statements: vec![
            step_into(4, Some(boolean(4, false)), vec![let_(5, "a", call(5, "one", vec![]))]),
            step_into(6, Some(boolean(6, true)), vec![let_(7, "b", call(7, "one", vec![]))]),
        ],
    };
    let compilation = run_with(program, config);
    assert_eq!(compilation.status, ExitStatus::Success);
    assert_eq!(pointer_lines(&compilation), vec![5, 7, 2, 7]);
}

#[test]
fn test_speed_block_scales_untimed_steps() {
    let compilation = run(vec![
        speed(
            1,
            num(1, 2.0),
            None,
            vec![
                let_(2, "s", new_ds(2, Type::stack(Type::Number), vec![], vec![])),
                sleep(3, 1.0),
            ],
        ),
        let_(4, "t", new_ds(4, Type::stack(Type::Number), vec![], vec![])),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let pointer_durations: Vec<f64> = compilation
        .instructions
        .iter()
        .filter(|i| matches!(i.kind, InstructionKind::MoveToLine { .. }))
        .map(|i| i.duration)
        .collect();
    assert_eq!(pointer_durations, vec![0.25, 0.25, 0.5]);

    let creations: Vec<f64> = compilation
        .instructions
        .iter()
        .filter(|i| matches!(i.kind, InstructionKind::ConstructStack { .. }))
        .map(|i| i.duration)
        .collect();
    assert_eq!(creations, vec![0.5, 1.0]);

    let sleeps: Vec<f64> = compilation
        .instructions
        .iter()
        .filter(|i| i.kind == InstructionKind::Sleep)
        .map(|i| i.duration)
        .collect();
    assert_eq!(sleeps, vec![1.0]);
}

#[test]
fn test_speed_with_false_condition_keeps_timing() {
    let compilation = run(vec![speed(
        1,
        num(1, 4.0),
        Some(boolean(1, false)),
        vec![let_(2, "x", num(2, 1.0))],
    )]);
    let moved = compilation
        .instructions
        .iter()
        .find(|i| matches!(i.kind, InstructionKind::MoveToLine { line: 2 }))
        .map(|i| i.duration);
    assert_eq!(moved, Some(0.5));
}

#[test]
fn test_non_positive_speed_is_a_runtime_error() {
    let compilation = run(vec![
        let_(1, "x", num(1, 1.0)),
        speed(2, num(2, 0.0), Some(boolean(2, false)), vec![]),
    ]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::InvalidSpeed {
            factor: 0.0,
            line: 2
        })
    );
}

#[test]
fn test_conditional_and_show_once_subtitles_in_a_loop() {
    let even = binary(
        3,
        BinaryOp::Eq,
        binary(3, BinaryOp::Mod, ident(3, "i"), num(3, 2.0)),
        num(3, 0.0),
    );
    let compilation = run(vec![for_range(
        1,
        "i",
        num(1, 0.0),
        num(1, 3.0),
        vec![
            subtitle(2, "first pass", None, true),
            subtitle(3, "even", Some(even), false),
        ],
    )]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let texts: Vec<String> = compilation
        .instructions
        .iter()
        .filter_map(|i| match &i.kind {
            InstructionKind::Subtitle { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["first pass", "even", "even"]);
}

#[test]
fn test_grid_cells_are_assigned_and_swapped() {
    let rows = vec![
        vec![num(1, 1.0), num(1, 2.0)],
        vec![num(1, 3.0), num(1, 4.0)],
    ];
    let compilation = run(vec![
        let_(1, "g", new_grid(1, Type::array_2d(Type::Number), vec![], rows)),
        assign_to(
            2,
            indexed("g", vec![num(2, 1.0), num(2, 0.0)]),
            cell(2, "g", num(2, 0.0), num(2, 1.0)),
        ),
        expr(
            3,
            method(3, "g", "swap", vec![num(3, 0.0), num(3, 0.0), num(3, 1.0), num(3, 1.0)]),
        ),
    ]);
    assert_eq!(compilation.status, ExitStatus::Success);

    let steps = mutations(&compilation);
    assert!(matches!(
        &steps[0],
        InstructionKind::ConstructArray2D { rows, .. }
            if rows == &vec![vec!["1".to_string(), "2".into()], vec!["3".into(), "4".into()]]
    ));
    assert_eq!(
        steps[1..].to_vec(),
        vec![
            InstructionKind::Array2DElemAssign {
                array: "array1".into(),
                row: 1,
                column: 0,
                value: "2".into(),
            },
            InstructionKind::Array2DSwap {
                array: "array1".into(),
                first: (0, 0),
                second: (1, 1),
            },
        ]
    );
}

#[test]
fn test_grid_initialiser_must_match_declared_size() {
    let rows = vec![vec![num(1, 1.0), num(1, 2.0)], vec![num(1, 3.0), num(1, 4.0)]];
    let compilation = run(vec![let_(
        1,
        "g",
        new_grid(1, Type::array_2d(Type::Number), vec![num(1, 3.0), num(1, 2.0)], rows),
    )]);
    assert_eq!(compilation.status, ExitStatus::RuntimeError);
    assert_eq!(
        compilation.runtime_error,
        Some(RuntimeError::ArrayInitialiser {
            expected: 3,
            found: 2,
            line: 1
        })
    );
}
