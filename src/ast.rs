// AST definitions consumed by the analyser and the virtual machine

use crate::types::Type;

/// 1-based source line used for diagnostics and code tracking
pub type Line = usize;

/// A whole program: function declarations plus top-level statements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
    pub statements: Vec<Statement>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub line: Line,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub body: Vec<Statement>,
}

/// `elif` arm of an if statement
#[derive(Debug, Clone, PartialEq)]
pub struct ElifBranch {
    pub line: Line,
    pub condition: Expr,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration {
        line: Line,
        name: String,
        declared_type: Option<Type>,
        value: Expr,
    },
    Assignment {
        line: Line,
        target: AssignTarget,
        value: Expr,
    },
    Expression {
        line: Line,
        expr: Expr,
    },
    Return {
        line: Line,
        value: Option<Expr>,
    },
    If {
        line: Line,
        condition: Expr,
        then_branch: Vec<Statement>,
        elifs: Vec<ElifBranch>,
        else_branch: Option<Vec<Statement>>,
    },
    While {
        line: Line,
        condition: Expr,
        body: Vec<Statement>,
    },
    /// `for variable in range(start, end[, step])`
    For {
        line: Line,
        variable: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Vec<Statement>,
    },
    Break {
        line: Line,
    },
    Continue {
        line: Line,
    },
    Sleep {
        line: Line,
        duration: Expr,
    },
    /// `@subtitle`: shown when `condition` holds (always when absent);
    /// `show_once` subtitles are shown at most once per run
    Subtitle {
        line: Line,
        text: String,
        duration: Option<Expr>,
        condition: Option<Expr>,
        show_once: bool,
    },
    /// `@stepInto { ... }` or `@stepOver { ... }`: calls made from `body`
    /// step into or over their callees while `condition` holds
    CodeTracking {
        line: Line,
        step_into: bool,
        condition: Option<Expr>,
        body: Vec<Statement>,
    },
    /// `@speed(factor) { ... }`: animations in `body` play `factor` times as fast
    Speed {
        line: Line,
        factor: Expr,
        condition: Option<Expr>,
        body: Vec<Statement>,
    },
}

impl Statement {
    pub fn line(&self) -> Line {
        match self {
            Statement::Declaration { line, .. }
            | Statement::Assignment { line, .. }
            | Statement::Expression { line, .. }
            | Statement::Return { line, .. }
            | Statement::If { line, .. }
            | Statement::While { line, .. }
            | Statement::For { line, .. }
            | Statement::Break { line }
            | Statement::Continue { line }
            | Statement::Sleep { line, .. }
            | Statement::Subtitle { line, .. }
            | Statement::CodeTracking { line, .. }
            | Statement::Speed { line, .. } => *line,
        }
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Identifier(String),
    /// `a[i] = v`, or `grid[i][j] = v` with two indices
    Index { target: String, indices: Vec<Expr> },
    NodeAccess {
        target: String,
        from_root: bool,
        chain: Vec<NodeField>,
    },
}

/// One link of a chained node access such as `tree.root.left.value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Left,
    Right,
    Value,
}

impl NodeField {
    /// Registry method backing this link
    pub fn method_name(self) -> &'static str {
        match self {
            NodeField::Left => "left",
            NodeField::Right => "right",
            NodeField::Value => "value",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,  // -x
    Plus, // +x
    Not,  // !x
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number {
        line: Line,
        value: f64,
    },
    Bool {
        line: Line,
        value: bool,
    },
    Char {
        line: Line,
        value: char,
    },
    String {
        line: Line,
        value: String,
    },
    Null {
        line: Line,
    },
    Identifier {
        line: Line,
        name: String,
    },
    Binary {
        line: Line,
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        line: Line,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    FunctionCall {
        line: Line,
        name: String,
        arguments: Vec<Expr>,
    },
    MethodCall {
        line: Line,
        instance: String,
        method: String,
        arguments: Vec<Expr>,
    },
    /// `new Kind<T>(arguments) {initialiser}`
    Constructor {
        line: Line,
        ty: Type,
        arguments: Vec<Expr>,
        initialiser: Initialiser,
    },
    /// `target[i]`, or `target[i][j]` on a 2D array
    Index {
        line: Line,
        target: String,
        indices: Vec<Expr>,
    },
    NodeAccess {
        line: Line,
        target: String,
        from_root: bool,
        chain: Vec<NodeField>,
    },
    Cast {
        line: Line,
        target: Type,
        expr: Box<Expr>,
    },
}

/// Initial values following a constructor call
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Initialiser {
    #[default]
    None,
    /// `{1, 2, 3}`
    Values(Vec<Expr>),
    /// `{{1, 2}, {3, 4}}`, for 2D arrays
    Rows(Vec<Vec<Expr>>),
}

impl Initialiser {
    pub fn is_empty(&self) -> bool {
        match self {
            Initialiser::None => true,
            Initialiser::Values(values) => values.is_empty(),
            Initialiser::Rows(rows) => rows.is_empty(),
        }
    }
}

impl Expr {
    pub fn line(&self) -> Line {
        match self {
            Expr::Number { line, .. }
            | Expr::Bool { line, .. }
            | Expr::Char { line, .. }
            | Expr::String { line, .. }
            | Expr::Null { line }
            | Expr::Identifier { line, .. }
            | Expr::Binary { line, .. }
            | Expr::Unary { line, .. }
            | Expr::FunctionCall { line, .. }
            | Expr::MethodCall { line, .. }
            | Expr::Constructor { line, .. }
            | Expr::Index { line, .. }
            | Expr::NodeAccess { line, .. }
            | Expr::Cast { line, .. } => *line,
        }
    }
}

/// Terse constructors for building programs by hand, mainly in tests
pub mod build {
    use super::*;

    pub fn num(line: Line, value: f64) -> Expr {
        Expr::Number { line, value }
    }

    pub fn boolean(line: Line, value: bool) -> Expr {
        Expr::Bool { line, value }
    }

    pub fn chr(line: Line, value: char) -> Expr {
        Expr::Char { line, value }
    }

    pub fn string(line: Line, value: &str) -> Expr {
        Expr::String {
            line,
            value: value.to_string(),
        }
    }

    pub fn null(line: Line) -> Expr {
        Expr::Null { line }
    }

    pub fn ident(line: Line, name: &str) -> Expr {
        Expr::Identifier {
            line,
            name: name.to_string(),
        }
    }

    pub fn binary(line: Line, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            line,
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(line: Line, name: &str, arguments: Vec<Expr>) -> Expr {
        Expr::FunctionCall {
            line,
            name: name.to_string(),
            arguments,
        }
    }

    pub fn method(line: Line, instance: &str, method: &str, arguments: Vec<Expr>) -> Expr {
        Expr::MethodCall {
            line,
            instance: instance.to_string(),
            method: method.to_string(),
            arguments,
        }
    }

    pub fn new_ds(line: Line, ty: Type, arguments: Vec<Expr>, initialiser: Vec<Expr>) -> Expr {
        let initialiser = if initialiser.is_empty() {
            Initialiser::None
        } else {
            Initialiser::Values(initialiser)
        };
        Expr::Constructor {
            line,
            ty,
            arguments,
            initialiser,
        }
    }

    /// `new Array<Array<T>>(arguments) {rows}`
    pub fn new_grid(line: Line, ty: Type, arguments: Vec<Expr>, rows: Vec<Vec<Expr>>) -> Expr {
        Expr::Constructor {
            line,
            ty,
            arguments,
            initialiser: Initialiser::Rows(rows),
        }
    }

    pub fn index(line: Line, target: &str, index: Expr) -> Expr {
        Expr::Index {
            line,
            target: target.to_string(),
            indices: vec![index],
        }
    }

    pub fn cell(line: Line, target: &str, row: Expr, column: Expr) -> Expr {
        Expr::Index {
            line,
            target: target.to_string(),
            indices: vec![row, column],
        }
    }

    /// Assignment target `target[indices...]`
    pub fn indexed(target: &str, indices: Vec<Expr>) -> AssignTarget {
        AssignTarget::Index {
            target: target.to_string(),
            indices,
        }
    }

    pub fn node_access(line: Line, target: &str, from_root: bool, chain: &[NodeField]) -> Expr {
        Expr::NodeAccess {
            line,
            target: target.to_string(),
            from_root,
            chain: chain.to_vec(),
        }
    }

    pub fn cast(line: Line, target: Type, expr: Expr) -> Expr {
        Expr::Cast {
            line,
            target,
            expr: Box::new(expr),
        }
    }

    pub fn let_(line: Line, name: &str, value: Expr) -> Statement {
        Statement::Declaration {
            line,
            name: name.to_string(),
            declared_type: None,
            value,
        }
    }

    pub fn let_typed(line: Line, name: &str, ty: Type, value: Expr) -> Statement {
        Statement::Declaration {
            line,
            name: name.to_string(),
            declared_type: Some(ty),
            value,
        }
    }

    pub fn assign(line: Line, name: &str, value: Expr) -> Statement {
        Statement::Assignment {
            line,
            target: AssignTarget::Identifier(name.to_string()),
            value,
        }
    }

    pub fn assign_to(line: Line, target: AssignTarget, value: Expr) -> Statement {
        Statement::Assignment {
            line,
            target,
            value,
        }
    }

    pub fn expr(line: Line, expr: Expr) -> Statement {
        Statement::Expression { line, expr }
    }

    pub fn ret(line: Line, value: Option<Expr>) -> Statement {
        Statement::Return { line, value }
    }

    pub fn if_else(
        line: Line,
        condition: Expr,
        then_branch: Vec<Statement>,
        else_branch: Option<Vec<Statement>>,
    ) -> Statement {
        Statement::If {
            line,
            condition,
            then_branch,
            elifs: Vec::new(),
            else_branch,
        }
    }

    pub fn while_(line: Line, condition: Expr, body: Vec<Statement>) -> Statement {
        Statement::While {
            line,
            condition,
            body,
        }
    }

    pub fn for_range(
        line: Line,
        variable: &str,
        start: Expr,
        end: Expr,
        body: Vec<Statement>,
    ) -> Statement {
        Statement::For {
            line,
            variable: variable.to_string(),
            start,
            end,
            step: None,
            body,
        }
    }

    pub fn subtitle(line: Line, text: &str, condition: Option<Expr>, show_once: bool) -> Statement {
        Statement::Subtitle {
            line,
            text: text.to_string(),
            duration: None,
            condition,
            show_once,
        }
    }

    pub fn step_into(line: Line, condition: Option<Expr>, body: Vec<Statement>) -> Statement {
        Statement::CodeTracking {
            line,
            step_into: true,
            condition,
            body,
        }
    }

    pub fn step_over(line: Line, condition: Option<Expr>, body: Vec<Statement>) -> Statement {
        Statement::CodeTracking {
            line,
            step_into: false,
            condition,
            body,
        }
    }

    pub fn speed(
        line: Line,
        factor: Expr,
        condition: Option<Expr>,
        body: Vec<Statement>,
    ) -> Statement {
        Statement::Speed {
            line,
            factor,
            condition,
            body,
        }
    }

    pub fn function(
        line: Line,
        name: &str,
        parameters: &[(&str, Type)],
        return_type: Type,
        body: Vec<Statement>,
    ) -> FunctionDecl {
        FunctionDecl {
            line,
            name: name.to_string(),
            parameters: parameters
                .iter()
                .map(|(name, ty)| Parameter {
                    name: name.to_string(),
                    ty: ty.clone(),
                })
                .collect(),
            return_type,
            body,
        }
    }
}
