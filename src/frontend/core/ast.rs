//! Metadata-parameterized syntax tree
//!
//! Every node carries a `meta: M`. Before inference `M` is [`Span`]; after
//! inference it is [`Typed`](crate::frontend::typecheck::Typed). `map_meta`
//! rewrites metadata while keeping the tree shape.

use crate::util::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Module identifier, e.g. `Main` or `Json.Decode`
pub type ModuleName = String;

/// A module: imports plus top-level declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub struct Module<M> {
    pub name: ModuleName,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub declarations: Vec<Declaration<M>>,
}

/// `import Foo as F exposing (..)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub module: ModuleName,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub exposing: Exposing,
}

/// Names an import brings into unqualified scope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exposing {
    #[default]
    Nothing,
    All,
    Names(Vec<String>),
}

impl Exposing {
    pub fn exposes(
        &self,
        name: &str,
    ) -> bool {
        match self {
            Exposing::Nothing => false,
            Exposing::All => true,
            Exposing::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Top-level function or value: `name args = body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub struct Declaration<M> {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Pattern<M>>,
    pub body: Expr<M>,
    #[serde(default)]
    pub meta: M,
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub struct Expr<M> {
    pub kind: ExprKind<M>,
    #[serde(default)]
    pub meta: M,
}

/// Expression forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub enum ExprKind<M> {
    Unit,
    Integer(i64),
    Hex(i64),
    Float(f64),
    String(String),
    Char(char),
    /// Variable or qualified reference (`x`, `List.map`)
    Var(String),
    Tuple(Box<Expr<M>>, Box<Expr<M>>),
    Tuple3(Box<Expr<M>>, Box<Expr<M>>, Box<Expr<M>>),
    List(Vec<Expr<M>>),
    Lambda {
        args: Vec<Pattern<M>>,
        body: Box<Expr<M>>,
    },
    /// `{ a = 1, b = 2 }`; a repeated field keeps the last value
    Record(Vec<(String, Expr<M>)>),
    /// `.field`
    RecordAccessFunction(String),
    /// `expr.field`
    RecordAccess {
        record: Box<Expr<M>>,
        field: String,
    },
    /// `{ r | a = 1 }`
    RecordUpdate {
        record: String,
        updates: Vec<(String, Expr<M>)>,
    },
    Parenthesized(Box<Expr<M>>),
    /// `f a b`
    Application {
        function: Box<Expr<M>>,
        args: Vec<Expr<M>>,
    },
    /// `a op b`
    Operator {
        op: BinOp,
        left: Box<Expr<M>>,
        right: Box<Expr<M>>,
    },
    /// `(op)`
    OperatorFunction(BinOp),
    /// `-e`
    Negate(Box<Expr<M>>),
    If {
        condition: Box<Expr<M>>,
        then_branch: Box<Expr<M>>,
        else_branch: Box<Expr<M>>,
    },
    Let {
        bindings: Vec<LetBinding<M>>,
        body: Box<Expr<M>>,
    },
    Case {
        subject: Box<Expr<M>>,
        branches: Vec<(Pattern<M>, Expr<M>)>,
    },
    /// `[glsl| ... |]`
    Glsl(String),
}

impl<M> ExprKind<M> {
    /// Short tag naming the form, used in diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            ExprKind::Unit => "unit",
            ExprKind::Integer(_) => "integer",
            ExprKind::Hex(_) => "hex",
            ExprKind::Float(_) => "float",
            ExprKind::String(_) => "string",
            ExprKind::Char(_) => "char",
            ExprKind::Var(_) => "variable",
            ExprKind::Tuple(..) => "tuple",
            ExprKind::Tuple3(..) => "tuple3",
            ExprKind::List(_) => "list",
            ExprKind::Lambda { .. } => "lambda",
            ExprKind::Record(_) => "record",
            ExprKind::RecordAccessFunction(_) => "record access function",
            ExprKind::RecordAccess { .. } => "record access",
            ExprKind::RecordUpdate { .. } => "record update",
            ExprKind::Parenthesized(_) => "parenthesized",
            ExprKind::Application { .. } => "application",
            ExprKind::Operator { .. } => "operator",
            ExprKind::OperatorFunction(_) => "operator function",
            ExprKind::Negate(_) => "negate",
            ExprKind::If { .. } => "if",
            ExprKind::Let { .. } => "let",
            ExprKind::Case { .. } => "case",
            ExprKind::Glsl(_) => "glsl",
        }
    }
}

/// Binding inside a `let` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub enum LetBinding<M> {
    /// `f x y = body`
    Function {
        name: String,
        args: Vec<Pattern<M>>,
        body: Expr<M>,
    },
    /// `( a, b ) = body`
    Destructuring { pattern: Pattern<M>, body: Expr<M> },
}

/// Pattern node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub struct Pattern<M> {
    pub kind: PatternKind<M>,
    #[serde(default)]
    pub meta: M,
}

/// Pattern forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize",
    deserialize = "M: Deserialize<'de> + Default"
))]
pub enum PatternKind<M> {
    Unit,
    Wildcard,
    Var(String),
    Integer(i64),
    Hex(i64),
    Float(f64),
    String(String),
    Char(char),
    Tuple(Box<Pattern<M>>, Box<Pattern<M>>),
    Tuple3(Box<Pattern<M>>, Box<Pattern<M>>, Box<Pattern<M>>),
    List(Vec<Pattern<M>>),
    /// `head :: tail`
    Cons {
        head: Box<Pattern<M>>,
        tail: Box<Pattern<M>>,
    },
    /// `{ a, b }`
    Record(Vec<String>),
    /// `pattern as name`
    Alias {
        pattern: Box<Pattern<M>>,
        name: String,
    },
    Parenthesized(Box<Pattern<M>>),
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Pow,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Append,
    Cons,
    PipeRight,
    PipeLeft,
    ComposeRight,
    ComposeLeft,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "//",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::Neq => "/=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Append => "++",
            BinOp::Cons => "::",
            BinOp::PipeRight => "|>",
            BinOp::PipeLeft => "<|",
            BinOp::ComposeRight => ">>",
            BinOp::ComposeLeft => "<<",
        }
    }

    pub const ALL: [BinOp; 20] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::IntDiv,
        BinOp::Pow,
        BinOp::Eq,
        BinOp::Neq,
        BinOp::Lt,
        BinOp::Le,
        BinOp::Gt,
        BinOp::Ge,
        BinOp::And,
        BinOp::Or,
        BinOp::Append,
        BinOp::Cons,
        BinOp::PipeRight,
        BinOp::PipeLeft,
        BinOp::ComposeRight,
        BinOp::ComposeLeft,
    ];
}

impl fmt::Display for BinOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "({})", self.symbol())
    }
}

// ============================================================================
// Metadata mapping
// ============================================================================

impl<M> Module<M> {
    pub fn map_meta<N>(
        self,
        f: &mut impl FnMut(M) -> N,
    ) -> Module<N> {
        Module {
            name: self.name,
            imports: self.imports,
            declarations: self
                .declarations
                .into_iter()
                .map(|d| d.map_meta(f))
                .collect(),
        }
    }

    /// Find a top-level declaration by name
    pub fn declaration(
        &self,
        name: &str,
    ) -> Option<&Declaration<M>> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

impl<M> Declaration<M> {
    pub fn map_meta<N>(
        self,
        f: &mut impl FnMut(M) -> N,
    ) -> Declaration<N> {
        Declaration {
            name: self.name,
            args: self.args.into_iter().map(|p| p.map_meta(f)).collect(),
            body: self.body.map_meta(f),
            meta: f(self.meta),
        }
    }
}

impl<M> Expr<M> {
    pub fn new(
        kind: ExprKind<M>,
        meta: M,
    ) -> Self {
        Expr { kind, meta }
    }

    pub fn map_meta<N>(
        self,
        f: &mut impl FnMut(M) -> N,
    ) -> Expr<N> {
        let kind = match self.kind {
            ExprKind::Unit => ExprKind::Unit,
            ExprKind::Integer(n) => ExprKind::Integer(n),
            ExprKind::Hex(n) => ExprKind::Hex(n),
            ExprKind::Float(x) => ExprKind::Float(x),
            ExprKind::String(s) => ExprKind::String(s),
            ExprKind::Char(c) => ExprKind::Char(c),
            ExprKind::Var(name) => ExprKind::Var(name),
            ExprKind::Tuple(a, b) => {
                ExprKind::Tuple(Box::new(a.map_meta(f)), Box::new(b.map_meta(f)))
            }
            ExprKind::Tuple3(a, b, c) => ExprKind::Tuple3(
                Box::new(a.map_meta(f)),
                Box::new(b.map_meta(f)),
                Box::new(c.map_meta(f)),
            ),
            ExprKind::List(items) => {
                ExprKind::List(items.into_iter().map(|e| e.map_meta(f)).collect())
            }
            ExprKind::Lambda { args, body } => ExprKind::Lambda {
                args: args.into_iter().map(|p| p.map_meta(f)).collect(),
                body: Box::new(body.map_meta(f)),
            },
            ExprKind::Record(fields) => ExprKind::Record(
                fields
                    .into_iter()
                    .map(|(name, e)| (name, e.map_meta(f)))
                    .collect(),
            ),
            ExprKind::RecordAccessFunction(field) => ExprKind::RecordAccessFunction(field),
            ExprKind::RecordAccess { record, field } => ExprKind::RecordAccess {
                record: Box::new(record.map_meta(f)),
                field,
            },
            ExprKind::RecordUpdate { record, updates } => ExprKind::RecordUpdate {
                record,
                updates: updates
                    .into_iter()
                    .map(|(name, e)| (name, e.map_meta(f)))
                    .collect(),
            },
            ExprKind::Parenthesized(inner) => ExprKind::Parenthesized(Box::new(inner.map_meta(f))),
            ExprKind::Application { function, args } => ExprKind::Application {
                function: Box::new(function.map_meta(f)),
                args: args.into_iter().map(|e| e.map_meta(f)).collect(),
            },
            ExprKind::Operator { op, left, right } => ExprKind::Operator {
                op,
                left: Box::new(left.map_meta(f)),
                right: Box::new(right.map_meta(f)),
            },
            ExprKind::OperatorFunction(op) => ExprKind::OperatorFunction(op),
            ExprKind::Negate(inner) => ExprKind::Negate(Box::new(inner.map_meta(f))),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => ExprKind::If {
                condition: Box::new(condition.map_meta(f)),
                then_branch: Box::new(then_branch.map_meta(f)),
                else_branch: Box::new(else_branch.map_meta(f)),
            },
            ExprKind::Let { bindings, body } => ExprKind::Let {
                bindings: bindings.into_iter().map(|b| b.map_meta(f)).collect(),
                body: Box::new(body.map_meta(f)),
            },
            ExprKind::Case { subject, branches } => ExprKind::Case {
                subject: Box::new(subject.map_meta(f)),
                branches: branches
                    .into_iter()
                    .map(|(p, e)| (p.map_meta(f), e.map_meta(f)))
                    .collect(),
            },
            ExprKind::Glsl(src) => ExprKind::Glsl(src),
        };
        Expr {
            kind,
            meta: f(self.meta),
        }
    }

    /// Metadata of this node
    pub fn meta(&self) -> &M {
        &self.meta
    }
}

impl<M> LetBinding<M> {
    pub fn map_meta<N>(
        self,
        f: &mut impl FnMut(M) -> N,
    ) -> LetBinding<N> {
        match self {
            LetBinding::Function { name, args, body } => LetBinding::Function {
                name,
                args: args.into_iter().map(|p| p.map_meta(f)).collect(),
                body: body.map_meta(f),
            },
            LetBinding::Destructuring { pattern, body } => LetBinding::Destructuring {
                pattern: pattern.map_meta(f),
                body: body.map_meta(f),
            },
        }
    }
}

impl<M> Pattern<M> {
    pub fn new(
        kind: PatternKind<M>,
        meta: M,
    ) -> Self {
        Pattern { kind, meta }
    }

    pub fn map_meta<N>(
        self,
        f: &mut impl FnMut(M) -> N,
    ) -> Pattern<N> {
        let kind = match self.kind {
            PatternKind::Unit => PatternKind::Unit,
            PatternKind::Wildcard => PatternKind::Wildcard,
            PatternKind::Var(name) => PatternKind::Var(name),
            PatternKind::Integer(n) => PatternKind::Integer(n),
            PatternKind::Hex(n) => PatternKind::Hex(n),
            PatternKind::Float(x) => PatternKind::Float(x),
            PatternKind::String(s) => PatternKind::String(s),
            PatternKind::Char(c) => PatternKind::Char(c),
            PatternKind::Tuple(a, b) => {
                PatternKind::Tuple(Box::new(a.map_meta(f)), Box::new(b.map_meta(f)))
            }
            PatternKind::Tuple3(a, b, c) => PatternKind::Tuple3(
                Box::new(a.map_meta(f)),
                Box::new(b.map_meta(f)),
                Box::new(c.map_meta(f)),
            ),
            PatternKind::List(items) => {
                PatternKind::List(items.into_iter().map(|p| p.map_meta(f)).collect())
            }
            PatternKind::Cons { head, tail } => PatternKind::Cons {
                head: Box::new(head.map_meta(f)),
                tail: Box::new(tail.map_meta(f)),
            },
            PatternKind::Record(fields) => PatternKind::Record(fields),
            PatternKind::Alias { pattern, name } => PatternKind::Alias {
                pattern: Box::new(pattern.map_meta(f)),
                name,
            },
            PatternKind::Parenthesized(inner) => {
                PatternKind::Parenthesized(Box::new(inner.map_meta(f)))
            }
        };
        Pattern {
            kind,
            meta: f(self.meta),
        }
    }
}

// ============================================================================
// Span-annotated constructors
// ============================================================================

/// Builders for span-annotated trees, used by tests and by tree producers that
/// do not track locations.
pub mod build {
    use super::*;

    pub fn expr(kind: ExprKind<Span>) -> Expr<Span> {
        Expr::new(kind, Span::dummy())
    }

    pub fn unit() -> Expr<Span> {
        expr(ExprKind::Unit)
    }

    pub fn int(n: i64) -> Expr<Span> {
        expr(ExprKind::Integer(n))
    }

    pub fn hex(n: i64) -> Expr<Span> {
        expr(ExprKind::Hex(n))
    }

    pub fn float(x: f64) -> Expr<Span> {
        expr(ExprKind::Float(x))
    }

    pub fn string(s: &str) -> Expr<Span> {
        expr(ExprKind::String(s.to_string()))
    }

    pub fn chr(c: char) -> Expr<Span> {
        expr(ExprKind::Char(c))
    }

    pub fn var(name: &str) -> Expr<Span> {
        expr(ExprKind::Var(name.to_string()))
    }

    pub fn tuple(
        a: Expr<Span>,
        b: Expr<Span>,
    ) -> Expr<Span> {
        expr(ExprKind::Tuple(Box::new(a), Box::new(b)))
    }

    pub fn tuple3(
        a: Expr<Span>,
        b: Expr<Span>,
        c: Expr<Span>,
    ) -> Expr<Span> {
        expr(ExprKind::Tuple3(Box::new(a), Box::new(b), Box::new(c)))
    }

    pub fn list(items: Vec<Expr<Span>>) -> Expr<Span> {
        expr(ExprKind::List(items))
    }

    pub fn lambda(
        args: Vec<Pattern<Span>>,
        body: Expr<Span>,
    ) -> Expr<Span> {
        expr(ExprKind::Lambda {
            args,
            body: Box::new(body),
        })
    }

    pub fn record(fields: Vec<(&str, Expr<Span>)>) -> Expr<Span> {
        expr(ExprKind::Record(
            fields
                .into_iter()
                .map(|(name, e)| (name.to_string(), e))
                .collect(),
        ))
    }

    pub fn accessor(field: &str) -> Expr<Span> {
        expr(ExprKind::RecordAccessFunction(field.to_string()))
    }

    pub fn access(
        record: Expr<Span>,
        field: &str,
    ) -> Expr<Span> {
        expr(ExprKind::RecordAccess {
            record: Box::new(record),
            field: field.to_string(),
        })
    }

    pub fn update(
        record: &str,
        updates: Vec<(&str, Expr<Span>)>,
    ) -> Expr<Span> {
        expr(ExprKind::RecordUpdate {
            record: record.to_string(),
            updates: updates
                .into_iter()
                .map(|(name, e)| (name.to_string(), e))
                .collect(),
        })
    }

    pub fn paren(inner: Expr<Span>) -> Expr<Span> {
        expr(ExprKind::Parenthesized(Box::new(inner)))
    }

    pub fn apply(
        function: Expr<Span>,
        args: Vec<Expr<Span>>,
    ) -> Expr<Span> {
        expr(ExprKind::Application {
            function: Box::new(function),
            args,
        })
    }

    pub fn op(
        op: BinOp,
        left: Expr<Span>,
        right: Expr<Span>,
    ) -> Expr<Span> {
        expr(ExprKind::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn negate(inner: Expr<Span>) -> Expr<Span> {
        expr(ExprKind::Negate(Box::new(inner)))
    }

    pub fn if_then_else(
        condition: Expr<Span>,
        then_branch: Expr<Span>,
        else_branch: Expr<Span>,
    ) -> Expr<Span> {
        expr(ExprKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    pub fn let_in(
        bindings: Vec<LetBinding<Span>>,
        body: Expr<Span>,
    ) -> Expr<Span> {
        expr(ExprKind::Let {
            bindings,
            body: Box::new(body),
        })
    }

    pub fn let_fn(
        name: &str,
        args: Vec<Pattern<Span>>,
        body: Expr<Span>,
    ) -> LetBinding<Span> {
        LetBinding::Function {
            name: name.to_string(),
            args,
            body,
        }
    }

    pub fn case(
        subject: Expr<Span>,
        branches: Vec<(Pattern<Span>, Expr<Span>)>,
    ) -> Expr<Span> {
        expr(ExprKind::Case {
            subject: Box::new(subject),
            branches,
        })
    }

    pub fn pat(kind: PatternKind<Span>) -> Pattern<Span> {
        Pattern::new(kind, Span::dummy())
    }

    pub fn pvar(name: &str) -> Pattern<Span> {
        pat(PatternKind::Var(name.to_string()))
    }

    pub fn punit() -> Pattern<Span> {
        pat(PatternKind::Unit)
    }

    pub fn pwild() -> Pattern<Span> {
        pat(PatternKind::Wildcard)
    }

    pub fn ptuple(
        a: Pattern<Span>,
        b: Pattern<Span>,
    ) -> Pattern<Span> {
        pat(PatternKind::Tuple(Box::new(a), Box::new(b)))
    }

    pub fn pcons(
        head: Pattern<Span>,
        tail: Pattern<Span>,
    ) -> Pattern<Span> {
        pat(PatternKind::Cons {
            head: Box::new(head),
            tail: Box::new(tail),
        })
    }

    pub fn precord(fields: &[&str]) -> Pattern<Span> {
        pat(PatternKind::Record(
            fields.iter().map(|f| f.to_string()).collect(),
        ))
    }

    pub fn declaration(
        name: &str,
        args: Vec<Pattern<Span>>,
        body: Expr<Span>,
    ) -> Declaration<Span> {
        Declaration {
            name: name.to_string(),
            args,
            body,
            meta: Span::dummy(),
        }
    }

    pub fn module(
        name: &str,
        declarations: Vec<Declaration<Span>>,
    ) -> Module<Span> {
        Module {
            name: name.to_string(),
            imports: Vec::new(),
            declarations,
        }
    }
}
