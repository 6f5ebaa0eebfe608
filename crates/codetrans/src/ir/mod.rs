//! Language-neutral program IR.
//!
//! The tree is built once by a front end (or by [`crate::Lang`] factory
//! hooks) and never mutated by rendering. Every node has a single
//! `render(writer)` operation; syntax decisions are delegated to the
//! [`crate::CodeWriter`] hooks so one tree renders for every backend.

mod invoke;
mod member;
mod render;

pub use member::{DataObjectLiteral, Member, MemberValue};

use crate::types::{ClassType, TypeInfo};
use serde::{Deserialize, Serialize};

/// A complete program: the top-level block of a render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }

    /// Decode a program handed over by a front end as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Literal values. Numbers keep their source text so output is exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(String),
    Long(String),
    Float(String),
    Double(String),
    Char(char),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    Xor,
    Shl,
    Shr,
}

impl BinaryOp {
    /// C-family spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    Complement,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

/// A binary operator application.
///
/// `string_concat` marks `+` chains whose context is string concatenation;
/// backends may render those as interpolated strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
    pub string_concat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Expression,
    Statement,
}

/// Body of a lambda or map iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

impl LambdaBody {
    pub fn kind(&self) -> BodyKind {
        match self {
            LambdaBody::Expr(_) => BodyKind::Expression,
            LambdaBody::Block(_) => BodyKind::Statement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeInfo,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub body: LambdaBody,
}

impl Lambda {
    pub fn kind(&self) -> BodyKind {
        self.body.kind()
    }
}

/// Iteration over the entries of a map, binding key and value names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapForEach {
    pub map: Box<Expr>,
    pub key: Param,
    pub value: Param,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Binary(Binary),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Parentheses as written in the source; precedence is never re-derived.
    Parens(Box<Expr>),
    Ident(String),
    This,
    MemberSelect {
        object: Box<Expr>,
        name: String,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    MethodCall {
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    New {
        ty: TypeInfo,
        args: Vec<Expr>,
    },
    Lambda(Lambda),
    EnumConstant {
        ty: ClassType,
        constant: String,
    },
    ApiType(ClassType),
    JsonObject(Vec<Member>),
    JsonArray(Vec<Expr>),
    DataObject(DataObjectLiteral),

    // Values whose method invocations are routed by `Expr::invoke`.
    DataObjectValue(Box<Expr>),
    JsonObjectValue(Box<Expr>),
    JsonArrayValue(Box<Expr>),

    DataObjectAssign {
        object: Box<Expr>,
        name: String,
        value: Box<Expr>,
    },
    DataObjectMemberSelect {
        object: Box<Expr>,
        name: String,
    },
    JsonObjectAssign {
        object: Box<Expr>,
        name: Box<Expr>,
        value: Box<Expr>,
    },
    JsonObjectMemberSelect {
        object: Box<Expr>,
        name: Box<Expr>,
    },
    JsonObjectToString(Box<Expr>),
    JsonArrayToString(Box<Expr>),

    MapGet {
        map: Box<Expr>,
        key: Box<Expr>,
    },
    MapForEach(MapForEach),
    MethodReference {
        receiver: Box<Expr>,
        method: String,
    },
    Console(Box<Expr>),
    /// An already-bound asynchronous result name.
    AsyncResult(String),
}

impl Expr {
    pub fn int(value: impl ToString) -> Self {
        Expr::Literal(Literal::Int(value.to_string()))
    }

    pub fn long(value: impl ToString) -> Self {
        Expr::Literal(Literal::Long(value.to_string()))
    }

    pub fn float(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Float(value.into()))
    }

    pub fn double(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Double(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(value.into()))
    }

    pub fn char(value: char) -> Self {
        Expr::Literal(Literal::Char(value))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary(Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            string_concat: false,
        })
    }

    /// `left + right` in a string context.
    pub fn concat(left: Expr, right: Expr) -> Self {
        Expr::Binary(Binary {
            left: Box::new(left),
            op: BinaryOp::Add,
            right: Box::new(right),
            string_concat: true,
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn parens(expr: Expr) -> Self {
        Expr::Parens(Box::new(expr))
    }

    pub fn member(object: Expr, name: impl Into<String>) -> Self {
        Expr::MemberSelect {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn conditional(test: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn call(receiver: Option<Expr>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            receiver: receiver.map(Box::new),
            method: method.into(),
            args,
        }
    }

    pub fn new_instance(ty: TypeInfo, args: Vec<Expr>) -> Self {
        Expr::New { ty, args }
    }

    pub fn lambda(params: Vec<Param>, body: LambdaBody) -> Self {
        Expr::Lambda(Lambda { params, body })
    }

    pub fn map_get(map: Expr, key: Expr) -> Self {
        Expr::MapGet {
            map: Box::new(map),
            key: Box::new(key),
        }
    }

    pub fn map_for_each(map: Expr, key: Param, value: Param, body: LambdaBody) -> Self {
        Expr::MapForEach(MapForEach {
            map: Box::new(map),
            key,
            value,
            body,
        })
    }

    pub fn method_reference(receiver: Expr, method: impl Into<String>) -> Self {
        Expr::MethodReference {
            receiver: Box::new(receiver),
            method: method.into(),
        }
    }

    /// Wrap a value whose type is a data object.
    pub fn data_object_value(expr: Expr) -> Self {
        Expr::DataObjectValue(Box::new(expr))
    }

    pub fn json_object_value(expr: Expr) -> Self {
        Expr::JsonObjectValue(Box::new(expr))
    }

    pub fn json_array_value(expr: Expr) -> Self {
        Expr::JsonArrayValue(Box::new(expr))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Block(Vec<Stmt>),
    VarDecl {
        ty: TypeInfo,
        name: String,
        init: Option<Expr>,
    },
    Expr(Expr),
    For {
        init: Box<Stmt>,
        test: Expr,
        update: Expr,
        body: Box<Stmt>,
    },
    ForEach {
        variable: String,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Throw {
        exception: String,
        reason: Option<Expr>,
    },
    Return(Option<Expr>),
    If {
        test: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    Break,
    Continue,
}

impl Stmt {
    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::Block(stmts)
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn var_decl(ty: TypeInfo, name: impl Into<String>, init: Option<Expr>) -> Self {
        Stmt::VarDecl {
            ty,
            name: name.into(),
            init,
        }
    }

    pub fn for_loop(init: Stmt, test: Expr, update: Expr, body: Stmt) -> Self {
        Stmt::For {
            init: Box::new(init),
            test,
            update,
            body: Box::new(body),
        }
    }

    pub fn for_each(variable: impl Into<String>, iterable: Expr, body: Stmt) -> Self {
        Stmt::ForEach {
            variable: variable.into(),
            iterable,
            body: Box::new(body),
        }
    }

    pub fn throw(exception: impl Into<String>, reason: Option<Expr>) -> Self {
        Stmt::Throw {
            exception: exception.into(),
            reason,
        }
    }

    pub fn return_stmt(expr: Option<Expr>) -> Self {
        Stmt::Return(expr)
    }

    pub fn if_stmt(test: Expr, then: Stmt, otherwise: Option<Stmt>) -> Self {
        Stmt::If {
            test,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        }
    }

    pub fn while_loop(test: Expr, body: Stmt) -> Self {
        Stmt::While {
            test,
            body: Box::new(body),
        }
    }
}
