//! Retargetable source rendering.
//!
//! `codetrans` holds a language-neutral IR of a small imperative program
//! (statements, expressions, closures, JSON and data object literals) and
//! renders it as source text of a target language. Each target is a
//! [`Lang`]: it builds target-specific IR nodes, hands out a
//! [`CodeWriter`] for every render pass, and loads script resources.
//!
//! # Architecture
//!
//! ```text
//!  Lang (session)            IR                 CodeWriter
//! ────────────────    ─────────────────    ────────────────────
//! factory hooks   ──>  Program / Expr  ──>  groovy: import ... / def x = ...
//! ImportSet       <──  render(writer)  ──>  lua:    local X = require(...)
//! ```
//!
//! Types referenced while rendering are recorded in the session's import
//! set; the outermost block of a pass writes them as a header in front of
//! the body.
//!
//! # Example
//!
//! ```ignore
//! use codetrans::{Expr, Lang, Program, Stmt, TypeInfo, output::GroovyLang};
//!
//! let lang = GroovyLang::default();
//! let program = Program::new(vec![Stmt::var_decl(
//!     TypeInfo::primitive("String"),
//!     "greeting",
//!     Some(Expr::concat(Expr::string("hello "), Expr::ident("name"))),
//! )]);
//! assert_eq!(lang.render(&program)?, "def greeting = \"hello ${name}\"\n");
//! ```

pub mod config;
pub mod data_object;
pub mod error;
pub mod imports;
pub mod ir;
pub mod lang;
pub mod output;
pub mod registry;
pub mod script;
pub mod types;
pub mod writer;

// Re-exports: IR types
pub use ir::{
    Binary, BinaryOp, DataObjectLiteral, Expr, Lambda, LambdaBody, Literal, MapForEach, Member,
    MemberValue, Param, Program, Stmt, UnaryOp,
};
pub use types::{ClassKind, ClassType, TypeInfo};

// Re-exports: core traits
pub use config::{Config, ConfigError};
pub use error::{RenderError, ScriptError};
pub use lang::{Lang, Session};
pub use script::{DirLoader, Globals, MemoryLoader, ResourceLoader, Script, ScriptEngine};
pub use writer::{CodeWriter, WriterState};

// Re-exports: Registry
pub use registry::{LangProvider, lang_for_extension, lang_for_name, langs, register_lang};
