//! The backend abstraction: one [`Lang`] per target language.

use crate::config::Config;
use crate::error::{RenderError, ScriptError};
use crate::imports::ImportSet;
use crate::ir::{Expr, LambdaBody, Param, Program, Stmt};
use crate::script::{ResourceLoader, Script};
use crate::types::{ClassType, TypeInfo};
use crate::writer::CodeWriter;
use std::cell::RefCell;

/// State of one backend session: configuration plus the running set of
/// referenced types.
///
/// The import set spans every render pass driven through the session. It
/// is not shareable between threads; concurrent passes need their own
/// sessions.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    imports: RefCell<ImportSet>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        tracing::debug!(indent = ?config.indent, interpolate = config.interpolate, "new session");
        Self {
            config,
            imports: RefCell::new(ImportSet::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Record a reference to `ty`; returns true on first sight.
    pub fn register(&self, lang: &'static str, ty: &ClassType) -> bool {
        let added = self.imports.borrow_mut().insert(ty);
        if added {
            tracing::debug!(lang, ty = %ty.name, "registered import");
        }
        added
    }

    /// Referenced types in first-seen order.
    pub fn imports(&self) -> Vec<ClassType> {
        self.imports.borrow().iter().cloned().collect()
    }

    /// Forget all references, starting a new compilation.
    pub fn reset(&self) {
        self.imports.borrow_mut().clear();
    }
}

/// A target language.
///
/// Supplies the writer for render passes, script loading, and factory hooks
/// for constructs whose IR depends on the target. IR construction only ever
/// needs *some* `Lang`, never a particular one.
pub trait Lang {
    /// Language identifier (e.g., "groovy", "lua").
    fn name(&self) -> &'static str;

    /// File extension for generated files (e.g., "lua").
    fn extension(&self) -> &'static str;

    fn session(&self) -> &Session;

    /// A fresh writer for one render pass.
    fn new_writer(&self) -> Box<dyn CodeWriter + '_>;

    /// Load and compile the script resource at `path` (without extension).
    fn load_script(
        &self,
        loader: &dyn ResourceLoader,
        path: &str,
    ) -> Result<Box<dyn Script>, ScriptError>;

    /// Render a whole program in one pass.
    fn render(&self, program: &Program) -> Result<String, RenderError> {
        let mut writer = self.new_writer();
        writer.render_program(program)?;
        Ok(writer.finish())
    }

    /// Render a single expression; no header is emitted.
    fn render_expr(&self, expr: &Expr) -> Result<String, RenderError> {
        let mut writer = self.new_writer();
        writer.render_fragment(expr)?;
        Ok(writer.finish())
    }

    /// Forget the session's referenced types.
    fn reset(&self) {
        self.session().reset();
    }

    // Factory hooks

    /// Reference to a class as a value (e.g. the receiver of a static call).
    fn class_expression(&self, ty: &ClassType) -> Expr {
        self.api_type(ty)
    }

    fn api_type(&self, ty: &ClassType) -> Expr {
        self.session().register(self.name(), ty);
        Expr::ApiType(ty.clone())
    }

    fn enum_constant(&self, ty: &ClassType, constant: &str) -> Expr {
        self.session().register(self.name(), ty);
        Expr::EnumConstant {
            ty: ty.clone(),
            constant: constant.to_string(),
        }
    }

    fn async_result(&self, name: &str) -> Expr {
        Expr::AsyncResult(name.to_string())
    }

    /// Handler receiving an asynchronous result of `result_type`.
    fn async_result_handler(
        &self,
        result_type: &TypeInfo,
        result_name: &str,
        body: LambdaBody,
    ) -> Expr {
        Expr::lambda(vec![Param::new(result_name, result_type.clone())], body)
    }

    fn variable_decl(&self, ty: TypeInfo, name: &str, init: Option<Expr>) -> Stmt {
        Stmt::var_decl(ty, name, init)
    }

    fn enhanced_for_loop(&self, variable: &str, iterable: Expr, body: Stmt) -> Stmt {
        Stmt::for_each(variable, iterable, body)
    }

    fn for_loop(&self, init: Stmt, test: Expr, update: Expr, body: Stmt) -> Stmt {
        Stmt::for_loop(init, test, update, body)
    }

    fn console(&self, expr: Expr) -> Expr {
        Expr::Console(Box::new(expr))
    }
}
