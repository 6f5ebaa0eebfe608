//! Groovy backend.
//!
//! Closures instead of lambdas, `def` declarations, `${}` interpolation for
//! string concatenation, map literals, and an `import` header collected
//! while rendering.

use crate::config::Config;
use crate::error::ScriptError;
use crate::ir::{Binary, Expr, Lambda, LambdaBody, Literal, MapForEach, Member, Stmt};
use crate::ir::{BinaryOp, DataObjectLiteral};
use crate::lang::{Lang, Session};
use crate::registry::LangProvider;
use crate::script::{Globals, ResourceLoader, Script, ScriptEngine, load_source};
use crate::types::{ClassKind, ClassType, TypeInfo};
use crate::writer::{CodeWriter, ContainerSyntax, RenderResult, WriterState, escape_string};
use std::sync::Arc;

/// Static provider of Groovy sessions for the registry.
pub static GROOVY_LANG: GroovyProvider = GroovyProvider;

pub struct GroovyProvider;

impl LangProvider for GroovyProvider {
    fn name(&self) -> &'static str {
        "groovy"
    }

    fn extension(&self) -> &'static str {
        "groovy"
    }

    fn create(&self, config: Config) -> Box<dyn Lang> {
        Box::new(GroovyLang::new(config))
    }
}

const SYNTAX: ContainerSyntax = ContainerSyntax {
    object_open: "[",
    object_close: "]",
    empty_object: "[:]",
    array_open: "[",
    array_close: "]",
    empty_array: "[]",
    key_separator: ":",
    separator: ",",
};

/// A Groovy session.
///
/// Groovy scripts need a JVM; executing them is delegated to an injected
/// [`ScriptEngine`].
pub struct GroovyLang {
    session: Session,
    engine: Option<Arc<dyn ScriptEngine>>,
}

impl GroovyLang {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::new(config),
            engine: None,
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn ScriptEngine>) -> Self {
        self.engine = Some(engine);
        self
    }
}

impl Default for GroovyLang {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Lang for GroovyLang {
    fn name(&self) -> &'static str {
        "groovy"
    }

    fn extension(&self) -> &'static str {
        "groovy"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn new_writer(&self) -> Box<dyn CodeWriter + '_> {
        Box::new(GroovyWriter::new(&self.session))
    }

    fn load_script(
        &self,
        loader: &dyn ResourceLoader,
        path: &str,
    ) -> Result<Box<dyn Script>, ScriptError> {
        let resource = format!("{path}.groovy");
        let source = load_source(loader, &resource)?;
        let engine = self.engine.clone().ok_or_else(|| ScriptError::Load {
            path: resource.clone(),
            reason: "no groovy script engine configured".to_string(),
        })?;
        let name = path.replace('/', ".");
        engine
            .compile(&name, &source)
            .map_err(|e| ScriptError::Load {
                path: resource.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(path = %resource, "loaded groovy script");
        Ok(Box::new(GroovyScript {
            path: resource,
            name,
            source,
            engine,
        }))
    }

    fn class_expression(&self, ty: &ClassType) -> Expr {
        Expr::Ident(ty.name.clone())
    }
}

struct GroovyScript {
    path: String,
    name: String,
    source: String,
    engine: Arc<dyn ScriptEngine>,
}

impl Script for GroovyScript {
    fn path(&self) -> &str {
        &self.path
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn run(&self, globals: &mut Globals) -> Result<(), ScriptError> {
        tracing::debug!(path = %self.path, bindings = globals.len(), "running groovy script");
        self.engine
            .execute(&self.name, &self.source, globals)
            .map_err(|source| ScriptError::Execution {
                path: self.path.clone(),
                source,
            })
    }
}

/// Writer for one Groovy render pass.
pub struct GroovyWriter<'a> {
    state: WriterState,
    session: &'a Session,
}

impl<'a> GroovyWriter<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            state: WriterState::new(session.config().indent.clone()),
            session,
        }
    }

    fn register(&self, ty: &ClassType) {
        self.session.register("groovy", ty);
    }

    /// `{ a, b ->` + body + `}`; expression bodies get their own line.
    fn render_closure(&mut self, params: &[&str], body: &LambdaBody) -> RenderResult {
        self.append("{");
        for (i, name) in params.iter().enumerate() {
            self.append(if i == 0 { " " } else { ", " });
            self.append(name);
        }
        self.append(" ->\n");
        self.indent();
        self.render_lambda_body(body)?;
        if let LambdaBody::Expr(_) = body {
            self.append("\n");
        }
        self.unindent();
        self.append("}");
        Ok(())
    }

    fn render_interpolated(&mut self, binary: &Binary) -> RenderResult {
        let mut parts = Vec::new();
        concat_parts(&binary.left, &mut parts);
        concat_parts(&binary.right, &mut parts);
        self.append("\"");
        for part in parts {
            match part {
                Expr::Literal(Literal::Str(text)) => self.append(&escape_groovy(text)),
                other => {
                    self.append("${");
                    other.render(self)?;
                    self.append("}");
                }
            }
        }
        self.append("\"");
        Ok(())
    }

    /// `.key` for literal names, `[name]` otherwise.
    fn render_key_access(&mut self, object: &Expr, name: &Expr) -> RenderResult {
        object.render(self)?;
        match name {
            Expr::Literal(Literal::Str(key)) => {
                self.append(".");
                self.append(key);
            }
            other => {
                self.append("[");
                other.render(self)?;
                self.append("]");
            }
        }
        Ok(())
    }
}

/// Flatten a left-associated string concatenation chain.
fn concat_parts<'e>(expr: &'e Expr, parts: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Binary(Binary {
            left,
            op: BinaryOp::Add,
            right,
            string_concat: true,
        }) => {
            concat_parts(left, parts);
            concat_parts(right, parts);
        }
        other => parts.push(other),
    }
}

fn escape_groovy(s: &str) -> String {
    escape_string(s).replace('$', "\\$")
}

impl CodeWriter for GroovyWriter<'_> {
    fn state(&self) -> &WriterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriterState {
        &mut self.state
    }

    fn lang_name(&self) -> &'static str {
        "groovy"
    }

    fn header_lines(&self) -> Vec<String> {
        self.session
            .imports()
            .iter()
            .map(|ty| {
                let fqn = match ty.kind {
                    ClassKind::Api => ty.translate_name("groovy"),
                    _ => ty.name.as_str(),
                };
                format!("import {fqn}")
            })
            .collect()
    }

    fn render_binary(&mut self, binary: &Binary) -> RenderResult {
        if binary.string_concat && self.session.config().interpolate {
            return self.render_interpolated(binary);
        }
        binary.left.render(self)?;
        self.append(" ");
        self.append(binary.op.symbol());
        self.append(" ");
        binary.right.render(self)
    }

    fn render_long_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        self.append("L");
        Ok(())
    }

    fn render_float_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        self.append("f");
        Ok(())
    }

    fn render_double_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        self.append("d");
        Ok(())
    }

    fn render_string_literal(&mut self, value: &str) -> RenderResult {
        self.append(&format!("\"{}\"", escape_groovy(value)));
        Ok(())
    }

    fn render_lambda(&mut self, lambda: &Lambda) -> RenderResult {
        let names: Vec<&str> = lambda.params.iter().map(|p| p.name.as_str()).collect();
        self.render_closure(&names, &lambda.body)
    }

    fn render_api_type(&mut self, ty: &ClassType) -> RenderResult {
        self.register(ty);
        self.append(&ty.simple_name);
        Ok(())
    }

    fn render_enum_constant(&mut self, ty: &ClassType, constant: &str) -> RenderResult {
        self.register(ty);
        self.append(&ty.simple_name);
        self.append(".");
        self.append(constant);
        Ok(())
    }

    fn render_console(&mut self, expr: &Expr) -> RenderResult {
        self.append("println(");
        expr.render(self)?;
        self.append(")");
        Ok(())
    }

    fn render_method_reference(&mut self, receiver: &Expr, method: &str) -> RenderResult {
        receiver.render(self)?;
        self.append(".&");
        self.append(method);
        Ok(())
    }

    fn render_map_get(&mut self, map: &Expr, key: &Expr) -> RenderResult {
        map.render(self)?;
        self.append("[");
        key.render(self)?;
        self.append("]");
        Ok(())
    }

    fn render_map_for_each(&mut self, iteration: &MapForEach) -> RenderResult {
        iteration.map.render(self)?;
        self.append(".each ");
        self.render_closure(
            &[iteration.key.name.as_str(), iteration.value.name.as_str()],
            &iteration.body,
        )
    }

    fn render_json_object(&mut self, members: &[Member]) -> RenderResult {
        self.render_object_literal(members, true, &SYNTAX)
    }

    fn render_json_array(&mut self, values: &[Expr]) -> RenderResult {
        self.render_array_literal(values, &SYNTAX)
    }

    fn render_data_object(&mut self, literal: &DataObjectLiteral) -> RenderResult {
        self.render_object_literal(literal.members(), false, &SYNTAX)
    }

    fn render_json_object_assign(&mut self, object: &Expr, name: &Expr, value: &Expr) -> RenderResult {
        self.render_key_access(object, name)?;
        self.append(" = ");
        value.render(self)
    }

    fn render_json_object_member_select(&mut self, object: &Expr, name: &Expr) -> RenderResult {
        self.render_key_access(object, name)
    }

    fn render_json_object_to_string(&mut self, object: &Expr) -> RenderResult {
        object.render(self)?;
        self.append(".toString()");
        Ok(())
    }

    fn render_json_array_to_string(&mut self, array: &Expr) -> RenderResult {
        array.render(self)?;
        self.append(".toString()");
        Ok(())
    }

    fn render_var_decl(&mut self, _ty: &TypeInfo, name: &str, init: Option<&Expr>) -> RenderResult {
        self.append("def ");
        self.append(name);
        if let Some(init) = init {
            self.append(" = ");
            init.render(self)?;
        }
        Ok(())
    }

    fn render_for_each(&mut self, variable: &str, iterable: &Expr, body: &Stmt) -> RenderResult {
        iterable.render(self)?;
        self.append(".each { ");
        self.append(variable);
        self.append(" ->\n");
        self.indent();
        self.render_body(body)?;
        self.unindent();
        self.append("}");
        Ok(())
    }
}
