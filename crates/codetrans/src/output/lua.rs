//! Lua backend.
//!
//! Emits Lua 5.4: `local` declarations, `..` concatenation, table
//! constructors, `function ... end` closures and a `require` header.
//! Scripts run in an embedded VM via `mlua`.

use crate::config::Config;
use crate::error::{RenderError, ScriptError};
use crate::ir::{Binary, BinaryOp, DataObjectLiteral, Expr, Lambda, LambdaBody, Literal};
use crate::ir::{MapForEach, Member, Stmt, UnaryOp};
use crate::lang::{Lang, Session};
use crate::registry::LangProvider;
use crate::script::{Globals, ResourceLoader, Script, load_source};
use crate::types::{ClassType, TypeInfo};
use crate::writer::{CodeWriter, ContainerSyntax, RenderResult, WriterState, escape_string};
use mlua::{Lua, LuaSerdeExt};

/// Static provider of Lua sessions for the registry.
pub static LUA_LANG: LuaProvider = LuaProvider;

pub struct LuaProvider;

impl LangProvider for LuaProvider {
    fn name(&self) -> &'static str {
        "lua"
    }

    fn extension(&self) -> &'static str {
        "lua"
    }

    fn create(&self, config: Config) -> Box<dyn Lang> {
        Box::new(LuaLang::new(config))
    }
}

const SYNTAX: ContainerSyntax = ContainerSyntax {
    object_open: "{",
    object_close: "}",
    empty_object: "{}",
    array_open: "{",
    array_close: "}",
    empty_array: "{}",
    key_separator: "=",
    separator: ",",
};

/// A Lua session.
#[derive(Debug, Default)]
pub struct LuaLang {
    session: Session,
}

impl LuaLang {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::new(config),
        }
    }
}

impl Lang for LuaLang {
    fn name(&self) -> &'static str {
        "lua"
    }

    fn extension(&self) -> &'static str {
        "lua"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn new_writer(&self) -> Box<dyn CodeWriter + '_> {
        Box::new(LuaWriter::new(&self.session))
    }

    fn load_script(
        &self,
        loader: &dyn ResourceLoader,
        path: &str,
    ) -> Result<Box<dyn Script>, ScriptError> {
        let resource = format!("{path}.lua");
        let source = load_source(loader, &resource)?;
        let lua = Lua::new();
        lua.load(source.as_str())
            .set_name(format!("@{resource}"))
            .into_function()
            .map_err(|e| ScriptError::Load {
                path: resource.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(path = %resource, "compiled lua script");
        Ok(Box::new(LuaScript {
            path: resource,
            source,
        }))
    }
}

struct LuaScript {
    path: String,
    source: String,
}

impl Script for LuaScript {
    fn path(&self) -> &str {
        &self.path
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn run(&self, globals: &mut Globals) -> Result<(), ScriptError> {
        let fail = |e: mlua::Error| ScriptError::Execution {
            path: self.path.clone(),
            source: Box::new(e),
        };
        let lua = Lua::new();
        let table = lua.globals();
        for (name, value) in globals.iter() {
            table
                .set(name.as_str(), lua.to_value(value).map_err(fail)?)
                .map_err(fail)?;
        }
        tracing::debug!(path = %self.path, bindings = globals.len(), "running lua script");
        lua.load(self.source.as_str())
            .set_name(format!("@{}", self.path))
            .exec()
            .map_err(fail)?;
        for (name, value) in globals.iter_mut() {
            let result: mlua::Value = table.get(name.as_str()).map_err(fail)?;
            *value = lua.from_value(result).map_err(fail)?;
        }
        Ok(())
    }
}

/// Writer for one Lua render pass.
pub struct LuaWriter<'a> {
    state: WriterState,
    session: &'a Session,
}

impl<'a> LuaWriter<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            state: WriterState::new(session.config().indent.clone()),
            session,
        }
    }

    /// Register `ty` and return the local it is bound to.
    fn bind(&self, ty: &ClassType) -> String {
        self.session.register("lua", ty);
        binding(&self.session.imports(), ty)
    }

    fn render_indented(&mut self, body: &Stmt) -> RenderResult {
        self.indent();
        self.render_body(body)?;
        self.unindent();
        Ok(())
    }

    /// Lambda or iteration body; expression bodies become one statement.
    fn render_function_body(&mut self, body: &LambdaBody, returns: bool) -> RenderResult {
        self.indent();
        match body {
            LambdaBody::Expr(expr) => {
                if returns && !is_statement(expr) {
                    self.append("return ");
                }
                expr.render(self)?;
                self.append("\n");
            }
            LambdaBody::Block(stmts) => self.render_block(stmts)?,
        }
        self.unindent();
        Ok(())
    }

    /// Loop update; `i++` style updates become assignments.
    fn render_update(&mut self, update: &Expr) -> RenderResult {
        let step = match update {
            Expr::Unary { op, operand } => match op {
                UnaryOp::PreIncrement | UnaryOp::PostIncrement => Some((operand, "+")),
                UnaryOp::PreDecrement | UnaryOp::PostDecrement => Some((operand, "-")),
                _ => None,
            },
            _ => None,
        };
        match step {
            Some((operand, sign)) => {
                operand.render(self)?;
                self.append(" = ");
                operand.render(self)?;
                self.append(&format!(" {sign} 1"));
                Ok(())
            }
            None => update.render(self),
        }
    }
}

/// Local name of a referenced type. The first type with a given simple name
/// takes it; later ones are bound to their mangled qualified name.
fn binding(imports: &[ClassType], ty: &ClassType) -> String {
    match imports.iter().find(|t| t.simple_name == ty.simple_name) {
        Some(first) if first != ty => ty.name.replace('.', "_"),
        _ => ty.simple_name.clone(),
    }
}

/// Expressions Lua only accepts in statement position.
fn is_statement(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Assign { .. }
            | Expr::DataObjectAssign { .. }
            | Expr::JsonObjectAssign { .. }
            | Expr::MapForEach(_)
    )
}

/// Values that are never `nil` or `false` at run time.
fn is_truthy(expr: &Expr) -> bool {
    match expr {
        Expr::Parens(inner) => is_truthy(inner),
        Expr::Literal(Literal::Null | Literal::Bool(false)) => false,
        Expr::Literal(_)
        | Expr::Lambda(_)
        | Expr::JsonObject(_)
        | Expr::JsonArray(_)
        | Expr::DataObject(_) => true,
        _ => false,
    }
}

impl CodeWriter for LuaWriter<'_> {
    fn state(&self) -> &WriterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriterState {
        &mut self.state
    }

    fn lang_name(&self) -> &'static str {
        "lua"
    }

    fn header_lines(&self) -> Vec<String> {
        let imports = self.session.imports();
        imports
            .iter()
            .map(|ty| {
                format!(
                    "local {} = require(\"{}\")",
                    binding(&imports, ty),
                    ty.translate_name("lua")
                )
            })
            .collect()
    }

    fn render_char_literal(&mut self, value: char) -> RenderResult {
        self.render_string_literal(&value.to_string())
    }

    fn render_null_literal(&mut self) -> RenderResult {
        self.append("nil");
        Ok(())
    }

    /// `/` stays float division and `>>` stays a logical shift; operand
    /// types are not known here, so integer forms are not chosen.
    fn binary_operator(&self, op: BinaryOp) -> Result<&'static str, RenderError> {
        Ok(match op {
            BinaryOp::Ne => "~=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "~",
            other => other.symbol(),
        })
    }

    fn render_binary(&mut self, binary: &Binary) -> RenderResult {
        // `%` floors; `math.fmod` truncates like the host remainder.
        if binary.op == BinaryOp::Rem && !binary.string_concat {
            self.append("math.fmod(");
            binary.left.render(self)?;
            self.append(", ");
            binary.right.render(self)?;
            self.append(")");
            return Ok(());
        }
        binary.left.render(self)?;
        let op = if binary.string_concat {
            ".."
        } else {
            self.binary_operator(binary.op)?
        };
        self.append(" ");
        self.append(op);
        self.append(" ");
        binary.right.render(self)
    }

    fn render_unary(&mut self, op: UnaryOp, operand: &Expr) -> RenderResult {
        let prefix = match op {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not ",
            UnaryOp::Complement => "~",
            _ => return Err(self.unsupported("increment/decrement operator")),
        };
        self.append(prefix);
        operand.render(self)
    }

    fn render_this(&mut self) -> RenderResult {
        self.append("self");
        Ok(())
    }

    fn render_conditional(&mut self, test: &Expr, then: &Expr, otherwise: &Expr) -> RenderResult {
        // `a and b or c` picks `c` whenever `b` is falsy.
        if is_truthy(then) {
            test.render(self)?;
            self.append(" and ");
            then.render(self)?;
            self.append(" or ");
            return otherwise.render(self);
        }
        self.append("(function() if ");
        test.render(self)?;
        self.append(" then return ");
        then.render(self)?;
        self.append(" else return ");
        otherwise.render(self)?;
        self.append(" end end)()");
        Ok(())
    }

    fn render_method_call(
        &mut self,
        receiver: Option<&Expr>,
        method: &str,
        args: &[Expr],
    ) -> RenderResult {
        if let Some(receiver) = receiver {
            receiver.render(self)?;
            // Static calls on a module table use `.`, instance calls `:`.
            self.append(match receiver {
                Expr::ApiType(_) => ".",
                _ => ":",
            });
        }
        self.append(method);
        self.append("(");
        self.render_args(args)?;
        self.append(")");
        Ok(())
    }

    fn render_new(&mut self, ty: &TypeInfo, args: &[Expr]) -> RenderResult {
        self.render_type_name(ty)?;
        self.append(".new(");
        self.render_args(args)?;
        self.append(")");
        Ok(())
    }

    fn render_lambda(&mut self, lambda: &Lambda) -> RenderResult {
        let names: Vec<&str> = lambda.params.iter().map(|p| p.name.as_str()).collect();
        self.append(&format!("function({})\n", names.join(", ")));
        self.render_function_body(&lambda.body, true)?;
        self.append("end");
        Ok(())
    }

    fn render_api_type(&mut self, ty: &ClassType) -> RenderResult {
        let name = self.bind(ty);
        self.append(&name);
        Ok(())
    }

    fn render_enum_constant(&mut self, ty: &ClassType, constant: &str) -> RenderResult {
        let name = self.bind(ty);
        self.append(&name);
        self.append(".");
        self.append(constant);
        Ok(())
    }

    fn render_console(&mut self, expr: &Expr) -> RenderResult {
        self.append("print(");
        expr.render(self)?;
        self.append(")");
        Ok(())
    }

    fn render_method_reference(&mut self, receiver: &Expr, method: &str) -> RenderResult {
        self.append("function(...) return ");
        receiver.render(self)?;
        self.append(":");
        self.append(method);
        self.append("(...) end");
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
        self.append(&format!(
            "for {}, {} in pairs(",
            iteration.key.name, iteration.value.name
        ));
        iteration.map.render(self)?;
        self.append(") do\n");
        self.render_function_body(&iteration.body, false)?;
        self.append("end");
        Ok(())
    }

    fn render_member_key(&mut self, name: &Expr, unquote: bool) -> RenderResult {
        match name {
            Expr::Literal(Literal::Str(key)) if unquote => {
                self.append(key);
                Ok(())
            }
            other => {
                self.append("[");
                other.render(self)?;
                self.append("]");
                Ok(())
            }
        }
    }

    fn render_json_object(&mut self, members: &[Member]) -> RenderResult {
        self.render_object_literal(members, false, &SYNTAX)
    }

    fn render_json_array(&mut self, values: &[Expr]) -> RenderResult {
        self.render_array_literal(values, &SYNTAX)
    }

    fn render_data_object(&mut self, literal: &DataObjectLiteral) -> RenderResult {
        self.render_object_literal(literal.members(), true, &SYNTAX)
    }

    fn render_json_object_assign(&mut self, object: &Expr, name: &Expr, value: &Expr) -> RenderResult {
        self.render_map_get(object, name)?;
        self.append(" = ");
        value.render(self)
    }

    fn render_json_object_member_select(&mut self, object: &Expr, name: &Expr) -> RenderResult {
        self.render_map_get(object, name)
    }

    fn render_json_object_to_string(&mut self, object: &Expr) -> RenderResult {
        self.append("tostring(");
        object.render(self)?;
        self.append(")");
        Ok(())
    }

    fn render_json_array_to_string(&mut self, array: &Expr) -> RenderResult {
        self.render_json_object_to_string(array)
    }

    fn render_var_decl(&mut self, _ty: &TypeInfo, name: &str, init: Option<&Expr>) -> RenderResult {
        self.append("local ");
        self.append(name);
        if let Some(init) = init {
            self.append(" = ");
            init.render(self)?;
        }
        Ok(())
    }

    fn render_for(&mut self, init: &Stmt, test: &Expr, update: &Expr, body: &Stmt) -> RenderResult {
        self.append("do\n");
        self.indent();
        self.render_stmt(init)?;
        self.append("while ");
        test.render(self)?;
        self.append(" do\n");
        self.indent();
        self.render_body(body)?;
        self.render_update(update)?;
        self.append("\n");
        self.unindent();
        self.append("end\n");
        self.unindent();
        self.append("end");
        Ok(())
    }

    fn render_for_each(&mut self, variable: &str, iterable: &Expr, body: &Stmt) -> RenderResult {
        self.append(&format!("for _, {variable} in ipairs("));
        iterable.render(self)?;
        self.append(") do\n");
        self.render_indented(body)?;
        self.append("end");
        Ok(())
    }

    fn render_if(&mut self, test: &Expr, then: &Stmt, otherwise: Option<&Stmt>) -> RenderResult {
        self.append("if ");
        test.render(self)?;
        self.append(" then\n");
        self.render_indented(then)?;
        let mut otherwise = otherwise;
        while let Some(stmt) = otherwise {
            match stmt {
                Stmt::If {
                    test,
                    then,
                    otherwise: next,
                } => {
                    self.append("elseif ");
                    test.render(self)?;
                    self.append(" then\n");
                    self.render_indented(then)?;
                    otherwise = next.as_deref();
                }
                other => {
                    self.append("else\n");
                    self.render_indented(other)?;
                    otherwise = None;
                }
            }
        }
        self.append("end");
        Ok(())
    }

    fn render_while(&mut self, test: &Expr, body: &Stmt) -> RenderResult {
        self.append("while ");
        test.render(self)?;
        self.append(" do\n");
        self.render_indented(body)?;
        self.append("end");
        Ok(())
    }

    fn render_throw(&mut self, exception: &str, reason: Option<&Expr>) -> RenderResult {
        self.append("error(");
        match reason {
            Some(reason) => reason.render(self)?,
            None => self.append(&format!("\"{}\"", escape_string(exception))),
        }
        self.append(")");
        Ok(())
    }

    fn render_continue(&mut self) -> RenderResult {
        Err(self.unsupported("continue"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Param, Program};
    use crate::script::MemoryLoader;

    fn expr(e: Expr) -> String {
        LuaLang::default().render_expr(&e).unwrap()
    }

    fn render(body: Vec<Stmt>) -> Result<String, RenderError> {
        LuaLang::default().render(&Program::new(body))
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr(Expr::long(10)), "10");
        assert_eq!(expr(Expr::double("2.5")), "2.5");
        assert_eq!(expr(Expr::null()), "nil");
        assert_eq!(expr(Expr::char('c')), "\"c\"");
    }

    #[test]
    fn test_operators() {
        let e = Expr::binary(
            Expr::binary(Expr::ident("a"), BinaryOp::Ne, Expr::int(1)),
            BinaryOp::And,
            Expr::unary(UnaryOp::Not, Expr::ident("done")),
        );
        assert_eq!(expr(e), "a ~= 1 and not done");
        assert_eq!(
            expr(Expr::concat(Expr::string("a"), Expr::ident("x"))),
            "\"a\" .. x"
        );
    }

    #[test]
    fn test_increment_outside_loop_unsupported() {
        let err = LuaLang::default()
            .render_expr(&Expr::unary(UnaryOp::PostIncrement, Expr::ident("i")))
            .unwrap_err();
        assert!(matches!(err, RenderError::Unsupported { lang: "lua", .. }));
    }

    #[test]
    fn test_for_loop_becomes_while() {
        let out = render(vec![Stmt::for_loop(
            Stmt::var_decl(TypeInfo::primitive("int"), "i", Some(Expr::int(0))),
            Expr::binary(Expr::ident("i"), BinaryOp::Lt, Expr::int(3)),
            Expr::unary(UnaryOp::PostIncrement, Expr::ident("i")),
            Stmt::block(vec![Stmt::expr(Expr::Console(Box::new(Expr::ident("i"))))]),
        )])
        .unwrap();
        assert_eq!(
            out,
            "do\n  local i = 0\n  while i < 3 do\n    print(i)\n    i = i + 1\n  end\nend\n"
        );
    }

    #[test]
    fn test_if_elseif_else() {
        let out = render(vec![Stmt::if_stmt(
            Expr::binary(Expr::ident("x"), BinaryOp::Gt, Expr::int(0)),
            Stmt::return_stmt(Some(Expr::int(1))),
            Some(Stmt::if_stmt(
                Expr::binary(Expr::ident("x"), BinaryOp::Lt, Expr::int(0)),
                Stmt::return_stmt(Some(Expr::int(-1))),
                Some(Stmt::return_stmt(Some(Expr::int(0)))),
            )),
        )])
        .unwrap();
        assert_eq!(
            out,
            "if x > 0 then\n  return 1\nelseif x < 0 then\n  return -1\nelse\n  return 0\nend\n"
        );
    }

    #[test]
    fn test_for_each_and_map_iteration() {
        let out = render(vec![
            Stmt::for_each(
                "item",
                Expr::ident("items"),
                Stmt::expr(Expr::Console(Box::new(Expr::ident("item")))),
            ),
            Stmt::expr(Expr::map_for_each(
                Expr::ident("headers"),
                Param::new("k", TypeInfo::primitive("String")),
                Param::new("v", TypeInfo::primitive("String")),
                LambdaBody::Expr(Box::new(Expr::Console(Box::new(Expr::ident("v"))))),
            )),
        ])
        .unwrap();
        assert_eq!(
            out,
            "for _, item in ipairs(items) do\n  print(item)\nend\n\
             for k, v in pairs(headers) do\n  print(v)\nend\n"
        );
    }

    #[test]
    fn test_lambda() {
        let e = Expr::lambda(
            vec![
                Param::new("a", TypeInfo::primitive("int")),
                Param::new("b", TypeInfo::primitive("int")),
            ],
            LambdaBody::Expr(Box::new(Expr::binary(
                Expr::ident("a"),
                BinaryOp::Add,
                Expr::ident("b"),
            ))),
        );
        assert_eq!(expr(e), "function(a, b)\n  return a + b\nend");
    }

    #[test]
    fn test_json_object_quoted_keys() {
        let e = Expr::JsonObject(vec![
            Member::single("content-type", Expr::string("text/plain")),
            Member::array("ids", vec![Expr::int(1), Expr::int(2)]),
        ]);
        assert_eq!(
            expr(e),
            "{\n  [\"content-type\"]=\"text/plain\",\n  [\"ids\"]={\n    1,\n    2\n  }\n}"
        );
    }

    #[test]
    fn test_calls_and_construction() {
        let lang = LuaLang::default();
        let server = ClassType::api("io.vertx.core.http.HttpServer");
        let call = Expr::invoke(lang.api_type(&server), "create", vec![]).unwrap();
        assert_eq!(lang.render_expr(&call).unwrap(), "HttpServer.create()");
        let call = Expr::invoke(Expr::ident("server"), "listen", vec![Expr::int(80)]).unwrap();
        assert_eq!(lang.render_expr(&call).unwrap(), "server:listen(80)");
        let new = Expr::new_instance(TypeInfo::Class(server), vec![]);
        assert_eq!(lang.render_expr(&new).unwrap(), "HttpServer.new()");
        assert_eq!(
            lang.render_expr(&Expr::method_reference(Expr::This, "handle"))
                .unwrap(),
            "function(...) return self:handle(...) end"
        );
    }

    #[test]
    fn test_throw_and_continue() {
        let out = render(vec![
            Stmt::throw("IllegalArgumentException", None),
            Stmt::throw("RuntimeException", Some(Expr::string("bad"))),
        ])
        .unwrap();
        assert_eq!(out, "error(\"IllegalArgumentException\")\nerror(\"bad\")\n");
        assert!(render(vec![Stmt::while_loop(Expr::bool(true), Stmt::Continue)]).is_err());
    }

    #[test]
    fn test_require_header() {
        let lang = LuaLang::default();
        let color = ClassType::enumeration("io.example.Color").with_translation("lua", "example.color");
        let out = lang
            .render(&Program::new(vec![Stmt::var_decl(
                TypeInfo::Class(color.clone()),
                "c",
                Some(lang.enum_constant(&color, "RED")),
            )]))
            .unwrap();
        assert_eq!(out, "local Color = require(\"example.color\")\nlocal c = Color.RED\n");
    }

    #[test]
    fn test_script_runs_against_globals() {
        let loader = MemoryLoader::new().with("sum.lua", "result = a + b");
        let script = LuaLang::default().load_script(&loader, "sum").unwrap();
        assert_eq!(script.path(), "sum.lua");
        let mut globals = Globals::new();
        globals.insert("a".into(), serde_json::json!(2));
        globals.insert("b".into(), serde_json::json!(3));
        globals.insert("result".into(), serde_json::Value::Null);
        script.run(&mut globals).unwrap();
        assert_eq!(globals["result"], serde_json::json!(5));
    }

    #[test]
    fn test_script_compile_failure() {
        let loader = MemoryLoader::new().with("broken.lua", "x = = 1");
        let err = LuaLang::default().load_script(&loader, "broken").err().unwrap();
        assert!(matches!(err, ScriptError::Load { ref path, .. } if path == "broken.lua"));
    }

    #[test]
    fn test_script_runtime_error_propagates() {
        let loader = MemoryLoader::new().with("fail.lua", "error(\"boom\")");
        let script = LuaLang::default().load_script(&loader, "fail").unwrap();
        let err = script.run(&mut Globals::new()).unwrap_err();
        match err {
            ScriptError::Execution { path, source } => {
                assert_eq!(path, "fail.lua");
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("expected execution failure, got {other:?}"),
        }
    }

    /// Render `body`, then run it with `globals` bound.
    fn run(body: Vec<Stmt>, globals: &mut Globals) -> String {
        let source = render(body).unwrap();
        let loader = MemoryLoader::new().with("generated.lua", source.clone());
        let script = LuaLang::default().load_script(&loader, "generated").unwrap();
        script.run(globals).unwrap();
        source
    }

    fn bindings(names: &[&str]) -> Globals {
        names
            .iter()
            .map(|name| (name.to_string(), serde_json::Value::Null))
            .collect()
    }

    #[test]
    fn test_script_errors_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<mlua::Error>();
        assert_send_sync::<ScriptError>();
    }

    #[test]
    fn test_conditional_with_falsy_branch() {
        let mut globals = bindings(&["result"]);
        let source = run(
            vec![Stmt::expr(Expr::assign(
                Expr::ident("result"),
                Expr::conditional(Expr::bool(true), Expr::bool(false), Expr::bool(true)),
            ))],
            &mut globals,
        );
        assert_eq!(
            source,
            "result = (function() if true then return false else return true end end)()\n"
        );
        assert_eq!(globals["result"], serde_json::json!(false));
    }

    #[test]
    fn test_conditional_with_truthy_branch() {
        let e = Expr::conditional(Expr::ident("flag"), Expr::int(1), Expr::int(2));
        assert_eq!(expr(e), "flag and 1 or 2");
        let e = Expr::conditional(Expr::ident("flag"), Expr::ident("a"), Expr::int(2));
        assert!(expr(e).starts_with("(function() if flag then return a"));
    }

    #[test]
    fn test_assignment_lambda_body_has_no_return() {
        let mut globals = bindings(&["x"]);
        let source = run(
            vec![
                Stmt::var_decl(
                    TypeInfo::primitive("Runnable"),
                    "f",
                    Some(Expr::lambda(
                        vec![],
                        LambdaBody::Expr(Box::new(Expr::assign(Expr::ident("x"), Expr::int(1)))),
                    )),
                ),
                Stmt::expr(Expr::call(None, "f", vec![])),
            ],
            &mut globals,
        );
        assert_eq!(source, "local f = function()\n  x = 1\nend\nf()\n");
        assert_eq!(globals["x"], serde_json::json!(1));
    }

    #[test]
    fn test_setter_lambda_body_has_no_return() {
        let set = Expr::invoke(
            Expr::data_object_value(Expr::ident("opts")),
            "setPort",
            vec![Expr::ident("p")],
        )
        .unwrap();
        let e = Expr::lambda(
            vec![Param::new("p", TypeInfo::primitive("int"))],
            LambdaBody::Expr(Box::new(set)),
        );
        assert_eq!(expr(e), "function(p)\n  opts.port = p\nend");
    }

    #[test]
    fn test_remainder_truncates_toward_zero() {
        let mut globals = bindings(&["r"]);
        let source = run(
            vec![Stmt::expr(Expr::assign(
                Expr::ident("r"),
                Expr::binary(Expr::int(-7), BinaryOp::Rem, Expr::int(2)),
            ))],
            &mut globals,
        );
        assert_eq!(source, "r = math.fmod(-7, 2)\n");
        assert_eq!(globals["r"], serde_json::json!(-1));
    }

    #[test]
    fn test_same_simple_name_gets_distinct_locals() {
        let lang = LuaLang::default();
        let first = ClassType::enumeration("io.a.Color");
        let second = ClassType::enumeration("io.b.Color");
        let out = lang
            .render(&Program::new(vec![
                Stmt::expr(lang.console(lang.enum_constant(&first, "RED"))),
                Stmt::expr(lang.console(lang.enum_constant(&second, "BLUE"))),
                Stmt::expr(lang.console(lang.enum_constant(&first, "GREEN"))),
            ]))
            .unwrap();
        assert_eq!(
            out,
            "local Color = require(\"io.a.Color\")\n\
             local io_b_Color = require(\"io.b.Color\")\n\
             print(Color.RED)\n\
             print(io_b_Color.BLUE)\n\
             print(Color.GREEN)\n"
        );
    }
}
