//! The writer protocol: stateful, indentation-aware text emission.
//!
//! IR nodes call back into a [`CodeWriter`] for every construct whose
//! syntax differs between targets. The provided methods implement
//! C-family defaults; backends override the hooks they need.
//!
//! # Deferred header
//!
//! Imports are only known once the whole body has been traversed. The
//! outermost [`CodeWriter::render_block`] renders the body, then splices
//! [`CodeWriter::header_lines`] in front of it. Nested blocks never do this:
//! the nesting depth is tracked in [`WriterState`].

use crate::error::RenderError;
use crate::ir::{Binary, BinaryOp, Expr, Lambda, LambdaBody, MapForEach, Member, MemberValue};
use crate::ir::{DataObjectLiteral, Literal, Program, Stmt, UnaryOp};
use crate::types::{ClassType, TypeInfo};

pub type RenderResult = Result<(), RenderError>;

/// Output buffer and mutable state of one render pass.
#[derive(Debug, Clone)]
pub struct WriterState {
    buffer: String,
    indent_unit: String,
    level: usize,
    at_line_start: bool,
    depth: usize,
}

impl WriterState {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            indent_unit: indent_unit.into(),
            level: 0,
            at_line_start: true,
            depth: 0,
        }
    }

    /// Append text; indentation is written before the first character of
    /// each non-empty line.
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            self.push(c);
        }
    }

    pub fn push(&mut self, c: char) {
        if c == '\n' {
            self.buffer.push('\n');
            self.at_line_start = true;
            return;
        }
        if self.at_line_start {
            for _ in 0..self.level {
                self.buffer.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
        self.buffer.push(c);
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn unindent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter a block; returns true for the outermost block of the pass.
    pub fn enter_block(&mut self) -> bool {
        self.depth += 1;
        self.depth == 1
    }

    pub fn exit_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Swap the rendered body out, write `lines` one per line, then put the
    /// body back unchanged.
    pub fn prepend_header(&mut self, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let body = std::mem::take(&mut self.buffer);
        let (level, at_line_start) = (self.level, self.at_line_start);
        self.level = 0;
        self.at_line_start = true;
        for line in lines {
            self.push_str(line);
            self.push('\n');
        }
        self.buffer.push_str(&body);
        self.level = level;
        self.at_line_start = at_line_start;
    }

    pub fn take(&mut self) -> String {
        self.at_line_start = true;
        std::mem::take(&mut self.buffer)
    }
}

/// Delimiters used for JSON object, data object and array literals.
#[derive(Debug, Clone, Copy)]
pub struct ContainerSyntax {
    pub object_open: &'static str,
    pub object_close: &'static str,
    pub empty_object: &'static str,
    pub array_open: &'static str,
    pub array_close: &'static str,
    pub empty_array: &'static str,
    /// Between a member name and its value.
    pub key_separator: &'static str,
    /// Between members/elements; never emitted after the last one.
    pub separator: &'static str,
}

/// Escape a string for a double-quoted C-family literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// A writer for one target language.
///
/// Implementors provide access to their [`WriterState`] and override the
/// hooks whose syntax differs from the C-family defaults.
pub trait CodeWriter {
    fn state(&self) -> &WriterState;

    fn state_mut(&mut self) -> &mut WriterState;

    /// Target language name, used in errors.
    fn lang_name(&self) -> &'static str;

    fn append(&mut self, text: &str) {
        self.state_mut().push_str(text);
    }

    fn indent(&mut self) {
        self.state_mut().indent();
    }

    fn unindent(&mut self) {
        self.state_mut().unindent();
    }

    fn unsupported(&self, construct: &str) -> RenderError {
        RenderError::unsupported(construct, self.lang_name())
    }

    /// Lines written in front of the top-level block (e.g. imports).
    fn header_lines(&self) -> Vec<String> {
        Vec::new()
    }

    /// Top-level entry point of a render pass.
    fn render_program(&mut self, program: &Program) -> RenderResult {
        self.render_block(&program.body)
    }

    /// Render an expression on its own. The header is never emitted.
    fn render_fragment(&mut self, expr: &Expr) -> RenderResult {
        self.state_mut().enter_block();
        let result = expr.render(self);
        self.state_mut().exit_block();
        result
    }

    /// End the pass and hand over the text.
    fn finish(&mut self) -> String {
        self.state_mut().take()
    }

    /// Render a statement terminated by exactly one newline.
    fn render_stmt(&mut self, stmt: &Stmt) -> RenderResult {
        stmt.render(self)?;
        if !self.state().at_line_start() {
            self.append("\n");
        }
        Ok(())
    }

    fn render_block(&mut self, stmts: &[Stmt]) -> RenderResult {
        let top = self.state_mut().enter_block();
        let result = stmts.iter().try_for_each(|stmt| self.render_stmt(stmt));
        self.state_mut().exit_block();
        result?;
        if top {
            let lines = self.header_lines();
            if !lines.is_empty() {
                tracing::debug!(lang = self.lang_name(), count = lines.len(), "emitting header");
            }
            self.state_mut().prepend_header(&lines);
        }
        Ok(())
    }

    /// Body of a compound statement, one statement per line.
    fn render_body(&mut self, body: &Stmt) -> RenderResult {
        match body {
            Stmt::Block(stmts) => self.render_block(stmts),
            other => self.render_stmt(other),
        }
    }

    fn render_lambda_body(&mut self, body: &LambdaBody) -> RenderResult {
        match body {
            LambdaBody::Expr(expr) => expr.render(self),
            LambdaBody::Block(stmts) => self.render_block(stmts),
        }
    }

    fn render_args(&mut self, args: &[Expr]) -> RenderResult {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            arg.render(self)?;
        }
        Ok(())
    }

    // Literals

    fn render_int_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        Ok(())
    }

    fn render_long_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        Ok(())
    }

    fn render_float_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        Ok(())
    }

    fn render_double_literal(&mut self, value: &str) -> RenderResult {
        self.append(value);
        Ok(())
    }

    fn render_char_literal(&mut self, value: char) -> RenderResult {
        let escaped = match value {
            '\'' => "\\'".to_string(),
            c => escape_string(&c.to_string()),
        };
        self.append(&format!("'{escaped}'"));
        Ok(())
    }

    fn render_string_literal(&mut self, value: &str) -> RenderResult {
        self.append(&format!("\"{}\"", escape_string(value)));
        Ok(())
    }

    fn render_bool_literal(&mut self, value: bool) -> RenderResult {
        self.append(if value { "true" } else { "false" });
        Ok(())
    }

    fn render_null_literal(&mut self) -> RenderResult {
        self.append("null");
        Ok(())
    }

    // Operators

    fn binary_operator(&self, op: BinaryOp) -> Result<&'static str, RenderError> {
        Ok(op.symbol())
    }

    fn render_binary(&mut self, binary: &Binary) -> RenderResult {
        binary.left.render(self)?;
        let op = self.binary_operator(binary.op)?;
        self.append(" ");
        self.append(op);
        self.append(" ");
        binary.right.render(self)
    }

    fn render_unary(&mut self, op: UnaryOp, operand: &Expr) -> RenderResult {
        let (prefix, suffix) = match op {
            UnaryOp::Neg => ("-", ""),
            UnaryOp::Not => ("!", ""),
            UnaryOp::Complement => ("~", ""),
            UnaryOp::PreIncrement => ("++", ""),
            UnaryOp::PreDecrement => ("--", ""),
            UnaryOp::PostIncrement => ("", "++"),
            UnaryOp::PostDecrement => ("", "--"),
        };
        self.append(prefix);
        operand.render(self)?;
        self.append(suffix);
        Ok(())
    }

    // Expressions

    fn render_this(&mut self) -> RenderResult {
        self.append("this");
        Ok(())
    }

    fn render_member_select(&mut self, object: &Expr, name: &str) -> RenderResult {
        object.render(self)?;
        self.append(".");
        self.append(name);
        Ok(())
    }

    fn render_assign(&mut self, target: &Expr, value: &Expr) -> RenderResult {
        target.render(self)?;
        self.append(" = ");
        value.render(self)
    }

    fn render_conditional(&mut self, test: &Expr, then: &Expr, otherwise: &Expr) -> RenderResult {
        test.render(self)?;
        self.append(" ? ");
        then.render(self)?;
        self.append(" : ");
        otherwise.render(self)
    }

    fn render_method_call(
        &mut self,
        receiver: Option<&Expr>,
        method: &str,
        args: &[Expr],
    ) -> RenderResult {
        if let Some(receiver) = receiver {
            receiver.render(self)?;
            self.append(".");
        }
        self.append(method);
        self.append("(");
        self.render_args(args)?;
        self.append(")");
        Ok(())
    }

    /// Name of a type in expression position.
    fn render_type_name(&mut self, ty: &TypeInfo) -> RenderResult {
        match ty.class() {
            Some(class) if class.is_importable() => self.render_api_type(class),
            _ => {
                self.append(ty.name());
                Ok(())
            }
        }
    }

    fn render_new(&mut self, ty: &TypeInfo, args: &[Expr]) -> RenderResult {
        self.append("new ");
        self.render_type_name(ty)?;
        self.append("(");
        self.render_args(args)?;
        self.append(")");
        Ok(())
    }

    fn render_lambda(&mut self, lambda: &Lambda) -> RenderResult {
        self.append("(");
        let names: Vec<&str> = lambda.params.iter().map(|p| p.name.as_str()).collect();
        self.append(&names.join(", "));
        self.append(") -> ");
        match &lambda.body {
            LambdaBody::Expr(expr) => expr.render(self),
            LambdaBody::Block(stmts) => {
                self.append("{\n");
                self.indent();
                self.render_block(stmts)?;
                self.unindent();
                self.append("}");
                Ok(())
            }
        }
    }

    fn render_api_type(&mut self, ty: &ClassType) -> RenderResult {
        self.append(&ty.name);
        Ok(())
    }

    fn render_enum_constant(&mut self, ty: &ClassType, constant: &str) -> RenderResult {
        self.append(&ty.name);
        self.append(".");
        self.append(constant);
        Ok(())
    }

    fn render_async_result(&mut self, name: &str) -> RenderResult {
        self.append(name);
        Ok(())
    }

    fn render_console(&mut self, expr: &Expr) -> RenderResult {
        self.append("System.out.println(");
        expr.render(self)?;
        self.append(")");
        Ok(())
    }

    fn render_method_reference(&mut self, receiver: &Expr, method: &str) -> RenderResult {
        receiver.render(self)?;
        self.append("::");
        self.append(method);
        Ok(())
    }

    fn render_map_get(&mut self, map: &Expr, key: &Expr) -> RenderResult {
        map.render(self)?;
        self.append(".get(");
        key.render(self)?;
        self.append(")");
        Ok(())
    }

    fn render_map_for_each(&mut self, _iteration: &MapForEach) -> RenderResult {
        Err(self.unsupported("map iteration"))
    }

    // Object literals

    fn render_json_object(&mut self, _members: &[Member]) -> RenderResult {
        Err(self.unsupported("json object literal"))
    }

    fn render_json_array(&mut self, _values: &[Expr]) -> RenderResult {
        Err(self.unsupported("json array literal"))
    }

    fn render_data_object(&mut self, _literal: &DataObjectLiteral) -> RenderResult {
        Err(self.unsupported("data object literal"))
    }

    /// Member name inside an object literal. With `unquote`, string literal
    /// names are written bare.
    fn render_member_key(&mut self, name: &Expr, unquote: bool) -> RenderResult {
        match name {
            Expr::Literal(Literal::Str(key)) if unquote => {
                self.append(key);
                Ok(())
            }
            other => other.render(self),
        }
    }

    fn render_object_literal(
        &mut self,
        members: &[Member],
        unquote: bool,
        syntax: &ContainerSyntax,
    ) -> RenderResult {
        if members.is_empty() {
            self.append(syntax.empty_object);
            return Ok(());
        }
        self.append(syntax.object_open);
        self.append("\n");
        self.indent();
        for (i, member) in members.iter().enumerate() {
            self.render_member_key(&member.name, unquote)?;
            self.append(syntax.key_separator);
            match &member.value {
                MemberValue::Single(value) => value.render(self)?,
                MemberValue::Array(values) => self.render_array_literal(values, syntax)?,
            }
            if i + 1 < members.len() {
                self.append(syntax.separator);
            }
            self.append("\n");
        }
        self.unindent();
        self.append(syntax.object_close);
        Ok(())
    }

    fn render_array_literal(&mut self, values: &[Expr], syntax: &ContainerSyntax) -> RenderResult {
        if values.is_empty() {
            self.append(syntax.empty_array);
            return Ok(());
        }
        self.append(syntax.array_open);
        self.append("\n");
        self.indent();
        for (i, value) in values.iter().enumerate() {
            value.render(self)?;
            if i + 1 < values.len() {
                self.append(syntax.separator);
            }
            self.append("\n");
        }
        self.unindent();
        self.append(syntax.array_close);
        Ok(())
    }

    fn render_json_object_assign(&mut self, _object: &Expr, _name: &Expr, _value: &Expr) -> RenderResult {
        Err(self.unsupported("json object assignment"))
    }

    fn render_json_object_member_select(&mut self, _object: &Expr, _name: &Expr) -> RenderResult {
        Err(self.unsupported("json object member access"))
    }

    fn render_json_object_to_string(&mut self, object: &Expr) -> RenderResult {
        object.render(self)?;
        self.append(".encode()");
        Ok(())
    }

    fn render_json_array_to_string(&mut self, array: &Expr) -> RenderResult {
        array.render(self)?;
        self.append(".encode()");
        Ok(())
    }

    fn render_data_object_member_select(&mut self, object: &Expr, name: &str) -> RenderResult {
        self.render_member_select(object, name)
    }

    fn render_data_object_assign(&mut self, object: &Expr, name: &str, value: &Expr) -> RenderResult {
        self.render_data_object_member_select(object, name)?;
        self.append(" = ");
        value.render(self)
    }

    // Statements

    fn render_var_decl(&mut self, ty: &TypeInfo, name: &str, init: Option<&Expr>) -> RenderResult {
        self.render_type_name(ty)?;
        self.append(" ");
        self.append(name);
        if let Some(init) = init {
            self.append(" = ");
            init.render(self)?;
        }
        Ok(())
    }

    /// ` {`, the indented body, then `}`.
    fn render_braced(&mut self, body: &Stmt) -> RenderResult {
        self.append(" {\n");
        self.indent();
        self.render_body(body)?;
        self.unindent();
        self.append("}");
        Ok(())
    }

    fn render_for(&mut self, init: &Stmt, test: &Expr, update: &Expr, body: &Stmt) -> RenderResult {
        self.append("for (");
        init.render(self)?;
        self.append("; ");
        test.render(self)?;
        self.append("; ");
        update.render(self)?;
        self.append(")");
        self.render_braced(body)
    }

    fn render_for_each(&mut self, variable: &str, iterable: &Expr, body: &Stmt) -> RenderResult {
        self.append("for (var ");
        self.append(variable);
        self.append(" : ");
        iterable.render(self)?;
        self.append(")");
        self.render_braced(body)
    }

    fn render_if(&mut self, test: &Expr, then: &Stmt, otherwise: Option<&Stmt>) -> RenderResult {
        self.append("if (");
        test.render(self)?;
        self.append(")");
        self.render_braced(then)?;
        match otherwise {
            Some(Stmt::If {
                test,
                then,
                otherwise,
            }) => {
                self.append(" else ");
                self.render_if(test, then, otherwise.as_deref())
            }
            Some(other) => {
                self.append(" else");
                self.render_braced(other)
            }
            None => Ok(()),
        }
    }

    fn render_while(&mut self, test: &Expr, body: &Stmt) -> RenderResult {
        self.append("while (");
        test.render(self)?;
        self.append(")");
        self.render_braced(body)
    }

    fn render_throw(&mut self, exception: &str, reason: Option<&Expr>) -> RenderResult {
        self.append("throw new ");
        self.append(exception);
        self.append("(");
        if let Some(reason) = reason {
            reason.render(self)?;
        }
        self.append(")");
        Ok(())
    }

    fn render_return(&mut self, expr: Option<&Expr>) -> RenderResult {
        self.append("return");
        if let Some(expr) = expr {
            self.append(" ");
            expr.render(self)?;
        }
        Ok(())
    }

    fn render_break(&mut self) -> RenderResult {
        self.append("break");
        Ok(())
    }

    fn render_continue(&mut self) -> RenderResult {
        self.append("continue");
        Ok(())
    }
}

/// Writer with only the C-family defaults.
pub struct DefaultWriter {
    state: WriterState,
}

impl DefaultWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            state: WriterState::new(indent_unit),
        }
    }
}

impl CodeWriter for DefaultWriter {
    fn state(&self) -> &WriterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WriterState {
        &mut self.state
    }

    fn lang_name(&self) -> &'static str {
        "default"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(expr: &Expr) -> String {
        let mut writer = DefaultWriter::new("  ");
        writer.render_fragment(expr).unwrap();
        writer.finish()
    }

    #[test]
    fn test_indent_applies_to_new_lines() {
        let mut state = WriterState::new("  ");
        state.push_str("a {\n");
        state.indent();
        state.push_str("b\n\nc\n");
        state.unindent();
        state.push_str("}");
        assert_eq!(state.as_str(), "a {\n  b\n\n  c\n}");
    }

    #[test]
    fn test_prepend_header_keeps_body() {
        let mut state = WriterState::new("  ");
        state.push_str("body\n");
        state.prepend_header(&["import a".into(), "import b".into()]);
        assert_eq!(state.as_str(), "import a\nimport b\nbody\n");
    }

    #[test]
    fn test_block_depth_tracking() {
        let mut state = WriterState::new("  ");
        assert!(state.enter_block());
        assert!(!state.enter_block());
        state.exit_block();
        state.exit_block();
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_statement_single_newline() {
        let mut writer = DefaultWriter::new("  ");
        let program = Program::new(vec![
            Stmt::return_stmt(Some(Expr::int(1))),
            Stmt::block(vec![Stmt::Break]),
        ]);
        writer.render_program(&program).unwrap();
        assert_eq!(writer.finish(), "return 1\nbreak\n");
    }

    #[test]
    fn test_parens_preserved() {
        let expr = Expr::binary(
            Expr::parens(Expr::binary(Expr::int(1), BinaryOp::Add, Expr::int(2))),
            BinaryOp::Mul,
            Expr::int(3),
        );
        assert_eq!(fragment(&expr), "(1 + 2) * 3");
    }

    #[test]
    fn test_data_object_assign_default() {
        let mut writer = DefaultWriter::new("  ");
        writer
            .render_data_object_assign(&Expr::ident("opts"), "Timeout", &Expr::int(30))
            .unwrap();
        assert_eq!(writer.finish(), "opts.Timeout = 30");
    }

    #[test]
    fn test_json_literal_unsupported_by_default() {
        let mut writer = DefaultWriter::new("  ");
        let err = writer.render_fragment(&Expr::JsonArray(vec![])).unwrap_err();
        assert!(matches!(err, RenderError::Unsupported { lang: "default", .. }));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("a\"b\\c\n"), "a\\\"b\\\\c\\n");
    }
}
