use super::{Expr, Literal, Stmt};
use crate::writer::{CodeWriter, RenderResult};

impl Literal {
    pub fn render<W: CodeWriter + ?Sized>(&self, w: &mut W) -> RenderResult {
        match self {
            Literal::Int(value) => w.render_int_literal(value),
            Literal::Long(value) => w.render_long_literal(value),
            Literal::Float(value) => w.render_float_literal(value),
            Literal::Double(value) => w.render_double_literal(value),
            Literal::Char(value) => w.render_char_literal(*value),
            Literal::Str(value) => w.render_string_literal(value),
            Literal::Bool(value) => w.render_bool_literal(*value),
            Literal::Null => w.render_null_literal(),
        }
    }
}

impl Expr {
    /// Append this expression to `w`.
    pub fn render<W: CodeWriter + ?Sized>(&self, w: &mut W) -> RenderResult {
        match self {
            Expr::Literal(literal) => literal.render(w),
            Expr::Binary(binary) => w.render_binary(binary),
            Expr::Unary { op, operand } => w.render_unary(*op, operand),
            Expr::Parens(inner) => {
                w.append("(");
                inner.render(w)?;
                w.append(")");
                Ok(())
            }
            Expr::Ident(name) => {
                w.append(name);
                Ok(())
            }
            Expr::This => w.render_this(),
            Expr::MemberSelect { object, name } => w.render_member_select(object, name),
            Expr::Assign { target, value } => w.render_assign(target, value),
            Expr::Conditional {
                test,
                then,
                otherwise,
            } => w.render_conditional(test, then, otherwise),
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => w.render_method_call(receiver.as_deref(), method, args),
            Expr::New { ty, args } => w.render_new(ty, args),
            Expr::Lambda(lambda) => w.render_lambda(lambda),
            Expr::EnumConstant { ty, constant } => w.render_enum_constant(ty, constant),
            Expr::ApiType(ty) => w.render_api_type(ty),
            Expr::JsonObject(members) => w.render_json_object(members),
            Expr::JsonArray(values) => w.render_json_array(values),
            Expr::DataObject(literal) => w.render_data_object(literal),
            Expr::DataObjectValue(inner)
            | Expr::JsonObjectValue(inner)
            | Expr::JsonArrayValue(inner) => inner.render(w),
            Expr::DataObjectAssign {
                object,
                name,
                value,
            } => w.render_data_object_assign(object, name, value),
            Expr::DataObjectMemberSelect { object, name } => {
                w.render_data_object_member_select(object, name)
            }
            Expr::JsonObjectAssign {
                object,
                name,
                value,
            } => w.render_json_object_assign(object, name, value),
            Expr::JsonObjectMemberSelect { object, name } => {
                w.render_json_object_member_select(object, name)
            }
            Expr::JsonObjectToString(object) => w.render_json_object_to_string(object),
            Expr::JsonArrayToString(array) => w.render_json_array_to_string(array),
            Expr::MapGet { map, key } => w.render_map_get(map, key),
            Expr::MapForEach(iteration) => w.render_map_for_each(iteration),
            Expr::MethodReference { receiver, method } => {
                w.render_method_reference(receiver, method)
            }
            Expr::Console(inner) => w.render_console(inner),
            Expr::AsyncResult(name) => w.render_async_result(name),
        }
    }
}

impl Stmt {
    /// Append this statement to `w`, without the terminating newline.
    pub fn render<W: CodeWriter + ?Sized>(&self, w: &mut W) -> RenderResult {
        match self {
            Stmt::Block(stmts) => w.render_block(stmts),
            Stmt::VarDecl { ty, name, init } => w.render_var_decl(ty, name, init.as_ref()),
            Stmt::Expr(expr) => expr.render(w),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => w.render_for(init, test, update, body),
            Stmt::ForEach {
                variable,
                iterable,
                body,
            } => w.render_for_each(variable, iterable, body),
            Stmt::Throw { exception, reason } => w.render_throw(exception, reason.as_ref()),
            Stmt::Return(expr) => w.render_return(expr.as_ref()),
            Stmt::If {
                test,
                then,
                otherwise,
            } => w.render_if(test, then, otherwise.as_deref()),
            Stmt::While { test, body } => w.render_while(test, body),
            Stmt::Break => w.render_break(),
            Stmt::Continue => w.render_continue(),
        }
    }
}
