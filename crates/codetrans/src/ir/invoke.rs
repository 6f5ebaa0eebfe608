use super::Expr;
use crate::data_object;
use crate::error::RenderError;

impl Expr {
    /// Build the node for `receiver.method(args)`.
    ///
    /// Data object, JSON object and JSON array values accept a closed set of
    /// methods that map onto structural operations; any other receiver
    /// becomes a plain method call.
    pub fn invoke(receiver: Expr, method: &str, args: Vec<Expr>) -> Result<Expr, RenderError> {
        match receiver {
            Expr::DataObjectValue(inner) => data_object::invoke(*inner, method, args),
            Expr::JsonObjectValue(inner) => json_object_invoke(*inner, method, args),
            Expr::JsonArrayValue(inner) => json_array_invoke(*inner, method, args),
            receiver => Ok(Expr::call(Some(receiver), method, args)),
        }
    }
}

fn json_object_invoke(object: Expr, method: &str, args: Vec<Expr>) -> Result<Expr, RenderError> {
    let mut args = args.into_iter();
    match (method, args.next(), args.next(), args.next()) {
        ("put", Some(name), Some(value), None) => Ok(Expr::JsonObjectAssign {
            object: Box::new(object),
            name: Box::new(name),
            value: Box::new(value),
        }),
        (getter, Some(name), None, None) if is_getter(getter) => {
            Ok(Expr::JsonObjectMemberSelect {
                object: Box::new(object),
                name: Box::new(name),
            })
        }
        ("encode" | "toString", None, None, None) => {
            Ok(Expr::JsonObjectToString(Box::new(object)))
        }
        _ => Err(RenderError::UnsupportedMethod {
            method: method.to_string(),
            receiver: "json object",
        }),
    }
}

/// `get` alone or followed by a type name (`getString`, `getInteger`).
fn is_getter(method: &str) -> bool {
    method
        .strip_prefix("get")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn json_array_invoke(array: Expr, method: &str, args: Vec<Expr>) -> Result<Expr, RenderError> {
    match (method, args.is_empty()) {
        ("encode" | "toString", true) => Ok(Expr::JsonArrayToString(Box::new(array))),
        _ => Err(RenderError::UnsupportedMethod {
            method: method.to_string(),
            receiver: "json array",
        }),
    }
}
