//! Rewrites accessor calls on data objects into property access.
//!
//! Data objects expose a builder-style API (`getHost()`, `setHost(h)`) but
//! are declarative property bags. Only getters and setters are accepted;
//! any other method is an error.

use crate::error::RenderError;
use crate::ir::Expr;

/// Classification of a method invoked on a data object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Property read of the named property.
    Get(String),
    /// Property write of the named property.
    Set(String),
    Unsupported,
}

/// Classify `method` called with `arity` arguments.
///
/// `get<Upper>...` with no arguments is a getter, `set<Upper>...` with one
/// argument is a setter; the property name is the remainder with its first
/// character lowercased.
pub fn classify(method: &str, arity: usize) -> Accessor {
    match (property_name(method, "get"), property_name(method, "set"), arity) {
        (Some(name), _, 0) => Accessor::Get(name),
        (_, Some(name), 1) => Accessor::Set(name),
        _ => Accessor::Unsupported,
    }
}

fn property_name(method: &str, prefix: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }
    let mut name: String = first.to_lowercase().collect();
    name.push_str(chars.as_str());
    Some(name)
}

/// Route `method(args)` on a data object `receiver`.
pub fn invoke(receiver: Expr, method: &str, mut args: Vec<Expr>) -> Result<Expr, RenderError> {
    match classify(method, args.len()) {
        Accessor::Set(name) => {
            let value = args.pop().ok_or_else(|| unsupported(method))?;
            Ok(Expr::DataObjectAssign {
                object: Box::new(receiver),
                name,
                value: Box::new(value),
            })
        }
        Accessor::Get(name) => Ok(Expr::DataObjectMemberSelect {
            object: Box::new(receiver),
            name,
        }),
        Accessor::Unsupported => Err(unsupported(method)),
    }
}

fn unsupported(method: &str) -> RenderError {
    RenderError::UnsupportedMethod {
        method: method.to_string(),
        receiver: "data object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_getter() {
        assert_eq!(classify("getHost", 0), Accessor::Get("host".into()));
        assert_eq!(classify("getIdleTimeout", 0), Accessor::Get("idleTimeout".into()));
    }

    #[test]
    fn test_classify_setter() {
        assert_eq!(classify("setPort", 1), Accessor::Set("port".into()));
    }

    #[test]
    fn test_classify_arity_mismatch() {
        assert_eq!(classify("getHost", 1), Accessor::Unsupported);
        assert_eq!(classify("setPort", 0), Accessor::Unsupported);
        assert_eq!(classify("setPort", 2), Accessor::Unsupported);
    }

    #[test]
    fn test_classify_other_names() {
        assert_eq!(classify("get", 0), Accessor::Unsupported);
        assert_eq!(classify("settle", 1), Accessor::Unsupported);
        assert_eq!(classify("toJson", 0), Accessor::Unsupported);
        assert_eq!(classify("addHeader", 1), Accessor::Unsupported);
    }

    #[test]
    fn test_invoke_setter() {
        let expr = invoke(Expr::ident("opts"), "setTimeout", vec![Expr::int(30)]).unwrap();
        assert_eq!(
            expr,
            Expr::DataObjectAssign {
                object: Box::new(Expr::ident("opts")),
                name: "timeout".into(),
                value: Box::new(Expr::int(30)),
            }
        );
    }

    #[test]
    fn test_invoke_unsupported() {
        let err = invoke(Expr::ident("opts"), "toJson", vec![]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedMethod { ref method, .. } if method == "toJson"
        ));
    }
}
