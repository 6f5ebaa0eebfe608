use super::{Expr, Literal};
use crate::error::RenderError;
use crate::types::ClassType;
use serde::{Deserialize, Serialize};

/// A name/value(s) pair inside a JSON object or data object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Usually a string literal.
    pub name: Expr,
    pub value: MemberValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberValue {
    Single(Expr),
    Array(Vec<Expr>),
}

impl Member {
    pub fn single(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: Expr::string(name),
            value: MemberValue::Single(value),
        }
    }

    pub fn array(name: impl Into<String>, values: Vec<Expr>) -> Self {
        Self {
            name: Expr::string(name),
            value: MemberValue::Array(values),
        }
    }

    /// The member name when it is a plain string literal.
    pub fn key(&self) -> Option<&str> {
        match &self.name {
            Expr::Literal(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }
}

/// Declarative construction of a data object.
///
/// Member names are unique; insertion order is the emitted property order.
/// Deserialization goes through [`DataObjectLiteral::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataObjectLiteral")]
pub struct DataObjectLiteral {
    pub ty: ClassType,
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct RawDataObjectLiteral {
    ty: ClassType,
    members: Vec<Member>,
}

impl TryFrom<RawDataObjectLiteral> for DataObjectLiteral {
    type Error = RenderError;

    fn try_from(raw: RawDataObjectLiteral) -> Result<Self, Self::Error> {
        Self::new(raw.ty, raw.members)
    }
}

impl DataObjectLiteral {
    pub fn new(ty: ClassType, members: Vec<Member>) -> Result<Self, RenderError> {
        for (i, member) in members.iter().enumerate() {
            if members[..i].iter().any(|m| m.name == member.name) {
                let name = member
                    .key()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{:?}", member.name));
                return Err(RenderError::DuplicateMember(name));
            }
        }
        Ok(Self { ty, members })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

impl From<DataObjectLiteral> for Expr {
    fn from(literal: DataObjectLiteral) -> Self {
        Expr::DataObject(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_member_rejected() {
        let err = DataObjectLiteral::new(
            ClassType::data_object("Options"),
            vec![
                Member::single("host", Expr::string("a")),
                Member::single("port", Expr::int(1)),
                Member::single("host", Expr::string("b")),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::DuplicateMember(name) if name == "host"));
    }

    #[test]
    fn test_member_order_preserved() {
        let literal = DataObjectLiteral::new(
            ClassType::data_object("Options"),
            vec![
                Member::single("port", Expr::int(1)),
                Member::single("host", Expr::string("a")),
            ],
        )
        .unwrap();
        let keys: Vec<_> = literal.members().iter().filter_map(Member::key).collect();
        assert_eq!(keys, vec!["port", "host"]);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_member() {
        let json = r#"{
            "ty": {"kind": "DataObject", "name": "io.example.Options", "simple_name": "Options"},
            "members": [
                {"name": {"Literal": {"Str": "host"}}, "value": {"Single": {"Literal": {"Str": "a"}}}},
                {"name": {"Literal": {"Str": "host"}}, "value": {"Single": {"Literal": {"Str": "b"}}}}
            ]
        }"#;
        let err = serde_json::from_str::<DataObjectLiteral>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate member `host`"), "{err}");

        let single = json.replacen("\"host\"", "\"port\"", 1);
        let literal: DataObjectLiteral = serde_json::from_str(&single).unwrap();
        assert_eq!(literal.members().len(), 2);
    }
}
