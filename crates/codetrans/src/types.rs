//! Descriptions of host types referenced by the IR.
//!
//! These come from an external type-description service; the renderer only
//! needs names, a classification, and per-language spellings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a described class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// A generated API surface (translated per language).
    Api,
    Enum,
    /// A structured config/value object with getter/setter accessors.
    DataObject,
    JsonObject,
    JsonArray,
    Other,
}

/// A class described by the type service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub kind: ClassKind,
    /// Fully qualified name (e.g., "io.vertx.core.http.HttpMethod").
    pub name: String,
    /// Simple name (e.g., "HttpMethod").
    pub simple_name: String,
    /// Qualified spelling per target language, keyed by language name.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl ClassType {
    pub fn new(kind: ClassKind, name: impl Into<String>) -> Self {
        let name = name.into();
        let simple_name = name.rsplit('.').next().unwrap_or(&name).to_string();
        Self {
            kind,
            name,
            simple_name,
            translations: BTreeMap::new(),
        }
    }

    pub fn api(name: impl Into<String>) -> Self {
        Self::new(ClassKind::Api, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(ClassKind::Enum, name)
    }

    pub fn data_object(name: impl Into<String>) -> Self {
        Self::new(ClassKind::DataObject, name)
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::new(ClassKind::Other, name)
    }

    /// Add the qualified spelling used by `lang`.
    pub fn with_translation(mut self, lang: &str, name: impl Into<String>) -> Self {
        self.translations.insert(lang.to_string(), name.into());
        self
    }

    /// Qualified spelling for `lang`, falling back to the host name.
    pub fn translate_name(&self, lang: &str) -> &str {
        self.translations
            .get(lang)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    /// Whether references to this type are tracked as imports.
    pub fn is_importable(&self) -> bool {
        matches!(self.kind, ClassKind::Api | ClassKind::Enum)
    }
}

/// A type as seen by declarations, lambdas and constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeInfo {
    Void,
    Primitive(String),
    Class(ClassType),
    Parameterized { raw: ClassType, args: Vec<TypeInfo> },
}

impl TypeInfo {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeInfo::Primitive(name.into())
    }

    /// Host-side qualified name.
    pub fn name(&self) -> &str {
        match self {
            TypeInfo::Void => "void",
            TypeInfo::Primitive(name) => name,
            TypeInfo::Class(class) => &class.name,
            TypeInfo::Parameterized { raw, .. } => &raw.name,
        }
    }

    /// The described class, if this is a class or parameterized type.
    pub fn class(&self) -> Option<&ClassType> {
        match self {
            TypeInfo::Class(class) | TypeInfo::Parameterized { raw: class, .. } => Some(class),
            _ => None,
        }
    }

    /// Type argument at `index` of a parameterized type.
    pub fn arg(&self, index: usize) -> Option<&TypeInfo> {
        match self {
            TypeInfo::Parameterized { args, .. } => args.get(index),
            _ => None,
        }
    }
}

impl From<ClassType> for TypeInfo {
    fn from(class: ClassType) -> Self {
        TypeInfo::Class(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let ty = ClassType::enumeration("io.vertx.core.http.HttpMethod");
        assert_eq!(ty.simple_name, "HttpMethod");
        assert_eq!(ClassType::other("Color").simple_name, "Color");
    }

    #[test]
    fn test_translate_name_fallback() {
        let ty = ClassType::api("io.vertx.core.Vertx")
            .with_translation("groovy", "io.vertx.groovy.core.Vertx");
        assert_eq!(ty.translate_name("groovy"), "io.vertx.groovy.core.Vertx");
        assert_eq!(ty.translate_name("lua"), "io.vertx.core.Vertx");
    }

    #[test]
    fn test_parameterized_arg() {
        let ty = TypeInfo::Parameterized {
            raw: ClassType::other("io.vertx.core.AsyncResult"),
            args: vec![TypeInfo::primitive("String")],
        };
        assert_eq!(ty.name(), "io.vertx.core.AsyncResult");
        assert_eq!(ty.arg(0), Some(&TypeInfo::primitive("String")));
        assert_eq!(ty.arg(1), None);
    }
}
