//! Loading and running script resources against a set of globals.

use crate::error::{BoxError, ScriptError};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Name to value bindings visible to a running script.
///
/// Values a script assigns to names already present are written back.
pub type Globals = BTreeMap<String, serde_json::Value>;

/// Source of script resources, addressed by slash-separated paths.
pub trait ResourceLoader {
    fn load(&self, path: &str) -> Option<String>;
}

/// Loads resources from a list of root directories, first match wins.
#[derive(Debug, Clone, Default)]
pub struct DirLoader {
    roots: Vec<PathBuf>,
}

impl DirLoader {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl ResourceLoader for DirLoader {
    fn load(&self, path: &str) -> Option<String> {
        self.roots
            .iter()
            .find_map(|root| std::fs::read_to_string(root.join(path)).ok())
    }
}

/// In-memory resources.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    resources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.resources.insert(path.into(), source.into());
        self
    }
}

impl ResourceLoader for MemoryLoader {
    fn load(&self, path: &str) -> Option<String> {
        self.resources.get(path).cloned()
    }
}

/// A loaded, compiled script.
pub trait Script {
    /// Resource path the script was loaded from.
    fn path(&self) -> &str;

    fn source(&self) -> &str;

    /// Execute against `globals`. Errors raised by the script are returned
    /// as [`ScriptError::Execution`] with the original cause.
    fn run(&self, globals: &mut Globals) -> Result<(), ScriptError>;
}

/// An external interpreter for a target language that has no in-process
/// runtime.
pub trait ScriptEngine {
    /// Check that `source` compiles.
    fn compile(&self, name: &str, source: &str) -> Result<(), BoxError>;

    fn execute(&self, name: &str, source: &str, globals: &mut Globals) -> Result<(), BoxError>;
}

/// Read `path` through `loader`, failing with [`ScriptError::Load`].
pub fn load_source(loader: &dyn ResourceLoader, path: &str) -> Result<String, ScriptError> {
    loader.load(path).ok_or_else(|| ScriptError::Load {
        path: path.to_string(),
        reason: "resource not found".to_string(),
    })
}
