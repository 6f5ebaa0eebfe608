//! Error types for rendering and script execution.

/// Boxed error carried through from a script engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error that aborts a render pass or IR construction.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported {construct} for {lang}")]
    Unsupported {
        construct: String,
        lang: &'static str,
    },

    #[error("unsupported method {method} on {receiver}")]
    UnsupportedMethod {
        method: String,
        receiver: &'static str,
    },

    #[error("duplicate member `{0}` in data object literal")]
    DuplicateMember(String),
}

impl RenderError {
    pub fn unsupported(construct: impl Into<String>, lang: &'static str) -> Self {
        RenderError::Unsupported {
            construct: construct.into(),
            lang,
        }
    }
}

/// Error raised while loading or running a script resource.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("could not load script {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("script {path} failed")]
    Execution {
        path: String,
        #[source]
        source: BoxError,
    },
}
