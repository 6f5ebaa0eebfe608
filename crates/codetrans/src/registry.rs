//! Registry of target languages.

use crate::config::Config;
use crate::lang::Lang;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Creates sessions for one target language.
pub trait LangProvider: Send + Sync {
    /// Language identifier (e.g., "groovy", "lua").
    fn name(&self) -> &'static str;

    /// File extension of scripts in this language.
    fn extension(&self) -> &'static str;

    /// A fresh session with its own import set.
    fn create(&self, config: Config) -> Box<dyn Lang>;
}

/// Global language registry.
static LANGS: RwLock<Vec<&'static dyn LangProvider>> = RwLock::new(Vec::new());
static LANGS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom language. Later registrations never shadow earlier
/// ones with the same name.
pub fn register_lang(provider: &'static dyn LangProvider) {
    tracing::debug!(lang = provider.name(), "registering language");
    LANGS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(provider);
}

fn init_langs() {
    LANGS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "groovy")]
        {
            register_lang(&crate::output::groovy::GROOVY_LANG);
        }
        #[cfg(feature = "lua")]
        {
            register_lang(&crate::output::lua::LUA_LANG);
        }
    });
}

fn find(pred: impl Fn(&dyn LangProvider) -> bool) -> Option<&'static dyn LangProvider> {
    init_langs();
    LANGS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|p| pred(**p))
        .copied()
}

/// Get a language by name.
pub fn lang_for_name(name: &str) -> Option<&'static dyn LangProvider> {
    find(|p| p.name() == name)
}

/// Get a language by script file extension.
pub fn lang_for_extension(ext: &str) -> Option<&'static dyn LangProvider> {
    find(|p| p.extension() == ext)
}

/// Get all registered languages.
pub fn langs() -> Vec<&'static dyn LangProvider> {
    init_langs();
    LANGS.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "groovy")]
    fn test_groovy_lookup() {
        let provider = lang_for_name("groovy").expect("groovy language");
        assert_eq!(provider.extension(), "groovy");
        let lang = provider.create(Config::default());
        assert_eq!(lang.name(), "groovy");
    }

    #[test]
    #[cfg(feature = "lua")]
    fn test_lua_lookup_by_extension() {
        let provider = lang_for_extension("lua").expect("lua extension");
        assert_eq!(provider.name(), "lua");
    }

    #[test]
    fn test_unknown_language() {
        assert!(lang_for_name("cobol").is_none());
        assert!(lang_for_extension("cbl").is_none());
    }

    #[test]
    #[cfg(all(feature = "groovy", feature = "lua"))]
    fn test_builtins_listed_once() {
        let names: Vec<_> = langs().iter().map(|p| p.name()).collect();
        assert_eq!(names.iter().filter(|n| **n == "groovy").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "lua").count(), 1);
    }
}
