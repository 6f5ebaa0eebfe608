//! Target language backends.

#[cfg(feature = "groovy")]
pub mod groovy;

#[cfg(feature = "lua")]
pub mod lua;

#[cfg(feature = "groovy")]
pub use groovy::{GROOVY_LANG, GroovyLang, GroovyWriter};

#[cfg(feature = "lua")]
pub use lua::{LUA_LANG, LuaLang, LuaWriter};
