//! Demangler for symbols produced by the Microsoft Visual C++ compiler.
//!
//! ```text
//! bytes -> decoder -> SymbolTree -> renderer -> text
//! ```
//!
//! The decoder ([`demangle`]) is a single-pass recursive-descent parser over
//! the mangled bytes, producing one owned [`SymbolTree`] per symbol or a
//! [`MalformedSymbol`] error locating the offending byte.  The renderer
//! ([`TextOutput`]) walks that tree and reconstructs the declaration,
//! honoring an [`Attributes`] set that ranges from `undname.exe`
//! compatibility (bugs included) to readable output.
//!
//! ```
//! use demangler::{demangle, Attributes, TextOutput};
//!
//! let tree = demangle("?foo@Bar@@SAHH@Z").unwrap();
//! let text = TextOutput::new(Attributes::undname()).convert(&tree);
//! assert_eq!(text, "public: static int __cdecl Bar::foo(int)");
//! ```

mod ast;
mod attributes;
mod codes;
mod decoder;
mod error;
mod text;

#[cfg(test)]
mod tests;

pub use ast::{Distance, MethodProperty, Scope, SymbolTree, SymbolType, TemplateParameter};
pub use attributes::Attributes;
pub use codes::{code_string, Code};
pub use error::{MalformedSymbol, Result};
pub use text::TextOutput;

/// Decode one mangled symbol into its tree.
pub fn demangle(mangled: &str) -> Result<SymbolTree> {
    demangle_with_debug(mangled, false)
}

/// Decode one mangled symbol, optionally tracing every grammar step and
/// stack push to stderr.
pub fn demangle_with_debug(mangled: &str, debug: bool) -> Result<SymbolTree> {
    decoder::Demangler::new(mangled.as_bytes(), debug).analyze()
}
