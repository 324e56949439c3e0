//! The decoder's single error kind.

use std::fmt;

/// Raised for every parse failure.  `offset` locates the offending byte in
/// the mangled input (the byte that failed to parse, not the position after
/// it), `category` names the grammar slot that rejected it, and `byte` is
/// the byte itself, or 0 when the input ended early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSymbol {
    pub offset: usize,
    pub category: &'static str,
    pub byte: u8,
}

pub type Result<T> = std::result::Result<T, MalformedSymbol>;

impl fmt::Display for MalformedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.byte == 0 {
            write!(
                f,
                "mangled symbol ends abruptly in {} at offset {}",
                self.category, self.offset
            )
        } else {
            write!(
                f,
                "unrecognized {} code '{}' at offset {}",
                self.category, self.byte as char, self.offset
            )
        }
    }
}

impl std::error::Error for MalformedSymbol {}
