//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters. The parser calls
//! these constants; it never hardcodes `[` or `` ` ``.

pub mod code_span;
pub mod link;

pub use code_span::CodeSpan;
pub use link::Link;
