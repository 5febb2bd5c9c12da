//! # Block Segmentation
//!
//! Two-phase block parsing over the lines of a document.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): Each line is classified into a `LineClass`
//!    containing local facts (indentation, blockquote depth, fence, heading,
//!    list and table markers, blank status)
//!
//! 2. **Block Construction** (`builder`): A `BlockBuilder` walks the classified
//!    lines and emits `ContentBlock`s as blocks open and close
//!
//! ## Modules
//!
//! - **`types`**: Core types (`ContentBlock`, `BlockKind`, `AllInnerBlocks`)
//! - **`kinds`**: Block-specific syntax with owned delimiters (headings, fences, tables, ...)
//! - **`classify`**: `MarkdownLineClassifier` produces `LineClass` for each line
//! - **`open`**: `try_open` dispatch for detecting block openers
//! - **`builder`**: `BlockBuilder` for block construction
//! - **`toc`**: indentation-driven builder for `toc.yml` documents
//!
//! ## Key Invariants
//!
//! - Fenced code blocks are raw zones: no block/inline parsing inside
//! - Child spans lie within their parent; siblings are ordered and disjoint
//! - All blocks store absolute byte spans into the source

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod open;
pub mod toc;
pub mod types;

pub use builder::{BlockBuilder, assign_sections};
pub use classify::{LineClass, MarkdownLineClassifier};
pub use types::{AllInnerBlocks, BlockKind, ContentBlock};
