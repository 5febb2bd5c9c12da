//! # Snapshot Testing Support
//!
//! Utilities for testing the segmenter via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts block trees to a stable, indented outline for
//!   `insta` snapshot testing
//! - **`invariants`**: Runtime checks for segmenter correctness (spans in bounds,
//!   child spans contained in parents, siblings ordered, text matching spans)
//!
//! ## Testing Strategy
//!
//! Segmentation behavior is pinned by snapshot tests rather than a separate
//! formal grammar. Outlines show block kinds, spans and text previews.

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::outline;
