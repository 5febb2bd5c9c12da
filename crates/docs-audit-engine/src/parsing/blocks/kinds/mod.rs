//! Block-specific types that own their syntax knowledge. The classifier and
//! builder ask these types; they never hardcode delimiters themselves.

pub mod arm;
pub mod block_quote;
pub mod code_fence;
pub mod front_matter;
pub mod heading;
pub mod list;
pub mod table;
pub mod zone_pivot;

pub use arm::ArmTemplate;
pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use front_matter::{FrontMatter, FrontMatterBounds};
pub use heading::{Heading, HeadingSig};
pub use list::{ListMarker, ListSyntax, indentation};
pub use table::Table;
pub use zone_pivot::ZonePivot;
