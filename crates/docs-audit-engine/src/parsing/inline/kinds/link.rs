/// Markdown inline link `[text](target "title")` delimiters.
pub struct Link;

impl Link {
    pub const TEXT_OPEN: u8 = b'[';
    pub const TEXT_CLOSE: u8 = b']';
    pub const TARGET_OPEN: u8 = b'(';
    pub const TARGET_CLOSE: u8 = b')';
    /// Prefix that turns a link into an image reference.
    pub const IMAGE_BANG: u8 = b'!';
    pub const ESCAPE: u8 = b'\\';
}
