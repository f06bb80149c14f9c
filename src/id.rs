use nanoid::nanoid;

/// Canonical alphabet for comment identifiers (no ambiguous glyphs).
const COMMENT_ID_ALPHABET: &[char] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
/// Default comment id length.
const COMMENT_ID_LENGTH: usize = 16;

/// Generates a new comment identifier using the configured alphabet and length.
pub fn generate_comment_id() -> String {
    nanoid!(COMMENT_ID_LENGTH, COMMENT_ID_ALPHABET)
}
