//! JSONC comment stripping.
//!
//! Configuration files may carry `//` line comments and `/* */` block
//! comments. Comment markers inside string literals are kept verbatim, and
//! newlines are preserved so parse errors still point at the right line.

use serde::de::DeserializeOwned;

use crate::loader::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String,
    Escape,
    LineComment,
    BlockComment,
}

/// Remove comments from JSONC text, leaving plain JSON.
///
/// An unterminated block comment swallows the rest of the input.
///
/// # Example
///
/// ```
/// use linthook_common_config::jsonc::strip_comments;
///
/// let json = strip_comments(r#"{ "url": "https://example.com" } // trailing"#);
/// assert_eq!(json.trim_end(), r#"{ "url": "https://example.com" }"#);
/// ```
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = State::Code;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    out.push(c);
                    state = State::String;
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => out.push(c),
            },
            State::String => {
                out.push(c);
                match c {
                    '\\' => state = State::Escape,
                    '"' => state = State::Code,
                    _ => {}
                }
            }
            State::Escape => {
                out.push(c);
                state = State::String;
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    // Keep tokens on either side of the comment apart.
                    out.push(' ');
                    state = State::Code;
                } else if c == '\n' {
                    out.push(c);
                }
            }
        }
    }

    out
}

/// Strip comments and deserialize.
pub fn parse<T: DeserializeOwned>(input: &str) -> Result<T, ConfigError> {
    let cleaned = strip_comments(input);
    serde_json::from_str(&cleaned).map_err(ConfigError::from)
}
