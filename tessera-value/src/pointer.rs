//! JSON Pointers (RFC 6901).

use core::fmt;
use core::str::FromStr;

use crate::ValueError;

/// One reference token of a [`Pointer`], unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    key: String,
    index: Option<usize>,
}

impl Token {
    /// A token from an unescaped key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let index = array_index(&key);
        Token { key, index }
    }

    /// The token as an object key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The token as an array index, if it is one.
    ///
    /// Only `0` and digit strings without a leading zero that fit `usize`
    /// qualify; `-` (past the end) does not.
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether this is `-`, the position past the last array element.
    pub fn is_end(&self) -> bool {
        self.key == "-"
    }
}

impl From<usize> for Token {
    fn from(index: usize) -> Self {
        Token {
            key: index.to_string(),
            index: Some(index),
        }
    }
}

fn array_index(key: &str) -> Option<usize> {
    match key.as_bytes() {
        [b'0'] => Some(0),
        [b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit) => key.parse().ok(),
        _ => None,
    }
}

/// A parsed JSON Pointer: a path of object keys and array indices.
///
/// ```
/// use tessera_value::Pointer;
///
/// let p: Pointer = "/a~1b/0".parse().unwrap();
/// assert_eq!(p.tokens()[0].key(), "a/b");
/// assert_eq!(p.tokens()[1].index(), Some(0));
/// assert_eq!(p.to_string(), "/a~1b/0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Vec<Token>,
}

impl Pointer {
    /// The empty pointer, which refers to the whole document.
    pub const fn root() -> Self {
        Pointer { tokens: Vec::new() }
    }

    /// Parse pointer text.
    ///
    /// The text must be empty or start with `/`; within tokens `~0` stands
    /// for `~` and `~1` for `/`, and any other use of `~` is an error.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        if text.is_empty() {
            return Ok(Pointer::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(ValueError::InvalidPointer {
                pointer: text.into(),
                reason: "must be empty or start with '/'",
            });
        };
        rest.split('/')
            .map(|raw| unescape(raw).map(Token::new))
            .collect::<Option<Vec<_>>>()
            .map(|tokens| Pointer { tokens })
            .ok_or_else(|| ValueError::InvalidPointer {
                pointer: text.into(),
                reason: "invalid escape sequence, only '~0' and '~1' are allowed",
            })
    }

    /// The tokens, from the root down.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether this pointer refers to the whole document.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Same as [`Pointer::is_root`].
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The last token, if any.
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// The pointer to the parent of what this one refers to.
    pub fn parent(&self) -> Option<Pointer> {
        let (_, init) = self.tokens.split_last()?;
        Some(Pointer {
            tokens: init.to_vec(),
        })
    }

    /// Split into the parent's tokens and the last token.
    pub fn split_last(&self) -> Option<(&Token, &[Token])> {
        self.tokens.split_last()
    }

    /// Append a token.
    pub fn push(&mut self, token: impl Into<Token>) {
        self.tokens.push(token.into());
    }

    /// A new pointer with `token` appended.
    pub fn join(&self, token: impl Into<Token>) -> Pointer {
        let mut p = self.clone();
        p.push(token);
        p
    }
}

impl From<&str> for Token {
    fn from(key: &str) -> Self {
        Token::new(key)
    }
}

impl From<String> for Token {
    fn from(key: String) -> Self {
        Token::new(key)
    }
}

fn unescape(raw: &str) -> Option<String> {
    if !raw.contains('~') {
        return Some(raw.to_owned());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next()? {
                '0' => out.push('~'),
                '1' => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

impl FromStr for Pointer {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pointer::parse(s)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            for c in token.key.chars() {
                match c {
                    '~' => f.write_str("~0")?,
                    '/' => f.write_str("~1")?,
                    c => fmt::Write::write_char(f, c)?,
                }
            }
        }
        Ok(())
    }
}
