use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::borrow::Cow;

/// A key identifying one entry in a [`DeferSet`][crate::DeferSet].
///
/// Keys come in three flavors: caller-supplied names, caller-supplied
/// numbers, and opaque [`Token`]s. Entries registered without a key fall
/// back to `Key::Index` holding the entry's zero-based registration
/// ordinal, assigned at insertion time and never recomputed.
///
/// # Example
///
/// ```rust
/// use defer_set::Key;
///
/// let name: Key = "cache".into();
/// let index: Key = 7u64.into();
/// assert_eq!(name.to_string(), "cache");
/// assert_eq!(index.to_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named key supplied by the caller.
    Name(Cow<'static, str>),
    /// A numeric key supplied by the caller, or a default ordinal.
    Index(u64),
    /// An opaque key minted with [`Token::new`].
    Token(Token),
}

impl Key {
    /// The default key for the entry at position `index`.
    pub(crate) fn ordinal(index: usize) -> Self {
        Self::Index(index as u64)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
            Self::Token(token) => write!(f, "{token}"),
        }
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<Cow<'static, str>> for Key {
    fn from(name: Cow<'static, str>) -> Self {
        Self::Name(name)
    }
}

impl From<u64> for Key {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index as u64)
    }
}

impl From<Token> for Key {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

/// An opaque key, unique for the lifetime of the process.
///
/// The closest Rust analog to an interned symbol: [`Token::new`] never
/// returns the same token twice, so only copies of a token compare equal
/// to it.
///
/// # Example
///
/// ```rust
/// use defer_set::Token;
///
/// let a = Token::new();
/// let b = Token::new();
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u64);

impl Token {
    /// Mint a fresh token, distinct from every previously minted one.
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
