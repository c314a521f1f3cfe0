//! Command definitions
//!
//! Represents requests sent to the server.

use std::fmt;

use bytes::Bytes;

/// Command types, keyed by their wire letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Fetch = b'G',
    Store = b'P',
    Refresh = b'T',
    Remove = b'R',
}

impl CommandType {
    /// Wire letter of this command
    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

/// Final component of a cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Int(i64),
    Str(String),
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Int(n) => write!(f, "{}", n),
            KeyToken::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for KeyToken {
    fn from(n: i64) -> Self {
        KeyToken::Int(n)
    }
}

impl From<u32> for KeyToken {
    fn from(n: u32) -> Self {
        KeyToken::Int(i64::from(n))
    }
}

impl From<i32> for KeyToken {
    fn from(n: i32) -> Self {
        KeyToken::Int(i64::from(n))
    }
}

impl From<&str> for KeyToken {
    fn from(s: &str) -> Self {
        KeyToken::Str(s.to_string())
    }
}

impl From<String> for KeyToken {
    fn from(s: String) -> Self {
        KeyToken::Str(s)
    }
}

/// Three-part key addressing a cache entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub level: u64,
    pub sub_level: u64,
    pub key: KeyToken,
}

impl CacheKey {
    pub fn new(level: u64, sub_level: u64, key: impl Into<KeyToken>) -> Self {
        Self {
            level,
            sub_level,
            key: key.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.level, self.sub_level, self.key)
    }
}

/// A request to the server
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch an entry, optionally extending its lifetime
    Fetch { key: CacheKey, lifetime: u64 },

    /// Store an entry
    Store {
        key: CacheKey,
        lifetime: u64,
        payload: Bytes,
    },

    /// Refresh an entry's lifetime
    Refresh { key: CacheKey, lifetime: u64 },

    /// Remove an entry
    Remove { key: CacheKey },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Fetch { .. } => CommandType::Fetch,
            Command::Store { .. } => CommandType::Store,
            Command::Refresh { .. } => CommandType::Refresh,
            Command::Remove { .. } => CommandType::Remove,
        }
    }

    pub fn key(&self) -> &CacheKey {
        match self {
            Command::Fetch { key, .. }
            | Command::Store { key, .. }
            | Command::Refresh { key, .. }
            | Command::Remove { key } => key,
        }
    }
}
